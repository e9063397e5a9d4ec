// Classification and ordering engine for the module list.
//
// - rules: exclusion rules that hide pending updates
// - tracker: per-build count of modules with a visible update
// - classifier: row -> category, plus the low-quality display filter
// - ordering: pure comparator over classified rows
// - buttons: per-row action affordances
pub mod buttons;
pub mod classifier;
pub mod ordering;
pub mod rules;
pub mod tracker;

pub use buttons::{ActionButton, ButtonCapabilityResolver};
pub use classifier::{Category, EntryClassifier};
pub use ordering::{ClassifiedEntry, DisplayBucket, SortMode};
pub use rules::{ExclusionRule, ExclusionRules, RuleMode, RuleParseError};
pub use tracker::{UpdateSummary, UpdateTracker};
