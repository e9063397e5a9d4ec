pub mod list_builder;
pub mod settings_editor;
pub mod snapshot_loader;

pub use list_builder::{BuiltList, ListBuilder, ListRow};
pub use settings_editor::{RemovalResult, SettingsEditor};
pub use snapshot_loader::{Snapshot, SnapshotLoader};
