use crate::engine::rules::ExclusionRules;
use crate::engine::tracker::UpdateTracker;
use crate::model::{Entry, ModuleDetails, ModuleEntry, ModuleFlags, NotificationKind, SeparatorKind};
use std::fmt;

/// Lifecycle category of a list row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Footer,
    Separator(SeparatorKind),
    Notification(NotificationKind),
    SpecialNotification(NotificationKind),
    /// Installed with a visible pending update.
    Updatable,
    Installed,
    /// Not installed, or installed with its update suppressed by a rule.
    Installable,
}

impl Category {
    /// Position of the category itself, independent of display buckets.
    pub fn rank(&self) -> u8 {
        match self {
            Category::Separator(_) => 1,
            Category::Notification(_) => 2,
            Category::Updatable => 3,
            Category::Installed => 4,
            Category::SpecialNotification(_) => 5,
            Category::Installable => 6,
            Category::Footer => 7,
        }
    }

    pub fn is_module(&self) -> bool {
        matches!(
            self,
            Category::Updatable | Category::Installed | Category::Installable
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Footer => "footer",
            Category::Separator(_) => "separator",
            Category::Notification(_) => "notification",
            Category::SpecialNotification(_) => "special-notification",
            Category::Updatable => "updatable",
            Category::Installed => "installed",
            Category::Installable => "installable",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Assigns categories to rows and decides which catalog rows are worth showing.
pub struct EntryClassifier<'a> {
    rules: &'a ExclusionRules,
    disable_low_quality_filter: bool,
}

impl<'a> EntryClassifier<'a> {
    pub fn new(rules: &'a ExclusionRules, disable_low_quality_filter: bool) -> Self {
        Self {
            rules,
            disable_low_quality_filter,
        }
    }

    /// Classify one row.
    ///
    /// The only side effect is registering a module in `tracker` the first
    /// time it is seen with a visible, non-excluded update.
    pub fn classify(&self, entry: &Entry, tracker: &mut UpdateTracker) -> Category {
        match entry {
            Entry::Footer { .. } => Category::Footer,
            Entry::Separator(kind) => Category::Separator(*kind),
            Entry::Notification { kind, special } => {
                if *special {
                    Category::SpecialNotification(*kind)
                } else {
                    Category::Notification(*kind)
                }
            }
            Entry::Module(module) => self.classify_module(module, tracker),
        }
    }

    pub fn classify_module(&self, module: &ModuleEntry, tracker: &mut UpdateTracker) -> Category {
        let Some(local) = module.local() else {
            return Category::Installable;
        };

        let catalog_version = module.remote().map(|remote| remote.version_code);
        let remote_version = catalog_version.unwrap_or(local.update_version_code);

        if local.installed_version_code >= module.available_version_code() {
            return Category::Installed;
        }

        if self.rules.is_excluded(&local.id, remote_version) {
            tracing::debug!("Module {} has an update, but it is excluded", local.id);
            return Category::Installable;
        }

        if tracker.register(&local.id) {
            tracing::debug!(
                "Module {} has an update ({} -> {}), {} pending",
                local.id,
                local.installed_version_code,
                remote_version,
                tracker.count()
            );
        }
        Category::Updatable
    }

    /// False for catalog-only modules hidden by the low-quality filter.
    pub fn should_display(&self, module: &ModuleEntry) -> bool {
        if module.local().is_some() || self.disable_low_quality_filter {
            return true;
        }
        match module.remote() {
            Some(remote) => {
                let low_quality = is_low_quality(&ModuleDetails::from(remote));
                if low_quality {
                    tracing::debug!("Hiding low quality module {}", module.id());
                }
                !low_quality
            }
            None => false,
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|text| text.trim().is_empty())
}

/// Heuristic for catalog metadata that is too sparse or suspicious to list.
pub fn is_low_quality(details: &ModuleDetails<'_>) -> bool {
    if details.flags.contains(ModuleFlags::METADATA_INVALID)
        || details.name.chars().count() < 3
        || details.version_code < 0
        || is_blank(details.author)
        || is_blank(details.description)
        || details.id.starts_with('.')
    {
        return true;
    }

    details
        .description
        .is_some_and(|description| description.trim().to_lowercase() == details.name.to_lowercase())
}
