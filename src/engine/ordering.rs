use crate::engine::classifier::Category;
use crate::model::{Entry, ModuleEntry};
use std::cmp::Ordering;

/// Display buckets in list order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DisplayBucket {
    Header,
    Separator,
    Notification,
    Updatable,
    Installed,
    SpecialNotification,
    Installable,
    Footer,
}

impl DisplayBucket {
    pub fn of(entry: &Entry, category: Category) -> Self {
        match (entry, category) {
            (Entry::Footer { is_header: true, .. }, _) => DisplayBucket::Header,
            (_, Category::Footer) => DisplayBucket::Footer,
            (_, Category::Separator(_)) => DisplayBucket::Separator,
            (_, Category::Notification(_)) => DisplayBucket::Notification,
            (_, Category::SpecialNotification(_)) => DisplayBucket::SpecialNotification,
            (_, Category::Updatable) => DisplayBucket::Updatable,
            (_, Category::Installed) => DisplayBucket::Installed,
            (_, Category::Installable) => DisplayBucket::Installable,
        }
    }
}

/// A row with its category fixed before sorting starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedEntry {
    pub entry: Entry,
    pub category: Category,
}

impl ClassifiedEntry {
    pub fn new(entry: Entry, category: Category) -> Self {
        Self { entry, category }
    }

    pub fn bucket(&self) -> DisplayBucket {
        DisplayBucket::of(&self.entry, self.category)
    }
}

/// Which tie-break the catalog section uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Recently updated catalog modules first.
    #[default]
    Update,
    /// Catalog modules alphabetically.
    Alpha,
}

impl SortMode {
    pub fn next(self) -> Self {
        match self {
            SortMode::Update => SortMode::Alpha,
            SortMode::Alpha => SortMode::Update,
        }
    }
}

/// Pure comparator over classified rows. Never classifies.
pub fn compare(a: &ClassifiedEntry, b: &ClassifiedEntry) -> Ordering {
    a.bucket()
        .cmp(&b.bucket())
        .then_with(|| {
            if a.category.rank() == b.category.rank() {
                tie_break(a, b)
            } else {
                a.category.rank().cmp(&b.category.rank())
            }
        })
}

pub fn compare_with_mode(mode: SortMode, a: &ClassifiedEntry, b: &ClassifiedEntry) -> Ordering {
    if mode == SortMode::Alpha
        && a.category == Category::Installable
        && b.category == Category::Installable
    {
        if let (Some(left), Some(right)) = (a.entry.as_module(), b.entry.as_module()) {
            let alpha = left
                .filter_level()
                .cmp(&right.filter_level())
                .then_with(|| lowercase_name(left).cmp(&lowercase_name(right)));
            if alpha != Ordering::Equal {
                return alpha;
            }
        }
    }
    compare(a, b)
}

pub fn sort_entries(entries: &mut [ClassifiedEntry], mode: SortMode) {
    entries.sort_by(|a, b| compare_with_mode(mode, a, b));
}

fn tie_break(a: &ClassifiedEntry, b: &ClassifiedEntry) -> Ordering {
    match (&a.category, &b.category) {
        (Category::Separator(left), Category::Separator(right)) => left.cmp(right),
        (Category::Notification(left), Category::Notification(right))
        | (Category::SpecialNotification(left), Category::SpecialNotification(right)) => {
            left.cmp(right)
        }
        (Category::Updatable, Category::Updatable)
        | (Category::Installable, Category::Installable) => {
            with_modules(a, b, |left, right| {
                left.filter_level()
                    .cmp(&right.filter_level())
                    .then_with(|| right.last_updated_at().cmp(&left.last_updated_at()))
                    .then_with(|| left.display_name().cmp(right.display_name()))
            })
        }
        (Category::Installed, Category::Installed) => with_modules(a, b, |left, right| {
            left.filter_level()
                .cmp(&right.filter_level())
                .then_with(|| lowercase_name(left).cmp(&lowercase_name(right)))
        }),
        _ => a.entry.id().cmp(b.entry.id()),
    }
}

fn with_modules(
    a: &ClassifiedEntry,
    b: &ClassifiedEntry,
    cmp: impl FnOnce(&ModuleEntry, &ModuleEntry) -> Ordering,
) -> Ordering {
    match (a.entry.as_module(), b.entry.as_module()) {
        (Some(left), Some(right)) => cmp(left, right),
        _ => a.entry.id().cmp(b.entry.id()),
    }
}

fn lowercase_name(module: &ModuleEntry) -> String {
    module.display_name().to_lowercase()
}
