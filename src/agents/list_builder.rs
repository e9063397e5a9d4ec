use crate::capability::ConfigTargetResolver;
use crate::engine::ordering::{self, ClassifiedEntry, SortMode};
use crate::engine::{
    ActionButton, ButtonCapabilityResolver, Category, EntryClassifier, ExclusionRules,
    UpdateSummary, UpdateTracker,
};
use crate::error::Result;
use crate::model::{
    Entry, LocalInfo, ModuleDetails, ModuleEntry, NotificationKind, RemoteInfo, SeparatorKind,
};
use crate::settings::DisplaySettings;
use std::collections::{BTreeMap, BTreeSet};

/// A sorted row ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRow {
    pub entry: Entry,
    pub category: Category,
    pub buttons: Vec<ActionButton>,
}

/// Output of one build pass. Immutable once handed to the renderer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuiltList {
    pub rows: Vec<ListRow>,
    pub summary: UpdateSummary,
}

impl BuiltList {
    pub fn updatable(&self) -> impl Iterator<Item = &ModuleEntry> {
        self.rows
            .iter()
            .filter(|row| row.category == Category::Updatable)
            .filter_map(|row| row.entry.as_module())
    }
}

/// Assembles, classifies and orders the rows for one refresh.
pub struct ListBuilder<'a> {
    rules: &'a ExclusionRules,
    targets: &'a dyn ConfigTargetResolver,
    display: DisplaySettings,
    query: String,
    sort_mode: SortMode,
    disabled_repos: BTreeSet<String>,
    extra_rows: Vec<Entry>,
}

impl<'a> ListBuilder<'a> {
    pub fn new(
        rules: &'a ExclusionRules,
        targets: &'a dyn ConfigTargetResolver,
        display: DisplaySettings,
    ) -> Self {
        Self {
            rules,
            targets,
            display,
            query: String::new(),
            sort_mode: SortMode::default(),
            disabled_repos: BTreeSet::new(),
            extra_rows: Vec::new(),
        }
    }

    pub fn query(mut self, query: &str) -> Self {
        self.query = query.trim().to_lowercase();
        self
    }

    pub fn sort_mode(mut self, sort_mode: SortMode) -> Self {
        self.sort_mode = sort_mode;
        self
    }

    pub fn disabled_repos<I, S>(mut self, repos: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.disabled_repos.extend(repos.into_iter().map(Into::into));
        self
    }

    pub fn notification(mut self, kind: NotificationKind, special: bool) -> Self {
        self.extra_rows.push(Entry::Notification { kind, special });
        self
    }

    pub fn separator(mut self, kind: SeparatorKind) -> Self {
        self.extra_rows.push(Entry::Separator(kind));
        self
    }

    pub fn insets(mut self, header_px: u32, footer_px: u32) -> Self {
        self.extra_rows.push(Entry::header(header_px));
        self.extra_rows.push(Entry::footer(footer_px));
        self
    }

    /// Run a full build pass with a fresh update tracker.
    pub fn build(&self, installed: Vec<LocalInfo>, catalog: Vec<RemoteInfo>) -> Result<BuiltList> {
        let classifier = EntryClassifier::new(self.rules, self.display.disable_low_quality_filter);

        let mut tracker = UpdateTracker::new();
        let mut classified: Vec<ClassifiedEntry> = self
            .extra_rows
            .iter()
            .map(|entry| {
                let category = classifier.classify(entry, &mut tracker);
                ClassifiedEntry::new(entry.clone(), category)
            })
            .collect();

        // Classification happens before the query filter so the update count
        // does not depend on the search text. The comparator only reads.
        for module in self.merge(installed, catalog)? {
            if !classifier.should_display(&module) {
                continue;
            }
            let category = classifier.classify_module(&module, &mut tracker);
            let Some(level) = filter_level(&module.main_info(), &self.query) else {
                continue;
            };
            classified.push(ClassifiedEntry::new(
                Entry::Module(module.with_filter_level(level)),
                category,
            ));
        }

        ordering::sort_entries(&mut classified, self.sort_mode);

        let buttons = ButtonCapabilityResolver::new(
            self.targets,
            self.display.web_view_available,
            self.display.showcase_mode,
        );
        let rows: Vec<ListRow> = classified
            .into_iter()
            .map(|classified| ListRow {
                buttons: buttons.resolve(&classified.entry),
                entry: classified.entry,
                category: classified.category,
            })
            .collect();

        let summary = tracker.summary();
        tracing::info!(
            "Built {} rows, {} module(s) with updates",
            rows.len(),
            summary.count
        );

        Ok(BuiltList { rows, summary })
    }

    fn merge(&self, installed: Vec<LocalInfo>, catalog: Vec<RemoteInfo>) -> Result<Vec<ModuleEntry>> {
        let mut merged: BTreeMap<String, (Option<LocalInfo>, Option<RemoteInfo>)> = BTreeMap::new();

        for local in installed {
            let id = local.id.clone();
            merged.entry(id).or_default().0 = Some(local);
        }

        for remote in catalog {
            if self.disabled_repos.contains(&remote.source_repo_id) {
                tracing::info!(
                    "Repo {} is disabled, skipping module {}",
                    remote.source_repo_id,
                    remote.module_id
                );
                continue;
            }

            let slot = &mut merged.entry(remote.module_id.clone()).or_default().1;
            if let Some(existing) = slot
                .as_ref()
                .filter(|existing| existing.version_code >= remote.version_code)
            {
                tracing::debug!(
                    "Keeping {} from {} over older copy from {}",
                    remote.module_id,
                    existing.source_repo_id,
                    remote.source_repo_id
                );
                continue;
            }
            *slot = Some(remote);
        }

        merged
            .into_iter()
            .map(|(id, (local, remote))| ModuleEntry::new(id, local, remote))
            .collect()
    }
}

/// Search relevance of a module for `query` (lowercase); lower is better.
///
/// `None` means the module does not match at all.
pub fn filter_level(details: &ModuleDetails<'_>, query: &str) -> Option<u8> {
    if query.is_empty() {
        return Some(0);
    }

    let id = details.id.to_lowercase();
    let name = details.name.to_lowercase();
    let author = details.author.unwrap_or_default().to_lowercase();

    if query == id || query == name || query == author {
        return Some(0);
    }
    if id.contains(query) || name.contains(query) {
        return Some(1);
    }
    let description = details.description.unwrap_or_default().to_lowercase();
    if author.contains(query) || description.contains(query) {
        return Some(2);
    }
    None
}
