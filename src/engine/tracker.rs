use std::collections::BTreeSet;

/// Distinct modules with a visible pending update, scoped to one build pass.
///
/// Create a fresh tracker per build; it only ever grows.
#[derive(Debug, Clone, Default)]
pub struct UpdateTracker {
    seen: BTreeSet<String>,
}

impl UpdateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a module with a visible update. Returns true on first sight.
    pub fn register(&mut self, module_id: &str) -> bool {
        if self.seen.contains(module_id) {
            return false;
        }
        self.seen.insert(module_id.to_string());
        true
    }

    pub fn count(&self) -> usize {
        self.seen.len()
    }

    pub fn has_updates(&self) -> bool {
        !self.seen.is_empty()
    }

    pub fn contains(&self, module_id: &str) -> bool {
        self.seen.contains(module_id)
    }

    pub fn summary(&self) -> UpdateSummary {
        UpdateSummary {
            has_updates: self.has_updates(),
            count: self.count(),
            module_ids: self.seen.iter().cloned().collect(),
        }
    }
}

/// Snapshot handed to the notification badge once a build completes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateSummary {
    pub has_updates: bool,
    pub count: usize,
    pub module_ids: Vec<String>,
}
