use crate::capability::InstalledPackages;
use crate::error::{ModlistError, Result};
use crate::model::{LocalInfo, NotificationKind, RemoteInfo};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A catalog repository the remote records came from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoInfo {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NotificationSpec {
    Name(String),
    Detailed {
        kind: String,
        #[serde(default)]
        special: bool,
    },
}

impl NotificationSpec {
    pub fn resolve(&self) -> (NotificationKind, bool) {
        match self {
            NotificationSpec::Name(name) => (NotificationKind::from_name(name), false),
            NotificationSpec::Detailed { kind, special } => {
                (NotificationKind::from_name(kind), *special)
            }
        }
    }
}

/// Everything the collaborators hand over for one list build.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub installed: Vec<LocalInfo>,
    pub catalog: Vec<RemoteInfo>,
    pub repos: Vec<RepoInfo>,
    pub notifications: Vec<NotificationSpec>,
    pub separators: Vec<String>,
    /// Installed app packages, used to resolve module config targets.
    pub packages: Vec<String>,
}

impl Snapshot {
    pub fn from_json_str(content: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(content)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    pub fn disabled_repos(&self) -> BTreeSet<String> {
        self.repos
            .iter()
            .filter(|repo| !repo.enabled)
            .map(|repo| repo.id.clone())
            .collect()
    }

    pub fn package_resolver(&self) -> InstalledPackages {
        InstalledPackages::new(self.packages.iter().cloned())
    }

    fn validate(&self) -> Result<()> {
        let mut seen = BTreeSet::new();
        for local in &self.installed {
            if local.id.trim().is_empty() {
                return Err(ModlistError::Snapshot(
                    "installed module with an empty id".to_string(),
                ));
            }
            if !seen.insert(local.id.as_str()) {
                return Err(ModlistError::Snapshot(format!(
                    "module '{}' is installed twice",
                    local.id
                )));
            }
        }

        if let Some(remote) = self.catalog.iter().find(|r| r.module_id.trim().is_empty()) {
            return Err(ModlistError::Snapshot(format!(
                "catalog record '{}' from repo '{}' has an empty id",
                remote.name, remote.source_repo_id
            )));
        }

        Ok(())
    }
}

/// Reads snapshot documents from disk.
pub struct SnapshotLoader {
    snapshot_path: PathBuf,
}

impl SnapshotLoader {
    pub fn new<P: AsRef<Path>>(snapshot_path: P) -> Self {
        Self {
            snapshot_path: snapshot_path.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self) -> Result<Snapshot> {
        let content = fs::read_to_string(&self.snapshot_path).map_err(|e| {
            ModlistError::Snapshot(format!(
                "Failed to read '{}': {}",
                self.snapshot_path.display(),
                e
            ))
        })?;
        Snapshot::from_json_str(&content)
    }
}
