use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("config target package '{package}' is not installed")]
pub struct TargetNotFound {
    pub package: String,
}

/// Checks whether the app a module points at for configuration exists.
pub trait ConfigTargetResolver: Send + Sync {
    fn resolve(&self, package: &str, config: &str) -> Result<(), TargetNotFound>;
}

/// Package part of a config target such as `com.example.app/.SettingsActivity extra`.
pub fn package_of_config(config: &str) -> &str {
    let config = config.split(' ').next().unwrap_or(config);
    config.split('/').next().unwrap_or(config)
}

/// Resolver backed by a fixed list of installed package names.
#[derive(Debug, Clone, Default)]
pub struct InstalledPackages {
    packages: BTreeSet<String>,
}

impl InstalledPackages {
    pub fn new<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            packages: packages.into_iter().map(Into::into).collect(),
        }
    }
}

impl ConfigTargetResolver for InstalledPackages {
    fn resolve(&self, package: &str, _config: &str) -> Result<(), TargetNotFound> {
        if self.packages.contains(package) {
            Ok(())
        } else {
            Err(TargetNotFound {
                package: package.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_is_taken_before_activity_and_arguments() {
        assert_eq!(package_of_config("com.example.app"), "com.example.app");
        assert_eq!(
            package_of_config("com.example.app/.ui.Settings"),
            "com.example.app"
        );
        assert_eq!(package_of_config("com.example.app --flag"), "com.example.app");
    }

    #[test]
    fn installed_packages_resolve_known_names_only() {
        let resolver = InstalledPackages::new(["com.example.app"]);
        assert!(resolver.resolve("com.example.app", "com.example.app").is_ok());
        assert_eq!(
            resolver.resolve("com.missing", "com.missing"),
            Err(TargetNotFound {
                package: "com.missing".into()
            })
        );
    }
}
