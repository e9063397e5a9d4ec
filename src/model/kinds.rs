use std::fmt;

/// Banner rows shown above the module list.
///
/// Declaration order is the order notifications are displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NotificationKind {
    Debug,
    ShowcaseMode,
    NoRootManager,
    NoRoot,
    RootDenied,
    RootManagerOutdated,
    NoInternet,
    RepoUpdateFailed,
    NeedCaptcha,
    NoWebView,
    UpdateAvailable,
    InstallFromStorage,
    /// Fallback for names this build does not recognise; sorts last.
    Unknown,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 12] = [
        NotificationKind::Debug,
        NotificationKind::ShowcaseMode,
        NotificationKind::NoRootManager,
        NotificationKind::NoRoot,
        NotificationKind::RootDenied,
        NotificationKind::RootManagerOutdated,
        NotificationKind::NoInternet,
        NotificationKind::RepoUpdateFailed,
        NotificationKind::NeedCaptcha,
        NotificationKind::NoWebView,
        NotificationKind::UpdateAvailable,
        NotificationKind::InstallFromStorage,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            NotificationKind::Debug => "debug",
            NotificationKind::ShowcaseMode => "showcase_mode",
            NotificationKind::NoRootManager => "no_root_manager",
            NotificationKind::NoRoot => "no_root",
            NotificationKind::RootDenied => "root_denied",
            NotificationKind::RootManagerOutdated => "root_manager_outdated",
            NotificationKind::NoInternet => "no_internet",
            NotificationKind::RepoUpdateFailed => "repo_update_failed",
            NotificationKind::NeedCaptcha => "need_captcha",
            NotificationKind::NoWebView => "no_web_view",
            NotificationKind::UpdateAvailable => "update_available",
            NotificationKind::InstallFromStorage => "install_from_storage",
            NotificationKind::Unknown => "unknown",
        }
    }

    /// Map an externally stored name onto a kind, falling back to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        let normalized = name.trim().to_ascii_lowercase();
        match Self::ALL.iter().find(|kind| kind.name() == normalized) {
            Some(kind) => *kind,
            None => {
                tracing::warn!("Unrecognised notification kind '{}', using fallback position", name);
                NotificationKind::Unknown
            }
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Section separators. Declaration order is display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeparatorKind {
    Updatable,
    Installed,
    Installable,
    Unknown,
}

impl SeparatorKind {
    pub fn name(&self) -> &'static str {
        match self {
            SeparatorKind::Updatable => "updatable",
            SeparatorKind::Installed => "installed",
            SeparatorKind::Installable => "installable",
            SeparatorKind::Unknown => "unknown",
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "updatable" => SeparatorKind::Updatable,
            "installed" => SeparatorKind::Installed,
            "installable" => SeparatorKind::Installable,
            _ => {
                tracing::warn!("Unrecognised separator kind '{}', using fallback position", name);
                SeparatorKind::Unknown
            }
        }
    }
}

impl fmt::Display for SeparatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
