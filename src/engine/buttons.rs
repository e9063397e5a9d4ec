use crate::capability::{ConfigTargetResolver, package_of_config};
use crate::model::{Entry, ModuleEntry};
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use url::Url;

/// Host whose config pages are rendered in the built-in web view.
pub const FIRST_PARTY_CONFIG_HOST: &str = "www.androidacy.com";

static MODULE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9._-]+$").expect("static regex is valid"));

/// Action affordances offered on a module row, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionButton {
    Warning,
    Uninstall,
    Info,
    UpdateInstall,
    Config,
    Support,
    Donate,
    Safe,
}

impl fmt::Display for ActionButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ActionButton::Warning => "warning",
            ActionButton::Uninstall => "uninstall",
            ActionButton::Info => "info",
            ActionButton::UpdateInstall => "update/install",
            ActionButton::Config => "config",
            ActionButton::Support => "support",
            ActionButton::Donate => "donate",
            ActionButton::Safe => "safe",
        };
        f.write_str(label)
    }
}

/// Ids that are hidden (leading dot) or outside the usual module id alphabet.
pub fn is_suspicious_id(module_id: &str) -> bool {
    module_id.starts_with('.') || !MODULE_ID_PATTERN.is_match(module_id)
}

fn is_first_party_endpoint(config: &str) -> bool {
    Url::parse(config)
        .map(|url| url.scheme() == "https" && url.host_str() == Some(FIRST_PARTY_CONFIG_HOST))
        .unwrap_or(false)
}

pub struct ButtonCapabilityResolver<'a> {
    targets: &'a dyn ConfigTargetResolver,
    web_view_available: bool,
    showcase_mode: bool,
}

impl<'a> ButtonCapabilityResolver<'a> {
    pub fn new(
        targets: &'a dyn ConfigTargetResolver,
        web_view_available: bool,
        showcase_mode: bool,
    ) -> Self {
        Self {
            targets,
            web_view_available,
            showcase_mode,
        }
    }

    /// Buttons for a row; empty for anything that is not a module.
    pub fn resolve(&self, entry: &Entry) -> Vec<ActionButton> {
        match entry {
            Entry::Module(module) => self.resolve_module(module),
            _ => Vec::new(),
        }
    }

    pub fn resolve_module(&self, module: &ModuleEntry) -> Vec<ActionButton> {
        let mut buttons = Vec::new();
        let local = module.local();
        let remote = module.remote();

        if is_suspicious_id(module.id()) {
            buttons.push(ActionButton::Warning);
        }
        if local.is_some() && !self.showcase_mode {
            buttons.push(ActionButton::Uninstall);
        }
        if remote.is_some_and(|remote| remote.notes_url.is_some()) {
            buttons.push(ActionButton::Info);
        }
        if remote.is_some() || local.is_some_and(|local| local.update_zip_url.is_some()) {
            buttons.push(ActionButton::UpdateInstall);
        }
        if let Some(config) = module.config_target() {
            if self.config_available(module.id(), config) {
                buttons.push(ActionButton::Config);
            }
        }

        let details = module.main_info();
        if details.support_url.is_some() {
            buttons.push(ActionButton::Support);
        }
        if details.donate_url.is_some() {
            buttons.push(ActionButton::Donate);
        }
        if details.safe {
            buttons.push(ActionButton::Safe);
        } else {
            tracing::debug!("Module {} is not marked safe", module.id());
        }

        buttons
    }

    fn config_available(&self, module_id: &str, config: &str) -> bool {
        if is_first_party_endpoint(config) {
            if !self.web_view_available {
                tracing::debug!(
                    "Module {} config page needs a web view, none available",
                    module_id
                );
            }
            return self.web_view_available;
        }

        let package = package_of_config(config);
        match self.targets.resolve(package, config) {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(
                    "Config package \"{}\" missing for module \"{}\": {}",
                    package,
                    module_id,
                    err
                );
                false
            }
        }
    }
}
