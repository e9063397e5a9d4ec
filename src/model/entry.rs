use crate::model::kinds::{NotificationKind, SeparatorKind};
use crate::model::module::ModuleEntry;
use std::fmt;

/// One row of the module list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Module(ModuleEntry),
    Notification { kind: NotificationKind, special: bool },
    Separator(SeparatorKind),
    Footer { height_px: u32, is_header: bool },
}

impl Entry {
    pub fn notification(kind: NotificationKind) -> Self {
        Entry::Notification {
            kind,
            special: false,
        }
    }

    pub fn special_notification(kind: NotificationKind) -> Self {
        Entry::Notification {
            kind,
            special: true,
        }
    }

    pub fn header(height_px: u32) -> Self {
        Entry::Footer {
            height_px,
            is_header: true,
        }
    }

    pub fn footer(height_px: u32) -> Self {
        Entry::Footer {
            height_px,
            is_header: false,
        }
    }

    pub fn as_module(&self) -> Option<&ModuleEntry> {
        match self {
            Entry::Module(module) => Some(module),
            _ => None,
        }
    }

    /// Module id, or an empty string for non-module rows.
    pub fn id(&self) -> &str {
        match self {
            Entry::Module(module) => module.id(),
            _ => "",
        }
    }
}

impl From<ModuleEntry> for Entry {
    fn from(module: ModuleEntry) -> Self {
        Entry::Module(module)
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entry::Module(module) => write!(f, "{} ({})", module.display_name(), module.id()),
            Entry::Notification { kind, special } => {
                if *special {
                    write!(f, "notification:{kind} [special]")
                } else {
                    write!(f, "notification:{kind}")
                }
            }
            Entry::Separator(kind) => write!(f, "separator:{kind}"),
            Entry::Footer {
                height_px,
                is_header: true,
            } => write!(f, "header:{height_px}px"),
            Entry::Footer { height_px, .. } => write!(f, "footer:{height_px}px"),
        }
    }
}
