pub mod entry;
pub mod kinds;
pub mod module;

pub use entry::Entry;
pub use kinds::{NotificationKind, SeparatorKind};
pub use module::{
    LocalInfo, ModuleDetails, ModuleEntry, ModuleFlags, PendingDownload, RemoteInfo,
    UPDATE_JSON_SOURCE,
};
