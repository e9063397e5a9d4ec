use crate::error::{ModlistError, Result};
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::ops::BitOr;

/// Source label used when the download comes from the module's own update metadata.
pub const UPDATE_JSON_SOURCE: &str = "update_json";

/// State bits reported by the root manager for an installed module.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleFlags(u32);

impl ModuleFlags {
    pub const DISABLED: ModuleFlags = ModuleFlags(0x01);
    pub const UPDATING: ModuleFlags = ModuleFlags(0x02);
    pub const ACTIVE: ModuleFlags = ModuleFlags(0x04);
    pub const UNINSTALLING: ModuleFlags = ModuleFlags(0x08);
    pub const UPDATING_ONLY: ModuleFlags = ModuleFlags(0x10);
    pub const MAYBE_ACTIVE: ModuleFlags = ModuleFlags(0x20);
    pub const HAS_ACTIVE_MOUNT: ModuleFlags = ModuleFlags(0x40);
    pub const METADATA_INVALID: ModuleFlags = ModuleFlags(0x80);

    pub const fn empty() -> Self {
        ModuleFlags(0)
    }

    pub const fn from_bits(bits: u32) -> Self {
        ModuleFlags(bits)
    }

    pub const fn bits(&self) -> u32 {
        self.0
    }

    /// True when any bit of `flag` is set.
    pub const fn contains(&self, flag: ModuleFlags) -> bool {
        self.0 & flag.0 != 0
    }
}

impl BitOr for ModuleFlags {
    type Output = ModuleFlags;

    fn bitor(self, rhs: Self) -> Self::Output {
        ModuleFlags(self.0 | rhs.0)
    }
}

/// A module installed on the device, as reported by the root manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalInfo {
    pub id: String,
    pub name: String,
    pub installed_version_code: i64,
    /// Version advertised by the module's own update metadata, 0 when none.
    #[serde(default)]
    pub update_version_code: i64,
    #[serde(default)]
    pub update_zip_url: Option<String>,
    #[serde(default)]
    pub update_checksum: Option<String>,
    #[serde(default)]
    pub config_target: Option<String>,
    #[serde(default)]
    pub support_url: Option<String>,
    #[serde(default)]
    pub donate_url: Option<String>,
    #[serde(default)]
    pub safe: bool,
    #[serde(default)]
    pub flags: ModuleFlags,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl LocalInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, installed_version_code: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            installed_version_code,
            update_version_code: 0,
            update_zip_url: None,
            update_checksum: None,
            config_target: None,
            support_url: None,
            donate_url: None,
            safe: false,
            flags: ModuleFlags::empty(),
            author: None,
            description: None,
        }
    }
}

/// A module as advertised by a remote catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteInfo {
    pub module_id: String,
    pub source_repo_id: String,
    pub name: String,
    pub version_code: i64,
    pub zip_url: String,
    #[serde(default)]
    pub checksum: Option<String>,
    /// Milliseconds since the epoch, 0 when unknown.
    #[serde(default)]
    pub last_updated_at: i64,
    #[serde(default)]
    pub notes_url: Option<String>,
    #[serde(default)]
    pub config_target: Option<String>,
    #[serde(default)]
    pub support_url: Option<String>,
    #[serde(default)]
    pub donate_url: Option<String>,
    #[serde(default)]
    pub safe: bool,
    #[serde(default)]
    pub flags: ModuleFlags,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl RemoteInfo {
    pub fn new(
        module_id: impl Into<String>,
        source_repo_id: impl Into<String>,
        name: impl Into<String>,
        version_code: i64,
        zip_url: impl Into<String>,
    ) -> Self {
        Self {
            module_id: module_id.into(),
            source_repo_id: source_repo_id.into(),
            name: name.into(),
            version_code,
            zip_url: zip_url.into(),
            checksum: None,
            last_updated_at: 0,
            notes_url: None,
            config_target: None,
            support_url: None,
            donate_url: None,
            safe: false,
            flags: ModuleFlags::empty(),
            author: None,
            description: None,
        }
    }
}

/// Borrowed view over whichever metadata source describes a module best.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModuleDetails<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub version_code: i64,
    pub author: Option<&'a str>,
    pub description: Option<&'a str>,
    pub support_url: Option<&'a str>,
    pub donate_url: Option<&'a str>,
    pub safe: bool,
    pub flags: ModuleFlags,
}

impl<'a> From<&'a LocalInfo> for ModuleDetails<'a> {
    fn from(local: &'a LocalInfo) -> Self {
        Self {
            id: &local.id,
            name: &local.name,
            version_code: local.installed_version_code,
            author: local.author.as_deref(),
            description: local.description.as_deref(),
            support_url: local.support_url.as_deref(),
            donate_url: local.donate_url.as_deref(),
            safe: local.safe,
            flags: local.flags,
        }
    }
}

impl<'a> From<&'a RemoteInfo> for ModuleDetails<'a> {
    fn from(remote: &'a RemoteInfo) -> Self {
        Self {
            id: &remote.module_id,
            name: &remote.name,
            version_code: remote.version_code,
            author: remote.author.as_deref(),
            description: remote.description.as_deref(),
            support_url: remote.support_url.as_deref(),
            donate_url: remote.donate_url.as_deref(),
            safe: remote.safe,
            flags: remote.flags,
        }
    }
}

/// Where an install or update would be downloaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDownload<'a> {
    pub url: &'a str,
    pub checksum: Option<&'a str>,
    pub source: &'a str,
}

/// A module row: local install state, catalog state, or both.
///
/// At least one of `local`/`remote` is always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleEntry {
    id: String,
    local: Option<LocalInfo>,
    remote: Option<RemoteInfo>,
    filter_level: u8,
}

impl ModuleEntry {
    pub fn new(
        id: impl Into<String>,
        local: Option<LocalInfo>,
        remote: Option<RemoteInfo>,
    ) -> Result<Self> {
        let id = id.into();

        if local.is_none() && remote.is_none() {
            return Err(ModlistError::InvalidEntry(format!(
                "module '{}' has neither local nor remote information",
                id
            )));
        }

        if let Some(local) = &local {
            if local.id != id {
                return Err(ModlistError::InvalidEntry(format!(
                    "local record '{}' attached to module '{}'",
                    local.id, id
                )));
            }
        }

        if let Some(remote) = &remote {
            if remote.module_id != id {
                return Err(ModlistError::InvalidEntry(format!(
                    "remote record '{}' attached to module '{}'",
                    remote.module_id, id
                )));
            }
        }

        Ok(Self {
            id,
            local,
            remote,
            filter_level: 0,
        })
    }

    pub fn installed(local: LocalInfo) -> Self {
        Self {
            id: local.id.clone(),
            local: Some(local),
            remote: None,
            filter_level: 0,
        }
    }

    pub fn available(remote: RemoteInfo) -> Self {
        Self {
            id: remote.module_id.clone(),
            local: None,
            remote: Some(remote),
            filter_level: 0,
        }
    }

    pub fn with_filter_level(mut self, filter_level: u8) -> Self {
        self.filter_level = filter_level;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn local(&self) -> Option<&LocalInfo> {
        self.local.as_ref()
    }

    pub fn remote(&self) -> Option<&RemoteInfo> {
        self.remote.as_ref()
    }

    pub fn filter_level(&self) -> u8 {
        self.filter_level
    }

    /// The catalog copy when it is newer than (or instead of) the installed one.
    pub fn main_info(&self) -> ModuleDetails<'_> {
        match (&self.local, &self.remote) {
            (Some(local), Some(remote)) if local.installed_version_code < remote.version_code => {
                remote.into()
            }
            (Some(local), _) => local.into(),
            (None, Some(remote)) => remote.into(),
            (None, None) => unreachable!("ModuleEntry is constructed with local or remote info"),
        }
    }

    pub fn display_name(&self) -> &str {
        self.main_info().name
    }

    /// Catalog timestamp with unknown and negative values collapsed to 0.
    pub fn last_updated_at(&self) -> i64 {
        self.remote
            .as_ref()
            .map(|remote| remote.last_updated_at.max(0))
            .unwrap_or(0)
    }

    pub fn last_updated_text(&self) -> String {
        let millis = self.last_updated_at();
        if millis <= 0 {
            return String::new();
        }
        match Timestamp::from_millisecond(millis) {
            Ok(ts) => ts.strftime("%Y-%m-%d %H:%M").to_string(),
            Err(_) => String::new(),
        }
    }

    /// Config target of an installed module, falling back to the catalog's.
    pub fn config_target(&self) -> Option<&str> {
        let local = self.local.as_ref()?;
        local
            .config_target
            .as_deref()
            .or_else(|| self.remote.as_ref()?.config_target.as_deref())
    }

    pub fn pending_download(&self) -> Option<PendingDownload<'_>> {
        let prefer_remote = match (&self.local, &self.remote) {
            (None, _) => true,
            (Some(local), Some(remote)) => local.update_version_code < remote.version_code,
            (Some(_), None) => false,
        };

        if prefer_remote {
            let remote = self.remote.as_ref()?;
            return Some(PendingDownload {
                url: &remote.zip_url,
                checksum: remote.checksum.as_deref(),
                source: &remote.source_repo_id,
            });
        }

        let local = self.local.as_ref()?;
        local.update_zip_url.as_deref().map(|url| PendingDownload {
            url,
            checksum: local.update_checksum.as_deref(),
            source: UPDATE_JSON_SOURCE,
        })
    }

    /// Newest version on offer: the catalog copy or the module's own update
    /// metadata, whichever is higher.
    pub fn available_version_code(&self) -> i64 {
        let catalog = self.remote.as_ref().map(|remote| remote.version_code);
        match &self.local {
            Some(local) => local.update_version_code.max(catalog.unwrap_or(0)),
            None => catalog.unwrap_or(0),
        }
    }

    /// True when the catalog advertises a newer version than the installed one.
    pub fn has_catalog_update(&self) -> bool {
        match (&self.local, &self.remote) {
            (Some(local), Some(remote)) => local.installed_version_code < remote.version_code,
            _ => false,
        }
    }

    pub fn has_flag(&self, flag: ModuleFlags) -> bool {
        self.local
            .as_ref()
            .is_some_and(|local| local.flags.contains(flag))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote(id: &str, version: i64) -> RemoteInfo {
        RemoteInfo::new(id, "main", format!("{id} remote"), version, format!("https://cdn.test/{id}.zip"))
    }

    #[test]
    fn rejects_entry_without_any_info() {
        let err = ModuleEntry::new("ghost", None, None).unwrap_err();
        assert!(matches!(err, ModlistError::InvalidEntry(_)));
    }

    #[test]
    fn rejects_mismatched_ids() {
        let err = ModuleEntry::new("foo", Some(LocalInfo::new("bar", "Bar", 1)), None).unwrap_err();
        assert!(matches!(err, ModlistError::InvalidEntry(_)));
    }

    #[test]
    fn main_info_prefers_newer_remote() {
        let mut local = LocalInfo::new("foo", "Foo local", 1);
        local.support_url = Some("https://support.test".into());
        let entry = ModuleEntry::new("foo", Some(local.clone()), Some(remote("foo", 2))).unwrap();
        assert_eq!(entry.display_name(), "foo remote");
        assert_eq!(entry.main_info().support_url, None);

        let entry = ModuleEntry::new("foo", Some(local), Some(remote("foo", 1))).unwrap();
        assert_eq!(entry.display_name(), "Foo local");
        assert_eq!(entry.main_info().support_url, Some("https://support.test"));
    }

    #[test]
    fn pending_download_uses_update_metadata_when_catalog_is_older() {
        let mut local = LocalInfo::new("foo", "Foo", 1);
        local.update_version_code = 5;
        local.update_zip_url = Some("https://self.test/foo.zip".into());
        local.update_checksum = Some("abc".into());

        let entry = ModuleEntry::new("foo", Some(local.clone()), Some(remote("foo", 3))).unwrap();
        let download = entry.pending_download().unwrap();
        assert_eq!(download.url, "https://self.test/foo.zip");
        assert_eq!(download.source, UPDATE_JSON_SOURCE);
        assert_eq!(download.checksum, Some("abc"));

        let entry = ModuleEntry::new("foo", Some(local), Some(remote("foo", 9))).unwrap();
        let download = entry.pending_download().unwrap();
        assert_eq!(download.url, "https://cdn.test/foo.zip");
        assert_eq!(download.source, "main");
    }

    #[test]
    fn available_version_takes_newest_source() {
        let mut local = LocalInfo::new("foo", "Foo", 1);
        local.update_version_code = 5;
        local.update_zip_url = Some("https://self.test/foo.zip".into());

        let self_hosted = ModuleEntry::installed(local.clone());
        assert_eq!(self_hosted.available_version_code(), 5);

        let older_catalog =
            ModuleEntry::new("foo", Some(local.clone()), Some(remote("foo", 3))).unwrap();
        assert_eq!(older_catalog.available_version_code(), 5);
        assert_eq!(older_catalog.main_info().version_code, 3);

        let newer_catalog = ModuleEntry::new("foo", Some(local), Some(remote("foo", 9))).unwrap();
        assert_eq!(newer_catalog.available_version_code(), 9);

        assert_eq!(ModuleEntry::available(remote("bar", 4)).available_version_code(), 4);
    }

    #[test]
    fn installed_module_without_update_url_has_no_download() {
        let entry = ModuleEntry::installed(LocalInfo::new("foo", "Foo", 1));
        assert!(entry.pending_download().is_none());
    }

    #[test]
    fn config_target_requires_local_install() {
        let mut catalog = remote("foo", 2);
        catalog.config_target = Some("com.example.app".into());

        let entry = ModuleEntry::available(catalog.clone());
        assert_eq!(entry.config_target(), None);

        let entry =
            ModuleEntry::new("foo", Some(LocalInfo::new("foo", "Foo", 1)), Some(catalog)).unwrap();
        assert_eq!(entry.config_target(), Some("com.example.app"));
    }

    #[test]
    fn last_updated_text_is_empty_for_unknown_timestamps() {
        let entry = ModuleEntry::available(remote("foo", 1));
        assert_eq!(entry.last_updated_text(), "");

        let mut catalog = remote("foo", 1);
        catalog.last_updated_at = 1_700_000_000_000;
        let entry = ModuleEntry::available(catalog);
        assert_eq!(entry.last_updated_text(), "2023-11-14 22:13");
    }

    #[test]
    fn flags_combine_and_query() {
        let flags = ModuleFlags::ACTIVE | ModuleFlags::UPDATING;
        assert!(flags.contains(ModuleFlags::ACTIVE));
        assert!(!flags.contains(ModuleFlags::DISABLED));
        assert_eq!(flags.bits(), 0x06);
    }
}
