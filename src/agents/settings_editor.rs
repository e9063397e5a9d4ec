use crate::engine::rules::{ExclusionRule, sanitize_version_spec};
use crate::error::{ModlistError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use toml_edit::{Array, DocumentMut, Item, Table, Value};

const UPDATES_SECTION: &str = "updates";
const EXCLUDES_KEY: &str = "excludes";
const VERSION_RULES_KEY: &str = "excluded_versions";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalResult {
    pub exclude_removed: bool,
    pub rules_removed: usize,
}

impl RemovalResult {
    pub fn is_empty(&self) -> bool {
        !self.exclude_removed && self.rules_removed == 0
    }
}

/// Edits the exclusion lists in the settings file, keeping its formatting.
pub struct SettingsEditor {
    settings_path: PathBuf,
}

impl SettingsEditor {
    pub fn new<P: AsRef<Path>>(settings_path: P) -> Self {
        Self {
            settings_path: settings_path.as_ref().to_path_buf(),
        }
    }

    /// Hide every update of `module_id`. Returns false if it was already excluded.
    pub fn add_exclude(&self, module_id: &str) -> Result<bool> {
        let module_id = validate_module_id(module_id)?;
        let mut doc = self.load_document()?;

        let excludes = ensure_array(&mut doc, EXCLUDES_KEY)?;
        if excludes.iter().any(|v| v.as_str() == Some(module_id)) {
            return Ok(false);
        }
        excludes.push(module_id);

        self.write_document(&doc)?;
        Ok(true)
    }

    /// Store a version rule for `module_id`, replacing any previous rule for it.
    pub fn set_version_rule(&self, module_id: &str, spec: &str) -> Result<ExclusionRule> {
        let module_id = validate_module_id(module_id)?;
        let raw = format!("{}:{}", module_id, sanitize_version_spec(spec));
        let rule = ExclusionRule::parse(&raw)
            .map_err(|e| ModlistError::Settings(format!("Invalid version rule: {}", e)))?;

        let mut doc = self.load_document()?;
        let rules = ensure_array(&mut doc, VERSION_RULES_KEY)?;
        rules.retain(|v| !rule_targets(v, module_id));
        rules.push(rule.to_string());

        self.write_document(&doc)?;
        Ok(rule)
    }

    /// Drop the whole-module exclude and any version rules for `module_id`.
    pub fn remove_module(&self, module_id: &str) -> Result<RemovalResult> {
        let module_id = module_id.trim();
        let mut doc = self.load_document()?;

        let exclude_removed = {
            let excludes = ensure_array(&mut doc, EXCLUDES_KEY)?;
            let before = excludes.len();
            excludes.retain(|v| v.as_str() != Some(module_id));
            excludes.len() != before
        };

        let rules_removed = {
            let rules = ensure_array(&mut doc, VERSION_RULES_KEY)?;
            let before = rules.len();
            rules.retain(|v| !rule_targets(v, module_id));
            before - rules.len()
        };

        let result = RemovalResult {
            exclude_removed,
            rules_removed,
        };
        if !result.is_empty() {
            self.write_document(&doc)?;
        }
        Ok(result)
    }

    fn load_document(&self) -> Result<DocumentMut> {
        if !self.settings_path.exists() {
            return Ok(DocumentMut::new());
        }

        let content = fs::read_to_string(&self.settings_path).map_err(|e| {
            ModlistError::Settings(format!(
                "Failed to read settings '{}': {}",
                self.settings_path.display(),
                e
            ))
        })?;

        content.parse::<DocumentMut>().map_err(|e| {
            ModlistError::Settings(format!(
                "Failed to parse settings '{}': {}",
                self.settings_path.display(),
                e
            ))
        })
    }

    fn write_document(&self, doc: &DocumentMut) -> Result<()> {
        fs::write(&self.settings_path, doc.to_string()).map_err(|e| {
            ModlistError::Settings(format!(
                "Failed to write settings '{}': {}",
                self.settings_path.display(),
                e
            ))
        })
    }
}

/// Returns the trimmed id, the form the rule parser matches against.
fn validate_module_id(module_id: &str) -> Result<&str> {
    let trimmed = module_id.trim();
    if trimmed.is_empty() || trimmed.contains(':') {
        return Err(ModlistError::Settings(format!(
            "'{}' is not a valid module id",
            module_id
        )));
    }
    Ok(trimmed)
}

fn rule_targets(value: &Value, module_id: &str) -> bool {
    value
        .as_str()
        .and_then(|raw| raw.split_once(':'))
        .is_some_and(|(id, _)| id.trim() == module_id)
}

fn ensure_array<'a>(doc: &'a mut DocumentMut, key: &str) -> Result<&'a mut Array> {
    if !doc.contains_key(UPDATES_SECTION) {
        let mut table = Table::new();
        table.set_implicit(false);
        doc[UPDATES_SECTION] = Item::Table(table);
    }

    let section = doc[UPDATES_SECTION].as_table_mut().ok_or_else(|| {
        ModlistError::Settings(format!("[{}] is not a table", UPDATES_SECTION))
    })?;

    if !section.contains_key(key) {
        section.insert(key, Item::Value(Value::Array(Array::new())));
    }

    section
        .get_mut(key)
        .and_then(Item::as_array_mut)
        .ok_or_else(|| {
            ModlistError::Settings(format!("{}.{} is not an array", UPDATES_SECTION, key))
        })
}
