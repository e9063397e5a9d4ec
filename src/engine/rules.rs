use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

static SPEC_NOISE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9^$]").expect("static regex is valid"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleParseError {
    #[error("rule '{0}' is missing the ':' separator")]
    MissingSeparator(String),

    #[error("rule '{0}' has an empty module id")]
    EmptyModuleId(String),

    #[error("rule '{0}' has no numeric version threshold")]
    InvalidThreshold(String),
}

/// How a version rule compares the advertised version against its threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleMode {
    /// `^N`: skip N and anything newer.
    AtLeast,
    /// `N$`: skip N and anything older.
    AtMost,
    /// `N`: skip exactly N.
    Exact,
}

/// A parsed `moduleId:<spec>` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRule {
    pub module_id: String,
    pub mode: RuleMode,
    pub threshold_version: i64,
}

impl ExclusionRule {
    pub fn new(module_id: impl Into<String>, mode: RuleMode, threshold_version: i64) -> Self {
        Self {
            module_id: module_id.into(),
            mode,
            threshold_version,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, RuleParseError> {
        let (module_id, spec) = raw
            .split_once(':')
            .ok_or_else(|| RuleParseError::MissingSeparator(raw.to_string()))?;

        let module_id = module_id.trim();
        if module_id.is_empty() {
            return Err(RuleParseError::EmptyModuleId(raw.to_string()));
        }

        let spec = spec.trim();
        let mode = if spec.starts_with('^') {
            RuleMode::AtLeast
        } else if spec.ends_with('$') {
            RuleMode::AtMost
        } else {
            RuleMode::Exact
        };

        let digits: String = spec.chars().filter(char::is_ascii_digit).collect();
        let threshold_version = digits
            .parse::<i64>()
            .map_err(|_| RuleParseError::InvalidThreshold(raw.to_string()))?;

        Ok(Self {
            module_id: module_id.to_string(),
            mode,
            threshold_version,
        })
    }

    /// Whether an update to `remote_version` should be hidden.
    pub fn matches(&self, remote_version: i64) -> bool {
        match self.mode {
            RuleMode::AtLeast => remote_version >= self.threshold_version,
            RuleMode::AtMost => remote_version <= self.threshold_version,
            RuleMode::Exact => remote_version == self.threshold_version,
        }
    }
}

impl FromStr for ExclusionRule {
    type Err = RuleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ExclusionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            RuleMode::AtLeast => write!(f, "{}:^{}", self.module_id, self.threshold_version),
            RuleMode::AtMost => write!(f, "{}:{}$", self.module_id, self.threshold_version),
            RuleMode::Exact => write!(f, "{}:{}", self.module_id, self.threshold_version),
        }
    }
}

/// Strip everything except digits and the `^`/`$` markers from user input.
pub fn sanitize_version_spec(text: &str) -> String {
    SPEC_NOISE.replace_all(text, "").into_owned()
}

/// Unified view over whole-module excludes and per-version rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionRules {
    excluded: BTreeSet<String>,
    version_rules: BTreeMap<String, ExclusionRule>,
}

impl ExclusionRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the two persisted string collections.
    ///
    /// Malformed version rules are logged and skipped.
    pub fn from_lists<E, V>(excludes: E, version_rules: V) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        V: IntoIterator,
        V::Item: AsRef<str>,
    {
        let mut rules = Self::new();

        for id in excludes {
            let id = id.as_ref().trim();
            if !id.is_empty() {
                rules.exclude_module(id);
            }
        }

        for raw in version_rules {
            let raw = raw.as_ref();
            match ExclusionRule::parse(raw) {
                Ok(rule) => {
                    if !rules.add_version_rule(rule) {
                        tracing::warn!("Ignoring duplicate version rule '{}'", raw);
                    }
                }
                Err(err) => tracing::warn!("Skipping version rule: {}", err),
            }
        }

        rules
    }

    pub fn exclude_module(&mut self, module_id: impl Into<String>) {
        self.excluded.insert(module_id.into());
    }

    /// Returns false (keeping the existing rule) when the module already has one.
    pub fn add_version_rule(&mut self, rule: ExclusionRule) -> bool {
        if self.version_rules.contains_key(&rule.module_id) {
            return false;
        }
        self.version_rules.insert(rule.module_id.clone(), rule);
        true
    }

    pub fn version_rule(&self, module_id: &str) -> Option<&ExclusionRule> {
        self.version_rules.get(module_id)
    }

    pub fn is_hard_excluded(&self, module_id: &str) -> bool {
        self.excluded.contains(module_id)
    }

    pub fn is_excluded(&self, module_id: &str, remote_version: i64) -> bool {
        if self.is_hard_excluded(module_id) {
            tracing::debug!("Module {} is excluded from update display", module_id);
            return true;
        }

        match self.version_rules.get(module_id) {
            Some(rule) if rule.matches(remote_version) => {
                tracing::debug!(
                    "Module {} version {} skipped by rule '{}'",
                    module_id,
                    remote_version,
                    rule
                );
                true
            }
            _ => false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.excluded.is_empty() && self.version_rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(version_rules: &[&str]) -> ExclusionRules {
        ExclusionRules::from_lists(Vec::<String>::new(), version_rules.iter().copied())
    }

    #[test]
    fn exact_rule_only_hides_that_version() {
        let rules = rules(&["foo:100"]);
        assert!(rules.is_excluded("foo", 100));
        assert!(!rules.is_excluded("foo", 99));
        assert!(!rules.is_excluded("foo", 101));
    }

    #[test]
    fn at_least_rule_hides_threshold_and_newer() {
        let rules = rules(&["foo:^100"]);
        assert!(!rules.is_excluded("foo", 99));
        assert!(rules.is_excluded("foo", 100));
        assert!(rules.is_excluded("foo", 5000));
    }

    #[test]
    fn at_most_rule_hides_threshold_and_older() {
        let rules = rules(&["foo:100$"]);
        assert!(rules.is_excluded("foo", 1));
        assert!(rules.is_excluded("foo", 100));
        assert!(!rules.is_excluded("foo", 101));
    }

    #[test]
    fn module_ids_match_exactly_not_by_prefix() {
        let rules = rules(&["foo:^1"]);
        assert!(!rules.is_excluded("foobar", 10));
        assert!(!rules.is_excluded("fo", 10));
    }

    #[test]
    fn hard_exclude_wins_over_version_rules() {
        let rules = ExclusionRules::from_lists(["foo"], ["foo:1"]);
        assert!(rules.is_excluded("foo", 42));
        assert!(!rules.is_excluded("bar", 42));
    }

    #[test]
    fn malformed_rules_are_skipped() {
        let rules = rules(&["no-separator", "foo:abc", ":12", "bar:^7"]);
        assert!(!rules.is_excluded("foo", 0));
        assert!(rules.is_excluded("bar", 7));
        assert!(rules.version_rule("foo").is_none());
    }

    #[test]
    fn threshold_ignores_non_digit_noise() {
        let rule = ExclusionRule::parse("foo:v1.2.3").unwrap();
        assert_eq!(rule.mode, RuleMode::Exact);
        assert_eq!(rule.threshold_version, 123);
    }

    #[test]
    fn parse_errors_name_the_problem() {
        assert_eq!(
            ExclusionRule::parse("foo"),
            Err(RuleParseError::MissingSeparator("foo".into()))
        );
        assert_eq!(
            ExclusionRule::parse("foo:^"),
            Err(RuleParseError::InvalidThreshold("foo:^".into()))
        );
    }

    #[test]
    fn first_rule_for_a_module_wins() {
        let rules = rules(&["foo:^10", "foo:3"]);
        assert_eq!(rules.version_rule("foo").map(|r| r.mode), Some(RuleMode::AtLeast));
    }

    #[test]
    fn display_uses_stored_syntax() {
        assert_eq!(ExclusionRule::new("a", RuleMode::AtLeast, 5).to_string(), "a:^5");
        assert_eq!(ExclusionRule::new("a", RuleMode::AtMost, 5).to_string(), "a:5$");
        assert_eq!(ExclusionRule::new("a", RuleMode::Exact, 5).to_string(), "a:5");
    }

    #[test]
    fn sanitize_keeps_digits_and_markers() {
        assert_eq!(sanitize_version_spec(" ^v12-b "), "^12");
        assert_eq!(sanitize_version_spec("45 and older$"), "45$");
    }
}
