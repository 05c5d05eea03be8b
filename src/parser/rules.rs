//! Field type rules driving value coercion.
//!
//! A rule pairs a field-name pattern with the type its values are coerced to.
//! Patterns are anchored at the start of the field name only, so `percent`
//! also matches `percentage`.
//!
//! Rule sets are plain values: the built-in table is available through
//! [`RuleSet::default`], and alternatives can be loaded from TOML:
//!
//! ```toml
//! [[rules]]
//! pattern = "call-count-.+"
//! kind = "integer"
//! ```

use crate::utils::config::{
    FLOAT_FIELD_PATTERNS, INTEGER_FIELD_PATTERNS, TIMESTAMP_FIELD_PATTERNS,
};
use crate::utils::error::ConfigError;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;

/// Target type of a coerced field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Integer,
    Float,
    /// Formatted date string converted to epoch seconds
    Timestamp,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::Integer => "integer",
            FieldKind::Float => "float",
            FieldKind::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// One `{pattern, kind}` entry as written in a rule file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleEntry {
    pub pattern: String,
    pub kind: FieldKind,
}

/// On-disk rule configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    #[serde(default)]
    pub rules: Vec<RuleEntry>,
}

/// A compiled field type rule
#[derive(Debug, Clone)]
pub struct FieldTypeRule {
    source: String,
    pattern: Regex,
    kind: FieldKind,
}

impl FieldTypeRule {
    pub fn new(pattern: &str, kind: FieldKind) -> Result<Self, ConfigError> {
        let anchored = format!("^(?:{})", pattern);
        let compiled = Regex::new(&anchored).map_err(|source| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            source: pattern.to_string(),
            pattern: compiled,
            kind,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.source
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn matches(&self, field: &str) -> bool {
        self.pattern.is_match(field)
    }
}

/// Ordered, validated collection of field type rules
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<FieldTypeRule>,
}

impl RuleSet {
    /// Build a rule set, rejecting a pattern declared under two kinds
    pub fn new(rules: Vec<FieldTypeRule>) -> Result<Self, ConfigError> {
        for (i, rule) in rules.iter().enumerate() {
            let clash = rules[..i]
                .iter()
                .find(|earlier| earlier.source == rule.source && earlier.kind != rule.kind);

            if let Some(earlier) = clash {
                return Err(ConfigError::AmbiguousRule {
                    pattern: rule.source.clone(),
                    first: earlier.kind.to_string(),
                    second: rule.kind.to_string(),
                });
            }
        }

        Ok(Self { rules })
    }

    /// Compile rule entries (as read from a config file)
    pub fn from_entries(entries: &[RuleEntry]) -> Result<Self, ConfigError> {
        let rules = entries
            .iter()
            .map(|entry| FieldTypeRule::new(&entry.pattern, entry.kind))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(rules)
    }

    /// Resolve the kind a field name is coerced to, if any
    ///
    /// # Errors
    /// * `ConfigError::AmbiguousField` - the name matches rules of two different kinds
    pub fn kind_for(&self, field: &str) -> Result<Option<FieldKind>, ConfigError> {
        let mut found: Option<FieldKind> = None;

        for rule in self.rules.iter().filter(|r| r.matches(field)) {
            match found {
                Some(kind) if kind != rule.kind => {
                    return Err(ConfigError::AmbiguousField {
                        field: field.to_string(),
                        first: kind.to_string(),
                        second: rule.kind.to_string(),
                    });
                }
                _ => found = Some(rule.kind),
            }
        }

        Ok(found)
    }

    pub fn rules(&self) -> &[FieldTypeRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn to_entries(&self) -> Vec<RuleEntry> {
        self.rules
            .iter()
            .map(|r| RuleEntry {
                pattern: r.source.clone(),
                kind: r.kind,
            })
            .collect()
    }
}

impl Default for RuleSet {
    /// The profiler's built-in rule table
    fn default() -> Self {
        let tables = [
            (INTEGER_FIELD_PATTERNS, FieldKind::Integer),
            (FLOAT_FIELD_PATTERNS, FieldKind::Float),
            (TIMESTAMP_FIELD_PATTERNS, FieldKind::Timestamp),
        ];

        let rules = tables
            .iter()
            .flat_map(|(patterns, kind)| {
                patterns.iter().map(move |p| FieldTypeRule {
                    source: p.to_string(),
                    pattern: Regex::new(&format!("^(?:{})", p))
                        .expect("built-in field patterns are valid regexes"),
                    kind: *kind,
                })
            })
            .collect();

        Self { rules }
    }
}

/// Load a rule set from a TOML file
///
/// # Errors
/// * `ConfigError::Io` - If file cannot be read
/// * `ConfigError::Toml` - If TOML is invalid
/// * `ConfigError::InvalidPattern` / `ConfigError::AmbiguousRule` - If the rules are unusable
pub fn load_rules(path: impl AsRef<Path>) -> Result<RuleSet, ConfigError> {
    let path = path.as_ref();
    debug!("Loading field rules from: {}", path.display());

    let contents = fs::read_to_string(path)?;
    let config: RuleConfig = toml::from_str(&contents)?;
    let rules = RuleSet::from_entries(&config.rules)?;

    debug!("Loaded {} field rules", rules.len());
    Ok(rules)
}
