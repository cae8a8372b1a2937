//! Rule metadata registry
//!
//! Built-in rule descriptors are process-wide immutable statics, declared
//! once and never mutated. A `RuleRegistry` is the per-run view: it
//! resolves configuration overrides (enabled flags, severities) against the
//! descriptor table at construction time and is read-only afterwards, so it
//! can be shared freely across parallel analyses.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use cslint_core::{CslintConfig, Severity};

use crate::builtin;

/// Static metadata describing one rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDescriptor {
    /// Diagnostic identifier, e.g. "BRACE001"
    pub id: &'static str,
    /// Short kebab-case name, e.g. "braces-should-not-be-omitted"
    pub name: &'static str,
    /// What the rule checks
    pub description: &'static str,
    /// Category the rule belongs to
    pub category: RuleCategory,
    /// Severity used when configuration does not override it
    pub default_severity: Severity,
    /// Whether the rule runs without explicit opt-in
    pub enabled_by_default: bool,
    /// Whether the rule offers an automatic fix
    pub fixable: bool,
}

/// Categories for organizing rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// Brace placement, line layout, spacing structure
    Layout,
    /// Naming and stylistic preferences
    Style,
    /// Patterns that are likely bugs
    Correctness,
    /// Documentation and metadata
    Documentation,
}

impl RuleCategory {
    pub fn slug(self) -> &'static str {
        match self {
            RuleCategory::Layout => "layout",
            RuleCategory::Style => "style",
            RuleCategory::Correctness => "correctness",
            RuleCategory::Documentation => "documentation",
        }
    }
}

/// The built-in descriptor table, constructed once per process
pub static BUILTIN_RULES: Lazy<Vec<RuleDescriptor>> =
    Lazy::new(|| vec![builtin::braces::descriptor()]);

/// Look up a built-in rule by id
pub fn find_rule(id: &str) -> Option<&'static RuleDescriptor> {
    BUILTIN_RULES.iter().find(|rule| rule.id == id)
}

/// One resolved rule: descriptor plus effective configuration
#[derive(Debug, Clone, Copy)]
pub struct ResolvedRule {
    pub descriptor: &'static RuleDescriptor,
    pub enabled: bool,
    pub severity: Severity,
}

/// Per-run view over the descriptor table with configuration applied.
/// Immutable after construction; safe for unsynchronized concurrent reads.
#[derive(Debug, Clone)]
pub struct RuleRegistry {
    rules: Vec<ResolvedRule>,
}

impl RuleRegistry {
    /// Resolve the built-in rules against a configuration
    pub fn from_config(config: &CslintConfig) -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|descriptor| ResolvedRule {
                descriptor,
                enabled: descriptor.enabled_by_default && config.rule_enabled(descriptor.id),
                severity: config
                    .rule_severity(descriptor.id)
                    .unwrap_or(descriptor.default_severity),
            })
            .collect();
        Self { rules }
    }

    /// Registry with every rule at its defaults
    pub fn with_defaults() -> Self {
        Self::from_config(&CslintConfig::default())
    }

    /// Whether a rule is enabled for this run
    pub fn is_enabled(&self, id: &str) -> bool {
        self.get(id).map(|r| r.enabled).unwrap_or(false)
    }

    /// Effective severity for a rule
    pub fn severity(&self, id: &str) -> Option<Severity> {
        self.get(id).map(|r| r.severity)
    }

    /// Resolved entry for a rule id
    pub fn get(&self, id: &str) -> Option<&ResolvedRule> {
        self.rules.iter().find(|r| r.descriptor.id == id)
    }

    /// All resolved rules, in declaration order
    pub fn rules(&self) -> &[ResolvedRule] {
        &self.rules
    }
}
