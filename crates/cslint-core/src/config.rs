//! Configuration loading and the per-rule settings model
//!
//! Configuration is read from `cslint.toml` or `.cslintrc.json` in the
//! project directory (TOML preferred when both exist). All fields are
//! optional; defaults match the built-in rule registry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::diagnostics::Severity;
use crate::error::CslintError;
use crate::result::Result;

/// Names probed during configuration discovery, in priority order
const CONFIG_FILE_NAMES: &[&str] = &["cslint.toml", ".cslintrc.json"];

/// Top-level analyzer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CslintConfig {
    /// Number of spaces one indentation level adds (used by fixes)
    pub indent_width: usize,
    /// Conditional-compilation symbols considered defined during analysis
    pub defined_symbols: Vec<String>,
    /// Per-rule overrides keyed by rule id
    pub rules: BTreeMap<String, RuleConfig>,
}

impl Default for CslintConfig {
    fn default() -> Self {
        Self {
            indent_width: 4,
            defined_symbols: Vec::new(),
            rules: BTreeMap::new(),
        }
    }
}

/// Per-rule configuration overrides
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RuleConfig {
    /// Whether the rule runs at all
    pub enabled: bool,
    /// Severity override; `None` keeps the rule's default
    pub severity: Option<Severity>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            severity: None,
        }
    }
}

impl CslintConfig {
    /// Load configuration from an explicit file path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CslintError::io_error(path.to_path_buf(), e))?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&content).map_err(|e| {
                CslintError::config_error(format!("invalid TOML in {}: {e}", path.display()))
            }),
            Some("json") => serde_json::from_str(&content).map_err(|e| {
                CslintError::config_error(format!("invalid JSON in {}: {e}", path.display()))
            }),
            _ => Err(CslintError::config_error(format!(
                "unsupported configuration file extension: {}",
                path.display()
            ))),
        }
    }

    /// Discover and load configuration from `dir`, walking no further than
    /// the directory itself. Returns defaults when no config file exists.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                tracing::debug!("loading configuration from {}", candidate.display());
                return Self::load_from_path(&candidate);
            }
        }
        Ok(Self::default())
    }

    /// Whether a rule is enabled (default: enabled)
    pub fn rule_enabled(&self, rule_id: &str) -> bool {
        self.rules.get(rule_id).map(|r| r.enabled).unwrap_or(true)
    }

    /// The configured severity override for a rule, if any
    pub fn rule_severity(&self, rule_id: &str) -> Option<Severity> {
        self.rules.get(rule_id).and_then(|r| r.severity)
    }
}
