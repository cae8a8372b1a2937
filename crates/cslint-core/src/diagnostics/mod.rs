//! Diagnostic types for the analyzer
//!
//! Provides immutable diagnostic records with:
//! - Precise 1-based line/column positions plus byte offsets
//! - Code suggestions (text edits) with applicability levels
//! - Text and JSON output rendering

mod renderer;
mod source_map;

pub use renderer::{DiagnosticRenderer, OutputFormat};
pub use source_map::SourceMap;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// A finding produced by a rule. Immutable once created; one instance per
/// offending construct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Identifier of the rule that produced this diagnostic
    pub rule_id: String,
    /// Severity level
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Location in the source file
    pub location: Location,
    /// Suggested fixes, if any were attached eagerly
    pub suggestions: Vec<CodeSuggestion>,
}

impl Diagnostic {
    pub fn new(
        rule_id: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        location: Location,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            severity,
            message: message.into(),
            location,
            suggestions: Vec::new(),
        }
    }

    /// Attach a code suggestion
    pub fn with_suggestion(mut self, suggestion: CodeSuggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

/// Severity levels for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Produced but never surfaced to the user
    Hidden,
    /// Informational finding
    Info,
    /// Finding that should be addressed
    Warning,
    /// Finding that must be fixed
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Hidden => write!(f, "hidden"),
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Location information for diagnostics and edits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// File path
    pub file: PathBuf,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based, in characters)
    pub column: usize,
    /// Optional end position
    pub end_line: Option<usize>,
    pub end_column: Option<usize>,
    /// Byte offset in the file
    pub offset: usize,
    /// Length of the span in bytes
    pub length: usize,
}

impl Location {
    pub fn new(file: PathBuf, line: usize, column: usize, offset: usize, length: usize) -> Self {
        Self {
            file,
            line,
            column,
            end_line: None,
            end_column: None,
            offset,
            length,
        }
    }

    /// Byte span covered by this location
    pub fn span(&self) -> (usize, usize) {
        (self.offset, self.offset + self.length)
    }
}

/// Indicates how a tool should treat a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Applicability {
    /// The suggestion is definitely correct and may be applied
    /// automatically (structural fixes that cannot change behavior).
    Always,
    /// The suggestion may be correct but requires review.
    MaybeIncorrect,
}

impl fmt::Display for Applicability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Applicability::Always => write!(f, "safe"),
            Applicability::MaybeIncorrect => write!(f, "unsafe"),
        }
    }
}

/// A text edit that resolves a diagnostic: replace the bytes covered by
/// `location` with `replacement`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSuggestion {
    /// Description of the suggested fix
    pub message: String,
    /// The replacement text
    pub replacement: String,
    /// Span to replace
    pub location: Location,
    /// When this suggestion should be applied
    pub applicability: Applicability,
}

impl CodeSuggestion {
    /// Create a safe (always applicable) suggestion
    pub fn safe(message: impl Into<String>, replacement: impl Into<String>, location: Location) -> Self {
        Self {
            message: message.into(),
            replacement: replacement.into(),
            location,
            applicability: Applicability::Always,
        }
    }
}

/// Sort diagnostics into deterministic document order: by file, then by
/// offset, then by rule id.
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by(|a, b| {
        a.location
            .file
            .cmp(&b.location.file)
            .then(a.location.offset.cmp(&b.location.offset))
            .then(a.rule_id.cmp(&b.rule_id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering() {
        assert!(Severity::Hidden < Severity::Info);
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn diagnostic_builder() {
        let location = Location::new(PathBuf::from("a.cs"), 3, 5, 42, 7);
        let diagnostic = Diagnostic::new("BRACE001", Severity::Warning, "msg", location.clone())
            .with_suggestion(CodeSuggestion::safe("fix", "{}", location));
        assert_eq!(diagnostic.rule_id, "BRACE001");
        assert_eq!(diagnostic.suggestions.len(), 1);
        assert_eq!(
            diagnostic.suggestions[0].applicability,
            Applicability::Always
        );
    }

    #[test]
    fn sorting_is_document_order() {
        let mk = |file: &str, offset: usize| {
            Diagnostic::new(
                "BRACE001",
                Severity::Warning,
                "msg",
                Location::new(PathBuf::from(file), 1, 1, offset, 1),
            )
        };
        let mut diagnostics = vec![mk("b.cs", 1), mk("a.cs", 9), mk("a.cs", 2)];
        sort_diagnostics(&mut diagnostics);
        assert_eq!(diagnostics[0].location.file, PathBuf::from("a.cs"));
        assert_eq!(diagnostics[0].location.offset, 2);
        assert_eq!(diagnostics[2].location.file, PathBuf::from("b.cs"));
    }
}
