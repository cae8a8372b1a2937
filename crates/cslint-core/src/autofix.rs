//! Autofix primitives
//!
//! Applies `CodeSuggestion` edits to source text with bounds validation,
//! detects conflicting edits, and renders dry-run previews. The per-rule
//! fix computation and the recompute-per-fix driver live in the rules
//! crate; this module owns the mechanics shared by every fix.

use std::path::PathBuf;

use crate::diagnostics::{Applicability, CodeSuggestion};
use crate::error::CslintError;
use crate::result::Result;

/// Configuration for fix application
#[derive(Debug, Clone)]
pub struct FixConfig {
    /// Whether to apply suggestions marked `MaybeIncorrect`
    pub apply_unsafe: bool,
    /// Preview mode: compute fixed content but do not write files
    pub dry_run: bool,
    /// Upper bound on fix passes per file; applying a fix can reveal no new
    /// work, so this only guards against a non-converging provider
    pub max_passes: usize,
}

impl Default for FixConfig {
    fn default() -> Self {
        Self {
            apply_unsafe: false,
            dry_run: false,
            max_passes: 1000,
        }
    }
}

impl FixConfig {
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Default::default()
        }
    }
}

/// Result of fixing one file
#[derive(Debug, Clone)]
pub struct FixResult {
    /// Path to the file
    pub file: PathBuf,
    /// Number of fixes applied
    pub applied_count: usize,
    /// Number of diagnostics for which no fix could be computed
    pub unavailable_count: usize,
    /// The fixed content; equal to the input when nothing was applied
    pub content: String,
}

impl FixResult {
    /// Whether any edit was made
    pub fn changed(&self) -> bool {
        self.applied_count > 0
    }
}

/// Whether a suggestion may be applied under the given configuration
pub fn is_applicable(suggestion: &CodeSuggestion, config: &FixConfig) -> bool {
    match suggestion.applicability {
        Applicability::Always => true,
        Applicability::MaybeIncorrect => config.apply_unsafe,
    }
}

/// Apply a single suggestion to `source`, validating the edit span.
///
/// Fails (rather than corrupting text) when the span is out of bounds or
/// not on character boundaries.
pub fn apply_suggestion(source: &str, suggestion: &CodeSuggestion) -> Result<String> {
    let (start, end) = suggestion.location.span();

    if end > source.len() || start > end {
        return Err(CslintError::fix_error(format!(
            "edit span {start}..{end} outside source of length {}",
            source.len()
        )));
    }
    if !source.is_char_boundary(start) || !source.is_char_boundary(end) {
        return Err(CslintError::fix_error(format!(
            "edit span {start}..{end} not on character boundaries"
        )));
    }

    let mut fixed = String::with_capacity(source.len() + suggestion.replacement.len());
    fixed.push_str(&source[..start]);
    fixed.push_str(&suggestion.replacement);
    fixed.push_str(&source[end..]);
    Ok(fixed)
}

/// Two suggestions conflict when their spans overlap
pub fn suggestions_conflict(a: &CodeSuggestion, b: &CodeSuggestion) -> bool {
    let (a_start, a_end) = a.location.span();
    let (b_start, b_end) = b.location.span();
    !(a_end <= b_start || b_end <= a_start)
}

/// Render a unified diff between original and fixed content for previews
pub fn render_diff(original: &str, fixed: &str, file: &std::path::Path) -> String {
    let name = file.display().to_string();
    similar::TextDiff::from_lines(original, fixed)
        .unified_diff()
        .context_radius(2)
        .header(&name, &name)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Location;

    fn suggestion(offset: usize, length: usize, replacement: &str) -> CodeSuggestion {
        CodeSuggestion::safe(
            "test",
            replacement,
            Location::new(PathBuf::from("a.cs"), 1, 1, offset, length),
        )
    }

    #[test]
    fn applies_replacement() {
        let fixed = apply_suggestion("abc def", &suggestion(4, 3, "xyz")).unwrap();
        assert_eq!(fixed, "abc xyz");
    }

    #[test]
    fn applies_insertion() {
        let fixed = apply_suggestion("ab", &suggestion(1, 0, "-")).unwrap();
        assert_eq!(fixed, "a-b");
    }

    #[test]
    fn rejects_out_of_bounds_span() {
        assert!(apply_suggestion("ab", &suggestion(1, 5, "x")).is_err());
    }

    #[test]
    fn rejects_non_boundary_span() {
        // 'é' occupies bytes 0..2; offset 1 is mid-character
        assert!(apply_suggestion("é", &suggestion(1, 0, "x")).is_err());
    }

    #[test]
    fn conflict_detection() {
        assert!(suggestions_conflict(
            &suggestion(0, 4, "x"),
            &suggestion(2, 4, "y")
        ));
        assert!(!suggestions_conflict(
            &suggestion(0, 2, "x"),
            &suggestion(2, 2, "y")
        ));
    }

    #[test]
    fn unsafe_suggestions_gated_by_config() {
        let mut s = suggestion(0, 1, "x");
        s.applicability = Applicability::MaybeIncorrect;
        assert!(!is_applicable(&s, &FixConfig::default()));
        assert!(is_applicable(
            &s,
            &FixConfig {
                apply_unsafe: true,
                ..Default::default()
            }
        ));
    }

    #[test]
    fn diff_rendering() {
        let diff = render_diff("a\nb\n", "a\nc\n", &PathBuf::from("a.cs"));
        assert!(diff.contains("-b"));
        assert!(diff.contains("+c"));
    }
}
