//! Braces-should-not-be-omitted rule (BRACE001) and its fix
//!
//! Reports a control construct (if/else, while, for, foreach, lock, using,
//! fixed, do-while) whose body is a single undelimited statement on its own
//! line. A child statement on the same line as its header is permitted
//! (`if (x) return;`), as is an `else if` chain link.
//!
//! The fix wraps the body in braces: the opening brace goes on its own line
//! at the header's indentation (after any comment on the header line), the
//! body keeps its text and trailing comment one indent level deeper, and
//! the closing brace lands on its own line at the header's indentation.

use std::path::Path;

use cslint_core::cst::ast::ControlConstruct;
use cslint_core::{
    CodeSuggestion, CsSyntaxKind, CsSyntaxNode, CsSyntaxToken, Diagnostic, Severity, SourceMap,
    TextSize,
};
use rowan::TokenAtOffset;

use crate::registry::{RuleCategory, RuleDescriptor};

/// Diagnostic identifier for this rule
pub const RULE_ID: &str = "BRACE001";

/// Descriptor registered in the built-in rule table
pub fn descriptor() -> RuleDescriptor {
    RuleDescriptor {
        id: RULE_ID,
        name: "braces-should-not-be-omitted",
        description: "Statement bodies on their own line must be wrapped in braces",
        category: RuleCategory::Layout,
        default_severity: Severity::Warning,
        enabled_by_default: true,
        fixable: true,
    }
}

/// Context handed to the check by the dispatch engine
pub(crate) struct RuleContext<'a> {
    pub file: &'a Path,
    pub source: &'a str,
    pub source_map: &'a SourceMap,
    pub severity: Severity,
}

/// Evaluate one control-construct node. The engine dispatches every node
/// whose kind subscribes to this rule; anything unclassifiable (incomplete
/// parse) is skipped without reporting.
pub(crate) fn check_node(node: &CsSyntaxNode, ctx: &RuleContext<'_>) -> Option<Diagnostic> {
    let construct = ControlConstruct::classify(node)?;
    if construct.body_is_block() {
        return None;
    }

    let header_start = usize::from(construct.header.start());
    let body_start = usize::from(construct.body.text_range().start());
    if ctx.source_map.line_index(header_start) == ctx.source_map.line_index(body_start) {
        // Single-line child statements are permitted
        return None;
    }

    let location = ctx
        .source_map
        .location(ctx.source, ctx.file, construct.body.text_range());
    Some(Diagnostic::new(
        RULE_ID,
        ctx.severity,
        format!(
            "Braces should not be omitted for {}.",
            construct.kind.description()
        ),
        location,
    ))
}

/// Compute the fix for one previously reported diagnostic.
///
/// Spans are recomputed from the current tree rather than trusting offsets
/// recorded earlier; when the body cannot be re-resolved unambiguously the
/// fix is unavailable and `None` is returned, never a best-effort edit.
pub fn create_fix(
    source: &str,
    root: &CsSyntaxNode,
    diagnostic: &Diagnostic,
    source_map: &SourceMap,
    indent_width: usize,
) -> Option<CodeSuggestion> {
    if diagnostic.rule_id != RULE_ID {
        return None;
    }

    let construct = root
        .descendants()
        .filter_map(|n| ControlConstruct::classify(&n))
        .find(|c| {
            usize::from(c.body.text_range().start()) == diagnostic.location.offset
                && !c.body_is_block()
        })?;

    let edit_start = extend_through_line_comments(root, construct.header.end());
    let edit_end = extend_through_line_comments(root, construct.body.text_range().end());
    if edit_end <= edit_start || edit_end > source.len() {
        return None;
    }

    let header_indent = source_map.line_indent(source, usize::from(construct.header.start()));
    let indent_unit = if header_indent.contains('\t') {
        "\t".to_string()
    } else {
        " ".repeat(indent_width)
    };
    let target_indent = format!("{header_indent}{indent_unit}");

    let inner = &source[edit_start..edit_end];
    let body_block = rebuild_body_lines(inner, edit_start, &target_indent, root, source)?;

    let line_break = if source.contains("\r\n") { "\r\n" } else { "\n" };
    let replacement = format!(
        "{line_break}{header_indent}{{{line_break}{body_block}{line_break}{header_indent}}}"
    );
    let location = source_map.location(
        source,
        &diagnostic.location.file,
        cslint_core::TextRange::new(
            TextSize::from(edit_start as u32),
            TextSize::from(edit_end as u32),
        ),
    );

    Some(CodeSuggestion::safe(
        format!("Wrap the body of {} in braces", construct.kind.description()),
        replacement,
        location,
    ))
}

/// Extend an edit boundary forward past comments on the same line.
///
/// Whitespace is only crossed when a comment follows it; a trailing comment
/// on the header line therefore stays on the header line, and a trailing
/// comment on the body line stays attached to the body.
fn extend_through_line_comments(root: &CsSyntaxNode, from: TextSize) -> usize {
    let mut end = usize::from(from);
    let mut token = token_starting_at(root, from);

    while let Some(current) = token {
        match current.kind() {
            CsSyntaxKind::Whitespace => {}
            CsSyntaxKind::CommentLine => {
                end = usize::from(current.text_range().end());
            }
            CsSyntaxKind::CommentBlock if !current.text().contains('\n') => {
                end = usize::from(current.text_range().end());
            }
            _ => break,
        }
        token = current.next_token();
    }

    end
}

/// The token starting exactly at `offset`, if any
fn token_starting_at(root: &CsSyntaxNode, offset: TextSize) -> Option<CsSyntaxToken> {
    if offset >= root.text_range().end() {
        return None;
    }
    match root.token_at_offset(offset) {
        TokenAtOffset::None => None,
        TokenAtOffset::Single(token) => {
            if token.text_range().start() == offset {
                Some(token)
            } else {
                token.next_token()
            }
        }
        TokenAtOffset::Between(_, right) => Some(right),
    }
}

/// Re-emit the edit region's body lines, indented one level deeper than the
/// header. The first segment of the region is the remnant of the header
/// line (whitespace only, by construction) and is dropped; every following
/// line keeps its text, with its leading indentation shifted from the body
/// line's original indentation to the target. Lines that begin inside a
/// multi-line token (verbatim strings, block comments, disabled regions)
/// and preprocessor directive lines are never touched.
fn rebuild_body_lines(
    inner: &str,
    inner_start: usize,
    target_indent: &str,
    root: &CsSyntaxNode,
    source: &str,
) -> Option<String> {
    let mut segments = inner.split_inclusive('\n');
    let header_remnant = segments.next()?;
    if !header_remnant.trim().is_empty() {
        // The region between the header and its line break should contain
        // nothing but whitespace at this point; anything else means the
        // spans are stale and the fix is unavailable.
        return None;
    }

    let mut out = String::with_capacity(inner.len() + 16);
    let mut offset_in_inner = inner.find('\n')? + 1;
    let mut base_indent: Option<String> = None;

    for segment in segments {
        let abs = inner_start + offset_in_inner;
        offset_in_inner += segment.len();

        let content = segment.trim_end_matches(['\n', '\r']);
        let is_blank = content.trim().is_empty();
        let is_directive = content.trim_start().starts_with('#');

        // The first non-blank line fixes the indentation all lines are
        // shifted relative to
        if !is_blank && base_indent.is_none() {
            base_indent = Some(leading_whitespace(content).to_string());
        }
        let base = base_indent.as_deref().unwrap_or("");

        if is_blank
            || is_directive
            || starts_inside_multiline_token(root, source, abs)
            || !content.starts_with(base)
            || base == target_indent
        {
            out.push_str(segment);
        } else {
            out.push_str(target_indent);
            out.push_str(&segment[base.len()..]);
        }
    }

    if out.is_empty() {
        return None;
    }
    // The last body line carries no break; strip one if a break slipped in
    while out.ends_with(['\n', '\r']) {
        out.pop();
    }
    Some(out)
}

fn leading_whitespace(line: &str) -> &str {
    let rest = line.trim_start_matches([' ', '\t']);
    &line[..line.len() - rest.len()]
}

/// Whether `abs` falls strictly inside a token spanning multiple lines
fn starts_inside_multiline_token(root: &CsSyntaxNode, source: &str, abs: usize) -> bool {
    if abs >= source.len() {
        return false;
    }
    match root.token_at_offset(TextSize::from(abs as u32)) {
        TokenAtOffset::Single(token) => {
            usize::from(token.text_range().start()) < abs && token.text().contains('\n')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cslint_core::{CancellationToken, CslintConfig, apply_suggestion, parse_cs};

    use crate::engine::LintEngine;

    fn engine() -> LintEngine {
        LintEngine::new(CslintConfig::default())
    }

    fn check(source: &str) -> Vec<Diagnostic> {
        engine()
            .analyze_source(Path::new("Test.cs"), source, &CancellationToken::new())
            .expect("analysis succeeds")
    }

    fn fix_first(source: &str) -> String {
        let diagnostics = check(source);
        assert!(!diagnostics.is_empty(), "expected a diagnostic");
        let (root, _) = parse_cs(source);
        let source_map = SourceMap::new(source);
        let suggestion = create_fix(source, &root, &diagnostics[0], &source_map, 4)
            .expect("fix should be available");
        apply_suggestion(source, &suggestion).expect("fix applies")
    }

    #[test]
    fn do_statement_fix_matches_convention() {
        // The while continuation stays on its own line after the brace
        let source = "do\n    Assert(true);\nwhile(false);\n";
        let fixed = fix_first(source);
        assert_eq!(fixed, "do\n{\n    Assert(true);\n}\nwhile(false);\n");
    }

    #[test]
    fn if_else_reports_two_independent_diagnostics() {
        let source = "if (i==0)\n    Assert(true);\nelse\n    Assert(false);\n";
        let diagnostics = check(source);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].location.line, 2);
        assert_eq!(diagnostics[1].location.line, 4);
    }

    #[test]
    fn braced_and_single_line_bodies_are_clean() {
        let source = "if (true) return;\nif (i==0)\n{\n    Assert(true);\n}\nelse\n{\n    Assert(false);\n}\n";
        assert!(check(source).is_empty());
    }

    #[test]
    fn ternary_expression_is_never_reported() {
        let source = "i == 0 ? Assert(true) : Assert(false);\n//if (i == 0)\n//{\n//    Assert(true);\n//}\n";
        assert!(check(source).is_empty());
    }

    #[test]
    fn trailing_comment_stays_attached_to_the_body() {
        let source = "if (x)\n    DoWork(); // note\n";
        let fixed = fix_first(source);
        assert_eq!(fixed, "if (x)\n{\n    DoWork(); // note\n}\n");
    }

    #[test]
    fn header_line_comment_stays_on_the_header_line() {
        let source = "if (x) // guard\n    DoWork();\n";
        let fixed = fix_first(source);
        assert_eq!(fixed, "if (x) // guard\n{\n    DoWork();\n}\n");
    }

    #[test]
    fn fix_is_idempotent() {
        let source = "if (x)\n    DoWork();\n";
        let fixed = fix_first(source);
        assert!(check(&fixed).is_empty());
    }

    #[test]
    fn indented_context_preserves_columns() {
        let source = "void Bar()\n{\n    if (x)\n        DoWork();\n}\n";
        let fixed = fix_first(source);
        assert_eq!(
            fixed,
            "void Bar()\n{\n    if (x)\n    {\n        DoWork();\n    }\n}\n"
        );
    }

    #[test]
    fn same_line_body_reindented_one_level() {
        // Body not on its own line is exempt; a body two lines down is not
        let source = "if (x)\nDoWork();\n";
        let fixed = fix_first(source);
        assert_eq!(fixed, "if (x)\n{\n    DoWork();\n}\n");
    }

    #[test]
    fn leading_body_comment_moves_inside_the_block() {
        let source = "if (x)\n    // explain\n    DoWork();\n";
        let fixed = fix_first(source);
        assert_eq!(fixed, "if (x)\n{\n    // explain\n    DoWork();\n}\n");
    }

    #[test]
    fn empty_statement_body_is_reported_and_fixed() {
        let source = "while (Wait())\n    ;\n";
        let diagnostics = check(source);
        assert_eq!(diagnostics.len(), 1);
        let fixed = fix_first(source);
        assert_eq!(fixed, "while (Wait())\n{\n    ;\n}\n");
    }

    #[test]
    fn nested_body_keeps_relative_indentation() {
        let source = "if (a)\n    while (b)\n        M();\n";
        let diagnostics = check(source);
        assert_eq!(diagnostics.len(), 2);
        // Fix the outer construct: the nested while keeps its extra level
        let (root, _) = parse_cs(source);
        let source_map = SourceMap::new(source);
        let suggestion = create_fix(source, &root, &diagnostics[0], &source_map, 4).unwrap();
        let fixed = apply_suggestion(source, &suggestion).unwrap();
        assert_eq!(fixed, "if (a)\n{\n    while (b)\n        M();\n}\n");
    }

    #[test]
    fn fix_unavailable_for_stale_diagnostic() {
        let source = "if (x)\n    M();\n";
        let diagnostics = check(source);
        let other_source = "N();\n";
        let (root, _) = parse_cs(other_source);
        let source_map = SourceMap::new(other_source);
        assert!(create_fix(other_source, &root, &diagnostics[0], &source_map, 4).is_none());
    }

    #[test]
    fn diagnostic_is_anchored_at_the_body_statement() {
        let source = "using System.Diagnostics;\npublic class Foo\n{\n    public void Bar(int i)\n    {\n        do\n            Debug.Assert(true);\n        while (false);\n    }\n}\n";
        let diagnostics = check(source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].location.line, 7);
        assert_eq!(diagnostics[0].location.column, 13);
    }

    #[test]
    fn fix_in_method_context_matches_original_fixture() {
        let source = "using System.Diagnostics;\npublic class Foo\n{\n    public void Bar(int i)\n    {\n        do\n            Debug.Assert(true);\n        while (false);\n    }\n}\n";
        let fixed = fix_first(source);
        assert_eq!(
            fixed,
            "using System.Diagnostics;\npublic class Foo\n{\n    public void Bar(int i)\n    {\n        do\n        {\n            Debug.Assert(true);\n        }\n        while (false);\n    }\n}\n"
        );
    }
}
