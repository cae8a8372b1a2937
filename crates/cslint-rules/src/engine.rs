//! Rule dispatch engine and fix driver
//!
//! The engine owns the per-run registry and configuration, walks a file's
//! tree in document order (depth-first, pre-order), and dispatches each
//! node to the rules subscribed to its kind. Analysis holds no mutable
//! shared state, so one engine can drive many files concurrently.
//!
//! Fixing works diagnostic-by-diagnostic: apply one fix, re-parse, and
//! recompute the remaining diagnostics from the fixed text. Spans are never
//! adjusted arithmetically across edits, so fixing one construct cannot
//! invalidate another's fix.

use std::path::Path;

use cslint_core::cst::WalkEvent;
use cslint_core::{
    CancellationToken, CodeSuggestion, CsSyntaxNode, CslintConfig, Diagnostic, FixConfig,
    FixResult, Result, SourceMap, apply_suggestion, is_applicable, parse_cs_with_symbols,
};

use crate::builtin::braces::{self, RuleContext};
use crate::registry::RuleRegistry;

/// Analysis and fix entry points over a resolved rule set
#[derive(Debug, Clone)]
pub struct LintEngine {
    registry: RuleRegistry,
    config: CslintConfig,
}

impl LintEngine {
    pub fn new(config: CslintConfig) -> Self {
        Self {
            registry: RuleRegistry::from_config(&config),
            config,
        }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &CslintConfig {
        &self.config
    }

    /// Parse `source` and report diagnostics in document order.
    ///
    /// Lexer errors are tolerated: the tree is still built (and analysis
    /// still runs) for whatever could be parsed.
    pub fn analyze_source(
        &self,
        file: &Path,
        source: &str,
        cancel: &CancellationToken,
    ) -> Result<Vec<Diagnostic>> {
        let (root, lexer_errors) = parse_cs_with_symbols(source, &self.config.defined_symbols);
        for error in &lexer_errors {
            tracing::debug!(
                "lexer issue in {} at {}..{}: {}",
                file.display(),
                error.span.start,
                error.span.end,
                error.message
            );
        }
        self.analyze_tree(file, source, &root, cancel)
    }

    /// Run the enabled rules over an already parsed tree.
    ///
    /// The cancellation token is checked at every node boundary; observing
    /// it aborts the pass and the partial results are discarded.
    pub fn analyze_tree(
        &self,
        file: &Path,
        source: &str,
        root: &CsSyntaxNode,
        cancel: &CancellationToken,
    ) -> Result<Vec<Diagnostic>> {
        let mut diagnostics = Vec::new();

        // A disabled rule is never dispatched; with no rule subscribed
        // there is nothing to walk.
        let Some(brace_rule) = self.registry.get(braces::RULE_ID).filter(|r| r.enabled) else {
            return Ok(diagnostics);
        };

        let source_map = SourceMap::new(source);
        let ctx = RuleContext {
            file,
            source,
            source_map: &source_map,
            severity: brace_rule.severity,
        };

        for event in root.preorder() {
            if let WalkEvent::Enter(node) = event {
                cancel.check()?;
                // Closed dispatch over node kinds: the brace rule subscribes
                // to the nine control-construct kinds.
                if node.kind().is_control_statement()
                    && let Some(diagnostic) = braces::check_node(&node, &ctx)
                {
                    diagnostics.push(diagnostic);
                }
            }
        }

        Ok(diagnostics)
    }

    /// Compute the fix for one diagnostic against the current tree, or
    /// `None` when no safe edit can be produced.
    pub fn fix_for(
        &self,
        source: &str,
        root: &CsSyntaxNode,
        diagnostic: &Diagnostic,
    ) -> Option<CodeSuggestion> {
        let source_map = SourceMap::new(source);
        braces::create_fix(
            source,
            root,
            diagnostic,
            &source_map,
            self.config.indent_width,
        )
    }

    /// Fix everything fixable in `source`, one diagnostic at a time.
    ///
    /// Each pass re-parses the current text, recomputes diagnostics, and
    /// applies the first available fix. The loop ends when no diagnostics
    /// remain or none of the remaining ones can be fixed.
    pub fn fix_source(
        &self,
        file: &Path,
        source: &str,
        fix_config: &FixConfig,
        cancel: &CancellationToken,
    ) -> Result<FixResult> {
        let mut current = source.to_string();
        let mut applied_count = 0usize;
        let mut unavailable_count = 0usize;

        for _pass in 0..fix_config.max_passes {
            cancel.check()?;

            let (root, _) = parse_cs_with_symbols(&current, &self.config.defined_symbols);
            let diagnostics = self.analyze_tree(file, &current, &root, cancel)?;
            if diagnostics.is_empty() {
                unavailable_count = 0;
                break;
            }

            let source_map = SourceMap::new(&current);
            let mut fixed_one = false;
            let mut skipped = 0usize;

            for diagnostic in &diagnostics {
                let suggestion = braces::create_fix(
                    &current,
                    &root,
                    diagnostic,
                    &source_map,
                    self.config.indent_width,
                );
                match suggestion {
                    Some(suggestion) if is_applicable(&suggestion, fix_config) => {
                        current = apply_suggestion(&current, &suggestion)?;
                        applied_count += 1;
                        fixed_one = true;
                        break;
                    }
                    _ => skipped += 1,
                }
            }

            if !fixed_one {
                unavailable_count = skipped;
                break;
            }
        }

        Ok(FixResult {
            file: file.to_path_buf(),
            applied_count,
            unavailable_count,
            content: current,
        })
    }
}

impl Default for LintEngine {
    fn default() -> Self {
        Self::new(CslintConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cslint_core::{RuleConfig, Severity};

    fn engine_with(config: CslintConfig) -> LintEngine {
        LintEngine::new(config)
    }

    #[test]
    fn disabled_rule_is_never_dispatched() {
        let mut config = CslintConfig::default();
        config.rules.insert(
            braces::RULE_ID.to_string(),
            RuleConfig {
                enabled: false,
                severity: None,
            },
        );
        let engine = engine_with(config);
        let diagnostics = engine
            .analyze_source(
                Path::new("Test.cs"),
                "if (x)\n    M();\n",
                &CancellationToken::new(),
            )
            .unwrap();
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn severity_override_is_applied() {
        let mut config = CslintConfig::default();
        config.rules.insert(
            braces::RULE_ID.to_string(),
            RuleConfig {
                enabled: true,
                severity: Some(Severity::Error),
            },
        );
        let engine = engine_with(config);
        let diagnostics = engine
            .analyze_source(
                Path::new("Test.cs"),
                "if (x)\n    M();\n",
                &CancellationToken::new(),
            )
            .unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn cancellation_aborts_analysis() {
        let engine = LintEngine::default();
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = engine.analyze_source(Path::new("Test.cs"), "if (x)\n    M();\n", &cancel);
        assert!(result.is_err());
    }

    #[test]
    fn nested_constructs_report_outer_before_inner() {
        let engine = LintEngine::default();
        let diagnostics = engine
            .analyze_source(
                Path::new("Test.cs"),
                "if (a)\n    while (b)\n        M();\n",
                &CancellationToken::new(),
            )
            .unwrap();
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].message.contains("`if`"));
        assert!(diagnostics[1].message.contains("`while`"));
        assert!(diagnostics[0].location.offset < diagnostics[1].location.offset);
    }

    #[test]
    fn fix_source_converges_on_nested_constructs() {
        let engine = LintEngine::default();
        let result = engine
            .fix_source(
                Path::new("Test.cs"),
                "if (a)\n    while (b)\n        M();\n",
                &FixConfig::default(),
                &CancellationToken::new(),
            )
            .unwrap();
        assert_eq!(result.applied_count, 2);
        assert_eq!(result.unavailable_count, 0);
        assert_eq!(
            result.content,
            "if (a)\n{\n    while (b)\n    {\n        M();\n    }\n}\n"
        );
        // The fixed text is clean
        let diagnostics = engine
            .analyze_source(
                Path::new("Test.cs"),
                &result.content,
                &CancellationToken::new(),
            )
            .unwrap();
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn fix_source_leaves_clean_input_untouched() {
        let engine = LintEngine::default();
        let source = "if (x)\n{\n    M();\n}\n";
        let result = engine
            .fix_source(
                Path::new("Test.cs"),
                source,
                &FixConfig::default(),
                &CancellationToken::new(),
            )
            .unwrap();
        assert_eq!(result.applied_count, 0);
        assert_eq!(result.content, source);
    }
}
