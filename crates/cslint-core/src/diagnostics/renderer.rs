//! Diagnostic rendering for terminal and machine consumption

use serde::Serialize;

use super::{Diagnostic, Severity};
use crate::console::{Color, Console};

/// Output format for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text with colors
    Text,
    /// JSON for programmatic consumption
    Json,
}

/// Renders diagnostics in the configured format
pub struct DiagnosticRenderer {
    console: Console,
    format: OutputFormat,
}

#[derive(Serialize)]
struct JsonDiagnostic<'a> {
    file: &'a std::path::Path,
    rule_id: &'a str,
    severity: Severity,
    line: usize,
    column: usize,
    length: usize,
    message: &'a str,
}

impl DiagnosticRenderer {
    pub fn new() -> Self {
        Self {
            console: Console::new(),
            format: OutputFormat::Text,
        }
    }

    pub fn no_colors() -> Self {
        Self {
            console: Console::no_colors(),
            format: OutputFormat::Text,
        }
    }

    pub fn with_format(format: OutputFormat) -> Self {
        let console = match format {
            OutputFormat::Json => Console::no_colors(),
            OutputFormat::Text => Console::new(),
        };
        Self { console, format }
    }

    /// Render a batch of diagnostics; `source_for` supplies the file text
    /// used for code frames in text mode.
    pub fn render_all(
        &self,
        diagnostics: &[Diagnostic],
        source_for: impl Fn(&Diagnostic) -> Option<String>,
    ) -> String {
        match self.format {
            OutputFormat::Text => {
                let mut output = String::new();
                for diagnostic in diagnostics {
                    output.push_str(
                        &self.render_text(diagnostic, source_for(diagnostic).as_deref()),
                    );
                    output.push('\n');
                }
                output
            }
            OutputFormat::Json => self.render_json(diagnostics),
        }
    }

    /// Render one diagnostic as human-readable text:
    ///
    /// ```text
    /// warning[BRACE001]: Braces should not be omitted for an `if` statement clause.
    ///   --> src/Foo.cs:7:13
    ///    |
    ///  7 |             Debug.Assert(true);
    ///    |
    /// ```
    pub fn render_text(&self, diagnostic: &Diagnostic, source: Option<&str>) -> String {
        let mut output = String::new();

        let severity_color = match diagnostic.severity {
            Severity::Error => Color::Red,
            Severity::Warning => Color::Yellow,
            Severity::Info | Severity::Hidden => Color::Blue,
        };
        let header = format!("{}[{}]", diagnostic.severity, diagnostic.rule_id);
        output.push_str(&self.console.colorize(&header, severity_color));
        output.push_str(": ");
        output.push_str(&diagnostic.message);
        output.push('\n');

        let location = format!(
            "  --> {}:{}:{}",
            diagnostic.location.file.display(),
            diagnostic.location.line,
            diagnostic.location.column
        );
        output.push_str(&self.console.colorize(&location, Color::Dim));
        output.push('\n');

        if let Some(source) = source
            && let Some(line_text) = source.lines().nth(diagnostic.location.line.saturating_sub(1))
        {
            let gutter_width = digits(diagnostic.location.line) + 1;
            output.push_str(&self
                .console
                .colorize(&format!("{:>gutter_width$} |", ""), Color::Dim));
            output.push('\n');
            output.push_str(&self.console.colorize(
                &format!("{:>gutter_width$} |", diagnostic.location.line),
                Color::Dim,
            ));
            output.push(' ');
            output.push_str(line_text);
            output.push('\n');
            output.push_str(&self
                .console
                .colorize(&format!("{:>gutter_width$} |", ""), Color::Dim));
            output.push('\n');
        }

        output
    }

    /// Render diagnostics as a JSON array
    pub fn render_json(&self, diagnostics: &[Diagnostic]) -> String {
        let entries: Vec<JsonDiagnostic<'_>> = diagnostics
            .iter()
            .map(|d| JsonDiagnostic {
                file: &d.location.file,
                rule_id: &d.rule_id,
                severity: d.severity,
                line: d.location.line,
                column: d.location.column,
                length: d.location.length,
                message: &d.message,
            })
            .collect();
        serde_json::to_string_pretty(&entries).unwrap_or_else(|_| "[]".to_string())
    }
}

impl Default for DiagnosticRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn digits(mut n: usize) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Location;
    use std::path::PathBuf;

    fn sample() -> Diagnostic {
        Diagnostic::new(
            "BRACE001",
            Severity::Warning,
            "Braces should not be omitted for an `if` statement clause.",
            Location::new(PathBuf::from("Foo.cs"), 2, 5, 11, 4),
        )
    }

    #[test]
    fn text_rendering_includes_position_and_message() {
        let renderer = DiagnosticRenderer::no_colors();
        let rendered = renderer.render_text(&sample(), Some("if (x)\n    M();\n"));
        assert!(rendered.contains("warning[BRACE001]"));
        assert!(rendered.contains("Foo.cs:2:5"));
        assert!(rendered.contains("    M();"));
    }

    #[test]
    fn json_rendering_has_expected_fields() {
        let renderer = DiagnosticRenderer::with_format(OutputFormat::Json);
        let json = renderer.render_json(&[sample()]);
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        let entry = &parsed[0];
        assert_eq!(entry["rule_id"], "BRACE001");
        assert_eq!(entry["severity"], "warning");
        assert_eq!(entry["line"], 2);
        assert_eq!(entry["column"], 5);
        assert_eq!(entry["length"], 4);
    }
}
