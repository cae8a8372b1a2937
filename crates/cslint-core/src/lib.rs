//! cslint core
//!
//! Core engine for the cslint C# style analyzer. This crate provides the
//! lossless CST (lexer, tolerant statement parser, typed AST layer), the
//! diagnostics model, autofix primitives, configuration, file discovery,
//! and the parallel execution driver. Rules live in `cslint-rules`.

pub mod autofix;
pub mod cancel;
pub mod config;
pub mod console;
pub mod cst; // Concrete Syntax Tree (lossless, Rowan-based)
pub mod diagnostics;
pub mod discovery;
pub mod error;
pub mod executor;
pub mod result;

// Re-export commonly used types
pub use autofix::{
    FixConfig, FixResult, apply_suggestion, is_applicable, render_diff, suggestions_conflict,
};
pub use cancel::CancellationToken;
pub use config::{CslintConfig, RuleConfig};
pub use console::{Color, Console};
pub use cst::ast::{AstNode, ControlConstruct, ControlKind};
pub use cst::{
    CsLanguage, CsSyntaxKind, CsSyntaxNode, CsSyntaxNodeExt, CsSyntaxToken, LexerError, TextRange,
    TextSize, parse_cs, parse_cs_with_symbols,
};
pub use diagnostics::{
    Applicability, CodeSuggestion, Diagnostic, DiagnosticRenderer, Location, OutputFormat,
    Severity, SourceMap, sort_diagnostics,
};
pub use discovery::discover_files;
pub use error::{CslintError, ErrorKind};
pub use executor::{FileExecutionResult, execute};
pub use result::Result;

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cslint=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
