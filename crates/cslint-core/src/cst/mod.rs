//! Concrete Syntax Tree (CST) for C# source
//!
//! A lossless syntax tree built on the Rowan library. The CST preserves all
//! source information (whitespace, comments, preprocessor directives) so
//! that autofixes can rewrite structure without disturbing formatting.
//!
//! ## Architecture
//!
//! Rowan's green/red tree pattern:
//!
//! - **Green tree**: immutable, position-independent storage of the source
//!   text with trivia; cheap to clone.
//! - **Red tree**: on-demand view with parent pointers and absolute offsets,
//!   used for traversal and classification.
//!
//! ## Trivia handling
//!
//! Trivia (whitespace, newlines, comments, preprocessor directives, disabled
//! conditional regions) is kept as ordinary tokens in the tree, which makes
//! the lossless property structural: `parse_cs(source).text() == source`.

mod builder;
mod language;
mod lexer;
mod nodes;
mod parser;
mod syntax_kind;

pub mod ast;

pub use builder::CstBuilder;
pub use language::CsLanguage;
pub use lexer::{
    CstLexResult, CstSpan, CstToken, LexerError, lex_with_trivia, lex_with_trivia_and_symbols,
};
pub use nodes::{
    CsSyntaxElement, CsSyntaxNode, CsSyntaxNodeExt, CsSyntaxToken, CsSyntaxTokenExt, Direction,
    NodeOrToken, TextRange, TextSize, WalkEvent,
};
pub use parser::{parse_cs, parse_cs_with_symbols};
pub use syntax_kind::CsSyntaxKind;
