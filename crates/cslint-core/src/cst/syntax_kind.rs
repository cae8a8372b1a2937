//! Syntax kind enumeration for the C# CST
//!
//! This module defines all node and token types the brace-style analyzer
//! distinguishes. The lexer and tolerant parser only model what layout
//! analysis needs: trivia, the nine control-statement keywords, the
//! punctuation that delimits headers/blocks/statements, and coarse token
//! classes for everything else.

use std::fmt;

/// Syntax kind for C# source elements
///
/// Includes:
/// - Trivia (whitespace, comments, preprocessor directives, disabled regions)
/// - Control-statement keywords
/// - Structural punctuation
/// - Coarse literal/identifier/operator token classes
/// - Structure nodes (statements, blocks, clauses)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum CsSyntaxKind {
    // ==================
    // Trivia (0-9)
    // ==================
    /// Spaces and tabs
    Whitespace = 0,
    /// Line break (`\n`, `\r\n`, or `\r`)
    Newline = 1,
    /// Line comment starting with //
    CommentLine = 2,
    /// Block comment /* ... */
    CommentBlock = 3,
    /// A preprocessor directive line (`#if`, `#region`, `#pragma`, ...)
    Directive = 4,
    /// Source text inside an inactive conditional-compilation region
    DisabledText = 5,

    // ==================
    // Keywords (10-29)
    // ==================
    /// `if` keyword
    IfKw = 10,
    /// `else` keyword
    ElseKw = 11,
    /// `while` keyword
    WhileKw = 12,
    /// `for` keyword
    ForKw = 13,
    /// `foreach` keyword
    ForeachKw = 14,
    /// `lock` keyword
    LockKw = 15,
    /// `using` keyword
    UsingKw = 16,
    /// `fixed` keyword
    FixedKw = 17,
    /// `do` keyword
    DoKw = 18,

    // ==================
    // Punctuation (30-49)
    // ==================
    LParen = 30,
    RParen = 31,
    LBrace = 32,
    RBrace = 33,
    LBracket = 34,
    RBracket = 35,
    Semicolon = 36,

    // ==================
    // Coarse token classes (50-69)
    // ==================
    /// Identifier, contextual keyword, or any C# keyword the analyzer does
    /// not model (`class`, `return`, `new`, ...)
    Ident = 50,
    /// Any string literal form: regular, verbatim, interpolated, raw
    StringLit = 51,
    /// Character literal
    CharLit = 52,
    /// Numeric literal
    NumberLit = 53,
    /// Any other operator or punctuation character
    Operator = 54,

    // ==================
    // Structure nodes (200+)
    // ==================
    /// Root node covering the whole file
    SourceFile = 200,
    /// `{ ... }` delimited block
    Block = 201,
    /// `if (cond) stmt [else stmt]`
    IfStatement = 202,
    /// `else stmt` clause of an if statement
    ElseClause = 203,
    WhileStatement = 204,
    ForStatement = 205,
    ForEachStatement = 206,
    LockStatement = 207,
    UsingStatement = 208,
    FixedStatement = 209,
    /// `do stmt while (cond);`
    DoStatement = 210,
    /// A bare `;`
    EmptyStatement = 211,
    /// Any statement or declaration the parser does not model structurally
    GenericStatement = 212,
    /// Parenthesized header clause `( ... )` of a control statement
    ParenClause = 213,

    // ==================
    // Special (400+)
    // ==================
    /// Token produced for unexpected input
    Error = 400,
}

impl CsSyntaxKind {
    /// Check if this kind is trivia (ignorable for structure, preserved for text)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            CsSyntaxKind::Whitespace
                | CsSyntaxKind::Newline
                | CsSyntaxKind::CommentLine
                | CsSyntaxKind::CommentBlock
                | CsSyntaxKind::Directive
                | CsSyntaxKind::DisabledText
        )
    }

    /// Check if this kind is a comment
    pub fn is_comment(self) -> bool {
        matches!(self, CsSyntaxKind::CommentLine | CsSyntaxKind::CommentBlock)
    }

    /// Check if this kind is a statement-level node
    pub fn is_statement(self) -> bool {
        matches!(
            self,
            CsSyntaxKind::Block
                | CsSyntaxKind::IfStatement
                | CsSyntaxKind::WhileStatement
                | CsSyntaxKind::ForStatement
                | CsSyntaxKind::ForEachStatement
                | CsSyntaxKind::LockStatement
                | CsSyntaxKind::UsingStatement
                | CsSyntaxKind::FixedStatement
                | CsSyntaxKind::DoStatement
                | CsSyntaxKind::EmptyStatement
                | CsSyntaxKind::GenericStatement
        )
    }

    /// Check if this kind is one of the nine control-construct forms
    pub fn is_control_statement(self) -> bool {
        matches!(
            self,
            CsSyntaxKind::IfStatement
                | CsSyntaxKind::ElseClause
                | CsSyntaxKind::WhileStatement
                | CsSyntaxKind::ForStatement
                | CsSyntaxKind::ForEachStatement
                | CsSyntaxKind::LockStatement
                | CsSyntaxKind::UsingStatement
                | CsSyntaxKind::FixedStatement
                | CsSyntaxKind::DoStatement
        )
    }
}

impl fmt::Display for CsSyntaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl From<CsSyntaxKind> for rowan::SyntaxKind {
    fn from(kind: CsSyntaxKind) -> Self {
        rowan::SyntaxKind(kind as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trivia_classification() {
        assert!(CsSyntaxKind::Whitespace.is_trivia());
        assert!(CsSyntaxKind::Directive.is_trivia());
        assert!(CsSyntaxKind::DisabledText.is_trivia());
        assert!(!CsSyntaxKind::IfKw.is_trivia());
        assert!(!CsSyntaxKind::Semicolon.is_trivia());
    }

    #[test]
    fn statement_classification() {
        assert!(CsSyntaxKind::Block.is_statement());
        assert!(CsSyntaxKind::EmptyStatement.is_statement());
        assert!(!CsSyntaxKind::ParenClause.is_statement());
        assert!(!CsSyntaxKind::ElseClause.is_statement());
    }

    #[test]
    fn control_statement_classification() {
        assert!(CsSyntaxKind::IfStatement.is_control_statement());
        assert!(CsSyntaxKind::ElseClause.is_control_statement());
        assert!(CsSyntaxKind::DoStatement.is_control_statement());
        assert!(!CsSyntaxKind::Block.is_control_statement());
        assert!(!CsSyntaxKind::GenericStatement.is_control_statement());
    }
}
