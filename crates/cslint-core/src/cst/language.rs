//! Rowan language implementation for C#
//!
//! Connects the `CsSyntaxKind` enum to Rowan's generic CST infrastructure.

use rowan::Language;

use super::CsSyntaxKind;

/// Language implementation for the C# brace-style CST
///
/// Zero-sized type implementing `rowan::Language` to bridge our syntax
/// kinds and Rowan's generic tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CsLanguage;

impl Language for CsLanguage {
    type Kind = CsSyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        match raw.0 {
            // Trivia
            0 => CsSyntaxKind::Whitespace,
            1 => CsSyntaxKind::Newline,
            2 => CsSyntaxKind::CommentLine,
            3 => CsSyntaxKind::CommentBlock,
            4 => CsSyntaxKind::Directive,
            5 => CsSyntaxKind::DisabledText,

            // Keywords
            10 => CsSyntaxKind::IfKw,
            11 => CsSyntaxKind::ElseKw,
            12 => CsSyntaxKind::WhileKw,
            13 => CsSyntaxKind::ForKw,
            14 => CsSyntaxKind::ForeachKw,
            15 => CsSyntaxKind::LockKw,
            16 => CsSyntaxKind::UsingKw,
            17 => CsSyntaxKind::FixedKw,
            18 => CsSyntaxKind::DoKw,

            // Punctuation
            30 => CsSyntaxKind::LParen,
            31 => CsSyntaxKind::RParen,
            32 => CsSyntaxKind::LBrace,
            33 => CsSyntaxKind::RBrace,
            34 => CsSyntaxKind::LBracket,
            35 => CsSyntaxKind::RBracket,
            36 => CsSyntaxKind::Semicolon,

            // Coarse token classes
            50 => CsSyntaxKind::Ident,
            51 => CsSyntaxKind::StringLit,
            52 => CsSyntaxKind::CharLit,
            53 => CsSyntaxKind::NumberLit,
            54 => CsSyntaxKind::Operator,

            // Structure nodes
            200 => CsSyntaxKind::SourceFile,
            201 => CsSyntaxKind::Block,
            202 => CsSyntaxKind::IfStatement,
            203 => CsSyntaxKind::ElseClause,
            204 => CsSyntaxKind::WhileStatement,
            205 => CsSyntaxKind::ForStatement,
            206 => CsSyntaxKind::ForEachStatement,
            207 => CsSyntaxKind::LockStatement,
            208 => CsSyntaxKind::UsingStatement,
            209 => CsSyntaxKind::FixedStatement,
            210 => CsSyntaxKind::DoStatement,
            211 => CsSyntaxKind::EmptyStatement,
            212 => CsSyntaxKind::GenericStatement,
            213 => CsSyntaxKind::ParenClause,

            _ => CsSyntaxKind::Error,
        }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind as u16)
    }
}
