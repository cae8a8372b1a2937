//! Type aliases and utilities for C# CST nodes
//!
//! Convenient aliases over Rowan's generic tree types, parameterized with
//! `CsLanguage`. The red tree is constructed on demand and provides parent
//! and sibling navigation; the green tree owns the (lossless) source text.

use super::{CsLanguage, CsSyntaxKind};

/// A node in the C# concrete syntax tree
pub type CsSyntaxNode = rowan::SyntaxNode<CsLanguage>;

/// A token in the C# concrete syntax tree
///
/// Tokens are the leaves of the tree and carry the actual source text,
/// including all trivia tokens.
pub type CsSyntaxToken = rowan::SyntaxToken<CsLanguage>;

/// Either a node or a token
pub type CsSyntaxElement = rowan::SyntaxElement<CsLanguage>;

// Re-export common rowan types for convenience
pub use rowan::{Direction, NodeOrToken, TextRange, TextSize, WalkEvent};

/// Extension trait for `CsSyntaxNode` with analyzer-specific helpers
pub trait CsSyntaxNodeExt {
    /// Find the first child node of a specific kind
    fn child_of_kind(&self, kind: CsSyntaxKind) -> Option<CsSyntaxNode>;

    /// Find the first child token of a specific kind
    fn token_of_kind(&self, kind: CsSyntaxKind) -> Option<CsSyntaxToken>;

    /// The first child node that is a statement (block, control statement,
    /// empty statement, or generic statement)
    fn first_statement_child(&self) -> Option<CsSyntaxNode>;

    /// First non-trivia token inside this node, in document order
    fn first_significant_token(&self) -> Option<CsSyntaxToken>;

    /// Last non-trivia token inside this node, in document order
    fn last_significant_token(&self) -> Option<CsSyntaxToken>;
}

impl CsSyntaxNodeExt for CsSyntaxNode {
    fn child_of_kind(&self, kind: CsSyntaxKind) -> Option<CsSyntaxNode> {
        self.children().find(|child| child.kind() == kind)
    }

    fn token_of_kind(&self, kind: CsSyntaxKind) -> Option<CsSyntaxToken> {
        self.children_with_tokens()
            .filter_map(|element| element.into_token())
            .find(|token| token.kind() == kind)
    }

    fn first_statement_child(&self) -> Option<CsSyntaxNode> {
        self.children().find(|child| child.kind().is_statement())
    }

    fn first_significant_token(&self) -> Option<CsSyntaxToken> {
        self.descendants_with_tokens()
            .filter_map(|element| element.into_token())
            .find(|token| !token.kind().is_trivia())
    }

    fn last_significant_token(&self) -> Option<CsSyntaxToken> {
        let mut last = None;
        for element in self.descendants_with_tokens() {
            if let Some(token) = element.into_token()
                && !token.kind().is_trivia()
            {
                last = Some(token);
            }
        }
        last
    }
}

/// Extension trait for `CsSyntaxToken`
pub trait CsSyntaxTokenExt {
    /// Check if this is a trivia token
    fn is_trivia(&self) -> bool;
}

impl CsSyntaxTokenExt for CsSyntaxToken {
    fn is_trivia(&self) -> bool {
        self.kind().is_trivia()
    }
}
