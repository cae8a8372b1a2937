//! Green-tree builder wrapper
//!
//! Thin wrapper over Rowan's `GreenNodeBuilder` that accepts `CsSyntaxKind`
//! directly and finishes into a red-tree root.

use rowan::GreenNodeBuilder;

use super::{CsSyntaxKind, CsSyntaxNode};

/// Builder for the C# CST
pub struct CstBuilder {
    inner: GreenNodeBuilder<'static>,
}

impl CstBuilder {
    pub fn new() -> Self {
        Self {
            inner: GreenNodeBuilder::new(),
        }
    }

    pub fn start_node(&mut self, kind: CsSyntaxKind) {
        self.inner.start_node(kind.into());
    }

    pub fn finish_node(&mut self) {
        self.inner.finish_node();
    }

    pub fn token(&mut self, kind: CsSyntaxKind, text: &str) {
        self.inner.token(kind.into(), text);
    }

    /// Finish building and return the root node
    pub fn finish(self) -> CsSyntaxNode {
        CsSyntaxNode::new_root(self.inner.finish())
    }
}

impl Default for CstBuilder {
    fn default() -> Self {
        Self::new()
    }
}
