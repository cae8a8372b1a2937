//! Typed AST layer over the CST
//!
//! Ergonomic wrappers over raw CST nodes, each with a `cast()` method for
//! safe conversion, plus the `ControlConstruct` classifier: the single
//! dispatch point that maps a node to one of the nine control-construct
//! forms and extracts its header span and body statement.

use super::{CsSyntaxKind, CsSyntaxNode, CsSyntaxNodeExt, CsSyntaxToken, TextRange};

/// Helper trait for casting CST nodes to typed wrappers
pub trait AstNode: Sized {
    fn can_cast(kind: CsSyntaxKind) -> bool;
    fn cast(node: CsSyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &CsSyntaxNode;
}

macro_rules! ast_node {
    ($(#[$meta:meta])* $name:ident, $kind:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $name {
            syntax: CsSyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: CsSyntaxKind) -> bool {
                kind == CsSyntaxKind::$kind
            }

            fn cast(node: CsSyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self { syntax: node })
                } else {
                    None
                }
            }

            fn syntax(&self) -> &CsSyntaxNode {
                &self.syntax
            }
        }
    };
}

ast_node!(
    /// `{ ... }` delimited block
    Block,
    Block
);

ast_node!(
    /// `if (cond) stmt [else stmt]`
    IfStatement,
    IfStatement
);

ast_node!(
    /// `else stmt` clause of an if statement
    ElseClause,
    ElseClause
);

ast_node!(WhileStatement, WhileStatement);
ast_node!(ForStatement, ForStatement);
ast_node!(ForEachStatement, ForEachStatement);
ast_node!(LockStatement, LockStatement);
ast_node!(UsingStatement, UsingStatement);
ast_node!(FixedStatement, FixedStatement);

ast_node!(
    /// `do stmt while (cond);`
    DoStatement,
    DoStatement
);

impl Block {
    pub fn statements(&self) -> impl Iterator<Item = CsSyntaxNode> + '_ {
        self.syntax
            .children()
            .filter(|n| n.kind().is_statement())
    }
}

impl IfStatement {
    pub fn if_keyword(&self) -> Option<CsSyntaxToken> {
        self.syntax.token_of_kind(CsSyntaxKind::IfKw)
    }

    pub fn condition(&self) -> Option<CsSyntaxNode> {
        self.syntax.child_of_kind(CsSyntaxKind::ParenClause)
    }

    /// The "then" body statement (never the else clause)
    pub fn body(&self) -> Option<CsSyntaxNode> {
        self.syntax.first_statement_child()
    }

    pub fn else_clause(&self) -> Option<ElseClause> {
        self.syntax
            .child_of_kind(CsSyntaxKind::ElseClause)
            .and_then(ElseClause::cast)
    }
}

impl ElseClause {
    pub fn else_keyword(&self) -> Option<CsSyntaxToken> {
        self.syntax.token_of_kind(CsSyntaxKind::ElseKw)
    }

    pub fn body(&self) -> Option<CsSyntaxNode> {
        self.syntax.first_statement_child()
    }
}

impl DoStatement {
    pub fn do_keyword(&self) -> Option<CsSyntaxToken> {
        self.syntax.token_of_kind(CsSyntaxKind::DoKw)
    }

    pub fn body(&self) -> Option<CsSyntaxNode> {
        self.syntax.first_statement_child()
    }

    pub fn while_keyword(&self) -> Option<CsSyntaxToken> {
        self.syntax.token_of_kind(CsSyntaxKind::WhileKw)
    }
}

/// One of the nine control-construct forms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    If,
    Else,
    While,
    For,
    ForEach,
    Lock,
    Using,
    Fixed,
    DoWhile,
}

impl ControlKind {
    /// The source keyword introducing the construct
    pub fn keyword(self) -> &'static str {
        match self {
            ControlKind::If => "if",
            ControlKind::Else => "else",
            ControlKind::While => "while",
            ControlKind::For => "for",
            ControlKind::ForEach => "foreach",
            ControlKind::Lock => "lock",
            ControlKind::Using => "using",
            ControlKind::Fixed => "fixed",
            ControlKind::DoWhile => "do",
        }
    }

    /// Phrase used in diagnostic messages, e.g. "an `if` statement clause"
    pub fn description(self) -> &'static str {
        match self {
            ControlKind::If => "an `if` statement clause",
            ControlKind::Else => "an `else` clause",
            ControlKind::While => "a `while` statement",
            ControlKind::For => "a `for` statement",
            ControlKind::ForEach => "a `foreach` statement",
            ControlKind::Lock => "a `lock` statement",
            ControlKind::Using => "a `using` statement",
            ControlKind::Fixed => "a `fixed` statement",
            ControlKind::DoWhile => "a `do` statement",
        }
    }
}

/// A derived view over a control-construct node: its kind, header span, and
/// governed body statement. Computed on demand, never persisted.
#[derive(Debug, Clone)]
pub struct ControlConstruct {
    pub kind: ControlKind,
    /// Span of the keyword and (where present) the parenthesized clause
    pub header: TextRange,
    /// The single statement governed by the construct
    pub body: CsSyntaxNode,
}

impl ControlConstruct {
    /// Classify a node as a control construct.
    ///
    /// Returns `None` for non-construct kinds, for constructs with a missing
    /// header or body (incomplete parses are skipped, never reported), and
    /// for an `else` clause whose body is an `if` statement (an `else if`
    /// chain link; the nested `if` is classified on its own).
    pub fn classify(node: &CsSyntaxNode) -> Option<ControlConstruct> {
        let kind = match node.kind() {
            CsSyntaxKind::IfStatement => ControlKind::If,
            CsSyntaxKind::ElseClause => ControlKind::Else,
            CsSyntaxKind::WhileStatement => ControlKind::While,
            CsSyntaxKind::ForStatement => ControlKind::For,
            CsSyntaxKind::ForEachStatement => ControlKind::ForEach,
            CsSyntaxKind::LockStatement => ControlKind::Lock,
            CsSyntaxKind::UsingStatement => ControlKind::Using,
            CsSyntaxKind::FixedStatement => ControlKind::Fixed,
            CsSyntaxKind::DoStatement => ControlKind::DoWhile,
            _ => return None,
        };

        let body = node.first_statement_child()?;

        if kind == ControlKind::Else && body.kind() == CsSyntaxKind::IfStatement {
            return None;
        }

        // A generic statement ending in a label colon is a recovery
        // fragment; its span does not cover a full statement.
        if body.kind() == CsSyntaxKind::GenericStatement
            && body
                .last_significant_token()
                .is_some_and(|t| t.kind() == CsSyntaxKind::Operator && t.text() == ":")
        {
            return None;
        }

        let header = match kind {
            ControlKind::Else => node.token_of_kind(CsSyntaxKind::ElseKw)?.text_range(),
            ControlKind::DoWhile => node.token_of_kind(CsSyntaxKind::DoKw)?.text_range(),
            _ => {
                let keyword = node
                    .children_with_tokens()
                    .filter_map(|e| e.into_token())
                    .find(|t| !t.kind().is_trivia())?;
                let clause = node.child_of_kind(CsSyntaxKind::ParenClause)?;
                TextRange::new(keyword.text_range().start(), clause.text_range().end())
            }
        };

        Some(ControlConstruct { kind, header, body })
    }

    /// Whether the body is already a delimited block
    pub fn body_is_block(&self) -> bool {
        self.body.kind() == CsSyntaxKind::Block
    }

    /// Offset of the first significant token of the body
    pub fn body_start(&self) -> rowan::TextSize {
        self.body.text_range().start()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::parse_cs;

    fn constructs(source: &str) -> Vec<ControlConstruct> {
        let (cst, errors) = parse_cs(source);
        assert!(errors.is_empty(), "lexer errors: {errors:?}");
        cst.descendants()
            .filter_map(|n| ControlConstruct::classify(&n))
            .collect()
    }

    #[test]
    fn classifies_all_nine_forms() {
        let cases = [
            ("if (x)\n    M();\n", ControlKind::If),
            ("while (x)\n    M();\n", ControlKind::While),
            ("for (var i = 0; i < n; i++)\n    M();\n", ControlKind::For),
            ("foreach (var i in xs)\n    M();\n", ControlKind::ForEach),
            ("lock (this)\n    M();\n", ControlKind::Lock),
            ("using (var f = Open())\n    M();\n", ControlKind::Using),
            (
                "fixed (byte* p = new byte[10])\n    M();\n",
                ControlKind::Fixed,
            ),
            ("do\n    M();\nwhile (x);\n", ControlKind::DoWhile),
        ];
        for (source, expected) in cases {
            let found = constructs(source);
            assert_eq!(found.len(), 1, "source: {source}");
            assert_eq!(found[0].kind, expected, "source: {source}");
            assert!(!found[0].body_is_block());
        }
    }

    #[test]
    fn if_else_yields_two_constructs() {
        let found = constructs("if (x)\n    A();\nelse\n    B();\n");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].kind, ControlKind::If);
        assert_eq!(found[1].kind, ControlKind::Else);
        assert_eq!(found[0].body.text().to_string(), "A();");
        assert_eq!(found[1].body.text().to_string(), "B();");
    }

    #[test]
    fn else_if_link_is_not_a_construct() {
        let found = constructs("if (a)\n    A();\nelse if (b)\n    B();\n");
        // The outer if and the nested if; the else clause itself is skipped
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|c| c.kind == ControlKind::If));
    }

    #[test]
    fn header_span_covers_keyword_and_clause() {
        let source = "while (i == 0)\n    M();\n";
        let found = constructs(source);
        let header = &source[usize::from(found[0].header.start())..usize::from(found[0].header.end())];
        assert_eq!(header, "while (i == 0)");
    }

    #[test]
    fn do_header_is_the_keyword() {
        let source = "do\n    M();\nwhile (x);\n";
        let found = constructs(source);
        let header = &source[usize::from(found[0].header.start())..usize::from(found[0].header.end())];
        assert_eq!(header, "do");
    }

    #[test]
    fn block_bodies_are_blocks() {
        let found = constructs("if (x)\n{\n    M();\n}\n");
        assert_eq!(found.len(), 1);
        assert!(found[0].body_is_block());
    }

    #[test]
    fn missing_body_is_not_classified() {
        let found = constructs("if (x)\n");
        assert!(found.is_empty());
    }

    #[test]
    fn missing_header_clause_is_not_classified() {
        let (cst, _) = parse_cs("while\n    M();\n");
        let found: Vec<_> = cst
            .descendants()
            .filter_map(|n| ControlConstruct::classify(&n))
            .collect();
        assert!(found.is_empty());
    }

    #[test]
    fn empty_statement_body_is_classified() {
        let found = constructs("while (x)\n    ;\n");
        assert_eq!(found.len(), 1);
        assert!(!found[0].body_is_block());
        assert_eq!(found[0].body.kind(), CsSyntaxKind::EmptyStatement);
    }

    #[test]
    fn typed_wrappers_navigate_if_else() {
        let (cst, _) = parse_cs("if (x)\n    A();\nelse\n    B();\n");
        let node = cst
            .descendants()
            .find(|n| n.kind() == CsSyntaxKind::IfStatement)
            .unwrap();
        let if_stmt = IfStatement::cast(node).unwrap();
        assert!(if_stmt.if_keyword().is_some());
        assert!(if_stmt.condition().is_some());
        assert_eq!(if_stmt.body().unwrap().text().to_string(), "A();");
        let else_clause = if_stmt.else_clause().unwrap();
        assert_eq!(else_clause.body().unwrap().text().to_string(), "B();");
    }
}
