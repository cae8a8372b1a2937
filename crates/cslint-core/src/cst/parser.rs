//! Tolerant statement-level parser for C# source
//!
//! Builds a lossless CST from the token stream. The parser models exactly
//! what brace-style analysis needs: the nine control constructs, delimited
//! blocks, empty statements, and parenthesized header clauses. Everything
//! else (declarations, expressions, labels) is consumed as opaque
//! `GenericStatement` nodes that end at `;`, at a block, or at the closing
//! brace of the enclosing block.
//!
//! Misparses inside generic statements can never invent a control construct,
//! so they can produce false negatives on exotic input but never false
//! positives.

use super::lexer::{CstToken, LexerError, lex_with_trivia_and_symbols};
use super::{CsSyntaxKind, CsSyntaxNode, CstBuilder};

/// Parse C# source into a lossless CST, with no conditional symbols defined
///
/// ```rust,ignore
/// let (cst, errors) = parse_cs("if (x)\n    M();\n");
/// assert_eq!(cst.text().to_string(), "if (x)\n    M();\n");
/// ```
pub fn parse_cs(source: &str) -> (CsSyntaxNode, Vec<LexerError>) {
    parse_cs_with_symbols(source, &[])
}

/// Parse C# source, evaluating `#if` conditions against `symbols`
pub fn parse_cs_with_symbols(source: &str, symbols: &[String]) -> (CsSyntaxNode, Vec<LexerError>) {
    let (tokens, errors) = lex_with_trivia_and_symbols(source, symbols);
    let mut parser = Parser::new(&tokens);
    parser.parse_source_file();
    (parser.finish(), errors)
}

/// Token stream parser
struct Parser<'a> {
    tokens: &'a [CstToken],
    pos: usize,
    builder: CstBuilder,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [CstToken]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: CstBuilder::new(),
        }
    }

    fn finish(self) -> CsSyntaxNode {
        self.builder.finish()
    }

    fn parse_source_file(&mut self) {
        self.builder.start_node(CsSyntaxKind::SourceFile);

        while !self.at_end() {
            if self.at_trivia() {
                self.bump();
            } else if self.current_kind() == Some(CsSyntaxKind::RBrace) {
                // Stray closing brace at top level: keep it, stay lossless
                self.bump();
            } else {
                self.parse_statement();
            }
        }

        self.builder.finish_node();
    }

    /// Parse one statement; the caller has already positioned us at a
    /// significant token.
    fn parse_statement(&mut self) {
        match self.current_kind() {
            Some(CsSyntaxKind::LBrace) => self.parse_block(),
            Some(CsSyntaxKind::IfKw) => self.parse_if_statement(),
            Some(CsSyntaxKind::WhileKw) => {
                self.parse_header_statement(CsSyntaxKind::WhileStatement)
            }
            Some(CsSyntaxKind::ForKw) => self.parse_header_statement(CsSyntaxKind::ForStatement),
            Some(CsSyntaxKind::ForeachKw) => {
                self.parse_header_statement(CsSyntaxKind::ForEachStatement)
            }
            Some(CsSyntaxKind::LockKw) => self.parse_header_statement(CsSyntaxKind::LockStatement),
            Some(CsSyntaxKind::FixedKw) => {
                self.parse_header_statement(CsSyntaxKind::FixedStatement)
            }
            Some(CsSyntaxKind::UsingKw) => {
                // `using (...)` statement vs `using X;` directive/declaration
                if self.peek_significant_kind_after(self.pos + 1) == Some(CsSyntaxKind::LParen) {
                    self.parse_header_statement(CsSyntaxKind::UsingStatement);
                } else {
                    self.parse_generic_statement();
                }
            }
            Some(CsSyntaxKind::DoKw) => self.parse_do_statement(),
            Some(CsSyntaxKind::Semicolon) => {
                self.builder.start_node(CsSyntaxKind::EmptyStatement);
                self.bump();
                self.builder.finish_node();
            }
            Some(_) => self.parse_generic_statement(),
            None => {}
        }
    }

    /// `{ statement* }`
    fn parse_block(&mut self) {
        self.builder.start_node(CsSyntaxKind::Block);
        self.bump(); // {

        while !self.at_end() {
            if self.at_trivia() {
                self.bump();
            } else if self.current_kind() == Some(CsSyntaxKind::RBrace) {
                self.bump();
                self.builder.finish_node();
                return;
            } else {
                self.parse_statement();
            }
        }

        // Unterminated block: tolerate
        self.builder.finish_node();
    }

    /// `if (cond) stmt [else stmt]`
    fn parse_if_statement(&mut self) {
        self.builder.start_node(CsSyntaxKind::IfStatement);
        self.bump(); // if
        self.consume_trivia();

        if self.current_kind() == Some(CsSyntaxKind::LParen) {
            self.parse_paren_clause();
        }
        self.consume_trivia();

        if self.can_start_body() && self.current_kind() != Some(CsSyntaxKind::ElseKw) {
            self.parse_statement();
        }

        if self.peek_significant_kind() == Some(CsSyntaxKind::ElseKw) {
            self.consume_trivia();
            self.parse_else_clause();
        }

        self.builder.finish_node();
    }

    /// `else stmt`
    fn parse_else_clause(&mut self) {
        self.builder.start_node(CsSyntaxKind::ElseClause);
        self.bump(); // else
        self.consume_trivia();

        if self.can_start_body() {
            self.parse_statement();
        }

        self.builder.finish_node();
    }

    /// `kw (header) stmt` for while/for/foreach/lock/using/fixed
    fn parse_header_statement(&mut self, node_kind: CsSyntaxKind) {
        self.builder.start_node(node_kind);
        self.bump(); // keyword
        self.consume_trivia();

        if self.current_kind() == Some(CsSyntaxKind::LParen) {
            self.parse_paren_clause();
        }
        self.consume_trivia();

        if self.can_start_body() && self.current_kind() != Some(CsSyntaxKind::ElseKw) {
            self.parse_statement();
        }

        self.builder.finish_node();
    }

    /// `do stmt while (cond);`
    fn parse_do_statement(&mut self) {
        self.builder.start_node(CsSyntaxKind::DoStatement);
        self.bump(); // do
        self.consume_trivia();

        if self.can_start_body() && self.current_kind() != Some(CsSyntaxKind::WhileKw) {
            self.parse_statement();
        }

        if self.peek_significant_kind() == Some(CsSyntaxKind::WhileKw) {
            self.consume_trivia();
            self.bump(); // while
            self.consume_trivia();
            if self.current_kind() == Some(CsSyntaxKind::LParen) {
                self.parse_paren_clause();
            }
            if self.peek_significant_kind() == Some(CsSyntaxKind::Semicolon) {
                self.consume_trivia();
                self.bump(); // ;
            }
        }

        self.builder.finish_node();
    }

    /// `( ... )` header clause, consumed opaquely with paren balancing.
    ///
    /// Braces inside the header (array initializers, lambda bodies) are kept
    /// as raw tokens; header contents are never analyzed structurally.
    fn parse_paren_clause(&mut self) {
        self.builder.start_node(CsSyntaxKind::ParenClause);
        self.bump(); // (
        let mut depth = 1usize;

        while !self.at_end() && depth > 0 {
            match self.current_kind() {
                Some(CsSyntaxKind::LParen) => depth += 1,
                Some(CsSyntaxKind::RParen) => depth -= 1,
                _ => {}
            }
            self.bump();
        }

        self.builder.finish_node();
    }

    /// Any statement or declaration the parser does not model.
    ///
    /// Ends at `;` (outside parens), at a block (declaration bodies, object
    /// initializers, lambda bodies are all parsed as `Block` children so
    /// nested statements are still analyzed), at a label colon, or at the
    /// `}` of the enclosing block.
    fn parse_generic_statement(&mut self) {
        self.builder.start_node(CsSyntaxKind::GenericStatement);
        let mut paren_depth = 0usize;

        while let Some(token) = self.current() {
            let kind = token.kind;
            let is_colon = kind == CsSyntaxKind::Operator && token.text == ":";

            match kind {
                k if k.is_trivia() => self.bump(),
                CsSyntaxKind::Semicolon => {
                    self.bump();
                    if paren_depth == 0 {
                        break;
                    }
                }
                CsSyntaxKind::LParen => {
                    paren_depth += 1;
                    self.bump();
                }
                CsSyntaxKind::RParen => {
                    paren_depth = paren_depth.saturating_sub(1);
                    self.bump();
                }
                CsSyntaxKind::LBrace if paren_depth == 0 => {
                    self.parse_block();
                    if self.peek_significant_kind() == Some(CsSyntaxKind::Semicolon) {
                        self.consume_trivia();
                        self.bump();
                    }
                    break;
                }
                CsSyntaxKind::RBrace if paren_depth == 0 => break,
                _ if is_colon && paren_depth == 0 => {
                    // `::` is a namespace alias qualifier, not a label end
                    if self
                        .tokens
                        .get(self.pos + 1)
                        .is_some_and(|t| t.kind == CsSyntaxKind::Operator && t.text == ":")
                    {
                        self.bump();
                        self.bump();
                    } else {
                        self.bump();
                        break;
                    }
                }
                _ => self.bump(),
            }
        }

        self.builder.finish_node();
    }

    // ---- primitives ---------------------------------------------------------

    fn current(&self) -> Option<&CstToken> {
        self.tokens.get(self.pos)
    }

    fn current_kind(&self) -> Option<CsSyntaxKind> {
        self.current().map(|t| t.kind)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn at_trivia(&self) -> bool {
        self.current_kind().map(|k| k.is_trivia()).unwrap_or(false)
    }

    /// A body statement can start here (not at end, not at the enclosing `}`)
    fn can_start_body(&self) -> bool {
        !self.at_end() && self.current_kind() != Some(CsSyntaxKind::RBrace)
    }

    /// Kind of the next significant token at or after the current position
    fn peek_significant_kind(&self) -> Option<CsSyntaxKind> {
        self.peek_significant_kind_after(self.pos)
    }

    fn peek_significant_kind_after(&self, from: usize) -> Option<CsSyntaxKind> {
        self.tokens[from.min(self.tokens.len())..]
            .iter()
            .map(|t| t.kind)
            .find(|k| !k.is_trivia())
    }

    fn bump(&mut self) {
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind, &token.text);
            self.pos += 1;
        }
    }

    fn consume_trivia(&mut self) {
        while self.at_trivia() {
            self.bump();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cst::CsSyntaxNodeExt;

    fn parse(source: &str) -> CsSyntaxNode {
        let (cst, errors) = parse_cs(source);
        assert!(errors.is_empty(), "lexer errors: {errors:?}");
        cst
    }

    fn kinds_of_descendants(node: &CsSyntaxNode, kind: CsSyntaxKind) -> usize {
        node.descendants().filter(|n| n.kind() == kind).count()
    }

    #[test]
    fn lossless_round_trip() {
        let source = "using System.Diagnostics;\npublic class Foo\n{\n    public void Bar(int i)\n    {\n        if (i == 0)\n            Debug.Assert(true);\n    }\n}\n";
        let cst = parse(source);
        assert_eq!(cst.text().to_string(), source);
    }

    #[test]
    fn if_statement_shape() {
        let cst = parse("if (x)\n    M();\n");
        let if_stmt = cst
            .descendants()
            .find(|n| n.kind() == CsSyntaxKind::IfStatement)
            .expect("if statement");
        assert!(
            if_stmt
                .child_of_kind(CsSyntaxKind::ParenClause)
                .is_some()
        );
        let body = if_stmt.first_statement_child().expect("body");
        assert_eq!(body.kind(), CsSyntaxKind::GenericStatement);
        assert_eq!(body.text().to_string(), "M();");
    }

    #[test]
    fn if_else_shape() {
        let cst = parse("if (x)\n    A();\nelse\n    B();\n");
        let if_stmt = cst
            .descendants()
            .find(|n| n.kind() == CsSyntaxKind::IfStatement)
            .unwrap();
        let else_clause = if_stmt
            .child_of_kind(CsSyntaxKind::ElseClause)
            .expect("else clause");
        let else_body = else_clause.first_statement_child().expect("else body");
        assert_eq!(else_body.text().to_string(), "B();");
    }

    #[test]
    fn else_if_chain_nests_inside_else_clause() {
        let cst = parse("if (a)\n    A();\nelse if (b)\n    B();\nelse\n    C();\n");
        assert_eq!(kinds_of_descendants(&cst, CsSyntaxKind::IfStatement), 2);
        assert_eq!(kinds_of_descendants(&cst, CsSyntaxKind::ElseClause), 2);
        let outer = cst
            .descendants()
            .find(|n| n.kind() == CsSyntaxKind::IfStatement)
            .unwrap();
        let else_clause = outer.child_of_kind(CsSyntaxKind::ElseClause).unwrap();
        let nested = else_clause.first_statement_child().unwrap();
        assert_eq!(nested.kind(), CsSyntaxKind::IfStatement);
    }

    #[test]
    fn do_while_shape() {
        let cst = parse("do\n    M();\nwhile (false);\n");
        let do_stmt = cst
            .descendants()
            .find(|n| n.kind() == CsSyntaxKind::DoStatement)
            .expect("do statement");
        let body = do_stmt.first_statement_child().expect("body");
        assert_eq!(body.text().to_string(), "M();");
        assert!(do_stmt.token_of_kind(CsSyntaxKind::WhileKw).is_some());
        assert!(do_stmt.token_of_kind(CsSyntaxKind::Semicolon).is_some());
        // A do-while must not also produce a WhileStatement node
        assert_eq!(kinds_of_descendants(&cst, CsSyntaxKind::WhileStatement), 0);
    }

    #[test]
    fn block_bodies() {
        let cst = parse("while (x)\n{\n    M();\n}\n");
        let while_stmt = cst
            .descendants()
            .find(|n| n.kind() == CsSyntaxKind::WhileStatement)
            .unwrap();
        let body = while_stmt.first_statement_child().unwrap();
        assert_eq!(body.kind(), CsSyntaxKind::Block);
    }

    #[test]
    fn empty_statement_body() {
        let cst = parse("while (x)\n    ;\n");
        let while_stmt = cst
            .descendants()
            .find(|n| n.kind() == CsSyntaxKind::WhileStatement)
            .unwrap();
        let body = while_stmt.first_statement_child().unwrap();
        assert_eq!(body.kind(), CsSyntaxKind::EmptyStatement);
    }

    #[test]
    fn using_directive_is_not_a_using_statement() {
        let cst = parse("using System;\nusing (var f = Open())\n    f.Read();\n");
        assert_eq!(kinds_of_descendants(&cst, CsSyntaxKind::UsingStatement), 1);
    }

    #[test]
    fn foreach_header_with_array_initializer() {
        let cst = parse("foreach (var j in new[] { 1, 2, 3 })\n    M(j);\n");
        let foreach_stmt = cst
            .descendants()
            .find(|n| n.kind() == CsSyntaxKind::ForEachStatement)
            .unwrap();
        let header = foreach_stmt
            .child_of_kind(CsSyntaxKind::ParenClause)
            .unwrap();
        assert_eq!(
            header.text().to_string(),
            "(var j in new[] { 1, 2, 3 })"
        );
        let body = foreach_stmt.first_statement_child().unwrap();
        assert_eq!(body.text().to_string(), "M(j);");
    }

    #[test]
    fn ternary_is_a_generic_statement() {
        let cst = parse("i == 0 ? Assert(true) : Assert(false);\n");
        assert_eq!(kinds_of_descendants(&cst, CsSyntaxKind::IfStatement), 0);
        assert_eq!(kinds_of_descendants(&cst, CsSyntaxKind::ElseClause), 0);
    }

    #[test]
    fn nested_construct_bodies() {
        let cst = parse("if (a)\n    while (b)\n        M();\n");
        let if_stmt = cst
            .descendants()
            .find(|n| n.kind() == CsSyntaxKind::IfStatement)
            .unwrap();
        let body = if_stmt.first_statement_child().unwrap();
        assert_eq!(body.kind(), CsSyntaxKind::WhileStatement);
    }

    #[test]
    fn labels_split_off_the_following_statement() {
        let cst = parse("retry: if (x)\n    M();\n");
        assert_eq!(kinds_of_descendants(&cst, CsSyntaxKind::IfStatement), 1);
    }

    #[test]
    fn class_and_method_bodies_are_blocks() {
        let source = "public class Foo\n{\n    public void Bar(int i)\n    {\n        M();\n    }\n}\n";
        let cst = parse(source);
        assert_eq!(cst.text().to_string(), source);
        assert_eq!(kinds_of_descendants(&cst, CsSyntaxKind::Block), 2);
    }

    #[test]
    fn missing_body_is_tolerated() {
        let cst = parse("if (x)\n");
        let if_stmt = cst
            .descendants()
            .find(|n| n.kind() == CsSyntaxKind::IfStatement)
            .unwrap();
        assert!(if_stmt.first_statement_child().is_none());
    }

    #[test]
    fn disabled_region_is_not_parsed() {
        let source = "#if DEBUG_ONLY\nif (x)\n    M();\n#endif\nM2();\n";
        let cst = parse(source);
        assert_eq!(cst.text().to_string(), source);
        assert_eq!(kinds_of_descendants(&cst, CsSyntaxKind::IfStatement), 0);
    }

    #[test]
    fn object_initializer_keeps_statement_intact() {
        let source = "var a = new Foo { A = 1, B = 2 };\nif (x)\n    M();\n";
        let cst = parse(source);
        assert_eq!(cst.text().to_string(), source);
        assert_eq!(kinds_of_descendants(&cst, CsSyntaxKind::IfStatement), 1);
    }
}
