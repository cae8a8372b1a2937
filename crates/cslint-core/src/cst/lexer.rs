//! Trivia-preserving lexer for C# source
//!
//! This lexer is designed for CST construction: it preserves ALL source
//! information (whitespace, newlines, comments, preprocessor directives)
//! so the tree can round-trip byte-for-byte: `parse(source).text() == source`.
//!
//! Conditional compilation is resolved here. `#if`/`#elif`/`#else`/`#endif`
//! conditions are evaluated against a set of defined symbols; the text of an
//! inactive branch is emitted as a single `DisabledText` trivia token, so the
//! parser never sees statements from inactive regions.

use crate::cst::CsSyntaxKind;
use std::ops::Range;

/// Simple span representing a byte range in the source
pub type CstSpan = Range<usize>;

/// A lexer error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerError {
    pub message: String,
    pub span: CstSpan,
}

impl LexerError {
    pub fn new(message: impl Into<String>, span: CstSpan) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}

/// A token with its syntax kind and span
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CstToken {
    pub kind: CsSyntaxKind,
    pub text: String,
    pub span: CstSpan,
}

impl CstToken {
    pub fn new(kind: CsSyntaxKind, text: impl Into<String>, span: CstSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Result returned by the lexer
pub type CstLexResult = (Vec<CstToken>, Vec<LexerError>);

/// One `#if`/`#elif`/`#else` nesting level
struct CondFrame {
    /// Whether the enclosing region is active
    parent_active: bool,
    /// Whether any branch of this `#if` chain has been taken
    taken: bool,
    /// Whether the current branch is active
    active: bool,
    /// An `#else` has been seen for this frame
    in_else: bool,
}

/// Lex input preserving all trivia, with no conditional symbols defined
pub fn lex_with_trivia(input: &str) -> CstLexResult {
    lex_with_trivia_and_symbols(input, &[])
}

/// Lex input preserving all trivia
///
/// `symbols` is the set of defined conditional-compilation symbols used to
/// evaluate `#if`/`#elif` conditions.
pub fn lex_with_trivia_and_symbols(input: &str, symbols: &[String]) -> CstLexResult {
    let mut lexer = Lexer::new(input, symbols);
    lexer.run();
    (lexer.tokens, lexer.errors)
}

struct Lexer<'a> {
    input: &'a str,
    symbols: &'a [String],
    pos: usize,
    tokens: Vec<CstToken>,
    errors: Vec<LexerError>,
    /// Only whitespace has been seen since the last newline
    at_line_start: bool,
    cond_stack: Vec<CondFrame>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str, symbols: &'a [String]) -> Self {
        Self {
            input,
            symbols,
            pos: 0,
            tokens: Vec::new(),
            errors: Vec::new(),
            at_line_start: true,
            cond_stack: Vec::new(),
        }
    }

    fn run(&mut self) {
        while self.pos < self.input.len() {
            let start = self.pos;
            let Some(current) = self.peek() else { break };

            match current {
                '\n' => {
                    self.push(CsSyntaxKind::Newline, start, start + 1);
                    self.at_line_start = true;
                }
                '\r' => {
                    let end = if self.peek_at(start + 1) == Some('\n') {
                        start + 2
                    } else {
                        start + 1
                    };
                    self.push(CsSyntaxKind::Newline, start, end);
                    self.at_line_start = true;
                }
                c if c == ' ' || c == '\t' => {
                    let end = self.scan_while(start, |c| c == ' ' || c == '\t');
                    self.push(CsSyntaxKind::Whitespace, start, end);
                }
                c if c.is_whitespace() => {
                    // Unusual unicode whitespace, keep it as whitespace trivia
                    let end = start + c.len_utf8();
                    self.push(CsSyntaxKind::Whitespace, start, end);
                }
                '#' if self.at_line_start => {
                    self.lex_directive(start);
                }
                '/' => match self.peek_at(start + 1) {
                    Some('/') => {
                        let end = self.scan_to_line_end(start);
                        self.push(CsSyntaxKind::CommentLine, start, end);
                        self.at_line_start = false;
                    }
                    Some('*') => {
                        let end = self.scan_block_comment(start);
                        self.push(CsSyntaxKind::CommentBlock, start, end);
                        self.at_line_start = false;
                    }
                    _ => {
                        self.push(CsSyntaxKind::Operator, start, start + 1);
                        self.at_line_start = false;
                    }
                },
                '"' => {
                    let end = self.scan_string(start, false, false);
                    self.push(CsSyntaxKind::StringLit, start, end);
                    self.at_line_start = false;
                }
                '\'' => {
                    let end = self.scan_char_literal(start);
                    self.push(CsSyntaxKind::CharLit, start, end);
                    self.at_line_start = false;
                }
                c @ ('@' | '$') => {
                    self.lex_at_or_dollar(start, c);
                }
                c if c.is_ascii_digit() => {
                    let end = self.scan_number(start);
                    self.push(CsSyntaxKind::NumberLit, start, end);
                    self.at_line_start = false;
                }
                c if is_ident_start(c) => {
                    let end = self.scan_while(start, is_ident_continue);
                    let kind = keyword_kind(&self.input[start..end]);
                    self.push(kind, start, end);
                    self.at_line_start = false;
                }
                '(' => self.push_punct(CsSyntaxKind::LParen, start),
                ')' => self.push_punct(CsSyntaxKind::RParen, start),
                '{' => self.push_punct(CsSyntaxKind::LBrace, start),
                '}' => self.push_punct(CsSyntaxKind::RBrace, start),
                '[' => self.push_punct(CsSyntaxKind::LBracket, start),
                ']' => self.push_punct(CsSyntaxKind::RBracket, start),
                ';' => self.push_punct(CsSyntaxKind::Semicolon, start),
                c => {
                    let end = start + c.len_utf8();
                    self.push(CsSyntaxKind::Operator, start, end);
                    self.at_line_start = false;
                }
            }
        }

        if !self.cond_stack.is_empty() {
            self.errors.push(LexerError::new(
                "unterminated #if directive",
                self.input.len()..self.input.len(),
            ));
        }
    }

    // ---- directive handling -------------------------------------------------

    fn lex_directive(&mut self, start: usize) {
        let end = self.scan_to_line_end(start);
        let text = &self.input[start..end];
        let (name, rest) = split_directive(text);

        self.push(CsSyntaxKind::Directive, start, end);
        self.at_line_start = false;

        match name {
            "if" => {
                let cond = self.eval_condition(rest, start..end);
                let parent_active = self.is_active();
                self.cond_stack.push(CondFrame {
                    parent_active,
                    taken: cond,
                    active: parent_active && cond,
                    in_else: false,
                });
            }
            "elif" => {
                let cond = self.eval_condition(rest, start..end);
                match self.cond_stack.last_mut() {
                    Some(frame) if !frame.in_else => {
                        frame.active = frame.parent_active && !frame.taken && cond;
                        frame.taken |= cond;
                    }
                    Some(_) => {
                        self.errors
                            .push(LexerError::new("#elif after #else", start..end));
                    }
                    None => {
                        self.errors
                            .push(LexerError::new("#elif without matching #if", start..end));
                    }
                }
            }
            "else" => match self.cond_stack.last_mut() {
                Some(frame) if !frame.in_else => {
                    frame.active = frame.parent_active && !frame.taken;
                    frame.taken = true;
                    frame.in_else = true;
                }
                Some(_) => {
                    self.errors
                        .push(LexerError::new("duplicate #else", start..end));
                }
                None => {
                    self.errors
                        .push(LexerError::new("#else without matching #if", start..end));
                }
            },
            "endif" => {
                if self.cond_stack.pop().is_none() {
                    self.errors
                        .push(LexerError::new("#endif without matching #if", start..end));
                }
            }
            // #region, #endregion, #pragma, #define, #undef, ... are plain trivia
            _ => {}
        }

        if !self.is_active() {
            self.consume_disabled_region();
        }
    }

    /// Whether the innermost conditional frame (if any) is active
    fn is_active(&self) -> bool {
        self.cond_stack.last().map(|f| f.active).unwrap_or(true)
    }

    /// Consume source lines until the directive that may re-activate this
    /// nesting level, emitting them as a single `DisabledText` token.
    fn consume_disabled_region(&mut self) {
        let start = self.skip_current_line_break();
        let mut depth = 0usize;
        let mut line_start = self.pos;

        loop {
            if self.pos >= self.input.len() {
                break;
            }
            let line_end = full_line_end(self.input, line_start);
            let line = &self.input[line_start..line_end];
            let trimmed = line.trim_start();
            if let Some(directive) = trimmed.strip_prefix('#') {
                let (name, _) = split_directive_body(directive);
                match name {
                    "if" => depth += 1,
                    "endif" | "elif" | "else" if depth == 0 => {
                        // Stop before this line so the directive is lexed normally
                        break;
                    }
                    "endif" => depth -= 1,
                    _ => {}
                }
            }
            line_start = skip_line_break(self.input, line_end);
            self.pos = line_start;
        }

        self.pos = line_start;
        if line_start > start {
            self.tokens.push(CstToken::new(
                CsSyntaxKind::DisabledText,
                &self.input[start..line_start],
                start..line_start,
            ));
        }
        self.at_line_start = true;
    }

    /// After a directive token we sit on its line break; keep it out of the
    /// disabled-text token so the directive line renders normally.
    fn skip_current_line_break(&mut self) -> usize {
        if self.peek() == Some('\r') {
            let end = if self.peek_at(self.pos + 1) == Some('\n') {
                self.pos + 2
            } else {
                self.pos + 1
            };
            self.push(CsSyntaxKind::Newline, self.pos, end);
        } else if self.peek() == Some('\n') {
            self.push(CsSyntaxKind::Newline, self.pos, self.pos + 1);
        }
        self.pos
    }

    /// Evaluate an `#if`/`#elif` condition against the defined symbols.
    ///
    /// Grammar: `||`, `&&`, `!`, parentheses, `true`, `false`, identifiers.
    /// A malformed condition is reported and treated as true so the region
    /// stays visible to analysis.
    fn eval_condition(&mut self, expr: &str, span: CstSpan) -> bool {
        match CondParser::new(expr, self.symbols).parse() {
            Some(value) => value,
            None => {
                self.errors.push(LexerError::new(
                    format!("malformed directive condition: {}", expr.trim()),
                    span,
                ));
                true
            }
        }
    }

    // ---- scanners -----------------------------------------------------------

    fn lex_at_or_dollar(&mut self, start: usize, first: char) {
        let second = self.peek_at(start + 1);

        match (first, second) {
            // @"verbatim", @$"interpolated verbatim"
            ('@', Some('"')) => {
                let end = self.scan_string(start, true, false);
                self.push(CsSyntaxKind::StringLit, start, end);
            }
            ('@', Some('$')) if self.peek_at(start + 2) == Some('"') => {
                let end = self.scan_string(start, true, true);
                self.push(CsSyntaxKind::StringLit, start, end);
            }
            // $"interpolated", $@"interpolated verbatim"
            ('$', Some('"')) => {
                let end = self.scan_string(start, false, true);
                self.push(CsSyntaxKind::StringLit, start, end);
            }
            ('$', Some('@')) if self.peek_at(start + 2) == Some('"') => {
                let end = self.scan_string(start, true, true);
                self.push(CsSyntaxKind::StringLit, start, end);
            }
            // @identifier escapes keywords: always a plain identifier
            ('@', Some(c)) if is_ident_start(c) => {
                let end = self.scan_while(start + 1, is_ident_continue);
                self.push(CsSyntaxKind::Ident, start, end);
            }
            _ => {
                self.push(CsSyntaxKind::Operator, start, start + 1);
            }
        }
        self.at_line_start = false;
    }

    /// Scan any string literal form starting at `start`.
    ///
    /// Handles regular (`"..."` with backslash escapes), verbatim (`@"..."`
    /// with `""` doubling), interpolated (brace holes, possibly nested
    /// strings inside holes), and raw (`"""..."""`) literals.
    fn scan_string(&mut self, start: usize, verbatim: bool, interpolated: bool) -> usize {
        // Skip the prefix characters up to the first quote
        let mut i = start;
        while i < self.input.len() && self.peek_at(i) != Some('"') {
            i += 1;
        }

        // Raw string literal: three or more quotes
        let quote_run = count_quotes(self.input, i);
        if !verbatim && quote_run >= 3 {
            let end = self.scan_raw_string(i, quote_run);
            self.pos = end;
            return end;
        }

        i += 1; // opening quote
        let mut hole_depth = 0usize;
        while let Some(c) = self.peek_at(i) {
            match c {
                '"' => {
                    if verbatim && self.peek_at(i + 1) == Some('"') {
                        i += 2; // "" escape in verbatim strings
                        continue;
                    }
                    if hole_depth == 0 {
                        i += 1;
                        self.pos = i;
                        return i;
                    }
                    // A nested string inside an interpolation hole
                    let saved = self.pos;
                    let end = self.scan_string(i, false, false);
                    self.pos = saved;
                    i = end;
                }
                '\\' if !verbatim && hole_depth == 0 => {
                    i += 1;
                    if let Some(next) = self.peek_at(i) {
                        i += next.len_utf8();
                    }
                }
                '{' if interpolated => {
                    if self.peek_at(i + 1) == Some('{') && hole_depth == 0 {
                        i += 2; // {{ escape
                    } else {
                        hole_depth += 1;
                        i += 1;
                    }
                }
                '}' if interpolated && hole_depth > 0 => {
                    hole_depth -= 1;
                    i += 1;
                }
                '\n' | '\r' if !verbatim => {
                    self.errors
                        .push(LexerError::new("unterminated string literal", start..i));
                    self.pos = i;
                    return i;
                }
                c => {
                    i += c.len_utf8();
                }
            }
        }

        self.errors
            .push(LexerError::new("unterminated string literal", start..i));
        self.pos = i;
        i
    }

    fn scan_raw_string(&mut self, quote_start: usize, quote_run: usize) -> usize {
        let mut i = quote_start + quote_run;
        while i < self.input.len() {
            if self.peek_at(i) == Some('"') {
                let run = count_quotes(self.input, i);
                if run >= quote_run {
                    return i + quote_run;
                }
                i += run;
            } else {
                i += self.peek_at(i).map(char::len_utf8).unwrap_or(1);
            }
        }
        self.errors.push(LexerError::new(
            "unterminated raw string literal",
            quote_start..i,
        ));
        i
    }

    fn scan_char_literal(&mut self, start: usize) -> usize {
        let mut i = start + 1;
        while let Some(c) = self.peek_at(i) {
            match c {
                '\\' => {
                    i += 1;
                    if let Some(next) = self.peek_at(i) {
                        i += next.len_utf8();
                    }
                }
                '\'' => {
                    i += 1;
                    self.pos = i;
                    return i;
                }
                '\n' | '\r' => break,
                c => i += c.len_utf8(),
            }
        }
        self.errors
            .push(LexerError::new("unterminated character literal", start..i));
        self.pos = i;
        i
    }

    fn scan_number(&mut self, start: usize) -> usize {
        let mut i = self.scan_while(start, |c| c.is_ascii_alphanumeric() || c == '_');
        // Decimal point followed by a digit continues the literal
        while self.peek_at(i) == Some('.')
            && self
                .peek_at(i + 1)
                .map(|c| c.is_ascii_digit())
                .unwrap_or(false)
        {
            i = self.scan_while(i + 1, |c| c.is_ascii_alphanumeric() || c == '_');
        }
        self.pos = i;
        i
    }

    fn scan_block_comment(&mut self, start: usize) -> usize {
        let mut i = start + 2;
        while i < self.input.len() {
            if self.input[i..].starts_with("*/") {
                let end = i + 2;
                self.pos = end;
                return end;
            }
            i += self.peek_at(i).map(char::len_utf8).unwrap_or(1);
        }
        self.errors
            .push(LexerError::new("unterminated block comment", start..i));
        self.pos = i;
        i
    }

    fn scan_to_line_end(&mut self, start: usize) -> usize {
        let end = full_line_end(self.input, start);
        self.pos = end;
        end
    }

    fn scan_while(&mut self, start: usize, predicate: impl Fn(char) -> bool) -> usize {
        let mut i = start;
        while let Some(c) = self.peek_at(i) {
            if predicate(c) {
                i += c.len_utf8();
            } else {
                break;
            }
        }
        self.pos = i;
        i
    }

    // ---- primitives ---------------------------------------------------------

    fn peek(&self) -> Option<char> {
        self.peek_at(self.pos)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(offset..)?.chars().next()
    }

    fn push(&mut self, kind: CsSyntaxKind, start: usize, end: usize) {
        self.tokens
            .push(CstToken::new(kind, &self.input[start..end], start..end));
        self.pos = end;
    }

    fn push_punct(&mut self, kind: CsSyntaxKind, start: usize) {
        self.push(kind, start, start + 1);
        self.at_line_start = false;
    }
}

/// Offset of the end of the line containing `start` (excluding the break)
fn full_line_end(input: &str, start: usize) -> usize {
    input[start..]
        .find(['\n', '\r'])
        .map(|rel| start + rel)
        .unwrap_or(input.len())
}

/// Offset just past the line break at `pos`
fn skip_line_break(input: &str, pos: usize) -> usize {
    let bytes = input.as_bytes();
    if pos < bytes.len() && bytes[pos] == b'\r' {
        if pos + 1 < bytes.len() && bytes[pos + 1] == b'\n' {
            pos + 2
        } else {
            pos + 1
        }
    } else if pos < bytes.len() && bytes[pos] == b'\n' {
        pos + 1
    } else {
        pos
    }
}

fn count_quotes(input: &str, start: usize) -> usize {
    input[start..].chars().take_while(|&c| c == '"').count()
}

/// Split a directive line (starting with `#`) into its name and remainder
fn split_directive(text: &str) -> (&str, &str) {
    split_directive_body(text.trim_start_matches('#'))
}

fn split_directive_body(body: &str) -> (&str, &str) {
    let body = body.trim_start();
    let name_end = body
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(body.len());
    (&body[..name_end], &body[name_end..])
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn keyword_kind(text: &str) -> CsSyntaxKind {
    match text {
        "if" => CsSyntaxKind::IfKw,
        "else" => CsSyntaxKind::ElseKw,
        "while" => CsSyntaxKind::WhileKw,
        "for" => CsSyntaxKind::ForKw,
        "foreach" => CsSyntaxKind::ForeachKw,
        "lock" => CsSyntaxKind::LockKw,
        "using" => CsSyntaxKind::UsingKw,
        "fixed" => CsSyntaxKind::FixedKw,
        "do" => CsSyntaxKind::DoKw,
        _ => CsSyntaxKind::Ident,
    }
}

// ---- directive condition parser --------------------------------------------

struct CondParser<'a> {
    tokens: Vec<CondToken<'a>>,
    pos: usize,
    symbols: &'a [String],
}

#[derive(Debug, PartialEq, Eq)]
enum CondToken<'a> {
    Ident(&'a str),
    Not,
    And,
    Or,
    LParen,
    RParen,
}

impl<'a> CondParser<'a> {
    fn new(expr: &'a str, symbols: &'a [String]) -> Self {
        let mut tokens = Vec::new();
        let mut rest = expr.trim();
        // Strip a trailing line comment from the directive
        if let Some(idx) = rest.find("//") {
            rest = rest[..idx].trim_end();
        }
        let mut chars = rest.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            match c {
                ' ' | '\t' => {}
                '!' => tokens.push(CondToken::Not),
                '(' => tokens.push(CondToken::LParen),
                ')' => tokens.push(CondToken::RParen),
                '&' if matches!(chars.peek(), Some((_, '&'))) => {
                    chars.next();
                    tokens.push(CondToken::And);
                }
                '|' if matches!(chars.peek(), Some((_, '|'))) => {
                    chars.next();
                    tokens.push(CondToken::Or);
                }
                c if is_ident_start(c) => {
                    let mut end = i + c.len_utf8();
                    while let Some(&(j, cc)) = chars.peek() {
                        if is_ident_continue(cc) {
                            end = j + cc.len_utf8();
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    tokens.push(CondToken::Ident(&rest[i..end]));
                }
                _ => {
                    // Unsupported operator (==, !=): bail out
                    tokens.clear();
                    tokens.push(CondToken::Ident("true"));
                    break;
                }
            }
        }
        Self {
            tokens,
            pos: 0,
            symbols,
        }
    }

    fn parse(mut self) -> Option<bool> {
        let value = self.parse_or()?;
        if self.pos == self.tokens.len() {
            Some(value)
        } else {
            None
        }
    }

    fn parse_or(&mut self) -> Option<bool> {
        let mut value = self.parse_and()?;
        while matches!(self.tokens.get(self.pos), Some(CondToken::Or)) {
            self.pos += 1;
            value |= self.parse_and()?;
        }
        Some(value)
    }

    fn parse_and(&mut self) -> Option<bool> {
        let mut value = self.parse_unary()?;
        while matches!(self.tokens.get(self.pos), Some(CondToken::And)) {
            self.pos += 1;
            value &= self.parse_unary()?;
        }
        Some(value)
    }

    fn parse_unary(&mut self) -> Option<bool> {
        match self.tokens.get(self.pos) {
            Some(CondToken::Not) => {
                self.pos += 1;
                Some(!self.parse_unary()?)
            }
            Some(CondToken::LParen) => {
                self.pos += 1;
                let value = self.parse_or()?;
                if matches!(self.tokens.get(self.pos), Some(CondToken::RParen)) {
                    self.pos += 1;
                    Some(value)
                } else {
                    None
                }
            }
            Some(CondToken::Ident(name)) => {
                let value = match *name {
                    "true" => true,
                    "false" => false,
                    name => self.symbols.iter().any(|s| s == name),
                };
                self.pos += 1;
                Some(value)
            }
            _ => None,
        }
    }
}
