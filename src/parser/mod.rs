//! The recursive-descent engine: owns the arena and the token stream for one
//! input, and exposes the handful of allocation/linking/error-construction
//! primitives every statement, clause, and expression parser in
//! `statements.rs`, `clauses.rs`, and `expr.rs` builds on.

mod clauses;
mod dispatch;
mod expr;
mod statements;

use crate::arena::Arena;
use crate::ast::{flags, AstNode, ContextGuard, ContextHint, NodeId, NodeKind, Text};
use crate::ast::Ast;
use crate::config::{ParserConfig, ParserMode};
use crate::depth_guard::{DepthGuard, DepthGuardStack};
use crate::error::{ErrorKind, ParseError};
use crate::token_cursor::TokenCursor;
use crate::tokenizer::{self, DelimiterKind, KeywordId, OperatorKind, Token, TokenKind};

/// Drives a parse from raw SQL text to an [`Ast`].
///
/// `Parser<'input>` owns both the [`Arena`] nodes are allocated into and the
/// token stream views they borrow from; [`Parser::parse`] hands back an
/// [`Ast`] borrowing `&self`, which is what makes [`Parser::reset`] (it
/// needs `&mut self`) a compile error while that `Ast` is still alive — see
/// the "Arena lifetime vs AST lifetime" design note.
pub struct Parser<'input> {
    source: &'input str,
    cursor: TokenCursor<'input>,
    arena: Arena<'input>,
    config: ParserConfig,
    depth: DepthGuardStack,
    context: ContextStackHandle,
    paren_depth: i32,
}

/// Newtype purely so `push_context`'s return type reads cleanly; behaves
/// identically to the bare [`crate::ast::ContextStack`].
type ContextStackHandle = crate::ast::ContextStack;

/// Marks a position in the source before a production starts consuming
/// tokens, so the eventually-allocated node can be stamped with the start of
/// its span rather than the position after its children were parsed.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Marker {
    line: u32,
    column: u32,
    byte_offset: u32,
}

impl<'input> Parser<'input> {
    pub fn new(config: ParserConfig) -> Self {
        Self {
            source: "",
            cursor: TokenCursor::new(tokenizer::tokenize("")),
            arena: Arena::new(),
            depth: DepthGuardStack::new(config.get_max_depth()),
            context: ContextStackHandle::new(),
            paren_depth: 0,
            config,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(ParserConfig::default())
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ParserConfig) {
        self.depth = DepthGuardStack::new(config.get_max_depth());
        self.config = config;
    }

    /// Clear the arena and token stream, readying the parser for another
    /// `parse`/`parse_script` call. Takes `&mut self`, so the borrow checker
    /// rejects any attempt to call this while an `Ast` from a previous parse
    /// is still borrowed.
    pub fn reset(&mut self) {
        self.arena.reset();
        self.cursor = TokenCursor::new(tokenizer::tokenize(""));
        self.context = ContextStackHandle::new();
        self.depth = DepthGuardStack::new(self.config.get_max_depth());
        self.paren_depth = 0;
        self.source = "";
    }

    pub fn node_count(&self) -> usize {
        self.arena.node_count()
    }

    pub fn memory_used(&self) -> usize {
        self.arena.memory_used()
    }

    /// Parse `sql` as a single statement.
    pub fn parse(&mut self, sql: &'input str) -> Result<Ast<'_, 'input>, ParseError> {
        self.begin(sql);
        if self.cursor.at_end() {
            return Err(self.error(ErrorKind::EmptyInput, "no tokens to parse"));
        }
        let root = self.dispatch_statement()?;
        self.cursor.eat_delimiter(DelimiterKind::Semicolon);
        if !self.cursor.at_end() {
            return Err(self.unexpected("end of input"));
        }
        if self.paren_depth != 0 {
            return Err(self.error(ErrorKind::UnbalancedParens, "unbalanced parentheses at end of statement"));
        }
        let ast = Ast::new(&self.arena, vec![root]);
        crate::validator::validate(&ast, sql, self.config())?;
        Ok(ast)
    }

    /// Parse `sql` as a `;`-separated sequence of statements. Stops at the
    /// first fatal error, surfacing it alongside whatever statements parsed
    /// cleanly before it.
    pub fn parse_script(&mut self, sql: &'input str) -> Result<Ast<'_, 'input>, ParseError> {
        self.begin(sql);
        if self.cursor.at_end() {
            return Err(self.error(ErrorKind::EmptyInput, "no tokens to parse"));
        }
        let mut roots = Vec::new();
        while !self.cursor.at_end() {
            match self.dispatch_statement() {
                Ok(root) => {
                    roots.push(root);
                    self.cursor.eat_delimiter(DelimiterKind::Semicolon);
                    if self.paren_depth != 0 {
                        return Err(ParseError::new(
                            ErrorKind::ScriptInterrupted { statements_parsed: roots.len() },
                            self.cursor.line(),
                            self.cursor.column(),
                            self.cursor.byte_offset(),
                            "unbalanced parentheses",
                            self.source,
                        ));
                    }
                }
                Err(err) if !roots.is_empty() => {
                    return Err(ParseError::new(
                        ErrorKind::ScriptInterrupted { statements_parsed: roots.len() },
                        err.line,
                        err.column,
                        err.byte_offset,
                        err.message.clone(),
                        self.source,
                    ));
                }
                Err(err) => return Err(err),
            }
        }
        let ast = Ast::new(&self.arena, roots);
        crate::validator::validate(&ast, sql, self.config())?;
        Ok(ast)
    }

    fn begin(&mut self, sql: &'input str) {
        self.source = sql;
        self.arena.reset();
        self.cursor = TokenCursor::new(tokenizer::tokenize(sql));
        self.context = ContextStackHandle::new();
        self.depth = DepthGuardStack::new(self.config.get_max_depth());
        self.paren_depth = 0;
    }

    // ---- node construction ----

    pub(crate) fn mark(&self) -> Marker {
        let t = self.cursor.current();
        Marker { line: t.line, column: t.column, byte_offset: t.byte_offset }
    }

    pub(crate) fn finish(&mut self, marker: Marker, kind: NodeKind) -> NodeId {
        self.finish_with(marker, kind, ContextHint::Unknown, |_| {})
    }

    pub(crate) fn finish_ctx(&mut self, marker: Marker, kind: NodeKind, ctx: ContextHint) -> NodeId {
        self.finish_with(marker, kind, ctx, |_| {})
    }

    pub(crate) fn finish_with<F>(&mut self, marker: Marker, kind: NodeKind, ctx: ContextHint, f: F) -> NodeId
    where
        F: FnOnce(&mut AstNode<'input>),
    {
        let mut node = AstNode::new(kind, ctx);
        node.line = marker.line;
        node.column = marker.column;
        node.byte_offset = marker.byte_offset;
        f(&mut node);
        self.arena.push(node)
    }

    /// Attach `child` as the new last child of `parent` in O(1) via the
    /// tail-cache pointer, matching the "ordered child list" container
    /// described in the data model.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.arena.get_mut(child).parent = Some(parent);
        let last = self.arena.get(parent).last_child;
        match last {
            Some(last_id) => self.arena.get_mut(last_id).next_sibling = Some(child),
            None => self.arena.get_mut(parent).first_child = Some(child),
        }
        self.arena.get_mut(parent).last_child = Some(child);
        self.arena.get_mut(parent).child_count += 1;
    }

    /// Attach `child` as the new first child of `parent`, for the rare case
    /// (the `WITH` clause) where a production's header is parsed only after
    /// its body already exists, so child order would otherwise come out
    /// reversed relative to source order.
    pub(crate) fn attach_first(&mut self, parent: NodeId, child: NodeId) {
        self.arena.get_mut(child).parent = Some(parent);
        let old_first = self.arena.get(parent).first_child;
        self.arena.get_mut(child).next_sibling = old_first;
        self.arena.get_mut(parent).first_child = Some(child);
        if self.arena.get(parent).last_child.is_none() {
            self.arena.get_mut(parent).last_child = Some(child);
        }
        self.arena.get_mut(parent).child_count += 1;
    }

    pub(crate) fn attach_all(&mut self, parent: NodeId, children: impl IntoIterator<Item = NodeId>) {
        for child in children {
            self.attach(parent, child);
        }
    }

    pub(crate) fn attach_opt(&mut self, parent: NodeId, child: Option<NodeId>) {
        if let Some(child) = child {
            self.attach(parent, child);
        }
    }

    pub(crate) fn set_flag(&mut self, node: NodeId, bit: u16) {
        self.arena.get_mut(node).flags.set(bit);
    }

    pub(crate) fn set_semantic_flag(&mut self, node: NodeId, bit: u16) {
        self.arena.get_mut(node).semantic_flags.set(bit);
    }

    pub(crate) fn set_primary_text(&mut self, node: NodeId, text: Text<'input>) {
        self.arena.get_mut(node).primary_text = Some(text);
    }

    pub(crate) fn set_secondary_text(&mut self, node: NodeId, text: Text<'input>) {
        self.arena.get_mut(node).secondary_text = Some(text);
    }

    pub(crate) fn set_schema_name(&mut self, node: NodeId, text: Text<'input>) {
        self.arena.get_mut(node).schema_name = Some(text);
    }

    pub(crate) fn kind_of(&self, node: NodeId) -> NodeKind {
        self.arena.get(node).kind
    }

    // ---- recursion / context ----

    pub(crate) fn enter_depth(&mut self) -> Result<DepthGuard, ParseError> {
        let line = self.cursor.line();
        let column = self.cursor.column();
        let byte_offset = self.cursor.byte_offset();
        let source = self.source;
        self.depth
            .enter()
            .map_err(|_| crate::depth_guard::depth_exceeded(line, column, byte_offset, source))
    }

    pub(crate) fn push_context(&mut self, ctx: ContextHint) -> ContextGuard {
        ContextGuard::new(&self.context, ctx)
    }

    pub(crate) fn current_context(&self) -> ContextHint {
        self.context.current()
    }

    pub(crate) fn is_debug(&self) -> bool {
        self.config.get_mode() == ParserMode::Debug
    }

    /// Emit a `tracing` span marker for a grammar production. A no-op in
    /// [`ParserMode::Production`] (the default) — see `SPEC_FULL.md` §4.11.
    pub(crate) fn trace_production(&self, name: &str) {
        if self.is_debug() {
            tracing::trace!(production = name, line = self.cursor.line(), column = self.cursor.column());
        }
    }

    // ---- token helpers ----

    pub(crate) fn cur(&self) -> Token<'input> {
        self.cursor.current()
    }

    pub(crate) fn peek(&self) -> Token<'input> {
        self.cursor.peek()
    }

    pub(crate) fn peek_n(&self, n: usize) -> Token<'input> {
        self.cursor.peek_n(n)
    }

    pub(crate) fn bump(&mut self) -> Token<'input> {
        self.cursor.advance()
    }

    pub(crate) fn at_keyword(&self, id: KeywordId) -> bool {
        self.cursor.at_keyword(id)
    }

    pub(crate) fn at_any_keyword(&self, ids: &[KeywordId]) -> bool {
        ids.iter().any(|id| self.cursor.at_keyword(*id))
    }

    pub(crate) fn at_lexeme(&self, word: &str) -> bool {
        self.cursor.at_lexeme(word)
    }

    pub(crate) fn at_operator(&self, op: OperatorKind) -> bool {
        self.cursor.at_operator(op)
    }

    pub(crate) fn at_delimiter(&self, delim: DelimiterKind) -> bool {
        self.cursor.at_delimiter(delim)
    }

    pub(crate) fn eat_keyword(&mut self, id: KeywordId) -> bool {
        self.cursor.eat_keyword(id)
    }

    pub(crate) fn eat_operator(&mut self, op: OperatorKind) -> bool {
        self.cursor.eat_operator(op)
    }

    pub(crate) fn eat_delimiter(&mut self, delim: DelimiterKind) -> bool {
        self.cursor.eat_delimiter(delim)
    }

    pub(crate) fn expect_keyword(&mut self, id: KeywordId) -> Result<Token<'input>, ParseError> {
        if self.cursor.at_keyword(id) {
            Ok(self.cursor.advance())
        } else {
            Err(self.unexpected(&format!("{id:?}")))
        }
    }

    pub(crate) fn expect_delimiter(&mut self, delim: DelimiterKind) -> Result<Token<'input>, ParseError> {
        if self.cursor.at_delimiter(delim) {
            Ok(self.cursor.advance())
        } else {
            Err(self.unexpected(&format!("{delim:?}")))
        }
    }

    pub(crate) fn expect_operator(&mut self, op: OperatorKind) -> Result<Token<'input>, ParseError> {
        if self.cursor.at_operator(op) {
            Ok(self.cursor.advance())
        } else {
            Err(self.unexpected(&format!("{op:?}")))
        }
    }

    /// Consume the current token if its lexeme case-insensitively matches
    /// `word`; for the obscure qualifiers (`RESTART IDENTITY`, ...) that
    /// aren't worth a `KeywordId` variant.
    pub(crate) fn eat_lexeme(&mut self, word: &str) -> bool {
        if self.cursor.at_lexeme(word) {
            self.cursor.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect_lexeme(&mut self, word: &str) -> Result<Token<'input>, ParseError> {
        if self.cursor.at_lexeme(word) {
            Ok(self.cursor.advance())
        } else {
            Err(self.unexpected(word))
        }
    }

    pub(crate) fn expect_lparen(&mut self) -> Result<(), ParseError> {
        self.expect_delimiter(DelimiterKind::LParen)?;
        self.paren_depth += 1;
        Ok(())
    }

    pub(crate) fn expect_rparen(&mut self) -> Result<(), ParseError> {
        if self.cursor.eat_delimiter(DelimiterKind::RParen) {
            self.paren_depth -= 1;
            Ok(())
        } else {
            Err(self.error(ErrorKind::UnbalancedParens, "expected closing ')'"))
        }
    }

    /// An identifier token, either bare or double-quoted; keywords are
    /// rejected here (callers that accept keyword-as-identifier do so via
    /// `identifier_or_fallback_keyword`).
    pub(crate) fn expect_identifier(&mut self) -> Result<Token<'input>, ParseError> {
        if matches!(self.cur().kind, TokenKind::Identifier | TokenKind::QuotedIdentifier) {
            Ok(self.cursor.advance())
        } else {
            Err(self.unexpected("identifier"))
        }
    }

    pub(crate) fn error(&self, kind: ErrorKind, message: impl Into<String>) -> ParseError {
        let t = self.cur();
        ParseError::new(kind, t.line, t.column, t.byte_offset, message, self.source)
    }

    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        self.error(
            ErrorKind::UnexpectedToken { expected: expected.to_string() },
            format!("unexpected token '{}', expected {expected}", self.cur().text),
        )
    }

    pub(crate) fn missing_clause(&self, what: &str) -> ParseError {
        self.error(ErrorKind::MissingClause(what.to_string()), format!("missing {what}"))
    }

    pub(crate) fn malformed_literal(&self, what: &str) -> ParseError {
        self.error(ErrorKind::MalformedLiteral(what.to_string()), format!("malformed {what} literal"))
    }
}

/// Strip the surrounding `quote` characters from a lexed string/identifier
/// token and collapse doubled-quote escapes, borrowing the input slice
/// verbatim when no escape is present.
pub(crate) fn unquote(raw: &str, quote: char) -> Text<'_> {
    let inner = &raw[quote.len_utf8()..raw.len() - quote.len_utf8()];
    if !inner.contains(quote) {
        return Text::borrowed(inner);
    }
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == quote && chars.peek() == Some(&quote) {
            chars.next();
        }
        out.push(c);
    }
    Text::owned(&out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_rejected() {
        let mut parser = Parser::with_defaults();
        let err = parser.parse("").unwrap_err();
        assert_eq!(err.kind, ErrorKind::EmptyInput);
    }

    #[test]
    fn whitespace_only_input_is_empty() {
        let mut parser = Parser::with_defaults();
        let err = parser.parse("   \n\t").unwrap_err();
        assert_eq!(err.kind, ErrorKind::EmptyInput);
    }

    #[test]
    fn reset_clears_node_count() {
        let mut parser = Parser::with_defaults();
        {
            let ast = parser.parse("SELECT 1").unwrap();
            assert!(ast.node_count() > 0);
        }
        parser.reset();
        assert_eq!(parser.node_count(), 0);
    }

    #[test]
    fn debug_mode_parses_the_same_as_production() {
        let mut parser = Parser::new(ParserConfig::new().mode(ParserMode::Debug));
        let ast = parser.parse("SELECT a FROM t WHERE a > 1 ORDER BY a").unwrap();
        assert!(ast.node_count() > 0);
    }
}
