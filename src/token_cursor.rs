//! The narrow interface the grammar layer uses to consume tokens. Every
//! statement, clause, and expression parser reaches the tokenizer only
//! through this cursor — see `SPEC_FULL.md` §4.2's "treated as a boundary,
//! not a grammar concern."

use crate::tokenizer::{DelimiterKind, KeywordId, OperatorKind, Token, TokenKind};

/// Keywords deliberately absent from [`KeywordId`] (see the "CREATE/DROP
/// keyword coverage" design note). Recognized only by case-folded lexeme
/// comparison at the point of use.
pub const FALLBACK_KEYWORDS: &[&str] = &["truncate", "vacuum", "analyze", "reindex", "pragma"];

/// A thin, random-access view over a pre-lexed token vector.
pub struct TokenCursor<'input> {
    tokens: Vec<Token<'input>>,
    position: usize,
}

impl<'input> TokenCursor<'input> {
    pub fn new(tokens: Vec<Token<'input>>) -> Self {
        Self { tokens, position: 0 }
    }

    pub fn current(&self) -> Token<'input> {
        self.tokens[self.position]
    }

    pub fn peek(&self) -> Token<'input> {
        self.peek_n(1)
    }

    /// Look `n` tokens ahead of `current()` (`peek_n(0) == current()`),
    /// saturating at the trailing `Eof` token.
    pub fn peek_n(&self, n: usize) -> Token<'input> {
        let index = (self.position + n).min(self.tokens.len() - 1);
        self.tokens[index]
    }

    pub fn advance(&mut self) -> Token<'input> {
        let token = self.current();
        if !self.at_end() {
            self.position += 1;
        }
        token
    }

    pub fn at_end(&self) -> bool {
        self.current().kind == TokenKind::Eof
    }

    pub fn line(&self) -> u32 {
        self.current().line
    }

    pub fn column(&self) -> u32 {
        self.current().column
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn byte_offset(&self) -> u32 {
        self.current().byte_offset
    }

    /// True if the current token is the keyword `id`.
    pub fn at_keyword(&self, id: KeywordId) -> bool {
        self.current().keyword == Some(id)
    }

    /// True if the current token's lexeme case-insensitively matches `word`,
    /// for the fallback keywords not present in [`KeywordId`].
    pub fn at_lexeme(&self, word: &str) -> bool {
        matches!(self.current().kind, TokenKind::Identifier | TokenKind::Keyword)
            && self.current().text.eq_ignore_ascii_case(word)
    }

    pub fn at_operator(&self, op: OperatorKind) -> bool {
        self.current().kind == TokenKind::Operator(op)
    }

    pub fn at_delimiter(&self, delim: DelimiterKind) -> bool {
        self.current().kind == TokenKind::Delimiter(delim)
    }

    /// Consume the current token if it is keyword `id`.
    pub fn eat_keyword(&mut self, id: KeywordId) -> bool {
        if self.at_keyword(id) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn eat_delimiter(&mut self, delim: DelimiterKind) -> bool {
        if self.at_delimiter(delim) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn eat_operator(&mut self, op: OperatorKind) -> bool {
        if self.at_operator(op) {
            self.advance();
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    #[test]
    fn advance_walks_tokens_in_order() {
        let tokens = tokenize("SELECT 1");
        let mut cursor = TokenCursor::new(tokens);
        assert!(cursor.at_keyword(KeywordId::Select));
        cursor.advance();
        assert_eq!(cursor.current().kind, TokenKind::Number);
        cursor.advance();
        assert!(cursor.at_end());
    }

    #[test]
    fn peek_n_saturates_at_eof() {
        let tokens = tokenize("SELECT 1");
        let cursor = TokenCursor::new(tokens);
        assert_eq!(cursor.peek_n(100).kind, TokenKind::Eof);
    }

    #[test]
    fn advance_past_eof_stays_put() {
        let tokens = tokenize("");
        let mut cursor = TokenCursor::new(tokens);
        assert!(cursor.at_end());
        cursor.advance();
        cursor.advance();
        assert!(cursor.at_end());
    }

    #[test]
    fn at_lexeme_matches_fallback_keywords_case_insensitively() {
        let tokens = tokenize("TRUNCATE t");
        let cursor = TokenCursor::new(tokens);
        assert!(cursor.at_lexeme("truncate"));
        assert!(FALLBACK_KEYWORDS.contains(&"truncate"));
    }
}
