//! Lexes UTF-8 SQL text into a finite, randomly-indexable token vector. This
//! module is a bundled implementation detail: the rest of the crate reaches
//! it only through [`crate::token_cursor::TokenCursor`], never past that
//! interface into character-level lexical decisions. See `SPEC_FULL.md`
//! §4.2 and §6.

mod cursor;
mod keyword;
mod token;

pub use keyword::KeywordId;
pub use token::{DelimiterKind, OperatorKind, Token, TokenKind};

use cursor::Cursor;

/// Lex `source` in full and return its tokens, terminated by a single
/// trailing `TokenKind::Eof`. Whitespace and comments (`--` line comments,
/// `/* */` block comments) are stripped; they never become tokens.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let mut lexer = Lexer::new(source);
    lexer.run();
    lexer.tokens
}

struct Lexer<'input> {
    cursor: Cursor<'input>,
    tokens: Vec<Token<'input>>,
}

impl<'input> Lexer<'input> {
    fn new(source: &'input str) -> Self {
        Self { cursor: Cursor::new(source), tokens: Vec::new() }
    }

    fn run(&mut self) {
        loop {
            self.skip_trivia();
            if self.cursor.is_eof() {
                break;
            }
            let token = self.next_token();
            self.tokens.push(token);
        }
        self.tokens.push(Token {
            kind: TokenKind::Eof,
            keyword: None,
            text: "",
            line: self.cursor.line(),
            column: self.cursor.column(),
            byte_offset: self.cursor.offset() as u32,
        });
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.first() {
                c if c.is_whitespace() => {
                    self.cursor.bump();
                }
                '-' if self.cursor.second() == '-' => {
                    while !self.cursor.is_eof() && self.cursor.first() != '\n' {
                        self.cursor.bump();
                    }
                }
                '/' if self.cursor.second() == '*' => {
                    self.cursor.bump();
                    self.cursor.bump();
                    while !self.cursor.is_eof()
                        && !(self.cursor.first() == '*' && self.cursor.second() == '/')
                    {
                        self.cursor.bump();
                    }
                    if !self.cursor.is_eof() {
                        self.cursor.bump();
                        self.cursor.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn next_token(&mut self) -> Token<'input> {
        let start = self.cursor.offset();
        let line = self.cursor.line();
        let column = self.cursor.column();
        let first = self.cursor.bump().expect("skip_trivia left at least one char");

        let kind = match first {
            '\'' => self.string_literal(),
            '"' => self.quoted_identifier(),
            c if is_ident_start(c) => self.identifier(),
            c if c.is_ascii_digit() => self.number(),
            '.' if self.cursor.first().is_ascii_digit() => self.number(),
            '.' => TokenKind::Delimiter(DelimiterKind::Dot),
            '$' if self.cursor.first().is_ascii_digit() => self.parameter(),
            '(' => TokenKind::Delimiter(DelimiterKind::LParen),
            ')' => TokenKind::Delimiter(DelimiterKind::RParen),
            '[' => TokenKind::Delimiter(DelimiterKind::LBracket),
            ']' => TokenKind::Delimiter(DelimiterKind::RBracket),
            ',' => TokenKind::Delimiter(DelimiterKind::Comma),
            ';' => TokenKind::Delimiter(DelimiterKind::Semicolon),
            ':' if self.cursor.first() == ':' => {
                self.cursor.bump();
                TokenKind::Operator(OperatorKind::Cast)
            }
            ':' => TokenKind::Delimiter(DelimiterKind::Colon),
            '+' => TokenKind::Operator(OperatorKind::Plus),
            '-' if self.cursor.first() == '>' && self.cursor.second() == '>' => {
                self.cursor.bump();
                self.cursor.bump();
                TokenKind::Operator(OperatorKind::ArrowArrow)
            }
            '-' if self.cursor.first() == '>' => {
                self.cursor.bump();
                TokenKind::Operator(OperatorKind::Arrow)
            }
            '-' => TokenKind::Operator(OperatorKind::Minus),
            '*' => TokenKind::Operator(OperatorKind::Star),
            '/' => TokenKind::Operator(OperatorKind::Slash),
            '%' => TokenKind::Operator(OperatorKind::Percent),
            '^' => TokenKind::Operator(OperatorKind::Caret),
            '=' => TokenKind::Operator(OperatorKind::Eq),
            '<' if self.cursor.first() == '>' => {
                self.cursor.bump();
                TokenKind::Operator(OperatorKind::NotEq)
            }
            '<' if self.cursor.first() == '=' => {
                self.cursor.bump();
                TokenKind::Operator(OperatorKind::LtEq)
            }
            '<' if self.cursor.first() == '@' => {
                self.cursor.bump();
                TokenKind::Operator(OperatorKind::ArrowAt)
            }
            '<' => TokenKind::Operator(OperatorKind::Lt),
            '>' if self.cursor.first() == '=' => {
                self.cursor.bump();
                TokenKind::Operator(OperatorKind::GtEq)
            }
            '>' => TokenKind::Operator(OperatorKind::Gt),
            '!' if self.cursor.first() == '=' => {
                self.cursor.bump();
                TokenKind::Operator(OperatorKind::NotEq)
            }
            '|' if self.cursor.first() == '|' => {
                self.cursor.bump();
                TokenKind::Operator(OperatorKind::Concat)
            }
            '#' if self.cursor.first() == '>' && self.cursor.second() == '>' => {
                self.cursor.bump();
                self.cursor.bump();
                TokenKind::Operator(OperatorKind::HashArrowArrow)
            }
            '#' if self.cursor.first() == '>' => {
                self.cursor.bump();
                TokenKind::Operator(OperatorKind::HashArrow)
            }
            '#' => TokenKind::Operator(OperatorKind::Hash),
            '@' if self.cursor.first() == '>' => {
                self.cursor.bump();
                TokenKind::Operator(OperatorKind::AtArrow)
            }
            '?' if self.cursor.first() == '|' => {
                self.cursor.bump();
                TokenKind::Operator(OperatorKind::QuestionPipe)
            }
            '?' if self.cursor.first() == '&' => {
                self.cursor.bump();
                TokenKind::Operator(OperatorKind::QuestionAmp)
            }
            '?' => TokenKind::Parameter,
            // Unrecognized byte: tokenized as a single-char operator lexeme
            // so the cursor always makes forward progress; the grammar
            // layer rejects it with UnexpectedToken.
            _ => TokenKind::Operator(OperatorKind::Plus),
        };

        let text = self.cursor.slice_from(start);
        let keyword = if matches!(kind, TokenKind::Identifier) {
            keyword::lookup(text)
        } else {
            None
        };
        let kind = if keyword.is_some() { TokenKind::Keyword } else { kind };

        Token { kind, keyword, text, line, column, byte_offset: start as u32 }
    }

    fn identifier(&mut self) -> TokenKind {
        while is_ident_continue(self.cursor.first()) {
            self.cursor.bump();
        }
        TokenKind::Identifier
    }

    fn number(&mut self) -> TokenKind {
        while self.cursor.first().is_ascii_digit() {
            self.cursor.bump();
        }
        if self.cursor.first() == '.' && self.cursor.second().is_ascii_digit() {
            self.cursor.bump();
            while self.cursor.first().is_ascii_digit() {
                self.cursor.bump();
            }
        }
        if matches!(self.cursor.first(), 'e' | 'E')
            && (self.cursor.second().is_ascii_digit() || matches!(self.cursor.second(), '+' | '-'))
        {
            self.cursor.bump();
            if matches!(self.cursor.first(), '+' | '-') {
                self.cursor.bump();
            }
            while self.cursor.first().is_ascii_digit() {
                self.cursor.bump();
            }
        }
        TokenKind::Number
    }

    fn parameter(&mut self) -> TokenKind {
        while self.cursor.first().is_ascii_digit() {
            self.cursor.bump();
        }
        TokenKind::Parameter
    }

    /// `'...'` with `''` as the doubled-quote escape for a literal `'`.
    fn string_literal(&mut self) -> TokenKind {
        loop {
            if self.cursor.is_eof() {
                break;
            }
            let c = self.cursor.bump().unwrap();
            if c == '\'' {
                if self.cursor.first() == '\'' {
                    self.cursor.bump();
                    continue;
                }
                break;
            }
        }
        TokenKind::String
    }

    /// `"..."` with `""` as the doubled-quote escape, same rule as string
    /// literals but for a quoted identifier.
    fn quoted_identifier(&mut self) -> TokenKind {
        loop {
            if self.cursor.is_eof() {
                break;
            }
            let c = self.cursor.bump().unwrap();
            if c == '"' {
                if self.cursor.first() == '"' {
                    self.cursor.bump();
                    continue;
                }
                break;
            }
        }
        TokenKind::QuotedIdentifier
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_simple_select() {
        let tokens = tokenize("SELECT 1");
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[0].keyword, Some(KeywordId::Select));
        assert_eq!(tokens[1].kind, TokenKind::Number);
        assert_eq!(tokens[1].text, "1");
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn strips_line_and_block_comments() {
        let tokens = tokenize("SELECT 1 -- trailing comment\n, /* mid */ 2");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["SELECT", "1", ",", "2", ""]);
    }

    #[test]
    fn lexes_string_with_doubled_quote_escape() {
        let tokens = tokenize("'it''s'");
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text, "'it''s'");
    }

    #[test]
    fn lexes_quoted_identifier() {
        let tokens = tokenize("\"My Table\"");
        assert_eq!(tokens[0].kind, TokenKind::QuotedIdentifier);
        assert_eq!(tokens[0].text, "\"My Table\"");
    }

    #[test]
    fn lexes_float_and_exponent_numbers() {
        assert_eq!(kinds("3.14"), vec![TokenKind::Number, TokenKind::Eof]);
        assert_eq!(kinds("1e10"), vec![TokenKind::Number, TokenKind::Eof]);
        assert_eq!(kinds("1.5e-3"), vec![TokenKind::Number, TokenKind::Eof]);
    }

    #[test]
    fn lexes_cast_and_concat_operators() {
        let tokens = tokenize("a::int || b");
        let ops: Vec<OperatorKind> = tokens
            .iter()
            .filter_map(|t| match t.kind {
                TokenKind::Operator(op) => Some(op),
                _ => None,
            })
            .collect();
        assert_eq!(ops, vec![OperatorKind::Cast, OperatorKind::Concat]);
    }

    #[test]
    fn lexes_json_arrow_operators() {
        let tokens = tokenize("a -> 'k' ->> 'k2' #> '{a}' #>> '{a}'");
        let ops: Vec<OperatorKind> = tokens
            .iter()
            .filter_map(|t| match t.kind {
                TokenKind::Operator(op) => Some(op),
                _ => None,
            })
            .collect();
        assert_eq!(
            ops,
            vec![
                OperatorKind::Arrow,
                OperatorKind::ArrowArrow,
                OperatorKind::HashArrow,
                OperatorKind::HashArrowArrow,
            ]
        );
    }

    #[test]
    fn tracks_line_and_column_across_newlines() {
        let tokens = tokenize("SELECT\n1");
        let one = &tokens[1];
        assert_eq!(one.line, 2);
        assert_eq!(one.column, 1);
    }

    #[test]
    fn empty_input_yields_only_eof() {
        assert_eq!(kinds(""), vec![TokenKind::Eof]);
        assert_eq!(kinds("   \n\t "), vec![TokenKind::Eof]);
    }
}
