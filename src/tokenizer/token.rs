use super::keyword::KeywordId;

/// One lexical unit produced by the tokenizer. `text` is always a view into
/// the original input — the tokenizer never copies; that decision belongs to
/// whoever builds AST nodes out of the token stream (see `Text::borrowed`
/// vs `Text::owned`).
#[derive(Debug, Clone, Copy)]
pub struct Token<'input> {
    pub kind: TokenKind,
    /// Populated only when `kind` is `TokenKind::Keyword`.
    pub keyword: Option<KeywordId>,
    pub text: &'input str,
    pub line: u32,
    pub column: u32,
    pub byte_offset: u32,
}

/// The closed set of lexical categories. See `SPEC_FULL.md` §4.2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Identifier,
    QuotedIdentifier,
    Number,
    String,
    Operator(OperatorKind),
    Delimiter(DelimiterKind),
    Parameter,
    Eof,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Concat,
    Cast,
    Arrow,
    ArrowArrow,
    Hash,
    HashArrow,
    HashArrowArrow,
    AtArrow,
    ArrowAt,
    Question,
    QuestionPipe,
    QuestionAmp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterKind {
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Dot,
    Semicolon,
    Colon,
}
