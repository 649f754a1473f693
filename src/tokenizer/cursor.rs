use std::str::CharIndices;

/// Peekable cursor over the input's `char_indices`, tracking line/column as a
/// side effect of `bump`. Grounded on the teacher crate's own lexer cursor
/// (`lexer/cursor.rs`): a thin iterator wrapper that hands back the previous
/// char on lookahead rather than re-scanning.
pub(crate) struct Cursor<'input> {
    source: &'input str,
    chars: CharIndices<'input>,
    offset: usize,
    line: u32,
    column: u32,
}

impl<'input> Cursor<'input> {
    pub(crate) fn new(source: &'input str) -> Self {
        Self {
            source,
            chars: source.char_indices(),
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    pub(crate) fn line(&self) -> u32 {
        self.line
    }

    pub(crate) fn column(&self) -> u32 {
        self.column
    }

    pub(crate) fn is_eof(&self) -> bool {
        self.offset >= self.source.len()
    }

    pub(crate) fn first(&self) -> char {
        self.chars.clone().next().map(|(_, c)| c).unwrap_or('\0')
    }

    pub(crate) fn second(&self) -> char {
        let mut iter = self.chars.clone();
        iter.next();
        iter.next().map(|(_, c)| c).unwrap_or('\0')
    }

    /// Consume and return the current char, advancing position bookkeeping.
    pub(crate) fn bump(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.offset = pos + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    pub(crate) fn slice_from(&self, start: usize) -> &'input str {
        &self.source[start..self.offset]
    }
}
