/// The closed set of ways a parse can fail. See `SPEC_FULL.md` §7.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorKind {
    #[error("no tokens to parse")]
    EmptyInput,

    #[error("unexpected token: expected {expected}")]
    UnexpectedToken { expected: String },

    #[error("unbalanced parentheses")]
    UnbalancedParens,

    #[error("recursion limit exceeded")]
    DepthExceeded,

    #[error("missing required clause: {0}")]
    MissingClause(String),

    #[error("malformed literal: {0}")]
    MalformedLiteral(String),

    #[error("validation failed: {0}")]
    ValidationFailed(String),

    #[error("script interrupted after {statements_parsed} statement(s)")]
    ScriptInterrupted { statements_parsed: usize },
}

/// A fatal parse failure, carrying enough information for a caller to print
/// a one-line diagnostic without re-lexing the input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {line}:{column}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub line: u32,
    pub column: u32,
    pub byte_offset: u32,
    pub message: String,
    /// A short, single-line slice of the source around `byte_offset`,
    /// trimmed and truncated to a bounded width. Plain data, not rendered
    /// output — rendering (color, carets, multi-line context) is a caller
    /// concern, the same split `apollo-parser` draws between its bare
    /// `Error` type and its `miette`/`annotate_snippets` integration
    /// examples.
    pub context: String,
}

impl ParseError {
    pub(crate) fn new(
        kind: ErrorKind,
        line: u32,
        column: u32,
        byte_offset: u32,
        message: impl Into<String>,
        source: &str,
    ) -> Self {
        Self {
            context: context_slice(source, byte_offset as usize),
            kind,
            line,
            column,
            byte_offset,
            message: message.into(),
        }
    }
}

const CONTEXT_WINDOW: usize = 24;
const CONTEXT_MAX_LEN: usize = 60;

/// Extract a short, single-line slice of `source` around `at`, suitable for
/// embedding in a one-line diagnostic.
fn context_slice(source: &str, at: usize) -> String {
    let at = at.min(source.len());
    let start = source[..at]
        .char_indices()
        .rev()
        .take(CONTEXT_WINDOW)
        .last()
        .map(|(i, _)| i)
        .unwrap_or(0);
    let end = source[at..]
        .char_indices()
        .take(CONTEXT_WINDOW)
        .last()
        .map(|(i, c)| at + i + c.len_utf8())
        .unwrap_or(source.len());
    let mut slice: String = source[start..end]
        .chars()
        .map(|c| if c == '\n' || c == '\r' || c == '\t' { ' ' } else { c })
        .collect();
    slice = slice.trim().to_string();
    if slice.len() > CONTEXT_MAX_LEN {
        slice.truncate(CONTEXT_MAX_LEN);
        slice.push('\u{2026}');
    }
    slice
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_slice_is_single_line_and_trimmed() {
        let source = "SELECT *\nFROM t\nWHERE a = 1";
        let at = source.find("WHERE").unwrap();
        let slice = context_slice(source, at);
        assert!(!slice.contains('\n'));
        assert!(slice.contains("WHERE"));
    }

    #[test]
    fn context_slice_truncates_long_lines() {
        let long_line = "x".repeat(200);
        let slice = context_slice(&long_line, 100);
        assert!(slice.chars().count() <= CONTEXT_MAX_LEN + 1);
    }

    #[test]
    fn context_slice_handles_start_of_input() {
        let source = "SELECT 1";
        assert_eq!(context_slice(source, 0), "SELECT 1");
    }

    #[test]
    fn context_slice_handles_end_of_input() {
        let source = "SELECT 1";
        let slice = context_slice(source, source.len());
        assert_eq!(slice, "SELECT 1");
    }
}
