use std::fmt;
use std::rc::Rc;

/// A node's textual payload: either a zero-copy view into the input the
/// tokenizer is lexing, or an owned, reference-counted copy for text that
/// must outlive the input buffer (or that the parser synthesizes rather than
/// lexes verbatim).
///
/// This plays the role the spec's "arena-copied strings" play in the
/// original design, adapted the way `apollo-parser`'s `BowString`
/// (`src/bowstring.rs`) adapts the same idea: a cheap, clonable owned string
/// type sitting next to the zero-copy borrowed case. We use `Rc<str>`
/// instead of `BowString`'s thin `ThinArc` since this parser is
/// single-threaded end to end (see §5) and stdlib `Rc` needs no extra
/// dependency; cloning an `Owned` variant is a refcount bump, matching the
/// "copy is cheap, lifetime is decoupled from the input" property the spec
/// asks for.
#[derive(Clone)]
pub enum Text<'input> {
    Borrowed(&'input str),
    Owned(Rc<str>),
}

impl<'input> Text<'input> {
    pub fn borrowed(s: &'input str) -> Self {
        Text::Borrowed(s)
    }

    pub fn owned(s: &str) -> Self {
        Text::Owned(Rc::from(s))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Text::Borrowed(s) => s,
            Text::Owned(s) => s,
        }
    }

    /// Produce a copy that does not borrow `'input`, for callers building an
    /// owned tree that must outlive the parser session.
    pub fn to_owned_text(&self) -> Text<'static> {
        Text::Owned(Rc::from(self.as_str()))
    }
}

impl PartialEq for Text<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}
impl Eq for Text<'_> {}

impl fmt::Debug for Text<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for Text<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.as_str(), f)
    }
}

impl AsRef<str> for Text<'_> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn borrowed_and_owned_compare_equal() {
        let borrowed = Text::borrowed("select");
        let owned = Text::owned("select");
        assert_eq!(borrowed, owned);
    }

    #[test]
    fn to_owned_text_detaches_lifetime() {
        let detached: Text<'static> = {
            let local = String::from("tmp");
            let borrowed = Text::borrowed(local.as_str());
            borrowed.to_owned_text()
        };
        assert_eq!(detached.as_str(), "tmp");
    }
}
