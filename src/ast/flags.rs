//! Bit sets attached to every [`super::AstNode`].
//!
//! Plain `u16` constants rather than a `bitflags!`-generated type: nothing in
//! this pack reaches for the `bitflags` crate for a closed, small set of
//! independent bits, and the struct-of-bitmasks shape mirrors the original
//! `uint32_t` bit sets in `db25::ast::ASTNode` directly (see
//! `examples/original_source/include/db25/parser/parser.hpp`).

/// Structural modifiers: `flags` field.
pub mod flags {
    pub const DISTINCT: u16 = 1 << 0;
    pub const ALL: u16 = 1 << 1;
    pub const HAS_ALIAS: u16 = 1 << 2;
    pub const IF_NOT_EXISTS: u16 = 1 << 3;
    pub const IF_EXISTS: u16 = 1 << 4;
    pub const CASCADE: u16 = 1 << 5;
    pub const RESTRICT: u16 = 1 << 6;
    pub const OR_REPLACE: u16 = 1 << 7;
    pub const TEMPORARY: u16 = 1 << 8;
    pub const UNIQUE: u16 = 1 << 9;
    pub const RECURSIVE: u16 = 1 << 10;
    pub const DO_NOTHING: u16 = 1 << 11;
    pub const VERBOSE: u16 = 1 << 12;
    pub const ANALYZE: u16 = 1 << 13;
    /// Set on a `LimitClause` that carries only an `OFFSET`, no `LIMIT`, so
    /// a single attached child is unambiguous to interpret.
    pub const OFFSET_ONLY: u16 = 1 << 14;
    pub const RESTART_IDENTITY: u16 = 1 << 15;
}

/// Semantic modifiers: `semantic_flags` field.
pub mod semantic_flags {
    pub const NOT: u16 = 1 << 0;
    pub const DESC: u16 = 1 << 1;
    pub const NULLS_FIRST: u16 = 1 << 2;
    pub const NULLS_LAST: u16 = 1 << 3;
    pub const IS_WINDOW_FUNCTION: u16 = 1 << 4;
    pub const AGGREGATE_DISTINCT: u16 = 1 << 5;
    pub const NATURAL: u16 = 1 << 6;
    pub const LATERAL: u16 = 1 << 7;
    pub const FOR_EACH_ROW: u16 = 1 << 8;
}

/// A thin wrapper so call sites read as `node.flags.has(flags::DISTINCT)`
/// instead of raw bitwise `&`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bits(pub u16);

impl Bits {
    pub const fn empty() -> Self {
        Bits(0)
    }

    pub fn has(self, bit: u16) -> bool {
        self.0 & bit != 0
    }

    pub fn set(&mut self, bit: u16) {
        self.0 |= bit;
    }

    pub fn with(mut self, bit: u16) -> Self {
        self.set(bit);
        self
    }
}
