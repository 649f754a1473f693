/// Governs how strict and how chatty a [`crate::Parser`] is.
///
/// Mirrors the shape of `apollo-parser`'s builder-style `Parser` knobs
/// (`recursion_limit`, `token_limit`) rather than a single sprawling
/// options struct, so a caller reads `ParserConfig::new().max_depth(64)`
/// the same way they'd read that crate's own builder calls.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    max_depth: u32,
    mode: ParserMode,
    dialect_keywords_only: bool,
    strict_ansi: bool,
    allow_extensions: bool,
}

/// Whether the parser should emit `tracing` spans for each grammar
/// production it enters. Off by default: span emission is not free, and
/// most embedders only want it while debugging a misparse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParserMode {
    #[default]
    Production,
    Debug,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            max_depth: 1000,
            mode: ParserMode::Production,
            dialect_keywords_only: true,
            strict_ansi: false,
            allow_extensions: true,
        }
    }
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maximum nesting depth the [`crate::depth_guard::DepthGuard`] allows
    /// before failing with [`crate::error::ErrorKind::DepthExceeded`].
    pub fn max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn mode(mut self, mode: ParserMode) -> Self {
        self.mode = mode;
        self
    }

    /// When `true` (the default), only the closed keyword set in
    /// `SPEC_FULL.md` §4.2 is recognized as a keyword; everything else
    /// (TRUNCATE, VACUUM, ANALYZE, REINDEX, PRAGMA, ...) is matched by
    /// case-folded lexeme comparison at the statement dispatcher instead of
    /// being promoted to a `KeywordId`.
    pub fn dialect_keywords_only(mut self, only: bool) -> Self {
        self.dialect_keywords_only = only;
        self
    }

    pub fn get_max_depth(&self) -> u32 {
        self.max_depth
    }

    pub fn get_mode(&self) -> ParserMode {
        self.mode
    }

    pub fn get_dialect_keywords_only(&self) -> bool {
        self.dialect_keywords_only
    }

    /// When `true`, the post-parse validator (see [`crate::validator`])
    /// rejects constructs outside ISO SQL:2016: JSON operators, `ILIKE`,
    /// `LATERAL`, and `ON CONFLICT`.
    pub fn strict_ansi(mut self, strict: bool) -> Self {
        self.strict_ansi = strict;
        self
    }

    /// When `false`, the statement dispatcher refuses the
    /// `FALLBACK_KEYWORDS` utility statements (`TRUNCATE`, `VACUUM`,
    /// `ANALYZE`, `REINDEX`, `PRAGMA`) that exist outside the closed
    /// `KeywordId` vocabulary.
    pub fn allow_extensions(mut self, allow: bool) -> Self {
        self.allow_extensions = allow;
        self
    }

    pub fn get_strict_ansi(&self) -> bool {
        self.strict_ansi
    }

    pub fn get_allow_extensions(&self) -> bool {
        self.allow_extensions
    }

    pub fn is_debug(&self) -> bool {
        self.mode == ParserMode::Debug
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_production_mode() {
        let config = ParserConfig::default();
        assert_eq!(config.get_mode(), ParserMode::Production);
        assert!(!config.is_debug());
        assert!(!config.get_strict_ansi());
        assert!(config.get_allow_extensions());
    }

    #[test]
    fn strict_ansi_and_extensions_are_independent_knobs() {
        let config = ParserConfig::new().strict_ansi(true).allow_extensions(false);
        assert!(config.get_strict_ansi());
        assert!(!config.get_allow_extensions());
    }

    #[test]
    fn builder_chains_override_defaults() {
        let config = ParserConfig::new().max_depth(16).mode(ParserMode::Debug);
        assert_eq!(config.get_max_depth(), 16);
        assert!(config.is_debug());
    }
}
