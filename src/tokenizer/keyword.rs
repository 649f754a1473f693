/// The closed vocabulary of keywords the grammar treats as structural.
///
/// Deliberately excludes `TRUNCATE`, `VACUUM`, `ANALYZE`, `REINDEX`, and
/// `PRAGMA` — see the "CREATE/DROP keyword coverage" design note. Those are
/// matched by case-folded lexeme comparison at the statement dispatcher
/// instead of being promoted here, the same way a hand-maintained keyword
/// table in a real parser lags behind the full list of reserved words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum KeywordId {
    // Statement leaders
    With,
    Select,
    Insert,
    Update,
    Delete,
    Create,
    Drop,
    Alter,
    Begin,
    Start,
    Commit,
    Rollback,
    Savepoint,
    Release,
    Explain,
    Values,
    Set,
    Attach,
    Detach,

    // Statement/clause vocabulary
    From,
    Where,
    Group,
    By,
    Having,
    Order,
    Limit,
    Offset,
    Window,
    Returning,
    Conflict,
    On,
    Using,
    Into,
    Default,

    // CREATE family
    Table,
    Index,
    View,
    Trigger,
    Schema,
    Or,
    Replace,
    Temporary,
    Unique,
    If,
    Not,
    Exists,
    Recursive,
    Primary,
    Key,
    Foreign,
    References,
    Check,
    Constraint,
    Column,
    Add,
    Rename,
    Type,
    Null,
    Collate,
    Cascade,
    Restrict,
    Before,
    After,
    Instead,
    Of,
    For,
    Each,
    Row,
    Statement,
    When,
    Do,
    Nothing,
    To,

    // Joins
    Join,
    Inner,
    Left,
    Right,
    Full,
    Outer,
    Cross,
    Natural,
    Lateral,

    // Set operations
    Union,
    Intersect,
    Except,
    All,
    Distinct,

    // Transaction modifiers
    Transaction,
    Isolation,
    Level,
    Read,
    Write,
    Only,

    // Expressions
    And,
    Case,
    Then,
    Else,
    End,
    Cast,
    As,
    Extract,
    Between,
    In,
    Like,
    Ilike,
    Is,
    Filter,
    Over,
    Partition,
    Asc,
    Desc,
    Nulls,
    First,
    Last,
    Array,
    Interval,
    True,
    False,

    // Frame clause
    Rows,
    Range,
    Groups,
    Unbounded,
    Preceding,
    Following,
    Current,

    // GROUP BY extensions
    Cube,
    Rollup,
    Grouping,
    Sets,
}

macro_rules! keyword_table {
    ($($lexeme:literal => $variant:ident),+ $(,)?) => {
        pub(crate) fn lookup(word: &str) -> Option<KeywordId> {
            $(if word.eq_ignore_ascii_case($lexeme) { return Some(KeywordId::$variant); })+
            None
        }
    };
}

keyword_table! {
    "with" => With, "select" => Select, "insert" => Insert, "update" => Update,
    "delete" => Delete, "create" => Create, "drop" => Drop, "alter" => Alter,
    "begin" => Begin, "start" => Start, "commit" => Commit, "rollback" => Rollback,
    "savepoint" => Savepoint, "release" => Release, "explain" => Explain,
    "values" => Values, "set" => Set, "attach" => Attach, "detach" => Detach,

    "from" => From, "where" => Where, "group" => Group, "by" => By,
    "having" => Having, "order" => Order, "limit" => Limit, "offset" => Offset,
    "window" => Window, "returning" => Returning, "conflict" => Conflict,
    "on" => On, "using" => Using, "into" => Into, "default" => Default,

    "table" => Table, "index" => Index, "view" => View, "trigger" => Trigger,
    "schema" => Schema, "or" => Or, "replace" => Replace,
    "temporary" => Temporary, "unique" => Unique, "if" => If, "not" => Not,
    "exists" => Exists, "recursive" => Recursive, "primary" => Primary,
    "key" => Key, "foreign" => Foreign, "references" => References,
    "check" => Check, "constraint" => Constraint, "column" => Column,
    "add" => Add, "rename" => Rename, "type" => Type, "null" => Null,
    "collate" => Collate, "cascade" => Cascade, "restrict" => Restrict,
    "before" => Before, "after" => After, "instead" => Instead, "of" => Of,
    "for" => For, "each" => Each, "row" => Row, "statement" => Statement,
    "when" => When, "do" => Do, "nothing" => Nothing, "to" => To,

    "join" => Join, "inner" => Inner, "left" => Left, "right" => Right,
    "full" => Full, "outer" => Outer, "cross" => Cross, "natural" => Natural,
    "lateral" => Lateral,

    "union" => Union, "intersect" => Intersect, "except" => Except,
    "all" => All, "distinct" => Distinct,

    "transaction" => Transaction, "isolation" => Isolation, "level" => Level,
    "read" => Read, "write" => Write, "only" => Only,

    "and" => And, "case" => Case, "then" => Then, "else" => Else, "end" => End,
    "cast" => Cast, "as" => As, "extract" => Extract, "between" => Between,
    "in" => In, "like" => Like, "ilike" => Ilike, "is" => Is,
    "filter" => Filter, "over" => Over, "partition" => Partition,
    "asc" => Asc, "desc" => Desc, "nulls" => Nulls, "first" => First,
    "last" => Last, "array" => Array, "interval" => Interval,
    "true" => True, "false" => False,

    "rows" => Rows, "range" => Range, "groups" => Groups,
    "unbounded" => Unbounded, "preceding" => Preceding,
    "following" => Following, "current" => Current,

    "cube" => Cube, "rollup" => Rollup, "grouping" => Grouping, "sets" => Sets,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(lookup("SELECT"), Some(KeywordId::Select));
        assert_eq!(lookup("Select"), Some(KeywordId::Select));
        assert_eq!(lookup("select"), Some(KeywordId::Select));
    }

    #[test]
    fn unknown_word_is_not_a_keyword() {
        assert_eq!(lookup("frobnicate"), None);
    }

    #[test]
    fn deliberately_excluded_words_are_not_keywords() {
        for word in ["truncate", "vacuum", "analyze", "reindex", "pragma"] {
            assert_eq!(lookup(word), None, "{word} must not be in KeywordId");
        }
    }
}
