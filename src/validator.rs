//! Post-parse structural validator. See `SPEC_FULL.md` §4.8.
//!
//! Most of what this module checks is already unreachable through the
//! grammar (a `WindowSpec` can only ever be attached inside
//! `parse_function_call`, for instance) — it exists as a second, independent
//! pass over the tree rather than trusting the grammar never regresses, the
//! same belt-and-suspenders role `db25`'s own post-parse validation pass
//! plays in `examples/original_source`. CTE name uniqueness and the
//! `strict_ansi` dialect check are the two assertions here with no grammar
//! counterpart at all.

use crate::ast::{semantic_flags, Ast, NodeId, NodeKind};
use crate::config::ParserConfig;
use crate::error::{ErrorKind, ParseError};

/// Walk every statement root in `ast` and report the first structural
/// violation found, if any.
pub fn validate(ast: &Ast<'_, '_>, source: &str, config: &ParserConfig) -> Result<(), ParseError> {
    for &root in ast.roots() {
        Validator { ast, source, config }.check(root)?;
    }
    Ok(())
}

struct Validator<'a, 'p, 'input> {
    ast: &'a Ast<'p, 'input>,
    source: &'a str,
    config: &'a ParserConfig,
}

impl<'a, 'p, 'input> Validator<'a, 'p, 'input> {
    fn check(&self, id: NodeId) -> Result<(), ParseError> {
        let node = self.ast.node(id);
        match node.kind {
            NodeKind::SelectList => {
                if node.child_count == 0 {
                    return Err(self.fail(id, "SELECT list must not be empty"));
                }
            }
            NodeKind::UnionStmt => {
                for child in self.ast.children(id) {
                    if !self.ast.node(child).kind.is_select_shaped() {
                        return Err(self.fail(id, "set-operation arms must both be SELECT-shaped"));
                    }
                }
            }
            NodeKind::JoinClause => {
                let is_cross = node.primary_text.as_ref().map(|t| t.as_str() == "CROSS").unwrap_or(false);
                let natural = node.semantic_flags.has(semantic_flags::NATURAL);
                if !is_cross && !natural && node.child_count < 3 {
                    return Err(self.fail(id, "non-CROSS join requires ON or USING"));
                }
                if node.child_count > 3 {
                    return Err(self.fail(id, "join may carry at most one ON/USING condition"));
                }
            }
            NodeKind::Cube | NodeKind::Rollup | NodeKind::GroupingSets => {
                let parent_is_group_by = node.parent.map(|p| self.ast.node(p).kind == NodeKind::GroupByClause).unwrap_or(false);
                if !parent_is_group_by {
                    return Err(self.fail(id, "CUBE/ROLLUP/GROUPING SETS may only appear in GROUP BY"));
                }
            }
            NodeKind::WindowSpec => {
                let parent_is_callable = node.parent.map(|p| self.ast.node(p).kind.is_callable()).unwrap_or(false);
                if !parent_is_callable {
                    return Err(self.fail(id, "OVER clause may only attach to a callable expression"));
                }
            }
            NodeKind::WithClause => {
                let mut seen: Vec<&str> = Vec::new();
                for cte in self.ast.children(id) {
                    let name = self
                        .ast
                        .node(cte)
                        .primary_text
                        .as_ref()
                        .map(|t| t.as_str())
                        .unwrap_or("");
                    if seen.contains(&name) {
                        return Err(self.fail(cte, &format!("duplicate CTE name '{name}' within the same WITH")));
                    }
                    seen.push(name);
                }
            }
            NodeKind::BinaryExpr if self.config.get_strict_ansi() => {
                if let Some(op) = node.primary_text.as_ref() {
                    if is_json_operator(op.as_str()) {
                        return Err(self.fail(id, &format!("JSON operator '{}' is not ISO SQL:2016", op.as_str())));
                    }
                }
            }
            NodeKind::LikeExpr if self.config.get_strict_ansi() => {
                if node.primary_text.as_ref().map(|t| t.as_str() == "ILIKE").unwrap_or(false) {
                    return Err(self.fail(id, "ILIKE is not ISO SQL:2016"));
                }
            }
            NodeKind::OnConflictClause if self.config.get_strict_ansi() => {
                return Err(self.fail(id, "ON CONFLICT is not ISO SQL:2016"));
            }
            NodeKind::TableRef | NodeKind::Subquery
                if self.config.get_strict_ansi() && node.semantic_flags.has(semantic_flags::LATERAL) =>
            {
                return Err(self.fail(id, "LATERAL is not ISO SQL:2016"));
            }
            _ => {}
        }

        for child in self.ast.children(id) {
            self.check(child)?;
        }
        Ok(())
    }

    fn fail(&self, id: NodeId, message: &str) -> ParseError {
        let node = self.ast.node(id);
        ParseError::new(
            ErrorKind::ValidationFailed(message.to_string()),
            node.line,
            node.column,
            node.byte_offset,
            message.to_string(),
            self.source,
        )
    }
}

fn is_json_operator(op: &str) -> bool {
    matches!(op, "->" | "->>" | "#>" | "#>>" | "@>" | "<@" | "?" | "?|" | "?&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    #[test]
    fn duplicate_cte_name_is_rejected() {
        let mut parser = Parser::with_defaults();
        let err = parser.parse("WITH a AS (SELECT 1), a AS (SELECT 2) SELECT * FROM a").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ValidationFailed("duplicate CTE name 'a' within the same WITH".to_string()));
    }

    #[test]
    fn distinct_cte_names_pass() {
        let mut parser = Parser::with_defaults();
        let sql = "WITH a AS (SELECT 1), b AS (SELECT 2) SELECT * FROM a, b";
        assert!(parser.parse(sql).is_ok());
    }

    #[test]
    fn union_requires_select_shaped_arms() {
        let mut parser = Parser::with_defaults();
        let sql = "SELECT a FROM t UNION SELECT b FROM u";
        assert!(parser.parse(sql).is_ok());
    }

    #[test]
    fn strict_ansi_rejects_json_operator() {
        let mut parser = Parser::new(ParserConfig::new().strict_ansi(true));
        let sql = "SELECT data -> 'key' FROM t";
        let err = parser.parse(sql).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::ValidationFailed(_)));
    }

    #[test]
    fn strict_ansi_rejects_on_conflict() {
        let mut parser = Parser::new(ParserConfig::new().strict_ansi(true));
        let sql = "INSERT INTO t (a) VALUES (1) ON CONFLICT (a) DO NOTHING";
        assert!(parser.parse(sql).is_err());
    }
}
