//! FROM/join tails, WHERE, GROUP BY (incl. CUBE/ROLLUP/GROUPING SETS),
//! HAVING, ORDER BY, LIMIT/OFFSET, WINDOW, RETURNING, ON CONFLICT, USING.
//! See `SPEC_FULL.md` §4.6.

use super::Parser;
use crate::ast::{flags, semantic_flags, ContextHint, NodeId, NodeKind, Text};
use crate::error::ParseError;
use crate::tokenizer::{DelimiterKind, KeywordId, OperatorKind, TokenKind};

impl<'input> Parser<'input> {
    pub(crate) fn parse_from_clause(&mut self) -> Result<NodeId, ParseError> {
        self.trace_production("from_clause");
        let marker = self.mark();
        self.expect_keyword(KeywordId::From)?;
        let _ctx = self.push_context(ContextHint::FromClause);
        let refs = self.parse_table_reference_list()?;
        let node = self.finish(marker, NodeKind::FromClause);
        self.attach_all(node, refs);
        Ok(node)
    }

    pub(crate) fn parse_table_reference_list(&mut self) -> Result<Vec<NodeId>, ParseError> {
        let mut refs = Vec::new();
        loop {
            refs.push(self.parse_table_reference()?);
            if !self.eat_delimiter(DelimiterKind::Comma) {
                break;
            }
        }
        Ok(refs)
    }

    fn parse_table_reference(&mut self) -> Result<NodeId, ParseError> {
        let _guard = self.enter_depth()?;
        let mut left = self.parse_table_primary()?;
        while let Some(join) = self.try_parse_join_tail(left)? {
            left = join;
        }
        Ok(left)
    }

    fn try_parse_join_tail(&mut self, left: NodeId) -> Result<Option<NodeId>, ParseError> {
        let marker = self.mark();
        let natural = self.eat_keyword(KeywordId::Natural);

        let (join_text, is_cross): (&str, bool) = if self.eat_keyword(KeywordId::Cross) {
            self.expect_keyword(KeywordId::Join)?;
            ("CROSS", true)
        } else if self.eat_keyword(KeywordId::Inner) {
            self.expect_keyword(KeywordId::Join)?;
            ("INNER", false)
        } else if self.eat_keyword(KeywordId::Left) {
            self.eat_keyword(KeywordId::Outer);
            self.expect_keyword(KeywordId::Join)?;
            ("LEFT", false)
        } else if self.eat_keyword(KeywordId::Right) {
            self.eat_keyword(KeywordId::Outer);
            self.expect_keyword(KeywordId::Join)?;
            ("RIGHT", false)
        } else if self.eat_keyword(KeywordId::Full) {
            self.eat_keyword(KeywordId::Outer);
            self.expect_keyword(KeywordId::Join)?;
            ("FULL", false)
        } else if self.eat_keyword(KeywordId::Join) {
            ("INNER", false)
        } else {
            if natural {
                return Err(self.unexpected("JOIN after NATURAL"));
            }
            return Ok(None);
        };

        let right = self.parse_table_primary()?;
        let mut condition = None;
        if !is_cross && !natural {
            if self.eat_keyword(KeywordId::On) {
                condition = Some(self.parse_expr(0)?);
            } else if self.eat_keyword(KeywordId::Using) {
                condition = Some(self.parse_using_clause()?);
            } else {
                return Err(self.missing_clause("ON or USING after a non-CROSS join"));
            }
        }

        let node = self.finish(marker, NodeKind::JoinClause);
        self.set_primary_text(node, Text::borrowed(join_text));
        if natural {
            self.set_semantic_flag(node, semantic_flags::NATURAL);
        }
        self.attach(node, left);
        self.attach(node, right);
        self.attach_opt(node, condition);
        Ok(Some(node))
    }

    fn parse_using_clause(&mut self) -> Result<NodeId, ParseError> {
        self.parse_name_list_in_parens(NodeKind::UsingClause)
    }

    fn parse_table_primary(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        let lateral = self.eat_keyword(KeywordId::Lateral);

        if self.at_delimiter(DelimiterKind::LParen) {
            self.expect_lparen()?;
            let node = if self.at_keyword(KeywordId::Select)
                || self.at_keyword(KeywordId::Values)
                || self.at_keyword(KeywordId::With)
            {
                let body = self.parse_with_or_set_op_chain()?;
                self.expect_rparen()?;
                let sub = self.finish(marker, NodeKind::Subquery);
                self.attach(sub, body);
                self.parse_optional_alias(sub)?
            } else {
                let nested = self.parse_table_reference()?;
                self.expect_rparen()?;
                nested
            };
            if lateral {
                self.set_semantic_flag(node, semantic_flags::LATERAL);
            }
            return Ok(node);
        }

        let node = self.parse_table_name_ref()?;
        let node = self.parse_optional_alias(node)?;
        if lateral {
            self.set_semantic_flag(node, semantic_flags::LATERAL);
        }
        Ok(node)
    }

    /// A bare, possibly schema-qualified table name with no alias or join
    /// tail — the `INSERT INTO`/`UPDATE`/`DELETE FROM`/`DROP`/`ALTER TABLE`
    /// shape, as opposed to [`Self::parse_table_primary`]'s full FROM-list
    /// grammar.
    pub(crate) fn parse_table_name_ref(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        let first = self.expect_identifier()?;
        let (schema, name) = if self.eat_delimiter(DelimiterKind::Dot) {
            (Some(first), self.expect_identifier()?)
        } else {
            (None, first)
        };
        let node = self.finish(marker, NodeKind::TableRef);
        self.set_primary_text(node, Text::borrowed(name.text));
        if let Some(schema) = schema {
            self.set_schema_name(node, Text::borrowed(schema.text));
        }
        Ok(node)
    }

    /// `[AS] alias [(col, ...)]`, attached onto an already-built reference
    /// node rather than wrapping it, so a `TableRef`/`Subquery` carries its
    /// own alias the way the data model's `secondary_text` slot intends.
    pub(crate) fn parse_optional_alias(&mut self, node: NodeId) -> Result<NodeId, ParseError> {
        let explicit_as = self.eat_keyword(KeywordId::As);
        if explicit_as || matches!(self.cur().kind, TokenKind::Identifier) {
            let alias = self.expect_identifier()?;
            self.set_secondary_text(node, Text::borrowed(alias.text));
            self.set_flag(node, flags::HAS_ALIAS);
            if self.at_delimiter(DelimiterKind::LParen) {
                let cols = self.parse_name_list_in_parens(NodeKind::ColumnAliasList)?;
                self.attach(node, cols);
            }
        }
        Ok(node)
    }

    pub(crate) fn parse_where_clause(&mut self) -> Result<NodeId, ParseError> {
        self.trace_production("where_clause");
        let marker = self.mark();
        self.expect_keyword(KeywordId::Where)?;
        let _ctx = self.push_context(ContextHint::WhereClause);
        let expr = self.parse_expr(0)?;
        let node = self.finish(marker, NodeKind::WhereClause);
        self.attach(node, expr);
        Ok(node)
    }

    pub(crate) fn parse_having_clause(&mut self) -> Result<NodeId, ParseError> {
        self.trace_production("having_clause");
        let marker = self.mark();
        self.expect_keyword(KeywordId::Having)?;
        let _ctx = self.push_context(ContextHint::HavingClause);
        let expr = self.parse_expr(0)?;
        let node = self.finish(marker, NodeKind::HavingClause);
        self.attach(node, expr);
        Ok(node)
    }

    pub(crate) fn parse_group_by_clause(&mut self) -> Result<NodeId, ParseError> {
        self.trace_production("group_by_clause");
        let marker = self.mark();
        self.expect_keyword(KeywordId::Group)?;
        self.expect_keyword(KeywordId::By)?;
        let _ctx = self.push_context(ContextHint::GroupByClause);
        let mut items = Vec::new();
        loop {
            items.push(self.parse_group_by_item()?);
            if !self.eat_delimiter(DelimiterKind::Comma) {
                break;
            }
        }
        let node = self.finish(marker, NodeKind::GroupByClause);
        self.attach_all(node, items);
        Ok(node)
    }

    fn parse_group_by_item(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        if self.eat_keyword(KeywordId::Cube) {
            let exprs = self.parse_expr_list_in_parens()?;
            let node = self.finish(marker, NodeKind::Cube);
            self.attach_all(node, exprs);
            return Ok(node);
        }
        if self.eat_keyword(KeywordId::Rollup) {
            let exprs = self.parse_expr_list_in_parens()?;
            let node = self.finish(marker, NodeKind::Rollup);
            self.attach_all(node, exprs);
            return Ok(node);
        }
        if self.eat_keyword(KeywordId::Grouping) {
            self.expect_keyword(KeywordId::Sets)?;
            self.expect_lparen()?;
            let mut sets = Vec::new();
            loop {
                let set_marker = self.mark();
                let exprs = self.parse_expr_list_in_parens()?;
                let set_node = self.finish(set_marker, NodeKind::ExprList);
                self.attach_all(set_node, exprs);
                sets.push(set_node);
                if !self.eat_delimiter(DelimiterKind::Comma) {
                    break;
                }
            }
            self.expect_rparen()?;
            let node = self.finish(marker, NodeKind::GroupingSets);
            self.attach_all(node, sets);
            return Ok(node);
        }
        self.parse_expr(0)
    }

    pub(crate) fn parse_expr_list_in_parens(&mut self) -> Result<Vec<NodeId>, ParseError> {
        self.expect_lparen()?;
        let mut exprs = Vec::new();
        if !self.at_delimiter(DelimiterKind::RParen) {
            loop {
                exprs.push(self.parse_expr(0)?);
                if !self.eat_delimiter(DelimiterKind::Comma) {
                    break;
                }
            }
        }
        self.expect_rparen()?;
        Ok(exprs)
    }

    pub(crate) fn parse_name_list_in_parens(&mut self, kind: NodeKind) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        self.expect_lparen()?;
        let mut names = Vec::new();
        loop {
            let name_marker = self.mark();
            let tok = self.expect_identifier()?;
            let item = self.finish_with(name_marker, NodeKind::Identifier, ContextHint::Unknown, |n| {
                n.primary_text = Some(Text::borrowed(tok.text));
            });
            names.push(item);
            if !self.eat_delimiter(DelimiterKind::Comma) {
                break;
            }
        }
        self.expect_rparen()?;
        let node = self.finish(marker, kind);
        self.attach_all(node, names);
        Ok(node)
    }

    pub(crate) fn parse_order_by_clause(&mut self) -> Result<NodeId, ParseError> {
        self.trace_production("order_by_clause");
        let marker = self.mark();
        self.expect_keyword(KeywordId::Order)?;
        self.expect_keyword(KeywordId::By)?;
        let _ctx = self.push_context(ContextHint::OrderByClause);
        let mut items = Vec::new();
        loop {
            items.push(self.parse_order_by_item()?);
            if !self.eat_delimiter(DelimiterKind::Comma) {
                break;
            }
        }
        let node = self.finish(marker, NodeKind::OrderByClause);
        self.attach_all(node, items);
        Ok(node)
    }

    fn parse_order_by_item(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        let expr = self.parse_expr(0)?;
        let desc = if self.eat_keyword(KeywordId::Asc) {
            false
        } else {
            self.eat_keyword(KeywordId::Desc)
        };
        let nulls_first = if self.eat_keyword(KeywordId::Nulls) {
            if self.eat_keyword(KeywordId::First) {
                Some(true)
            } else {
                self.expect_keyword(KeywordId::Last)?;
                Some(false)
            }
        } else {
            None
        };
        let node = self.finish(marker, NodeKind::OrderByItem);
        self.attach(node, expr);
        if desc {
            self.set_semantic_flag(node, semantic_flags::DESC);
        }
        match nulls_first {
            Some(true) => self.set_semantic_flag(node, semantic_flags::NULLS_FIRST),
            Some(false) => self.set_semantic_flag(node, semantic_flags::NULLS_LAST),
            None => {}
        }
        Ok(node)
    }

    pub(crate) fn parse_limit_clause(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        let mut limit_expr = None;
        let mut offset_expr = None;
        if self.eat_keyword(KeywordId::Limit) {
            limit_expr = Some(self.parse_expr(0)?);
        }
        if self.eat_keyword(KeywordId::Offset) {
            offset_expr = Some(self.parse_expr(0)?);
        }
        if limit_expr.is_none() && offset_expr.is_none() {
            return Err(self.unexpected("LIMIT or OFFSET"));
        }
        let node = self.finish(marker, NodeKind::LimitClause);
        match (limit_expr, offset_expr) {
            (Some(l), Some(o)) => {
                self.attach(node, l);
                self.attach(node, o);
            }
            (Some(l), None) => self.attach(node, l),
            (None, Some(o)) => {
                self.attach(node, o);
                self.set_flag(node, flags::OFFSET_ONLY);
            }
            (None, None) => unreachable!(),
        }
        Ok(node)
    }

    pub(crate) fn parse_window_clause(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        self.expect_keyword(KeywordId::Window)?;
        let mut defs = Vec::new();
        loop {
            let def_marker = self.mark();
            let name = self.expect_identifier()?;
            self.expect_keyword(KeywordId::As)?;
            let spec = self.parse_window_spec_body()?;
            let def_node = self.finish(def_marker, NodeKind::WindowDef);
            self.set_primary_text(def_node, Text::borrowed(name.text));
            self.attach(def_node, spec);
            defs.push(def_node);
            if !self.eat_delimiter(DelimiterKind::Comma) {
                break;
            }
        }
        let node = self.finish(marker, NodeKind::WindowClause);
        self.attach_all(node, defs);
        Ok(node)
    }

    pub(crate) fn parse_returning_clause(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        self.expect_keyword(KeywordId::Returning)?;
        let mut items = Vec::new();
        loop {
            items.push(self.parse_select_item()?);
            if !self.eat_delimiter(DelimiterKind::Comma) {
                break;
            }
        }
        let node = self.finish(marker, NodeKind::ReturningClause);
        self.attach_all(node, items);
        Ok(node)
    }

    pub(crate) fn parse_on_conflict_clause(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        self.expect_keyword(KeywordId::On)?;
        self.expect_keyword(KeywordId::Conflict)?;
        let target = if self.at_delimiter(DelimiterKind::LParen) {
            Some(self.parse_name_list_in_parens(NodeKind::NameList)?)
        } else {
            None
        };
        self.expect_keyword(KeywordId::Do)?;
        let node = self.finish(marker, NodeKind::OnConflictClause);
        self.attach_opt(node, target);
        if self.eat_keyword(KeywordId::Nothing) {
            self.set_flag(node, flags::DO_NOTHING);
        } else {
            self.expect_keyword(KeywordId::Update)?;
            self.expect_keyword(KeywordId::Set)?;
            let assignments = self.parse_assignment_list()?;
            self.attach(node, assignments);
            if self.eat_keyword(KeywordId::Where) {
                let _ctx = self.push_context(ContextHint::WhereClause);
                let pred = self.parse_expr(0)?;
                let where_marker = self.mark();
                let where_node = self.finish(where_marker, NodeKind::WhereClause);
                self.attach(where_node, pred);
                self.attach(node, where_node);
            }
        }
        Ok(node)
    }

    pub(crate) fn parse_assignment_list(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        let mut assigns = Vec::new();
        loop {
            let a_marker = self.mark();
            let col = self.expect_identifier()?;
            self.expect_operator(OperatorKind::Eq)?;
            let value = self.parse_expr(0)?;
            let a_node = self.finish(a_marker, NodeKind::Assignment);
            self.set_primary_text(a_node, Text::borrowed(col.text));
            self.attach(a_node, value);
            assigns.push(a_node);
            if !self.eat_delimiter(DelimiterKind::Comma) {
                break;
            }
        }
        let node = self.finish(marker, NodeKind::AssignmentList);
        self.attach_all(node, assigns);
        Ok(node)
    }

    /// `FROM`-shaped table-reference list reused by `UPDATE ... FROM` and
    /// `DELETE ... USING` extensions.
    pub(crate) fn parse_from_or_using_extension(&mut self, kind: NodeKind) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        let refs = self.parse_table_reference_list()?;
        let node = self.finish(marker, kind);
        self.attach_all(node, refs);
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    #[test]
    fn from_clause_with_join_on() {
        let mut parser = Parser::with_defaults();
        let ast = parser.parse("SELECT * FROM a JOIN b ON a.id = b.id").unwrap();
        let select = ast.root();
        let from = ast.children(select).nth(1).unwrap();
        assert_eq!(ast.node(from).kind, NodeKind::FromClause);
        let join = ast.children(from).next().unwrap();
        assert_eq!(ast.node(join).kind, NodeKind::JoinClause);
        assert_eq!(ast.node(join).primary_text.as_ref().unwrap().as_str(), "INNER");
    }

    #[test]
    fn order_by_desc_sets_flag() {
        let mut parser = Parser::with_defaults();
        let ast = parser.parse("SELECT a FROM t ORDER BY a DESC").unwrap();
        let select = ast.root();
        let order_by = ast.children(select).last().unwrap();
        assert_eq!(ast.node(order_by).kind, NodeKind::OrderByClause);
        let item = ast.children(order_by).next().unwrap();
        assert!(ast.node(item).semantic_flags.has(semantic_flags::DESC));
    }

    #[test]
    fn group_by_cube_produces_cube_node() {
        let mut parser = Parser::with_defaults();
        let ast = parser.parse("SELECT a FROM t GROUP BY CUBE(a, b)").unwrap();
        let select = ast.root();
        let group_by = ast.children(select).find(|&id| ast.node(id).kind == NodeKind::GroupByClause).unwrap();
        let item = ast.children(group_by).next().unwrap();
        assert_eq!(ast.node(item).kind, NodeKind::Cube);
        assert_eq!(ast.node(item).child_count, 2);
    }

    #[test]
    fn limit_offset_only_sets_flag() {
        let mut parser = Parser::with_defaults();
        let ast = parser.parse("SELECT a FROM t OFFSET 5").unwrap();
        let select = ast.root();
        let limit = ast.children(select).last().unwrap();
        assert_eq!(ast.node(limit).kind, NodeKind::LimitClause);
        assert!(ast.node(limit).flags.has(flags::OFFSET_ONLY));
    }
}
