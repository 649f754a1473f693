//! Top-level statement grammar: `WITH`/set operations, SELECT's own clause
//! sequence, the DML trio, the DDL family, transaction control, and the
//! fallback utility statements. See `SPEC_FULL.md` §4.5.

use super::{Marker, Parser};
use crate::ast::{flags, semantic_flags, ContextHint, NodeId, NodeKind, Text};
use crate::error::ParseError;
use crate::tokenizer::{DelimiterKind, KeywordId, OperatorKind, TokenKind};

impl<'input> Parser<'input> {
    // ---- WITH / set operations ----

    pub(crate) fn parse_with_or_set_op_chain(&mut self) -> Result<NodeId, ParseError> {
        if self.at_keyword(KeywordId::With) {
            return self.parse_with_or_select();
        }
        self.parse_set_op_chain()
    }

    pub(crate) fn parse_with_or_select(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        self.expect_keyword(KeywordId::With)?;
        let recursive = self.eat_keyword(KeywordId::Recursive);
        let mut ctes = Vec::new();
        loop {
            ctes.push(self.parse_cte_definition()?);
            if !self.eat_delimiter(DelimiterKind::Comma) {
                break;
            }
        }
        let with_node = self.finish(marker, NodeKind::WithClause);
        self.attach_all(with_node, ctes);
        if recursive {
            self.set_flag(with_node, flags::RECURSIVE);
        }
        let body = self.parse_set_op_chain()?;
        self.attach_first(body, with_node);
        Ok(body)
    }

    fn parse_cte_definition(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        let name = self.expect_identifier()?;
        let columns = if self.at_delimiter(DelimiterKind::LParen) {
            Some(self.parse_name_list_in_parens(NodeKind::ColumnAliasList)?)
        } else {
            None
        };
        self.expect_keyword(KeywordId::As)?;
        self.expect_lparen()?;
        let body = self.parse_with_or_set_op_chain()?;
        self.expect_rparen()?;
        let node = self.finish(marker, NodeKind::CteDefinition);
        self.set_primary_text(node, Text::borrowed(name.text));
        self.attach_opt(node, columns);
        self.attach(node, body);
        Ok(node)
    }

    pub(crate) fn parse_set_op_chain(&mut self) -> Result<NodeId, ParseError> {
        let start = self.mark();
        let mut left = self.parse_select_or_values_primary()?;
        loop {
            let op_text = if self.eat_keyword(KeywordId::Union) {
                "UNION"
            } else if self.eat_keyword(KeywordId::Intersect) {
                "INTERSECT"
            } else if self.eat_keyword(KeywordId::Except) {
                "EXCEPT"
            } else {
                break;
            };
            let all = self.eat_keyword(KeywordId::All);
            if !all {
                self.eat_keyword(KeywordId::Distinct);
            }
            let right = self.parse_select_or_values_primary()?;
            let node = self.finish(start, NodeKind::UnionStmt);
            self.set_primary_text(node, Text::borrowed(op_text));
            self.attach(node, left);
            self.attach(node, right);
            if all {
                self.set_flag(node, flags::ALL);
            }
            left = node;
        }
        Ok(left)
    }

    fn parse_select_or_values_primary(&mut self) -> Result<NodeId, ParseError> {
        if self.at_keyword(KeywordId::Values) {
            return self.parse_values_stmt();
        }
        if self.at_delimiter(DelimiterKind::LParen) {
            let marker = self.mark();
            self.expect_lparen()?;
            let inner = self.parse_set_op_chain()?;
            self.expect_rparen()?;
            let _ = marker;
            return Ok(inner);
        }
        self.parse_select_stmt()
    }

    fn parse_values_stmt(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        self.expect_keyword(KeywordId::Values)?;
        let mut rows = Vec::new();
        loop {
            let row_marker = self.mark();
            let exprs = self.parse_expr_list_in_parens()?;
            let row = self.finish(row_marker, NodeKind::RowLiteral);
            self.attach_all(row, exprs);
            rows.push(row);
            if !self.eat_delimiter(DelimiterKind::Comma) {
                break;
            }
        }
        let node = self.finish(marker, NodeKind::ValuesStmt);
        self.attach_all(node, rows);
        Ok(node)
    }

    // ---- SELECT ----

    fn parse_select_stmt(&mut self) -> Result<NodeId, ParseError> {
        self.trace_production("select_stmt");
        let marker = self.mark();
        self.expect_keyword(KeywordId::Select)?;
        let distinct = self.eat_keyword(KeywordId::Distinct);
        let all = if !distinct { self.eat_keyword(KeywordId::All) } else { false };
        let select_list = self.parse_select_list()?;
        let from = if self.at_keyword(KeywordId::From) { Some(self.parse_from_clause()?) } else { None };
        let where_clause = if self.at_keyword(KeywordId::Where) { Some(self.parse_where_clause()?) } else { None };
        let group_by = if self.at_keyword(KeywordId::Group) { Some(self.parse_group_by_clause()?) } else { None };
        let having = if self.at_keyword(KeywordId::Having) { Some(self.parse_having_clause()?) } else { None };
        let window = if self.at_keyword(KeywordId::Window) { Some(self.parse_window_clause()?) } else { None };
        let order_by = if self.at_keyword(KeywordId::Order) { Some(self.parse_order_by_clause()?) } else { None };
        let limit = if self.at_keyword(KeywordId::Limit) || self.at_keyword(KeywordId::Offset) {
            Some(self.parse_limit_clause()?)
        } else {
            None
        };
        let node = self.finish(marker, NodeKind::SelectStmt);
        self.attach(node, select_list);
        self.attach_opt(node, from);
        self.attach_opt(node, where_clause);
        self.attach_opt(node, group_by);
        self.attach_opt(node, having);
        self.attach_opt(node, window);
        self.attach_opt(node, order_by);
        self.attach_opt(node, limit);
        if distinct {
            self.set_flag(node, flags::DISTINCT);
        }
        if all {
            self.set_flag(node, flags::ALL);
        }
        Ok(node)
    }

    fn parse_select_list(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        let _ctx = self.push_context(ContextHint::SelectList);
        let mut items = Vec::new();
        loop {
            items.push(self.parse_select_item()?);
            if !self.eat_delimiter(DelimiterKind::Comma) {
                break;
            }
        }
        let node = self.finish(marker, NodeKind::SelectList);
        self.attach_all(node, items);
        Ok(node)
    }

    pub(crate) fn parse_select_item(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        if self.at_operator(OperatorKind::Star) {
            self.bump();
            return Ok(self.finish(marker, NodeKind::Star));
        }
        if matches!(self.cur().kind, TokenKind::Identifier | TokenKind::QuotedIdentifier)
            && matches!(self.peek().kind, TokenKind::Delimiter(DelimiterKind::Dot))
            && matches!(self.peek_n(2).kind, TokenKind::Operator(OperatorKind::Star))
        {
            let qualifier = self.expect_identifier()?;
            self.expect_delimiter(DelimiterKind::Dot)?;
            self.expect_operator(OperatorKind::Star)?;
            let node = self.finish(marker, NodeKind::Star);
            self.set_schema_name(node, Text::borrowed(qualifier.text));
            return Ok(node);
        }
        let expr = self.parse_expr(0)?;
        let alias = if self.eat_keyword(KeywordId::As) {
            Some(self.expect_identifier()?)
        } else if matches!(self.cur().kind, TokenKind::Identifier) {
            Some(self.expect_identifier()?)
        } else {
            None
        };
        let node = self.finish(marker, NodeKind::SelectItem);
        self.attach(node, expr);
        if let Some(alias) = alias {
            self.set_secondary_text(node, Text::borrowed(alias.text));
            self.set_flag(node, flags::HAS_ALIAS);
        }
        Ok(node)
    }

    // ---- DML ----

    pub(crate) fn parse_insert(&mut self) -> Result<NodeId, ParseError> {
        self.trace_production("insert_stmt");
        let marker = self.mark();
        self.expect_keyword(KeywordId::Insert)?;
        self.expect_keyword(KeywordId::Into)?;
        let table = self.parse_table_name_ref()?;
        let columns = if self.at_delimiter(DelimiterKind::LParen) {
            Some(self.parse_name_list_in_parens(NodeKind::ColumnAliasList)?)
        } else {
            None
        };
        let source = if self.eat_keyword(KeywordId::Default) {
            self.expect_keyword(KeywordId::Values)?;
            None
        } else {
            Some(self.parse_with_or_set_op_chain()?)
        };
        let on_conflict = if self.at_keyword(KeywordId::On) { Some(self.parse_on_conflict_clause()?) } else { None };
        let returning = if self.at_keyword(KeywordId::Returning) { Some(self.parse_returning_clause()?) } else { None };
        let node = self.finish(marker, NodeKind::InsertStmt);
        self.attach(node, table);
        self.attach_opt(node, columns);
        self.attach_opt(node, source);
        self.attach_opt(node, on_conflict);
        self.attach_opt(node, returning);
        Ok(node)
    }

    pub(crate) fn parse_update(&mut self) -> Result<NodeId, ParseError> {
        self.trace_production("update_stmt");
        let marker = self.mark();
        self.expect_keyword(KeywordId::Update)?;
        let table = self.parse_table_name_ref()?;
        let table = self.parse_optional_alias(table)?;
        self.expect_keyword(KeywordId::Set)?;
        let assignments = self.parse_assignment_list()?;
        let from = if self.at_keyword(KeywordId::From) { Some(self.parse_from_clause()?) } else { None };
        let where_clause = if self.at_keyword(KeywordId::Where) { Some(self.parse_where_clause()?) } else { None };
        let returning = if self.at_keyword(KeywordId::Returning) { Some(self.parse_returning_clause()?) } else { None };
        let node = self.finish(marker, NodeKind::UpdateStmt);
        self.attach(node, table);
        self.attach(node, assignments);
        self.attach_opt(node, from);
        self.attach_opt(node, where_clause);
        self.attach_opt(node, returning);
        Ok(node)
    }

    pub(crate) fn parse_delete(&mut self) -> Result<NodeId, ParseError> {
        self.trace_production("delete_stmt");
        let marker = self.mark();
        self.expect_keyword(KeywordId::Delete)?;
        self.expect_keyword(KeywordId::From)?;
        let table = self.parse_table_name_ref()?;
        let table = self.parse_optional_alias(table)?;
        let using = if self.eat_keyword(KeywordId::Using) {
            Some(self.parse_from_or_using_extension(NodeKind::UsingClause)?)
        } else {
            None
        };
        let where_clause = if self.at_keyword(KeywordId::Where) { Some(self.parse_where_clause()?) } else { None };
        let returning = if self.at_keyword(KeywordId::Returning) { Some(self.parse_returning_clause()?) } else { None };
        let node = self.finish(marker, NodeKind::DeleteStmt);
        self.attach(node, table);
        self.attach_opt(node, using);
        self.attach_opt(node, where_clause);
        self.attach_opt(node, returning);
        Ok(node)
    }

    // ---- DDL: CREATE ----

    pub(crate) fn parse_create(&mut self) -> Result<NodeId, ParseError> {
        self.trace_production("create_stmt");
        let marker = self.mark();
        self.expect_keyword(KeywordId::Create)?;
        let or_replace = if self.eat_keyword(KeywordId::Or) {
            self.expect_keyword(KeywordId::Replace)?;
            true
        } else {
            false
        };
        let temporary = self.eat_keyword(KeywordId::Temporary);
        if self.eat_keyword(KeywordId::Unique) {
            self.expect_keyword(KeywordId::Index)?;
            return self.parse_create_index(marker, or_replace, true);
        }
        if self.eat_keyword(KeywordId::Table) {
            return self.parse_create_table(marker, or_replace, temporary);
        }
        if self.eat_keyword(KeywordId::Index) {
            return self.parse_create_index(marker, or_replace, false);
        }
        if self.eat_keyword(KeywordId::View) {
            return self.parse_create_view(marker, or_replace, temporary);
        }
        if self.eat_keyword(KeywordId::Trigger) {
            return self.parse_create_trigger(marker, or_replace);
        }
        if self.eat_keyword(KeywordId::Schema) {
            return self.parse_create_schema(marker);
        }
        Err(self.unexpected("TABLE, INDEX, VIEW, TRIGGER, or SCHEMA"))
    }

    fn parse_if_not_exists(&mut self) -> Result<bool, ParseError> {
        if self.eat_keyword(KeywordId::If) {
            self.expect_keyword(KeywordId::Not)?;
            self.expect_keyword(KeywordId::Exists)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn parse_create_table(&mut self, marker: Marker, or_replace: bool, temporary: bool) -> Result<NodeId, ParseError> {
        let if_not_exists = self.parse_if_not_exists()?;
        let table = self.parse_table_name_ref()?;
        self.expect_lparen()?;
        let mut items = Vec::new();
        loop {
            items.push(self.parse_table_element()?);
            if !self.eat_delimiter(DelimiterKind::Comma) {
                break;
            }
        }
        self.expect_rparen()?;
        let node = self.finish(marker, NodeKind::CreateTableStmt);
        self.attach(node, table);
        self.attach_all(node, items);
        if or_replace {
            self.set_flag(node, flags::OR_REPLACE);
        }
        if temporary {
            self.set_flag(node, flags::TEMPORARY);
        }
        if if_not_exists {
            self.set_flag(node, flags::IF_NOT_EXISTS);
        }
        Ok(node)
    }

    fn parse_table_element(&mut self) -> Result<NodeId, ParseError> {
        if self.at_any_keyword(&[KeywordId::Primary, KeywordId::Foreign, KeywordId::Unique, KeywordId::Check, KeywordId::Constraint]) {
            return self.parse_table_constraint();
        }
        self.parse_column_def()
    }

    fn parse_column_def(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        let name = self.expect_identifier()?;
        let data_type = self.parse_data_type()?;
        let mut constraints = Vec::new();
        while let Some(c) = self.try_parse_column_constraint()? {
            constraints.push(c);
        }
        let node = self.finish(marker, NodeKind::ColumnDef);
        self.set_primary_text(node, Text::borrowed(name.text));
        self.attach(node, data_type);
        self.attach_all(node, constraints);
        Ok(node)
    }

    pub(crate) fn parse_data_type(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        let name = self.expect_identifier()?;
        let args = if self.at_delimiter(DelimiterKind::LParen) { self.parse_expr_list_in_parens()? } else { Vec::new() };
        let node = self.finish(marker, NodeKind::DataType);
        self.set_primary_text(node, Text::borrowed(name.text));
        self.attach_all(node, args);
        Ok(node)
    }

    fn try_parse_column_constraint(&mut self) -> Result<Option<NodeId>, ParseError> {
        let marker = self.mark();
        if self.eat_keyword(KeywordId::Not) {
            self.expect_keyword(KeywordId::Null)?;
            let node = self.finish(marker, NodeKind::ColumnConstraint);
            self.set_primary_text(node, Text::borrowed("NOT NULL"));
            return Ok(Some(node));
        }
        if self.eat_keyword(KeywordId::Null) {
            let node = self.finish(marker, NodeKind::ColumnConstraint);
            self.set_primary_text(node, Text::borrowed("NULL"));
            return Ok(Some(node));
        }
        if self.eat_keyword(KeywordId::Primary) {
            self.expect_keyword(KeywordId::Key)?;
            let node = self.finish(marker, NodeKind::ColumnConstraint);
            self.set_primary_text(node, Text::borrowed("PRIMARY KEY"));
            return Ok(Some(node));
        }
        if self.eat_keyword(KeywordId::Unique) {
            let node = self.finish(marker, NodeKind::ColumnConstraint);
            self.set_primary_text(node, Text::borrowed("UNIQUE"));
            return Ok(Some(node));
        }
        if self.eat_keyword(KeywordId::Default) {
            let expr = self.parse_expr(0)?;
            let node = self.finish(marker, NodeKind::ColumnConstraint);
            self.set_primary_text(node, Text::borrowed("DEFAULT"));
            self.attach(node, expr);
            return Ok(Some(node));
        }
        if self.eat_keyword(KeywordId::References) {
            let table = self.parse_table_name_ref()?;
            let cols = if self.at_delimiter(DelimiterKind::LParen) {
                Some(self.parse_name_list_in_parens(NodeKind::ColumnAliasList)?)
            } else {
                None
            };
            let node = self.finish(marker, NodeKind::ColumnConstraint);
            self.set_primary_text(node, Text::borrowed("REFERENCES"));
            self.attach(node, table);
            self.attach_opt(node, cols);
            return Ok(Some(node));
        }
        if self.eat_keyword(KeywordId::Check) {
            self.expect_lparen()?;
            let expr = self.parse_expr(0)?;
            self.expect_rparen()?;
            let node = self.finish(marker, NodeKind::ColumnConstraint);
            self.set_primary_text(node, Text::borrowed("CHECK"));
            self.attach(node, expr);
            return Ok(Some(node));
        }
        if self.eat_keyword(KeywordId::Collate) {
            let name = self.expect_identifier()?;
            let node = self.finish(marker, NodeKind::ColumnConstraint);
            self.set_primary_text(node, Text::borrowed("COLLATE"));
            self.set_secondary_text(node, Text::borrowed(name.text));
            return Ok(Some(node));
        }
        Ok(None)
    }

    fn parse_table_constraint(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        let constraint_name = if self.eat_keyword(KeywordId::Constraint) { Some(self.expect_identifier()?) } else { None };

        let label;
        let mut cols = None;
        let mut fk_table = None;
        let mut fk_cols = None;
        let mut check_expr = None;

        if self.eat_keyword(KeywordId::Primary) {
            self.expect_keyword(KeywordId::Key)?;
            cols = Some(self.parse_name_list_in_parens(NodeKind::ColumnAliasList)?);
            label = "PRIMARY KEY";
        } else if self.eat_keyword(KeywordId::Unique) {
            cols = Some(self.parse_name_list_in_parens(NodeKind::ColumnAliasList)?);
            label = "UNIQUE";
        } else if self.eat_keyword(KeywordId::Foreign) {
            self.expect_keyword(KeywordId::Key)?;
            cols = Some(self.parse_name_list_in_parens(NodeKind::ColumnAliasList)?);
            self.expect_keyword(KeywordId::References)?;
            fk_table = Some(self.parse_table_name_ref()?);
            if self.at_delimiter(DelimiterKind::LParen) {
                fk_cols = Some(self.parse_name_list_in_parens(NodeKind::ColumnAliasList)?);
            }
            label = "FOREIGN KEY";
        } else if self.eat_keyword(KeywordId::Check) {
            self.expect_lparen()?;
            check_expr = Some(self.parse_expr(0)?);
            self.expect_rparen()?;
            label = "CHECK";
        } else {
            return Err(self.unexpected("PRIMARY KEY, UNIQUE, FOREIGN KEY, or CHECK"));
        }

        let node = self.finish(marker, NodeKind::TableConstraint);
        self.set_primary_text(node, Text::borrowed(label));
        if let Some(name) = constraint_name {
            self.set_secondary_text(node, Text::borrowed(name.text));
        }
        self.attach_opt(node, cols);
        self.attach_opt(node, fk_table);
        self.attach_opt(node, fk_cols);
        self.attach_opt(node, check_expr);
        Ok(node)
    }

    fn parse_create_index(&mut self, marker: Marker, or_replace: bool, unique: bool) -> Result<NodeId, ParseError> {
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.expect_identifier()?;
        self.expect_keyword(KeywordId::On)?;
        let table = self.parse_table_name_ref()?;
        self.expect_lparen()?;
        let mut cols = Vec::new();
        loop {
            let col_marker = self.mark();
            let expr = self.parse_expr(0)?;
            let dir_desc = if self.eat_keyword(KeywordId::Desc) {
                true
            } else {
                self.eat_keyword(KeywordId::Asc);
                false
            };
            let col_node = self.finish(col_marker, NodeKind::IndexColumn);
            self.attach(col_node, expr);
            if dir_desc {
                self.set_semantic_flag(col_node, semantic_flags::DESC);
            }
            cols.push(col_node);
            if !self.eat_delimiter(DelimiterKind::Comma) {
                break;
            }
        }
        self.expect_rparen()?;
        let node = self.finish(marker, NodeKind::CreateIndexStmt);
        self.set_primary_text(node, Text::borrowed(name.text));
        self.attach(node, table);
        self.attach_all(node, cols);
        if unique {
            self.set_flag(node, flags::UNIQUE);
        }
        if or_replace {
            self.set_flag(node, flags::OR_REPLACE);
        }
        if if_not_exists {
            self.set_flag(node, flags::IF_NOT_EXISTS);
        }
        Ok(node)
    }

    fn parse_create_view(&mut self, marker: Marker, or_replace: bool, temporary: bool) -> Result<NodeId, ParseError> {
        let name = self.expect_identifier()?;
        let columns = if self.at_delimiter(DelimiterKind::LParen) {
            Some(self.parse_name_list_in_parens(NodeKind::ColumnAliasList)?)
        } else {
            None
        };
        self.expect_keyword(KeywordId::As)?;
        let body = self.parse_with_or_set_op_chain()?;
        let node = self.finish(marker, NodeKind::CreateViewStmt);
        self.set_primary_text(node, Text::borrowed(name.text));
        self.attach_opt(node, columns);
        self.attach(node, body);
        if or_replace {
            self.set_flag(node, flags::OR_REPLACE);
        }
        if temporary {
            self.set_flag(node, flags::TEMPORARY);
        }
        Ok(node)
    }

    fn parse_create_trigger(&mut self, marker: Marker, or_replace: bool) -> Result<NodeId, ParseError> {
        let name = self.expect_identifier()?;
        let timing = if self.eat_keyword(KeywordId::Before) {
            "BEFORE"
        } else if self.eat_keyword(KeywordId::After) {
            "AFTER"
        } else {
            self.expect_keyword(KeywordId::Instead)?;
            self.expect_keyword(KeywordId::Of)?;
            "INSTEAD OF"
        };
        let event = if self.eat_keyword(KeywordId::Insert) {
            "INSERT"
        } else if self.eat_keyword(KeywordId::Update) {
            "UPDATE"
        } else if self.eat_keyword(KeywordId::Delete) {
            "DELETE"
        } else {
            return Err(self.unexpected("INSERT, UPDATE, or DELETE"));
        };
        self.expect_keyword(KeywordId::On)?;
        let table = self.parse_table_name_ref()?;
        let for_each_row = if self.eat_keyword(KeywordId::For) {
            self.expect_keyword(KeywordId::Each)?;
            if self.eat_keyword(KeywordId::Row) {
                true
            } else {
                self.expect_keyword(KeywordId::Statement)?;
                false
            }
        } else {
            false
        };
        self.expect_keyword(KeywordId::Begin)?;
        let mut body_stmts = Vec::new();
        while !self.at_keyword(KeywordId::End) {
            body_stmts.push(self.dispatch_statement()?);
            self.eat_delimiter(DelimiterKind::Semicolon);
        }
        self.expect_keyword(KeywordId::End)?;
        let node = self.finish(marker, NodeKind::CreateTriggerStmt);
        self.set_primary_text(node, Text::borrowed(name.text));
        self.set_secondary_text(node, Text::owned(&format!("{timing} {event}")));
        self.attach(node, table);
        self.attach_all(node, body_stmts);
        if or_replace {
            self.set_flag(node, flags::OR_REPLACE);
        }
        if for_each_row {
            self.set_semantic_flag(node, semantic_flags::FOR_EACH_ROW);
        }
        Ok(node)
    }

    fn parse_create_schema(&mut self, marker: Marker) -> Result<NodeId, ParseError> {
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.expect_identifier()?;
        let node = self.finish(marker, NodeKind::CreateSchemaStmt);
        self.set_primary_text(node, Text::borrowed(name.text));
        if if_not_exists {
            self.set_flag(node, flags::IF_NOT_EXISTS);
        }
        Ok(node)
    }

    // ---- DDL: DROP / ALTER ----

    pub(crate) fn parse_drop(&mut self) -> Result<NodeId, ParseError> {
        self.trace_production("drop_stmt");
        let marker = self.mark();
        self.expect_keyword(KeywordId::Drop)?;
        let object = if self.eat_keyword(KeywordId::Table) {
            "TABLE"
        } else if self.eat_keyword(KeywordId::Index) {
            "INDEX"
        } else if self.eat_keyword(KeywordId::View) {
            "VIEW"
        } else if self.eat_keyword(KeywordId::Trigger) {
            "TRIGGER"
        } else if self.eat_keyword(KeywordId::Schema) {
            "SCHEMA"
        } else {
            return Err(self.unexpected("TABLE, INDEX, VIEW, TRIGGER, or SCHEMA"));
        };
        let if_exists = if self.eat_keyword(KeywordId::If) {
            self.expect_keyword(KeywordId::Exists)?;
            true
        } else {
            false
        };
        let mut names = Vec::new();
        loop {
            names.push(self.parse_table_name_ref()?);
            if !self.eat_delimiter(DelimiterKind::Comma) {
                break;
            }
        }
        let cascade_restrict = if self.eat_keyword(KeywordId::Cascade) {
            Some(true)
        } else if self.eat_keyword(KeywordId::Restrict) {
            Some(false)
        } else {
            None
        };
        let node = self.finish(marker, NodeKind::DropStmt);
        self.set_primary_text(node, Text::borrowed(object));
        self.attach_all(node, names);
        if if_exists {
            self.set_flag(node, flags::IF_EXISTS);
        }
        match cascade_restrict {
            Some(true) => self.set_flag(node, flags::CASCADE),
            Some(false) => self.set_flag(node, flags::RESTRICT),
            None => {}
        }
        Ok(node)
    }

    pub(crate) fn parse_alter_table(&mut self) -> Result<NodeId, ParseError> {
        self.trace_production("alter_table_stmt");
        let marker = self.mark();
        self.expect_keyword(KeywordId::Alter)?;
        self.expect_keyword(KeywordId::Table)?;
        let table = self.parse_table_name_ref()?;
        let mut actions = Vec::new();
        loop {
            actions.push(self.parse_alter_action()?);
            if !self.eat_delimiter(DelimiterKind::Comma) {
                break;
            }
        }
        let node = self.finish(marker, NodeKind::AlterTableStmt);
        self.attach(node, table);
        self.attach_all(node, actions);
        Ok(node)
    }

    fn parse_alter_action(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        if self.eat_keyword(KeywordId::Add) {
            if self.eat_keyword(KeywordId::Column) {
                let col = self.parse_column_def()?;
                let node = self.finish(marker, NodeKind::AlterAction);
                self.set_primary_text(node, Text::borrowed("ADD COLUMN"));
                self.attach(node, col);
                return Ok(node);
            }
            let constraint = self.parse_table_constraint()?;
            let node = self.finish(marker, NodeKind::AlterAction);
            self.set_primary_text(node, Text::borrowed("ADD CONSTRAINT"));
            self.attach(node, constraint);
            return Ok(node);
        }
        if self.eat_keyword(KeywordId::Drop) {
            if self.eat_keyword(KeywordId::Column) {
                let name = self.expect_identifier()?;
                let node = self.finish(marker, NodeKind::AlterAction);
                self.set_primary_text(node, Text::borrowed("DROP COLUMN"));
                self.set_secondary_text(node, Text::borrowed(name.text));
                return Ok(node);
            }
            self.expect_keyword(KeywordId::Constraint)?;
            let name = self.expect_identifier()?;
            let node = self.finish(marker, NodeKind::AlterAction);
            self.set_primary_text(node, Text::borrowed("DROP CONSTRAINT"));
            self.set_secondary_text(node, Text::borrowed(name.text));
            return Ok(node);
        }
        if self.eat_keyword(KeywordId::Rename) {
            if self.eat_keyword(KeywordId::Column) {
                let from = self.expect_identifier()?;
                self.expect_keyword(KeywordId::To)?;
                let to = self.expect_identifier()?;
                let node = self.finish(marker, NodeKind::AlterAction);
                self.set_primary_text(node, Text::borrowed("RENAME COLUMN"));
                self.set_secondary_text(node, Text::owned(&format!("{} -> {}", from.text, to.text)));
                return Ok(node);
            }
            self.eat_keyword(KeywordId::To);
            let to = self.expect_identifier()?;
            let node = self.finish(marker, NodeKind::AlterAction);
            self.set_primary_text(node, Text::borrowed("RENAME TO"));
            self.set_secondary_text(node, Text::borrowed(to.text));
            return Ok(node);
        }
        if self.eat_keyword(KeywordId::Alter) {
            self.eat_keyword(KeywordId::Column);
            let name = self.expect_identifier()?;
            self.expect_keyword(KeywordId::Type)?;
            let data_type = self.parse_data_type()?;
            let node = self.finish(marker, NodeKind::AlterAction);
            self.set_primary_text(node, Text::borrowed("ALTER COLUMN TYPE"));
            self.set_secondary_text(node, Text::borrowed(name.text));
            self.attach(node, data_type);
            return Ok(node);
        }
        Err(self.unexpected("ADD, DROP, RENAME, or ALTER"))
    }

    // ---- Transaction control / EXPLAIN / SET / ATTACH / fallback utilities ----

    pub(crate) fn parse_transaction(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        if self.eat_keyword(KeywordId::Begin) || self.eat_keyword(KeywordId::Start) {
            self.eat_keyword(KeywordId::Transaction);
            let mode = if self.eat_keyword(KeywordId::Read) {
                if self.eat_keyword(KeywordId::Write) {
                    Some("READ WRITE")
                } else {
                    self.expect_keyword(KeywordId::Only)?;
                    Some("READ ONLY")
                }
            } else {
                None
            };
            let node = self.finish(marker, NodeKind::TransactionStmt);
            self.set_primary_text(node, Text::borrowed("BEGIN"));
            if let Some(m) = mode {
                self.set_secondary_text(node, Text::borrowed(m));
            }
            return Ok(node);
        }
        if self.eat_keyword(KeywordId::Commit) {
            let node = self.finish(marker, NodeKind::TransactionStmt);
            self.set_primary_text(node, Text::borrowed("COMMIT"));
            return Ok(node);
        }
        if self.eat_keyword(KeywordId::Rollback) {
            let savepoint = if self.eat_keyword(KeywordId::To) {
                self.eat_keyword(KeywordId::Savepoint);
                Some(self.expect_identifier()?)
            } else {
                None
            };
            let node = self.finish(marker, NodeKind::TransactionStmt);
            self.set_primary_text(node, Text::borrowed("ROLLBACK"));
            if let Some(sp) = savepoint {
                self.set_secondary_text(node, Text::borrowed(sp.text));
            }
            return Ok(node);
        }
        if self.eat_keyword(KeywordId::Savepoint) {
            let name = self.expect_identifier()?;
            let node = self.finish(marker, NodeKind::TransactionStmt);
            self.set_primary_text(node, Text::borrowed("SAVEPOINT"));
            self.set_secondary_text(node, Text::borrowed(name.text));
            return Ok(node);
        }
        if self.eat_keyword(KeywordId::Release) {
            self.eat_keyword(KeywordId::Savepoint);
            let name = self.expect_identifier()?;
            let node = self.finish(marker, NodeKind::TransactionStmt);
            self.set_primary_text(node, Text::borrowed("RELEASE"));
            self.set_secondary_text(node, Text::borrowed(name.text));
            return Ok(node);
        }
        Err(self.unexpected("BEGIN, COMMIT, ROLLBACK, SAVEPOINT, or RELEASE"))
    }

    pub(crate) fn parse_explain(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        self.expect_keyword(KeywordId::Explain)?;
        let analyze = self.eat_lexeme("analyze");
        let verbose = self.eat_lexeme("verbose");
        let inner = self.dispatch_statement()?;
        let node = self.finish(marker, NodeKind::ExplainStmt);
        self.attach(node, inner);
        if analyze {
            self.set_flag(node, flags::ANALYZE);
        }
        if verbose {
            self.set_flag(node, flags::VERBOSE);
        }
        Ok(node)
    }

    pub(crate) fn parse_set_stmt(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        self.expect_keyword(KeywordId::Set)?;
        let name = self.expect_identifier()?;
        if !self.eat_operator(OperatorKind::Eq) {
            self.expect_keyword(KeywordId::To)?;
        }
        let value = self.parse_expr(0)?;
        let node = self.finish(marker, NodeKind::SetStmt);
        self.set_primary_text(node, Text::borrowed(name.text));
        self.attach(node, value);
        Ok(node)
    }

    pub(crate) fn parse_attach(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        self.expect_keyword(KeywordId::Attach)?;
        self.eat_lexeme("database");
        let expr = self.parse_expr(0)?;
        self.expect_keyword(KeywordId::As)?;
        let name = self.expect_identifier()?;
        let node = self.finish(marker, NodeKind::AttachStmt);
        self.set_primary_text(node, Text::borrowed(name.text));
        self.attach(node, expr);
        Ok(node)
    }

    pub(crate) fn parse_detach(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        self.expect_keyword(KeywordId::Detach)?;
        self.eat_lexeme("database");
        let name = self.expect_identifier()?;
        let node = self.finish(marker, NodeKind::DetachStmt);
        self.set_primary_text(node, Text::borrowed(name.text));
        Ok(node)
    }

    pub(crate) fn parse_fallback_utility(&mut self, word: &str) -> Result<NodeId, ParseError> {
        match word {
            "truncate" => self.parse_truncate(),
            "vacuum" => self.parse_simple_utility(NodeKind::VacuumStmt),
            "analyze" => self.parse_simple_utility(NodeKind::AnalyzeStmt),
            "reindex" => self.parse_simple_utility(NodeKind::ReindexStmt),
            "pragma" => self.parse_pragma(),
            _ => Err(self.unexpected("a utility statement")),
        }
    }

    fn parse_truncate(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        self.expect_lexeme("truncate")?;
        self.eat_keyword(KeywordId::Table);
        let mut names = Vec::new();
        loop {
            names.push(self.parse_table_name_ref()?);
            if !self.eat_delimiter(DelimiterKind::Comma) {
                break;
            }
        }
        let mut restart_identity = false;
        if self.eat_lexeme("restart") {
            self.expect_lexeme("identity")?;
            restart_identity = true;
        } else if self.eat_lexeme("continue") {
            self.expect_lexeme("identity")?;
        }
        let cascade_restrict = if self.eat_keyword(KeywordId::Cascade) {
            Some(true)
        } else if self.eat_keyword(KeywordId::Restrict) {
            Some(false)
        } else {
            None
        };
        let node = self.finish(marker, NodeKind::TruncateStmt);
        self.attach_all(node, names);
        if restart_identity {
            self.set_flag(node, flags::RESTART_IDENTITY);
        }
        match cascade_restrict {
            Some(true) => self.set_flag(node, flags::CASCADE),
            Some(false) => self.set_flag(node, flags::RESTRICT),
            None => {}
        }
        Ok(node)
    }

    fn parse_simple_utility(&mut self, kind: NodeKind) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        self.bump();
        let target = if matches!(self.cur().kind, TokenKind::Identifier | TokenKind::QuotedIdentifier) {
            Some(self.parse_table_name_ref()?)
        } else {
            None
        };
        let node = self.finish(marker, kind);
        self.attach_opt(node, target);
        Ok(node)
    }

    fn parse_pragma(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        self.bump();
        let name = self.expect_identifier()?;
        let value = if self.eat_operator(OperatorKind::Eq) {
            Some(self.parse_expr(0)?)
        } else if self.at_delimiter(DelimiterKind::LParen) {
            self.expect_lparen()?;
            let e = self.parse_expr(0)?;
            self.expect_rparen()?;
            Some(e)
        } else {
            None
        };
        let node = self.finish(marker, NodeKind::PragmaStmt);
        self.set_primary_text(node, Text::borrowed(name.text));
        self.attach_opt(node, value);
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    #[test]
    fn select_one_parses_to_single_item_list() {
        let mut parser = Parser::with_defaults();
        let ast = parser.parse("SELECT 1").unwrap();
        let select = ast.root();
        assert_eq!(ast.node(select).kind, NodeKind::SelectStmt);
        let list = ast.children(select).next().unwrap();
        assert_eq!(ast.node(list).kind, NodeKind::SelectList);
        assert_eq!(ast.node(list).child_count, 1);
    }

    #[test]
    fn union_all_sets_flag_and_nests_left() {
        let mut parser = Parser::with_defaults();
        let ast = parser.parse("SELECT a FROM t UNION ALL SELECT b FROM u").unwrap();
        let root = ast.root();
        assert_eq!(ast.node(root).kind, NodeKind::UnionStmt);
        assert_eq!(ast.node(root).primary_text.as_ref().unwrap().as_str(), "UNION");
        assert!(ast.node(root).flags.has(flags::ALL));
    }

    #[test]
    fn recursive_cte_feeds_union_all() {
        let mut parser = Parser::with_defaults();
        let ast = parser
            .parse("WITH RECURSIVE t(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM t WHERE n < 5) SELECT n FROM t")
            .unwrap();
        let root = ast.root();
        assert_eq!(ast.node(root).kind, NodeKind::SelectStmt);
        let with_node = ast.children(root).next().unwrap();
        assert_eq!(ast.node(with_node).kind, NodeKind::WithClause);
        assert!(ast.node(with_node).flags.has(flags::RECURSIVE));
        let cte = ast.children(with_node).next().unwrap();
        assert_eq!(ast.node(cte).kind, NodeKind::CteDefinition);
    }

    #[test]
    fn insert_with_on_conflict_do_nothing() {
        let mut parser = Parser::with_defaults();
        let ast = parser.parse("INSERT INTO t (a, b) VALUES (1, 2) ON CONFLICT (a) DO NOTHING").unwrap();
        let root = ast.root();
        assert_eq!(ast.node(root).kind, NodeKind::InsertStmt);
        let on_conflict = ast.children(root).find(|&id| ast.node(id).kind == NodeKind::OnConflictClause).unwrap();
        assert!(ast.node(on_conflict).flags.has(flags::DO_NOTHING));
    }

    #[test]
    fn create_table_with_primary_key_and_check() {
        let mut parser = Parser::with_defaults();
        let ast = parser
            .parse("CREATE TABLE IF NOT EXISTS t (id INTEGER PRIMARY KEY, n INTEGER CHECK (n > 0))")
            .unwrap();
        let root = ast.root();
        assert_eq!(ast.node(root).kind, NodeKind::CreateTableStmt);
        assert!(ast.node(root).flags.has(flags::IF_NOT_EXISTS));
        let cols: Vec<NodeId> = ast.children(root).filter(|&id| ast.node(id).kind == NodeKind::ColumnDef).collect();
        assert_eq!(cols.len(), 2);
    }

    #[test]
    fn delete_using_and_truncate_restart_identity() {
        let mut parser = Parser::with_defaults();
        let ast = parser.parse("TRUNCATE TABLE t RESTART IDENTITY CASCADE").unwrap();
        let root = ast.root();
        assert_eq!(ast.node(root).kind, NodeKind::TruncateStmt);
        assert!(ast.node(root).flags.has(flags::RESTART_IDENTITY));
        assert!(ast.node(root).flags.has(flags::CASCADE));
    }
}
