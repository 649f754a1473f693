//! Pratt/precedence-climbing expression core. See `SPEC_FULL.md` §4.7.
//!
//! One `parse_expr(min_bp)` loop drives the whole ladder; each tier is
//! represented as a constant binding power rather than a table, since the
//! set of operators per tier is small and fixed.

use super::{unquote, Marker, Parser};
use crate::ast::{semantic_flags, ContextHint, NodeId, NodeKind, Text};
use crate::error::ParseError;
use crate::tokenizer::{DelimiterKind, KeywordId, OperatorKind, Token, TokenKind};

const OR_BP: u8 = 10;
const AND_BP: u8 = 20;
const NOT_PREFIX_BP: u8 = 25;
const COMPARISON_BP: u8 = 30;
const JSON_BP: u8 = 40;
const ADD_BP: u8 = 50;
const MUL_BP: u8 = 60;
const POW_BP: u8 = 70;
const CONCAT_BP: u8 = 80;
const UNARY_BP: u8 = 90;
const CAST_BP: u8 = 100;
const MEMBER_BP: u8 = 110;

enum InSource {
    List(Vec<NodeId>),
    Subquery(NodeId),
}

impl<'input> Parser<'input> {
    pub(crate) fn parse_expr(&mut self, min_bp: u8) -> Result<NodeId, ParseError> {
        let _guard = self.enter_depth()?;
        let start = self.mark();
        let mut lhs = self.parse_prefix(start)?;

        loop {
            if self.at_keyword(KeywordId::And) {
                if AND_BP < min_bp {
                    break;
                }
                self.bump();
                let rhs = self.parse_expr(AND_BP + 1)?;
                lhs = self.binary(start, lhs, "AND", rhs);
                continue;
            }
            if self.at_keyword(KeywordId::Or) {
                if OR_BP < min_bp {
                    break;
                }
                self.bump();
                let rhs = self.parse_expr(OR_BP + 1)?;
                lhs = self.binary(start, lhs, "OR", rhs);
                continue;
            }

            let negated = self.at_keyword(KeywordId::Not) && self.peek_begins_predicate();
            if negated || self.at_keyword(KeywordId::In) || self.at_any_keyword(&[KeywordId::Like, KeywordId::Ilike]) || self.at_keyword(KeywordId::Between) {
                if COMPARISON_BP < min_bp {
                    break;
                }
                if negated {
                    self.bump();
                }
                if self.eat_keyword(KeywordId::In) {
                    lhs = self.finish_in_expr(start, lhs, negated)?;
                    continue;
                }
                if self.eat_keyword(KeywordId::Between) {
                    lhs = self.finish_between_expr(start, lhs, negated)?;
                    continue;
                }
                lhs = self.finish_like_expr(start, lhs, negated)?;
                continue;
            }
            if self.at_keyword(KeywordId::Is) {
                if COMPARISON_BP < min_bp {
                    break;
                }
                self.bump();
                lhs = self.finish_is_expr(start, lhs)?;
                continue;
            }
            if self.at_comparison_operator() {
                if COMPARISON_BP < min_bp {
                    break;
                }
                let text = self.bump_comparison_operator_text();
                let rhs = self.parse_expr(COMPARISON_BP + 1)?;
                lhs = self.binary(start, lhs, text, rhs);
                continue;
            }
            if self.at_json_operator() {
                if JSON_BP < min_bp {
                    break;
                }
                let text = self.bump_json_operator_text();
                let rhs = self.parse_expr(JSON_BP + 1)?;
                lhs = self.binary(start, lhs, text, rhs);
                continue;
            }
            if self.at_add_operator() {
                if ADD_BP < min_bp {
                    break;
                }
                let text = self.bump_add_operator_text();
                let rhs = self.parse_expr(ADD_BP + 1)?;
                lhs = self.binary(start, lhs, text, rhs);
                continue;
            }
            if self.at_mul_operator() {
                if MUL_BP < min_bp {
                    break;
                }
                let text = self.bump_mul_operator_text();
                let rhs = self.parse_expr(MUL_BP + 1)?;
                lhs = self.binary(start, lhs, text, rhs);
                continue;
            }
            if self.at_operator(OperatorKind::Caret) {
                if POW_BP < min_bp {
                    break;
                }
                self.bump();
                let rhs = self.parse_expr(POW_BP)?;
                lhs = self.binary(start, lhs, "^", rhs);
                continue;
            }
            if self.at_operator(OperatorKind::Concat) {
                if CONCAT_BP < min_bp {
                    break;
                }
                self.bump();
                let rhs = self.parse_expr(CONCAT_BP + 1)?;
                lhs = self.binary(start, lhs, "||", rhs);
                continue;
            }
            if self.at_operator(OperatorKind::Cast) {
                if CAST_BP < min_bp {
                    break;
                }
                self.bump();
                let ty = self.parse_data_type()?;
                let node = self.finish(start, NodeKind::CastExpr);
                self.attach(node, lhs);
                self.attach(node, ty);
                lhs = node;
                continue;
            }
            if self.at_delimiter(DelimiterKind::Dot) {
                if MEMBER_BP < min_bp {
                    break;
                }
                self.bump();
                let field = self.expect_identifier()?;
                let node = self.finish(start, NodeKind::BinaryExpr);
                self.set_primary_text(node, Text::borrowed("."));
                self.set_secondary_text(node, Text::borrowed(field.text));
                self.attach(node, lhs);
                lhs = node;
                continue;
            }
            if self.at_delimiter(DelimiterKind::LBracket) {
                if MEMBER_BP < min_bp {
                    break;
                }
                self.bump();
                let index = self.parse_expr(0)?;
                self.expect_delimiter(DelimiterKind::RBracket)?;
                let node = self.finish(start, NodeKind::BinaryExpr);
                self.set_primary_text(node, Text::borrowed("[]"));
                self.attach(node, lhs);
                self.attach(node, index);
                lhs = node;
                continue;
            }
            break;
        }
        Ok(lhs)
    }

    fn parse_prefix(&mut self, start: Marker) -> Result<NodeId, ParseError> {
        if self.eat_keyword(KeywordId::Not) {
            let operand = self.parse_expr(NOT_PREFIX_BP)?;
            let node = self.finish(start, NodeKind::UnaryExpr);
            self.set_primary_text(node, Text::borrowed("NOT"));
            self.attach(node, operand);
            return Ok(node);
        }
        if self.eat_operator(OperatorKind::Minus) {
            let operand = self.parse_expr(UNARY_BP)?;
            let node = self.finish(start, NodeKind::UnaryExpr);
            self.set_primary_text(node, Text::borrowed("-"));
            self.attach(node, operand);
            return Ok(node);
        }
        if self.eat_operator(OperatorKind::Plus) {
            let operand = self.parse_expr(UNARY_BP)?;
            let node = self.finish(start, NodeKind::UnaryExpr);
            self.set_primary_text(node, Text::borrowed("+"));
            self.attach(node, operand);
            return Ok(node);
        }
        self.parse_primary(start)
    }

    fn parse_primary(&mut self, start: Marker) -> Result<NodeId, ParseError> {
        match self.cur().kind {
            TokenKind::Number => {
                let tok = self.bump();
                let kind = if tok.text.contains('.') || tok.text.contains(['e', 'E']) {
                    NodeKind::FloatLiteral
                } else {
                    NodeKind::IntegerLiteral
                };
                let node = self.finish(start, kind);
                self.set_primary_text(node, Text::borrowed(tok.text));
                Ok(node)
            }
            TokenKind::String => {
                let tok = self.bump();
                let node = self.finish(start, NodeKind::StringLiteral);
                self.set_primary_text(node, unquote(tok.text, '\''));
                Ok(node)
            }
            TokenKind::Parameter => {
                let tok = self.bump();
                let node = self.finish(start, NodeKind::Identifier);
                self.set_primary_text(node, Text::borrowed(tok.text));
                Ok(node)
            }
            TokenKind::Delimiter(DelimiterKind::LParen) => self.parse_paren_primary(start),
            TokenKind::Keyword => self.parse_keyword_primary(start),
            TokenKind::Identifier | TokenKind::QuotedIdentifier => self.parse_identifier_or_call(start),
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn parse_paren_primary(&mut self, start: Marker) -> Result<NodeId, ParseError> {
        self.expect_lparen()?;
        if self.at_keyword(KeywordId::Select) || self.at_keyword(KeywordId::With) || self.at_keyword(KeywordId::Values) {
            let body = self.parse_with_or_set_op_chain()?;
            self.expect_rparen()?;
            let node = self.finish(start, NodeKind::Subquery);
            self.attach(node, body);
            return Ok(node);
        }
        let first = self.parse_expr(0)?;
        if self.eat_delimiter(DelimiterKind::Comma) {
            let mut items = vec![first];
            loop {
                items.push(self.parse_expr(0)?);
                if !self.eat_delimiter(DelimiterKind::Comma) {
                    break;
                }
            }
            self.expect_rparen()?;
            let node = self.finish(start, NodeKind::RowLiteral);
            self.attach_all(node, items);
            return Ok(node);
        }
        self.expect_rparen()?;
        let node = self.finish(start, NodeKind::ParenExpr);
        self.attach(node, first);
        Ok(node)
    }

    fn parse_keyword_primary(&mut self, start: Marker) -> Result<NodeId, ParseError> {
        if self.eat_keyword(KeywordId::Case) {
            return self.parse_case_expr(start);
        }
        if self.eat_keyword(KeywordId::Cast) {
            return self.parse_cast_expr(start);
        }
        if self.eat_keyword(KeywordId::Extract) {
            return self.parse_extract_expr(start);
        }
        if self.eat_keyword(KeywordId::Exists) {
            self.expect_lparen()?;
            let body = self.parse_with_or_set_op_chain()?;
            self.expect_rparen()?;
            let sub = self.finish(start, NodeKind::Subquery);
            self.attach(sub, body);
            let node = self.finish(start, NodeKind::ExistsExpr);
            self.attach(node, sub);
            return Ok(node);
        }
        if self.eat_keyword(KeywordId::Array) {
            return self.parse_array_literal(start);
        }
        if self.eat_keyword(KeywordId::Interval) {
            return self.parse_interval_literal(start);
        }
        if self.eat_keyword(KeywordId::Row) {
            let exprs = self.parse_expr_list_in_parens()?;
            let node = self.finish(start, NodeKind::RowLiteral);
            self.attach_all(node, exprs);
            return Ok(node);
        }
        if self.eat_keyword(KeywordId::True) {
            let node = self.finish(start, NodeKind::BooleanLiteral);
            self.set_primary_text(node, Text::borrowed("true"));
            return Ok(node);
        }
        if self.eat_keyword(KeywordId::False) {
            let node = self.finish(start, NodeKind::BooleanLiteral);
            self.set_primary_text(node, Text::borrowed("false"));
            return Ok(node);
        }
        if self.eat_keyword(KeywordId::Null) {
            return Ok(self.finish(start, NodeKind::NullLiteral));
        }
        Err(self.unexpected("an expression"))
    }

    fn parse_identifier_or_call(&mut self, start: Marker) -> Result<NodeId, ParseError> {
        let first = self.expect_identifier()?;
        let (schema, name) = if self.eat_delimiter(DelimiterKind::Dot) {
            (Some(first), self.expect_identifier()?)
        } else {
            (None, first)
        };
        if self.at_delimiter(DelimiterKind::LParen) {
            return self.parse_function_call(start, schema, name);
        }
        let node = self.finish(start, NodeKind::ColumnRef);
        self.set_primary_text(node, Text::borrowed(name.text));
        if let Some(schema) = schema {
            self.set_schema_name(node, Text::borrowed(schema.text));
        }
        Ok(node)
    }

    fn parse_function_call(
        &mut self,
        start: Marker,
        schema: Option<Token<'input>>,
        name: Token<'input>,
    ) -> Result<NodeId, ParseError> {
        self.expect_lparen()?;
        let _ctx = self.push_context(ContextHint::FunctionArg);
        let distinct = self.eat_keyword(KeywordId::Distinct);
        if !distinct {
            self.eat_keyword(KeywordId::All);
        }
        let mut args = Vec::new();
        if self.at_operator(OperatorKind::Star) {
            self.bump();
            args.push(self.finish(start, NodeKind::Star));
        } else if !self.at_delimiter(DelimiterKind::RParen) {
            loop {
                args.push(self.parse_expr(0)?);
                if !self.eat_delimiter(DelimiterKind::Comma) {
                    break;
                }
            }
        }
        let order_by = if self.at_keyword(KeywordId::Order) { Some(self.parse_order_by_clause()?) } else { None };
        self.expect_rparen()?;

        let arg_list = self.finish(start, NodeKind::ArgumentList);
        self.attach_all(arg_list, args);
        self.attach_opt(arg_list, order_by);

        let filter = if self.eat_keyword(KeywordId::Filter) {
            self.expect_lparen()?;
            self.expect_keyword(KeywordId::Where)?;
            let pred = self.parse_expr(0)?;
            self.expect_rparen()?;
            let f_node = self.finish(start, NodeKind::FilterClause);
            self.attach(f_node, pred);
            Some(f_node)
        } else {
            None
        };

        let node = self.finish(start, NodeKind::FunctionCall);
        self.set_primary_text(node, Text::borrowed(name.text));
        if let Some(schema) = schema {
            self.set_schema_name(node, Text::borrowed(schema.text));
        }
        self.attach(node, arg_list);
        self.attach_opt(node, filter);
        if distinct && is_aggregate_name(name.text) {
            self.set_semantic_flag(node, semantic_flags::AGGREGATE_DISTINCT);
        }

        if self.eat_keyword(KeywordId::Over) {
            let window = self.parse_over_clause()?;
            self.attach(node, window);
            self.set_semantic_flag(node, semantic_flags::IS_WINDOW_FUNCTION);
        }
        Ok(node)
    }

    fn parse_over_clause(&mut self) -> Result<NodeId, ParseError> {
        if matches!(self.cur().kind, TokenKind::Identifier) {
            let marker = self.mark();
            let name = self.expect_identifier()?;
            let node = self.finish(marker, NodeKind::WindowSpec);
            self.set_primary_text(node, Text::borrowed(name.text));
            return Ok(node);
        }
        let marker = self.mark();
        self.expect_lparen()?;
        let inner = self.parse_window_spec_inner(marker)?;
        self.expect_rparen()?;
        Ok(inner)
    }

    pub(crate) fn parse_window_spec_body(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        self.expect_lparen()?;
        let node = self.parse_window_spec_inner(marker)?;
        self.expect_rparen()?;
        Ok(node)
    }

    fn parse_window_spec_inner(&mut self, marker: Marker) -> Result<NodeId, ParseError> {
        let base = if matches!(self.cur().kind, TokenKind::Identifier)
            && !self.at_keyword(KeywordId::Partition)
            && !self.at_keyword(KeywordId::Order)
        {
            Some(self.expect_identifier()?)
        } else {
            None
        };
        let partition_by = if self.eat_keyword(KeywordId::Partition) {
            self.expect_keyword(KeywordId::By)?;
            let p_marker = self.mark();
            let mut exprs = Vec::new();
            loop {
                exprs.push(self.parse_expr(0)?);
                if !self.eat_delimiter(DelimiterKind::Comma) {
                    break;
                }
            }
            let p_node = self.finish(p_marker, NodeKind::PartitionByClause);
            self.attach_all(p_node, exprs);
            Some(p_node)
        } else {
            None
        };
        let order_by = if self.at_keyword(KeywordId::Order) { Some(self.parse_order_by_clause()?) } else { None };
        let frame = if self.at_any_keyword(&[KeywordId::Rows, KeywordId::Range, KeywordId::Groups]) {
            Some(self.parse_frame_clause()?)
        } else {
            None
        };
        let node = self.finish(marker, NodeKind::WindowSpec);
        if let Some(b) = base {
            self.set_primary_text(node, Text::borrowed(b.text));
        }
        self.attach_opt(node, partition_by);
        self.attach_opt(node, order_by);
        self.attach_opt(node, frame);
        Ok(node)
    }

    fn parse_frame_clause(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        let unit = if self.eat_keyword(KeywordId::Rows) {
            "ROWS"
        } else if self.eat_keyword(KeywordId::Range) {
            "RANGE"
        } else {
            self.expect_keyword(KeywordId::Groups)?;
            "GROUPS"
        };
        self.eat_keyword(KeywordId::Between);
        let start_bound = self.parse_frame_bound()?;
        let end_bound = if self.eat_keyword(KeywordId::And) { Some(self.parse_frame_bound()?) } else { None };
        let node = self.finish(marker, NodeKind::FrameClause);
        self.set_primary_text(node, Text::borrowed(unit));
        self.attach(node, start_bound);
        self.attach_opt(node, end_bound);
        Ok(node)
    }

    fn parse_frame_bound(&mut self) -> Result<NodeId, ParseError> {
        let marker = self.mark();
        if self.eat_keyword(KeywordId::Unbounded) {
            let text = if self.eat_keyword(KeywordId::Preceding) {
                "UNBOUNDED PRECEDING"
            } else {
                self.expect_keyword(KeywordId::Following)?;
                "UNBOUNDED FOLLOWING"
            };
            let node = self.finish(marker, NodeKind::FrameBound);
            self.set_secondary_text(node, Text::borrowed(text));
            return Ok(node);
        }
        if self.eat_keyword(KeywordId::Current) {
            self.expect_keyword(KeywordId::Row)?;
            let node = self.finish(marker, NodeKind::FrameBound);
            self.set_secondary_text(node, Text::borrowed("CURRENT ROW"));
            return Ok(node);
        }
        let expr = self.parse_expr(0)?;
        let dir = if self.eat_keyword(KeywordId::Preceding) {
            "PRECEDING"
        } else {
            self.expect_keyword(KeywordId::Following)?;
            "FOLLOWING"
        };
        let node = self.finish(marker, NodeKind::FrameBound);
        self.set_secondary_text(node, Text::borrowed(dir));
        self.attach(node, expr);
        Ok(node)
    }

    fn parse_case_expr(&mut self, start: Marker) -> Result<NodeId, ParseError> {
        let _ctx = self.push_context(ContextHint::CaseExpression);
        let operand = if !self.at_keyword(KeywordId::When) { Some(self.parse_expr(0)?) } else { None };
        let mut whens = Vec::new();
        while self.eat_keyword(KeywordId::When) {
            let when_marker = self.mark();
            let cond = self.parse_expr(0)?;
            self.expect_keyword(KeywordId::Then)?;
            let result = self.parse_expr(0)?;
            let when_node = self.finish(when_marker, NodeKind::WhenClause);
            self.attach(when_node, cond);
            self.attach(when_node, result);
            whens.push(when_node);
        }
        if whens.is_empty() {
            return Err(self.missing_clause("at least one WHEN clause"));
        }
        let else_branch = if self.eat_keyword(KeywordId::Else) { Some(self.parse_expr(0)?) } else { None };
        self.expect_keyword(KeywordId::End)?;
        let node = self.finish(start, NodeKind::CaseExpr);
        self.attach_opt(node, operand);
        self.attach_all(node, whens);
        self.attach_opt(node, else_branch);
        Ok(node)
    }

    fn parse_cast_expr(&mut self, start: Marker) -> Result<NodeId, ParseError> {
        self.expect_lparen()?;
        let expr = self.parse_expr(0)?;
        self.expect_keyword(KeywordId::As)?;
        let data_type = self.parse_data_type()?;
        self.expect_rparen()?;
        let node = self.finish(start, NodeKind::CastExpr);
        self.attach(node, expr);
        self.attach(node, data_type);
        Ok(node)
    }

    fn parse_extract_expr(&mut self, start: Marker) -> Result<NodeId, ParseError> {
        self.expect_lparen()?;
        let field = self.expect_identifier()?;
        self.expect_keyword(KeywordId::From)?;
        let expr = self.parse_expr(0)?;
        self.expect_rparen()?;
        let node = self.finish(start, NodeKind::ExtractExpr);
        self.set_primary_text(node, Text::borrowed(field.text));
        self.attach(node, expr);
        Ok(node)
    }

    fn parse_array_literal(&mut self, start: Marker) -> Result<NodeId, ParseError> {
        if self.eat_delimiter(DelimiterKind::LBracket) {
            let mut items = Vec::new();
            if !self.at_delimiter(DelimiterKind::RBracket) {
                loop {
                    items.push(self.parse_expr(0)?);
                    if !self.eat_delimiter(DelimiterKind::Comma) {
                        break;
                    }
                }
            }
            self.expect_delimiter(DelimiterKind::RBracket)?;
            let node = self.finish(start, NodeKind::ArrayLiteral);
            self.attach_all(node, items);
            return Ok(node);
        }
        self.expect_lparen()?;
        let body = self.parse_with_or_set_op_chain()?;
        self.expect_rparen()?;
        let sub = self.finish(start, NodeKind::Subquery);
        self.attach(sub, body);
        let node = self.finish(start, NodeKind::ArrayLiteral);
        self.attach(node, sub);
        Ok(node)
    }

    fn parse_interval_literal(&mut self, start: Marker) -> Result<NodeId, ParseError> {
        if !matches!(self.cur().kind, TokenKind::String) {
            return Err(self.unexpected("a string literal"));
        }
        let value = self.bump();
        let unit = if matches!(self.cur().kind, TokenKind::Identifier) { Some(self.bump()) } else { None };
        let unit_text = match unit {
            Some(first) if self.eat_keyword(KeywordId::To) => {
                let second = self.expect_identifier()?;
                Some(Text::owned(&format!("{} TO {}", first.text, second.text)))
            }
            Some(first) => Some(Text::borrowed(first.text)),
            None => None,
        };
        let node = self.finish(start, NodeKind::IntervalLiteral);
        self.set_primary_text(node, unquote(value.text, '\''));
        if let Some(text) = unit_text {
            self.set_secondary_text(node, text);
        }
        Ok(node)
    }

    fn parse_in_source(&mut self) -> Result<InSource, ParseError> {
        self.expect_lparen()?;
        if self.at_keyword(KeywordId::Select) || self.at_keyword(KeywordId::With) || self.at_keyword(KeywordId::Values) {
            let marker = self.mark();
            let body = self.parse_with_or_set_op_chain()?;
            self.expect_rparen()?;
            let sub = self.finish(marker, NodeKind::Subquery);
            self.attach(sub, body);
            return Ok(InSource::Subquery(sub));
        }
        let mut items = Vec::new();
        if !self.at_delimiter(DelimiterKind::RParen) {
            loop {
                items.push(self.parse_expr(0)?);
                if !self.eat_delimiter(DelimiterKind::Comma) {
                    break;
                }
            }
        }
        self.expect_rparen()?;
        Ok(InSource::List(items))
    }

    fn finish_in_expr(&mut self, start: Marker, lhs: NodeId, negated: bool) -> Result<NodeId, ParseError> {
        let source = self.parse_in_source()?;
        let node = self.finish(start, NodeKind::InExpr);
        self.attach(node, lhs);
        match source {
            InSource::List(items) => {
                let list_node = self.finish(start, NodeKind::ExprList);
                self.attach_all(list_node, items);
                self.attach(node, list_node);
            }
            InSource::Subquery(sub) => self.attach(node, sub),
        }
        if negated {
            self.set_semantic_flag(node, semantic_flags::NOT);
        }
        Ok(node)
    }

    fn finish_between_expr(&mut self, start: Marker, lhs: NodeId, negated: bool) -> Result<NodeId, ParseError> {
        let low = self.parse_expr(ADD_BP)?;
        self.expect_keyword(KeywordId::And)?;
        let high = self.parse_expr(ADD_BP)?;
        let node = self.finish(start, NodeKind::BetweenExpr);
        self.attach(node, lhs);
        self.attach(node, low);
        self.attach(node, high);
        if negated {
            self.set_semantic_flag(node, semantic_flags::NOT);
        }
        Ok(node)
    }

    fn finish_like_expr(&mut self, start: Marker, lhs: NodeId, negated: bool) -> Result<NodeId, ParseError> {
        let ilike = self.eat_keyword(KeywordId::Ilike);
        if !ilike {
            self.expect_keyword(KeywordId::Like)?;
        }
        let pattern = self.parse_expr(CONCAT_BP)?;
        let node = self.finish(start, NodeKind::LikeExpr);
        self.set_primary_text(node, Text::borrowed(if ilike { "ILIKE" } else { "LIKE" }));
        self.attach(node, lhs);
        self.attach(node, pattern);
        if negated {
            self.set_semantic_flag(node, semantic_flags::NOT);
        }
        Ok(node)
    }

    fn finish_is_expr(&mut self, start: Marker, lhs: NodeId) -> Result<NodeId, ParseError> {
        let negated = self.eat_keyword(KeywordId::Not);
        if self.eat_keyword(KeywordId::Distinct) {
            self.expect_keyword(KeywordId::From)?;
            let rhs = self.parse_expr(COMPARISON_BP + 1)?;
            let node = self.finish(start, NodeKind::IsDistinctFromExpr);
            self.attach(node, lhs);
            self.attach(node, rhs);
            if negated {
                self.set_semantic_flag(node, semantic_flags::NOT);
            }
            return Ok(node);
        }
        for (kw, text) in [(KeywordId::Null, "NULL"), (KeywordId::True, "TRUE"), (KeywordId::False, "FALSE")] {
            if self.eat_keyword(kw) {
                let node = self.finish(start, NodeKind::IsNullExpr);
                self.set_primary_text(node, Text::borrowed(text));
                self.attach(node, lhs);
                if negated {
                    self.set_semantic_flag(node, semantic_flags::NOT);
                }
                return Ok(node);
            }
        }
        Err(self.unexpected("NULL, TRUE, FALSE, or DISTINCT FROM"))
    }

    fn binary(&mut self, start: Marker, left: NodeId, op_text: &'static str, right: NodeId) -> NodeId {
        let node = self.finish(start, NodeKind::BinaryExpr);
        self.set_primary_text(node, Text::borrowed(op_text));
        self.attach(node, left);
        self.attach(node, right);
        node
    }

    fn peek_begins_predicate(&self) -> bool {
        matches!(self.peek().keyword, Some(KeywordId::In) | Some(KeywordId::Like) | Some(KeywordId::Ilike) | Some(KeywordId::Between))
    }

    fn at_comparison_operator(&self) -> bool {
        self.at_operator(OperatorKind::Eq)
            || self.at_operator(OperatorKind::NotEq)
            || self.at_operator(OperatorKind::Lt)
            || self.at_operator(OperatorKind::Gt)
            || self.at_operator(OperatorKind::LtEq)
            || self.at_operator(OperatorKind::GtEq)
    }

    fn bump_comparison_operator_text(&mut self) -> &'static str {
        match self.bump().kind {
            TokenKind::Operator(OperatorKind::Eq) => "=",
            TokenKind::Operator(OperatorKind::NotEq) => "<>",
            TokenKind::Operator(OperatorKind::Lt) => "<",
            TokenKind::Operator(OperatorKind::Gt) => ">",
            TokenKind::Operator(OperatorKind::LtEq) => "<=",
            TokenKind::Operator(OperatorKind::GtEq) => ">=",
            _ => unreachable!("guarded by at_comparison_operator"),
        }
    }

    fn at_json_operator(&self) -> bool {
        matches!(
            self.cur().kind,
            TokenKind::Operator(
                OperatorKind::Arrow
                    | OperatorKind::ArrowArrow
                    | OperatorKind::HashArrow
                    | OperatorKind::HashArrowArrow
                    | OperatorKind::AtArrow
                    | OperatorKind::ArrowAt
                    | OperatorKind::Question
                    | OperatorKind::QuestionPipe
                    | OperatorKind::QuestionAmp
            )
        )
    }

    fn bump_json_operator_text(&mut self) -> &'static str {
        match self.bump().kind {
            TokenKind::Operator(OperatorKind::Arrow) => "->",
            TokenKind::Operator(OperatorKind::ArrowArrow) => "->>",
            TokenKind::Operator(OperatorKind::HashArrow) => "#>",
            TokenKind::Operator(OperatorKind::HashArrowArrow) => "#>>",
            TokenKind::Operator(OperatorKind::AtArrow) => "@>",
            TokenKind::Operator(OperatorKind::ArrowAt) => "<@",
            TokenKind::Operator(OperatorKind::Question) => "?",
            TokenKind::Operator(OperatorKind::QuestionPipe) => "?|",
            TokenKind::Operator(OperatorKind::QuestionAmp) => "?&",
            _ => unreachable!("guarded by at_json_operator"),
        }
    }

    fn at_add_operator(&self) -> bool {
        self.at_operator(OperatorKind::Plus) || self.at_operator(OperatorKind::Minus)
    }

    fn bump_add_operator_text(&mut self) -> &'static str {
        match self.bump().kind {
            TokenKind::Operator(OperatorKind::Plus) => "+",
            TokenKind::Operator(OperatorKind::Minus) => "-",
            _ => unreachable!("guarded by at_add_operator"),
        }
    }

    fn at_mul_operator(&self) -> bool {
        self.at_operator(OperatorKind::Star) || self.at_operator(OperatorKind::Slash) || self.at_operator(OperatorKind::Percent)
    }

    fn bump_mul_operator_text(&mut self) -> &'static str {
        match self.bump().kind {
            TokenKind::Operator(OperatorKind::Star) => "*",
            TokenKind::Operator(OperatorKind::Slash) => "/",
            TokenKind::Operator(OperatorKind::Percent) => "%",
            _ => unreachable!("guarded by at_mul_operator"),
        }
    }
}

/// Aggregates for which `DISTINCT` inside the argument list is a recognized
/// modifier (§4.7). A `DISTINCT` sent to an arbitrary scalar function is
/// still legal syntax, it just isn't flagged as aggregate-distinct.
const AGGREGATE_NAMES: &[&str] = &["count", "sum", "min", "max", "avg"];

fn is_aggregate_name(name: &str) -> bool {
    AGGREGATE_NAMES.iter().any(|candidate| name.eq_ignore_ascii_case(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::Parser;

    #[test]
    fn precedence_mul_binds_tighter_than_add() {
        let mut parser = Parser::with_defaults();
        let ast = parser.parse("SELECT 1 + 2 * 3").unwrap();
        let select = ast.root();
        let item = ast.children(ast.children(select).next().unwrap()).next().unwrap();
        let expr = ast.children(item).next().unwrap();
        assert_eq!(ast.node(expr).kind, NodeKind::BinaryExpr);
        assert_eq!(ast.node(expr).primary_text.as_ref().unwrap().as_str(), "+");
        let rhs = ast.children(expr).nth(1).unwrap();
        assert_eq!(ast.node(rhs).primary_text.as_ref().unwrap().as_str(), "*");
    }

    #[test]
    fn power_is_right_associative() {
        let mut parser = Parser::with_defaults();
        let ast = parser.parse("SELECT 2 ^ 3 ^ 2").unwrap();
        let select = ast.root();
        let item = ast.children(ast.children(select).next().unwrap()).next().unwrap();
        let expr = ast.children(item).next().unwrap();
        let rhs = ast.children(expr).nth(1).unwrap();
        assert_eq!(ast.node(rhs).kind, NodeKind::BinaryExpr);
    }

    #[test]
    fn not_in_sets_semantic_flag_instead_of_wrapping() {
        let mut parser = Parser::with_defaults();
        let ast = parser.parse("SELECT 1 FROM t WHERE a NOT IN (1, 2)").unwrap();
        let select = ast.root();
        let where_clause = ast.children(select).find(|&id| ast.node(id).kind == NodeKind::WhereClause).unwrap();
        let in_expr = ast.children(where_clause).next().unwrap();
        assert_eq!(ast.node(in_expr).kind, NodeKind::InExpr);
        assert!(ast.node(in_expr).semantic_flags.has(semantic_flags::NOT));
    }

    #[test]
    fn count_distinct_sets_flag_on_function_call() {
        let mut parser = Parser::with_defaults();
        let ast = parser.parse("SELECT COUNT(DISTINCT a) FROM t").unwrap();
        let select = ast.root();
        let item = ast.children(ast.children(select).next().unwrap()).next().unwrap();
        let call = ast.children(item).next().unwrap();
        assert_eq!(ast.node(call).kind, NodeKind::FunctionCall);
        assert!(ast.node(call).semantic_flags.has(semantic_flags::AGGREGATE_DISTINCT));
    }

    #[test]
    fn distinct_on_non_aggregate_does_not_set_flag() {
        let mut parser = Parser::with_defaults();
        let ast = parser.parse("SELECT my_func(DISTINCT a) FROM t").unwrap();
        let select = ast.root();
        let item = ast.children(ast.children(select).next().unwrap()).next().unwrap();
        let call = ast.children(item).next().unwrap();
        assert_eq!(ast.node(call).kind, NodeKind::FunctionCall);
        assert!(!ast.node(call).semantic_flags.has(semantic_flags::AGGREGATE_DISTINCT));
    }

    #[test]
    fn interval_literal_with_simple_unit() {
        let mut parser = Parser::with_defaults();
        let ast = parser.parse("SELECT INTERVAL '3' DAY").unwrap();
        let select = ast.root();
        let item = ast.children(ast.children(select).next().unwrap()).next().unwrap();
        let literal = ast.children(item).next().unwrap();
        assert_eq!(ast.node(literal).kind, NodeKind::IntervalLiteral);
        assert_eq!(ast.node(literal).secondary_text.as_ref().unwrap().as_str(), "DAY");
    }

    #[test]
    fn interval_literal_with_compound_unit() {
        let mut parser = Parser::with_defaults();
        let ast = parser.parse("SELECT INTERVAL '1-2' YEAR TO MONTH").unwrap();
        let select = ast.root();
        let item = ast.children(ast.children(select).next().unwrap()).next().unwrap();
        let literal = ast.children(item).next().unwrap();
        assert_eq!(ast.node(literal).kind, NodeKind::IntervalLiteral);
        assert_eq!(ast.node(literal).secondary_text.as_ref().unwrap().as_str(), "YEAR TO MONTH");
    }

    #[test]
    fn window_function_with_frame() {
        let mut parser = Parser::with_defaults();
        let ast = parser
            .parse("SELECT sum(a) OVER (PARTITION BY b ORDER BY c ROWS BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW) FROM t")
            .unwrap();
        let select = ast.root();
        let item = ast.children(ast.children(select).next().unwrap()).next().unwrap();
        let call = ast.children(item).next().unwrap();
        assert!(ast.node(call).semantic_flags.has(semantic_flags::IS_WINDOW_FUNCTION));
        let window = ast.children(call).last().unwrap();
        assert_eq!(ast.node(window).kind, NodeKind::WindowSpec);
    }
}
