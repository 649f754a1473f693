//! Peeks the leading keyword(s) of a statement and routes to the matching
//! statement parser. See `SPEC_FULL.md` §4.4.

use super::Parser;
use crate::ast::NodeId;
use crate::error::ParseError;
use crate::token_cursor::FALLBACK_KEYWORDS;
use crate::tokenizer::KeywordId;

impl<'input> Parser<'input> {
    pub(crate) fn dispatch_statement(&mut self) -> Result<NodeId, ParseError> {
        let _guard = self.enter_depth()?;
        self.trace_production("statement");

        if self.at_keyword(KeywordId::With) {
            return self.parse_with_or_select();
        }
        if self.at_keyword(KeywordId::Select) {
            return self.parse_set_op_chain();
        }
        if self.at_keyword(KeywordId::Insert) {
            return self.parse_insert();
        }
        if self.at_keyword(KeywordId::Update) {
            return self.parse_update();
        }
        if self.at_keyword(KeywordId::Delete) {
            return self.parse_delete();
        }
        if self.at_keyword(KeywordId::Create) {
            return self.parse_create();
        }
        if self.at_keyword(KeywordId::Drop) {
            return self.parse_drop();
        }
        if self.at_keyword(KeywordId::Alter) {
            return self.parse_alter_table();
        }
        if self.at_keyword(KeywordId::Begin) || self.at_keyword(KeywordId::Start) {
            return self.parse_transaction();
        }
        if self.at_keyword(KeywordId::Commit)
            || self.at_keyword(KeywordId::Rollback)
            || self.at_keyword(KeywordId::Savepoint)
            || self.at_keyword(KeywordId::Release)
        {
            return self.parse_transaction();
        }
        if self.at_keyword(KeywordId::Explain) {
            return self.parse_explain();
        }
        if self.at_keyword(KeywordId::Values) {
            return self.parse_set_op_chain();
        }
        if self.at_keyword(KeywordId::Set) {
            return self.parse_set_stmt();
        }
        if self.at_keyword(KeywordId::Attach) {
            return self.parse_attach();
        }
        if self.at_keyword(KeywordId::Detach) {
            return self.parse_detach();
        }
        if self.config().get_allow_extensions() {
            for word in FALLBACK_KEYWORDS {
                if self.at_lexeme(word) {
                    return self.parse_fallback_utility(word);
                }
            }
        }

        Err(self.unexpected("a statement (SELECT, INSERT, UPDATE, DELETE, CREATE, ...)"))
    }
}
