//! A recursive-descent SQL front-end: tokenizer, Pratt expression core,
//! statement/clause grammar, and an arena-backed AST with a post-parse
//! structural validator. See `SPEC_FULL.md` for the full component design.
//!
//! No semantic analysis, no query planning, no SQL formatting: this crate
//! turns SQL text into a typed tree and tells you whether it's
//! well-formed, nothing more.
//!
//! ```
//! use quill_sql::Parser;
//!
//! let mut parser = Parser::with_defaults();
//! let ast = parser.parse("SELECT id, name FROM users WHERE id = 1").unwrap();
//! assert_eq!(ast.node_count() > 0, true);
//! ```

pub mod arena;
pub mod ast;
pub mod config;
pub mod depth_guard;
pub mod error;
pub mod parser;
pub mod token_cursor;
pub mod tokenizer;
pub mod validator;

pub use ast::{Ast, NodeId, NodeKind, Text};
pub use config::{ParserConfig, ParserMode};
pub use error::{ErrorKind, ParseError};
pub use parser::Parser;
pub use validator::validate;
