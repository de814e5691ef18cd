//! Lox Syntax Tree
//!
//! The `Expr` and `Stmt` node families, generated at build time from the
//! schemas in `lox-astgen`, plus the value types they are built from.
//!
//! Exclusive children are checked on every access:
//!
//! ```
//! use lox_ast::expr::{Grouping, Literal};
//! use lox_ast::{NullChildError, Value};
//!
//! let grouping = Grouping::new(Some(Box::new(Literal::new(Value::Number(1.0)))));
//! assert!(grouping.expression().is_ok());
//!
//! let empty = Grouping::new(None);
//! assert_eq!(empty.expression().unwrap_err(), NullChildError::new("Grouping", "expression"));
//! ```

pub mod error;
pub mod printer;
pub mod token;
pub mod value;

pub mod expr {
    include!(concat!(env!("OUT_DIR"), "/expr.rs"));
}

pub mod stmt {
    include!(concat!(env!("OUT_DIR"), "/stmt.rs"));
}

pub use error::NullChildError;
pub use printer::AstPrinter;
pub use token::{Token, TokenKind};
pub use value::Value;
