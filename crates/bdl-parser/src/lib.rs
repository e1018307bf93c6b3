// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Hand-written recursive descent parser for the Bridge Description Language
//!
//! Turns BDL source text into a [`Bridge`](bdl_ast::Bridge) plus the
//! diagnostics found along the way, and loads documents from disk.

pub mod load;
pub mod parser;

pub use load::{LoadError, load_bridge};
pub use parser::{ParseError, ParseErrorKind, parse_bridge, parse_expression};

// Re-export lexer
pub use bdl_lexer::Token;
