// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! AST types for the Bridge Description Language
//!
//! This crate contains the Bridge records produced by the parser, the
//! expression and body syntax trees, the dynamic value model used to decode
//! component configurations, and the diagnostics shared by every phase.

pub mod addr;
pub mod body;
pub mod bridge;
pub mod category;
pub mod diagnostics;
pub mod expr;
pub mod foundation;
pub mod printer;
pub mod value;

// Re-export commonly used types
pub use addr::MessagingComponent;
pub use body::{Attribute, Block, Body, Label};
pub use bridge::{Bridge, Component, Globals};
pub use category::ComponentCategory;
pub use diagnostics::{Diagnostic, DiagnosticFormatter, Diagnostics, Severity};
pub use expr::{Expr, ExprKind, IndexKey, ObjectItem, Step, Traversal};
pub use foundation::{SourceFile, SourceMap, SourceRange, Span};
pub use printer::print_bridge;
pub use value::{Type, Value};
