//! Foundation types shared by every stage of the interpreter.

pub mod span;

pub use span::{Pos, SourceFile, SourceMap, SourceRange, Span};
