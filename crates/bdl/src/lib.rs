// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! # Bridge Description Language
//!
//! Interpreter for BDL documents, which describe event-driven integrations
//! as a graph of components, and translate into Kubernetes manifests.
//!
//! This crate is a facade over the stages of the interpreter:
//!
//! ```text
//! bdl-ast         - spans, diagnostics, values, expression and Bridge AST
//!     ↓
//! bdl-lexer       - tokenization
//!     ↓
//! bdl-parser      - recursive descent parser, document loading
//!     ↓
//! bdl-core        - decoding, component graph, evaluation
//!     ↓
//! bdl-components  - component catalogue
//!     ↓
//! bdl-encoding    - manifest and DOT output
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bdl::Document;
//!
//! let doc = Document::load(Path::new("bridge.brg.hcl"))?;
//! let output = doc.generate();
//! if output.diagnostics.has_errors() {
//!     eprintln!("{}", doc.format_diagnostics(&output.diagnostics));
//! }
//! ```

pub use bdl_ast::{self as ast, *};

pub use bdl_lexer as lexer;

pub use bdl_parser as parser;
pub use bdl_parser::{LoadError, parse_bridge};

pub use bdl_core;
pub use bdl_core::{BridgeGraph, Context, Registry};

pub use bdl_components as components;

pub use bdl_encoding as encoding;
pub use bdl_encoding::{EncodeError, Envelope, Format, Serializer};

pub mod document;

pub use document::{Document, Output};

/// Interpreter version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
