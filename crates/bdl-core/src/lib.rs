// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Decoding, graph construction and evaluation of Bridge descriptions.
//!
//! Given a parsed [`Bridge`](bdl_ast::Bridge) and a [`Registry`] of
//! component implementations, [`Context::generate`] builds the component
//! graph, evaluates every component in dependency order and collects the
//! manifests they translate to.

pub mod address;
pub mod context;
pub mod convert;
pub mod decode;
pub mod eval;
pub mod evaluator;
pub mod funcs;
pub mod globals;
pub mod graph;
pub mod order;
pub mod pipeline;
pub mod registry;
pub mod safe;
pub mod schema;
pub mod transform;
pub mod translation;
pub mod vertex;

pub use context::EvalContext;
pub use globals::BridgeGlobals;
pub use graph::{DirectedGraph, VertexId};
pub use pipeline::Context;
pub use registry::Registry;
pub use schema::Spec;
pub use translation::{Addressable, ComponentImpl, Decodable, Translatable};
pub use vertex::{BridgeGraph, ComponentVertex};
