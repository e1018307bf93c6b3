// Allow unwrap in tests
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! Output encodings of a translated Bridge.
//!
//! - [`manifest`]: the generated manifests as a Kubernetes `List` or wrapped
//!   in a `Bridge` object, encoded as JSON or YAML
//! - [`dot`]: the component graph in Graphviz DOT format

pub mod dot;
pub mod manifest;

pub use dot::{to_dot, write_dot};
pub use manifest::{DEFAULT_BRIDGE_ID, EncodeError, Envelope, Format, Serializer};
