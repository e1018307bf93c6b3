//! Capabilities of component implementations.
//!
//! An implementation exposes only the capabilities it supports. Absence is
//! meaningful: a component without [`Addressable`] can not receive events,
//! one without [`Translatable`] emits nothing.

use crate::globals::BridgeGlobals;
use crate::schema::Spec;
use bdl_ast::Value;

/// Declares the configuration schema of a component.
pub trait Decodable {
    fn spec(&self) -> Spec;
}

/// Emits the manifests of a component.
///
/// Must be pure and deterministic. `config` is the decoded configuration,
/// `event_dst` the destination events are sent to, or null.
pub trait Translatable {
    fn manifests(
        &self,
        id: &str,
        config: &Value,
        event_dst: &Value,
        globals: &BridgeGlobals,
    ) -> Vec<serde_json::Value>;
}

/// Computes the event address of a component.
///
/// Implementations may only read proper attributes of `config`: inside a
/// reference cycle the address is computed before references are resolved.
pub trait Addressable {
    fn address(&self, id: &str, config: &Value, event_dst: &Value) -> Value;
}

/// A component implementation, registered for a (category, type) pair.
pub trait ComponentImpl {
    fn decodable(&self) -> Option<&dyn Decodable> {
        None
    }

    fn translatable(&self) -> Option<&dyn Translatable> {
        None
    }

    fn addressable(&self) -> Option<&dyn Addressable> {
        None
    }
}
