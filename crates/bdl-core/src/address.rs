//! Event addresses and object references.
//!
//! An event destination is the value a component exposes to the components
//! sending events to it:
//!
//! ```text
//! { ref = { apiVersion = "...", kind = "...", name = "..." } }
//! ```
//!
//! Its type is fixed. It is the declared type of component references in the
//! evaluation context, and the type of the placeholders injected for
//! references that are not resolved yet.

use bdl_ast::{Type, Value};

/// Root of the dynamic namespace of Secret references, e.g. `secret.creds`.
pub const SECRET_NAMESPACE: &str = "secret";

const CHANNEL_API_VERSION: &str = "messaging.knative.dev/v1";
const CHANNEL_KIND: &str = "Channel";

/// Maximum length of a Kubernetes object name.
const MAX_NAME_LEN: usize = 63;

pub fn object_reference_type() -> Type {
    Type::object([
        ("apiVersion", Type::String),
        ("kind", Type::String),
        ("name", Type::String),
    ])
}

pub fn destination_type() -> Type {
    Type::object([("ref", object_reference_type())])
}

pub fn object_reference(api_version: &str, kind: &str, name: &str) -> Value {
    Value::object([
        ("apiVersion", Value::string(api_version)),
        ("kind", Value::string(kind)),
        ("name", Value::string(name)),
    ])
}

pub fn destination(api_version: &str, kind: &str, name: &str) -> Value {
    Value::object([("ref", object_reference(api_version, kind, name))])
}

/// Reference to the Secret named `name`.
pub fn secret_reference(name: &str) -> Value {
    object_reference("v1", "Secret", name)
}

/// Destination of the channel a replying component is addressed through.
pub fn reply_channel(component_id: &str) -> Value {
    destination(
        CHANNEL_API_VERSION,
        CHANNEL_KIND,
        &rfc1123_name(component_id),
    )
}

/// Computes the address of a component given the destination its events are
/// sent to.
///
/// Components that do not forward events anywhere are their own address.
/// Components replying into a chain are reached through a channel named
/// after them, which also delivers their replies.
pub fn address_for(event_dst: &Value, own: impl FnOnce() -> Value, component_id: &str) -> Value {
    if event_dst.is_null() {
        own()
    } else {
        reply_channel(component_id)
    }
}

/// Returns true when `v` has the shape of an object reference.
pub fn is_object_reference(v: &Value) -> bool {
    let Some(attrs) = v.as_object() else {
        return false;
    };
    attrs.len() == 3
        && ["apiVersion", "kind", "name"]
            .iter()
            .all(|k| matches!(attrs.get(*k), Some(Value::String(_))))
}

/// Normalizes an identifier into a valid Kubernetes object name (RFC 1123
/// label): lowercase alphanumerics and dashes, at most 63 characters,
/// starting and ending with an alphanumeric character.
pub fn rfc1123_name(id: &str) -> String {
    let mut name: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    name.truncate(MAX_NAME_LEN);
    name.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::convert;

    #[test]
    fn test_destination_has_destination_type() {
        let dst = destination("targets.triggermesh.io/v1alpha1", "AWSSNSTarget", "sns");
        assert_eq!(convert(&dst, &destination_type()), Ok(dst.clone()));
        assert!(is_object_reference(dst.attr("ref")));
    }

    #[test]
    fn test_secret_reference() {
        let secret = secret_reference("kafka-creds");
        assert!(is_object_reference(&secret));
        assert_eq!(secret.attr("kind"), &Value::string("Secret"));
        assert!(!is_object_reference(&Value::Bool(true)));
    }

    #[test]
    fn test_address_algebra() {
        let own = || destination("sources.triggermesh.io/v1alpha1", "X", "x");
        assert_eq!(address_for(&Value::Null, own, "x"), own());

        let replying = address_for(&Value::Unknown(destination_type()), own, "My_Target");
        assert_eq!(
            replying,
            destination("messaging.knative.dev/v1", "Channel", "my-target")
        );
    }

    #[test]
    fn test_rfc1123_name() {
        assert_eq!(rfc1123_name("My_Topic"), "my-topic");
        assert_eq!(rfc1123_name("_edge_"), "edge");
        assert_eq!(rfc1123_name(&"a".repeat(80)).len(), 63);
        assert_eq!(rfc1123_name("__"), "");
    }
}
