//! Kubernetes object helpers.
//!
//! Manifests are plain JSON objects. [`Object`] builds them field by field,
//! the way unstructured objects are built in Kubernetes client libraries.

use bdl_ast::Value;
use bdl_core::BridgeGlobals;
use serde_json::{Map, json};

pub use bdl_core::address::rfc1123_name;

pub const API_TARGETS: &str = "targets.triggermesh.io/v1alpha1";
pub const API_SOURCES: &str = "sources.triggermesh.io/v1alpha1";
pub const API_FLOW: &str = "flow.triggermesh.io/v1alpha1";
pub const API_MESSAGING: &str = "messaging.knative.dev/v1";
pub const API_EVENTING: &str = "eventing.knative.dev/v1";
pub const API_EVENTING_V1ALPHA1: &str = "eventing.knative.dev/v1alpha1";
pub const API_SERVING: &str = "serving.knative.dev/v1";
pub const API_KNATIVE_SOURCES: &str = "sources.knative.dev/v1";
pub const API_KNATIVE_SOURCES_V1BETA1: &str = "sources.knative.dev/v1beta1";

/// A Kubernetes object under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Object(Map<String, serde_json::Value>);

impl Object {
    pub fn new(api_version: &str, kind: &str, name: &str) -> Self {
        let mut obj = Object(Map::new());
        obj.set_nested(api_version, &["apiVersion"]);
        obj.set_nested(kind, &["kind"]);
        obj.set_nested(name, &["metadata", "name"]);
        obj
    }

    /// Sets the field at `path`, creating intermediate objects as needed.
    /// Intermediate values that are not objects are replaced.
    pub fn set_nested(&mut self, value: impl Into<serde_json::Value>, path: &[&str]) {
        let Some((last, parents)) = path.split_last() else {
            return;
        };
        let mut current = &mut self.0;
        for key in parents {
            let entry = current
                .entry(key.to_string())
                .or_insert_with(|| serde_json::Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = serde_json::Value::Object(Map::new());
            }
            let serde_json::Value::Object(next) = entry else {
                return;
            };
            current = next;
        }
        current.insert(last.to_string(), value.into());
    }

    /// Sets the field at `path` to a string when `value` is one.
    pub fn set_optional_str(&mut self, value: &Value, path: &[&str]) {
        if let Some(s) = value.as_str() {
            self.set_nested(s, path);
        }
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    pub fn into_json(self) -> serde_json::Value {
        serde_json::Value::Object(self.0)
    }
}

/// Converts an event destination to its JSON form, `{ref: {...}}`.
pub fn destination_json(dst: &Value) -> serde_json::Value {
    json!({ "ref": dst.attr("ref").to_json() })
}

/// The `ref` part of an event destination, used as a `sink.ref`.
pub fn sink_ref(dst: &Value) -> serde_json::Value {
    dst.attr("ref").to_json()
}

pub fn new_destination_json(api_version: &str, kind: &str, name: &str) -> serde_json::Value {
    json!({ "ref": { "apiVersion": api_version, "kind": kind, "name": name } })
}

pub fn new_channel(name: &str) -> serde_json::Value {
    Object::new(API_MESSAGING, "Channel", name).into_json()
}

/// Options of a Subscription besides its channel and subscriber.
#[derive(Debug, Clone, Default)]
pub struct SubscriptionOptions {
    pub reply: Option<serde_json::Value>,
    pub delivery: Option<serde_json::Value>,
}

impl SubscriptionOptions {
    /// Replies are sent to `dst`.
    pub fn reply_to(mut self, dst: &Value) -> Self {
        self.reply = Some(destination_json(dst));
        self
    }

    /// Applies the Bridge-wide delivery defaults.
    pub fn with_globals(mut self, globals: &BridgeGlobals) -> Self {
        self.delivery = delivery(globals);
        self
    }
}

pub fn new_subscription(
    name: &str,
    channel: &str,
    subscriber: serde_json::Value,
    opts: SubscriptionOptions,
) -> serde_json::Value {
    let mut subs = Object::new(API_MESSAGING, "Subscription", name);
    subs.set_nested(
        json!({ "apiVersion": API_MESSAGING, "kind": "Channel", "name": channel }),
        &["spec", "channel"],
    );
    subs.set_nested(subscriber, &["spec", "subscriber"]);
    if let Some(reply) = opts.reply {
        subs.set_nested(reply, &["spec", "reply"]);
    }
    if let Some(delivery) = opts.delivery {
        subs.set_nested(delivery, &["spec", "delivery"]);
    }
    subs.into_json()
}

/// Knative delivery options derived from the Bridge-wide defaults, or none
/// when no default is set.
pub fn delivery(globals: &BridgeGlobals) -> Option<serde_json::Value> {
    let mut spec = Map::new();
    if let Some(retries) = globals.retries() {
        spec.insert("retry".into(), retries.into());
    }
    if let Some(delay) = globals.backoff_delay() {
        spec.insert("backoffDelay".into(), delay.into());
    }
    if let Some(policy) = globals.backoff_policy() {
        spec.insert("backoffPolicy".into(), policy.into());
    }
    if let Some(dls) = globals.dead_letter_sink() {
        spec.insert("deadLetterSink".into(), destination_json(dls));
    }
    (!spec.is_empty()).then_some(serde_json::Value::Object(spec))
}

/// The Channel and Subscription routing the replies of a component to
/// `event_dst`. Components with a null destination do not reply.
pub fn reply_manifests(
    name: &str,
    api_version: &str,
    kind: &str,
    event_dst: &Value,
    globals: &BridgeGlobals,
) -> Vec<serde_json::Value> {
    if event_dst.is_null() {
        return Vec::new();
    }
    let subscriber = new_destination_json(api_version, kind, name);
    let opts = SubscriptionOptions::default()
        .reply_to(event_dst)
        .with_globals(globals);
    vec![new_channel(name), new_subscription(name, name, subscriber, opts)]
}
