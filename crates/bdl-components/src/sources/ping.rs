use crate::k8s::{API_KNATIVE_SOURCES, Object, rfc1123_name, sink_ref};
use bdl_ast::{Type, Value};
use bdl_core::{BridgeGlobals, Decodable, Spec, Translatable};

/// Emits an event on a cron schedule.
///
/// ```text
/// source "ping" "tick" {
///   schedule     = "*/1 * * * *"
///   data         = "{\"hello\": \"world\"}"
///   content_type = "application/json"
///   to           = target.sink
/// }
/// ```
pub struct Ping;

capabilities!(Ping: decodable, translatable);

impl Decodable for Ping {
    fn spec(&self) -> Spec {
        Spec::object([
            ("schedule", Spec::required_attr("schedule", Type::String)),
            ("data", Spec::optional_attr("data", Type::String)),
            (
                "content_type",
                Spec::optional_attr("content_type", Type::String),
            ),
        ])
    }
}

impl Translatable for Ping {
    fn manifests(
        &self,
        id: &str,
        config: &Value,
        event_dst: &Value,
        _: &BridgeGlobals,
    ) -> Vec<serde_json::Value> {
        let mut s = Object::new(API_KNATIVE_SOURCES, "PingSource", &rfc1123_name(id));
        s.set_optional_str(config.attr("schedule"), &["spec", "schedule"]);
        s.set_optional_str(config.attr("data"), &["spec", "data"]);
        s.set_optional_str(config.attr("content_type"), &["spec", "contentType"]);
        s.set_nested(sink_ref(event_dst), &["spec", "sink", "ref"]);
        vec![s.into_json()]
    }
}
