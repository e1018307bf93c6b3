use crate::k8s::{API_TARGETS, Object, reply_manifests, rfc1123_name};
use crate::secrets;
use bdl_ast::{Type, Value};
use bdl_core::address::{address_for, destination, object_reference_type};
use bdl_core::{Addressable, BridgeGlobals, Decodable, Spec, Translatable};

const KIND: &str = "DatadogTarget";

/// Sends events to Datadog as metrics.
pub struct Datadog;

capabilities!(Datadog: decodable, translatable, addressable);

impl Decodable for Datadog {
    fn spec(&self) -> Spec {
        Spec::object([
            (
                "metric_prefix",
                Spec::optional_attr("metric_prefix", Type::String),
            ),
            ("auth", Spec::required_attr("auth", object_reference_type())),
        ])
    }
}

impl Translatable for Datadog {
    fn manifests(
        &self,
        id: &str,
        config: &Value,
        event_dst: &Value,
        globals: &BridgeGlobals,
    ) -> Vec<serde_json::Value> {
        let name = rfc1123_name(id);

        let mut t = Object::new(API_TARGETS, KIND, &name);
        t.set_optional_str(config.attr("metric_prefix"), &["spec", "metricPrefix"]);
        let secret = config.attr("auth").attr("name").as_str().unwrap_or_default();
        t.set_nested(secrets::datadog(secret), &["spec", "apiKey", "secretKeyRef"]);

        let mut manifests = vec![t.into_json()];
        manifests.extend(reply_manifests(&name, API_TARGETS, KIND, event_dst, globals));
        manifests
    }
}

impl Addressable for Datadog {
    fn address(&self, id: &str, _: &Value, event_dst: &Value) -> Value {
        address_for(
            event_dst,
            || destination(API_TARGETS, KIND, &rfc1123_name(id)),
            id,
        )
    }
}
