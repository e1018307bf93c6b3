use crate::k8s::{API_SERVING, Object, reply_manifests, rfc1123_name};
use bdl_ast::{Type, Value};
use bdl_core::address::{address_for, destination};
use bdl_core::{Addressable, BridgeGlobals, Decodable, Spec, Translatable};
use serde_json::json;

const KIND: &str = "Service";

/// Label restricting a Knative Service to the cluster network.
const VISIBILITY_LABEL: &str = "networking.knative.dev/visibility";
const CLUSTER_LOCAL: &str = "cluster-local";

/// Runs a container image receiving events over HTTP.
///
/// ```text
/// target "container" "display" {
///   image    = "gcr.io/knative-releases/knative.dev/eventing/cmd/event_display"
///   public   = true
///   env_vars = { LOG_LEVEL = "debug" }
/// }
/// ```
pub struct Container;

capabilities!(Container: decodable, translatable, addressable);

impl Decodable for Container {
    fn spec(&self) -> Spec {
        Spec::object([
            ("image", Spec::required_attr("image", Type::String)),
            ("public", Spec::optional_attr("public", Type::Bool)),
            (
                "env_vars",
                Spec::optional_attr("env_vars", Type::map(Type::String)),
            ),
        ])
    }
}

impl Translatable for Container {
    fn manifests(
        &self,
        id: &str,
        config: &Value,
        event_dst: &Value,
        globals: &BridgeGlobals,
    ) -> Vec<serde_json::Value> {
        let name = rfc1123_name(id);

        let mut svc = Object::new(API_SERVING, KIND, &name);
        if !config.attr("public").is_true() {
            svc.set_nested(CLUSTER_LOCAL, &["metadata", "labels", VISIBILITY_LABEL]);
        }

        let mut container = serde_json::Map::new();
        if let Some(image) = config.attr("image").as_str() {
            container.insert("image".into(), image.into());
        }
        if let Some(vars) = config.attr("env_vars").as_object().filter(|v| !v.is_empty()) {
            let env: Vec<serde_json::Value> = vars
                .iter()
                .map(|(name, value)| json!({ "name": name, "value": value.to_json() }))
                .collect();
            container.insert("env".into(), env.into());
        }
        svc.set_nested(
            vec![serde_json::Value::Object(container)],
            &["spec", "template", "spec", "containers"],
        );

        let mut manifests = vec![svc.into_json()];
        manifests.extend(reply_manifests(&name, API_SERVING, KIND, event_dst, globals));
        manifests
    }
}

impl Addressable for Container {
    fn address(&self, id: &str, _: &Value, event_dst: &Value) -> Value {
        address_for(
            event_dst,
            || destination(API_SERVING, KIND, &rfc1123_name(id)),
            id,
        )
    }
}
