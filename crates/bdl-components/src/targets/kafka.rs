use crate::k8s::{API_EVENTING_V1ALPHA1, Object, reply_manifests, rfc1123_name};
use bdl_ast::{Type, Value};
use bdl_core::address::{address_for, destination, object_reference_type};
use bdl_core::{Addressable, BridgeGlobals, Decodable, Spec, Translatable};

const KIND: &str = "KafkaSink";

/// Produces events to a Kafka topic.
pub struct Kafka;

capabilities!(Kafka: decodable, translatable, addressable);

impl Decodable for Kafka {
    fn spec(&self) -> Spec {
        Spec::object([
            ("topic", Spec::required_attr("topic", Type::String)),
            (
                "bootstrap_servers",
                Spec::required_attr("bootstrap_servers", Type::list(Type::String)),
            ),
            ("auth", Spec::required_attr("auth", object_reference_type())),
        ])
    }
}

impl Translatable for Kafka {
    fn manifests(
        &self,
        id: &str,
        config: &Value,
        event_dst: &Value,
        globals: &BridgeGlobals,
    ) -> Vec<serde_json::Value> {
        let name = rfc1123_name(id);

        let mut s = Object::new(API_EVENTING_V1ALPHA1, KIND, &name);
        s.set_optional_str(config.attr("topic"), &["spec", "topic"]);
        s.set_nested(
            config.attr("bootstrap_servers").string_list(),
            &["spec", "bootstrapServers"],
        );
        s.set_optional_str(
            config.attr("auth").attr("name"),
            &["spec", "auth", "secret", "ref", "name"],
        );

        let mut manifests = vec![s.into_json()];
        manifests.extend(reply_manifests(
            &name,
            API_EVENTING_V1ALPHA1,
            KIND,
            event_dst,
            globals,
        ));
        manifests
    }
}

impl Addressable for Kafka {
    fn address(&self, id: &str, _: &Value, event_dst: &Value) -> Value {
        address_for(
            event_dst,
            || destination(API_EVENTING_V1ALPHA1, KIND, &rfc1123_name(id)),
            id,
        )
    }
}
