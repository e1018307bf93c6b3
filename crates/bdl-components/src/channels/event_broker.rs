use crate::k8s::{API_EVENTING, Object, delivery, rfc1123_name};
use bdl_ast::Value;
use bdl_core::address::destination;
use bdl_core::{Addressable, BridgeGlobals, Decodable, Spec, Translatable};

/// A Broker other components send events to and subscribe from.
pub struct EventBroker;

capabilities!(EventBroker: decodable, translatable, addressable);

impl Decodable for EventBroker {
    fn spec(&self) -> Spec {
        Spec::object([])
    }
}

impl Translatable for EventBroker {
    fn manifests(
        &self,
        id: &str,
        _: &Value,
        _: &Value,
        globals: &BridgeGlobals,
    ) -> Vec<serde_json::Value> {
        let mut broker = Object::new(API_EVENTING, "Broker", &rfc1123_name(id));
        if let Some(delivery) = delivery(globals) {
            broker.set_nested(delivery, &["spec", "delivery"]);
        }
        vec![broker.into_json()]
    }
}

impl Addressable for EventBroker {
    fn address(&self, id: &str, _: &Value, _: &Value) -> Value {
        destination(API_EVENTING, "Broker", &rfc1123_name(id))
    }
}
