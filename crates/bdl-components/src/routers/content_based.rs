use crate::k8s::{API_EVENTING, Object, delivery, destination_json, rfc1123_name};
use bdl_ast::{Type, Value};
use bdl_core::address::{destination, destination_type};
use bdl_core::{Addressable, BridgeGlobals, Decodable, Spec, Translatable};

/// Routes events to destinations based on their attributes.
///
/// Translates to a Broker with one Trigger per `route` block:
///
/// ```text
/// router "content_based" "dispatch" {
///   route {
///     attributes = { type = "order.created" }
///     to         = target.warehouse
///   }
/// }
/// ```
pub struct ContentBased;

capabilities!(ContentBased: decodable, translatable, addressable);

impl Decodable for ContentBased {
    fn spec(&self) -> Spec {
        Spec::object([(
            "route",
            Spec::block_list(
                "route",
                Spec::object([
                    (
                        "attributes",
                        Spec::optional_attr("attributes", Type::map(Type::String)),
                    ),
                    ("to", Spec::required_attr("to", destination_type())),
                ]),
                1,
                0,
            ),
        )])
    }
}

impl Translatable for ContentBased {
    fn manifests(
        &self,
        id: &str,
        config: &Value,
        _: &Value,
        globals: &BridgeGlobals,
    ) -> Vec<serde_json::Value> {
        let name = rfc1123_name(id);
        let broker = Object::new(API_EVENTING, "Broker", &name);
        let mut manifests = vec![broker.into_json()];

        let routes = config.attr("route").as_list().unwrap_or_default();
        for (i, route) in routes.iter().enumerate() {
            let mut trigger = Object::new(API_EVENTING, "Trigger", &format!("{name}-r{i}"));
            trigger.set_nested(name.as_str(), &["spec", "broker"]);
            if let Some(attrs) = route.attr("attributes").as_object().filter(|a| !a.is_empty()) {
                let filter = Value::Object(attrs.clone()).to_json();
                trigger.set_nested(filter, &["spec", "filter", "attributes"]);
            }
            trigger.set_nested(destination_json(route.attr("to")), &["spec", "subscriber"]);
            if let Some(delivery) = delivery(globals) {
                trigger.set_nested(delivery, &["spec", "delivery"]);
            }
            manifests.push(trigger.into_json());
        }
        manifests
    }
}

impl Addressable for ContentBased {
    fn address(&self, id: &str, _: &Value, _: &Value) -> Value {
        destination(API_EVENTING, "Broker", &rfc1123_name(id))
    }
}
