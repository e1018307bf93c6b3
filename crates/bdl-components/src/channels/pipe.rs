use crate::k8s::{
    API_MESSAGING, SubscriptionOptions, destination_json, new_channel, new_subscription,
    rfc1123_name,
};
use bdl_ast::Value;
use bdl_core::address::{destination, destination_type};
use bdl_core::{Addressable, BridgeGlobals, Decodable, Spec, Translatable};

/// A Channel with a single subscriber.
///
/// ```text
/// channel "pipe" "orders" {
///   to       = target.warehouse
///   error_to = target.dls
/// }
/// ```
pub struct Pipe;

capabilities!(Pipe: decodable, translatable, addressable);

impl Decodable for Pipe {
    fn spec(&self) -> Spec {
        Spec::object([
            ("to", Spec::required_attr("to", destination_type())),
            ("error_to", Spec::optional_attr("error_to", destination_type())),
        ])
    }
}

impl Translatable for Pipe {
    fn manifests(
        &self,
        id: &str,
        config: &Value,
        _: &Value,
        globals: &BridgeGlobals,
    ) -> Vec<serde_json::Value> {
        let name = rfc1123_name(id);

        let mut opts = SubscriptionOptions::default().with_globals(globals);
        let error_to = config.attr("error_to");
        if !error_to.is_null() {
            let mut delivery = opts
                .delivery
                .take()
                .unwrap_or_else(|| serde_json::json!({}));
            delivery["deadLetterSink"] = destination_json(error_to);
            opts.delivery = Some(delivery);
        }

        let subscriber = destination_json(config.attr("to"));
        vec![
            new_channel(&name),
            new_subscription(&name, &name, subscriber, opts),
        ]
    }
}

impl Addressable for Pipe {
    fn address(&self, id: &str, _: &Value, _: &Value) -> Value {
        destination(API_MESSAGING, "Channel", &rfc1123_name(id))
    }
}
