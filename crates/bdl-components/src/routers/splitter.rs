use crate::k8s::{API_FLOW, Object, rfc1123_name, sink_ref};
use bdl_ast::{Type, Value};
use bdl_core::address::{destination, destination_type};
use bdl_core::{Addressable, BridgeGlobals, Decodable, Spec, Translatable};

/// Splits events carrying a list into one event per element.
pub struct Splitter;

capabilities!(Splitter: decodable, translatable, addressable);

impl Decodable for Splitter {
    fn spec(&self) -> Spec {
        Spec::object([
            ("path", Spec::required_attr("path", Type::String)),
            (
                "ce_context",
                Spec::block(
                    "ce_context",
                    Spec::object([
                        ("type", Spec::required_attr("type", Type::String)),
                        ("source", Spec::required_attr("source", Type::String)),
                        (
                            "extensions",
                            Spec::optional_attr("extensions", Type::map(Type::String)),
                        ),
                    ]),
                    true,
                ),
            ),
            ("to", Spec::required_attr("to", destination_type())),
        ])
    }
}

impl Translatable for Splitter {
    fn manifests(
        &self,
        id: &str,
        config: &Value,
        _: &Value,
        _: &BridgeGlobals,
    ) -> Vec<serde_json::Value> {
        let mut s = Object::new(API_FLOW, "Splitter", &rfc1123_name(id));
        s.set_optional_str(config.attr("path"), &["spec", "path"]);

        let ce_context = config.attr("ce_context");
        s.set_optional_str(ce_context.attr("type"), &["spec", "ceContext", "type"]);
        s.set_optional_str(ce_context.attr("source"), &["spec", "ceContext", "source"]);
        if let Some(ext) = ce_context.attr("extensions").as_object() {
            s.set_nested(
                Value::Object(ext.clone()).to_json(),
                &["spec", "ceContext", "extensions"],
            );
        }

        s.set_nested(sink_ref(config.attr("to")), &["spec", "sink", "ref"]);
        vec![s.into_json()]
    }
}

impl Addressable for Splitter {
    fn address(&self, id: &str, _: &Value, _: &Value) -> Value {
        destination(API_FLOW, "Splitter", &rfc1123_name(id))
    }
}
