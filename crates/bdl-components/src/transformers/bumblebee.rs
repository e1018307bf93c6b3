use crate::k8s::{API_FLOW, Object, rfc1123_name, sink_ref};
use bdl_ast::{Type, Value};
use bdl_core::address::destination;
use bdl_core::{Addressable, BridgeGlobals, Decodable, Spec, Translatable};
use serde_json::json;

/// Declarative transformation of event context attributes and data.
///
/// ```text
/// transformer "bumblebee" "tag" {
///   to = target.sink
///   context {
///     operation "add" {
///       path {
///         key   = "type"
///         value = "io.example.tagged"
///       }
///     }
///   }
/// }
/// ```
pub struct Bumblebee;

capabilities!(Bumblebee: decodable, translatable, addressable);

fn operations_spec() -> Spec {
    Spec::block_list(
        "operation",
        Spec::object([
            ("operation", Spec::label(0, "operation")),
            (
                "path",
                Spec::block_list(
                    "path",
                    Spec::object([
                        ("key", Spec::optional_attr("key", Type::String)),
                        ("value", Spec::optional_attr("value", Type::String)),
                    ]),
                    1,
                    0,
                ),
            ),
        ]),
        0,
        0,
    )
}

impl Decodable for Bumblebee {
    fn spec(&self) -> Spec {
        Spec::object([
            ("context", Spec::block("context", Spec::object([("operation", operations_spec())]), false)),
            ("data", Spec::block("data", Spec::object([("operation", operations_spec())]), false)),
        ])
    }
}

impl Translatable for Bumblebee {
    fn manifests(
        &self,
        id: &str,
        config: &Value,
        event_dst: &Value,
        _: &BridgeGlobals,
    ) -> Vec<serde_json::Value> {
        let mut t = Object::new(API_FLOW, "Transformation", &rfc1123_name(id));
        t.set_nested(operations(config.attr("context")), &["spec", "context"]);
        t.set_nested(operations(config.attr("data")), &["spec", "data"]);
        t.set_nested(sink_ref(event_dst), &["spec", "sink", "ref"]);
        vec![t.into_json()]
    }
}

impl Addressable for Bumblebee {
    fn address(&self, id: &str, _: &Value, _: &Value) -> Value {
        destination(API_FLOW, "Transformation", &rfc1123_name(id))
    }
}

fn operations(block: &Value) -> serde_json::Value {
    let ops = block.attr("operation").as_list().unwrap_or_default();
    ops.iter()
        .map(|op| {
            let paths: Vec<serde_json::Value> = op
                .attr("path")
                .as_list()
                .unwrap_or_default()
                .iter()
                .map(|path| {
                    let mut p = serde_json::Map::new();
                    if let Some(key) = path.attr("key").as_str() {
                        p.insert("key".into(), key.into());
                    }
                    if let Some(value) = path.attr("value").as_str() {
                        p.insert("value".into(), value.into());
                    }
                    serde_json::Value::Object(p)
                })
                .collect();
            json!({ "operation": op.attr("operation").to_json(), "paths": paths })
        })
        .collect()
}
