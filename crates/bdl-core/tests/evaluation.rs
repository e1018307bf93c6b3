//! End-to-end evaluation with a minimal set of components.

use bdl_ast::{Bridge, ComponentCategory, Type, Value};
use bdl_core::address::{address_for, destination, destination_type};
use bdl_core::{
    Addressable, BridgeGlobals, ComponentImpl, Context, Decodable, Registry, Spec, Translatable,
};
use serde_json::json;

/// A component with an optional `tag` attribute, emitting one manifest
/// naming its destination.
struct Echo {
    kind: &'static str,
}

impl Decodable for Echo {
    fn spec(&self) -> Spec {
        Spec::object([
            ("tag", Spec::optional_attr("tag", Type::String)),
            ("peer", Spec::optional_attr("peer", destination_type())),
        ])
    }
}

impl Translatable for Echo {
    fn manifests(
        &self,
        id: &str,
        config: &Value,
        event_dst: &Value,
        globals: &BridgeGlobals,
    ) -> Vec<serde_json::Value> {
        vec![json!({
            "kind": self.kind,
            "name": id,
            "tag": config.attr("tag").to_json(),
            "sink": event_dst.attr("ref").attr("name").to_json(),
            "peer": config.attr("peer").attr("ref").attr("name").to_json(),
            "retries": globals.retries(),
            "dead_letter_sink": globals.dead_letter_sink().map(|d| d.attr("ref").attr("name").to_json()),
        })]
    }
}

impl Addressable for Echo {
    fn address(&self, id: &str, _: &Value, event_dst: &Value) -> Value {
        address_for(event_dst, || destination("test/v1", self.kind, id), id)
    }
}

impl ComponentImpl for Echo {
    fn decodable(&self) -> Option<&dyn Decodable> {
        Some(self)
    }
    fn translatable(&self) -> Option<&dyn Translatable> {
        Some(self)
    }
    fn addressable(&self) -> Option<&dyn Addressable> {
        Some(self)
    }
}

/// A source: no address.
struct Emitter;

impl Translatable for Emitter {
    fn manifests(&self, id: &str, _: &Value, event_dst: &Value, _: &BridgeGlobals) -> Vec<serde_json::Value> {
        vec![json!({ "kind": "Emitter", "name": id, "sink": event_dst.attr("ref").attr("name").to_json() })]
    }
}

impl ComponentImpl for Emitter {
    fn translatable(&self) -> Option<&dyn Translatable> {
        Some(self)
    }
}

struct Panicking;

impl Translatable for Panicking {
    fn manifests(&self, _: &str, _: &Value, _: &Value, _: &BridgeGlobals) -> Vec<serde_json::Value> {
        panic!("boom")
    }
}

impl ComponentImpl for Panicking {
    fn translatable(&self) -> Option<&dyn Translatable> {
        Some(self)
    }
}

fn registry() -> Registry {
    let mut r = Registry::new();
    r.register(ComponentCategory::Source, "emitter", Emitter)
        .register(ComponentCategory::Channel, "echo", Echo { kind: "EchoChannel" })
        .register(ComponentCategory::Transformer, "echo", Echo { kind: "EchoTransformer" })
        .register(ComponentCategory::Target, "echo", Echo { kind: "EchoTarget" })
        .register(ComponentCategory::Target, "panicking", Panicking);
    r
}

fn parse(source: &str) -> Bridge {
    let (bridge, diags) = bdl_parser::parse_bridge(source, 0);
    assert!(diags.is_empty(), "{diags}");
    bridge
}

fn names(manifests: &[serde_json::Value]) -> Vec<String> {
    manifests
        .iter()
        .map(|m| format!("{} {}", m["kind"].as_str().unwrap(), m["name"].as_str().unwrap()))
        .collect()
}

#[test]
fn test_linear_chain() {
    let bridge = parse(
        r#"
        source "emitter" "s" { to = target.t }
        target "echo" "t" { tag = "final" }
        "#,
    );
    let registry = registry();
    let (manifests, diags) = Context::new(&bridge, &registry).generate();
    assert!(diags.is_empty(), "{diags}");
    assert_eq!(names(&manifests), ["Emitter s", "EchoTarget t"]);
    assert_eq!(manifests[0]["sink"], "t");
    assert_eq!(manifests[1]["tag"], "final");
}

#[test]
fn test_cycle_is_translated_once() {
    let bridge = parse(
        r#"
        source "emitter" "a" { to = transformer.b }
        transformer "echo" "b" { to = target.c }
        target "echo" "c" { to = transformer.b }
        "#,
    );
    let registry = registry();
    let (manifests, diags) = Context::new(&bridge, &registry).generate();
    assert!(diags.is_empty(), "{diags}");
    assert_eq!(
        names(&manifests),
        ["Emitter a", "EchoTransformer b", "EchoTarget c"]
    );
    // Both members reply into the chain and are addressed through channels.
    assert_eq!(manifests[0]["sink"], "b");
    assert_eq!(manifests[1]["sink"], "c");
    assert_eq!(manifests[2]["sink"], "b");
}

#[test]
fn test_cycle_through_attributes() {
    let bridge = parse(
        r#"
        channel "echo" "x" { peer = channel.y }
        channel "echo" "y" { peer = channel.x }
        "#,
    );
    let registry = registry();
    let (manifests, diags) = Context::new(&bridge, &registry).generate();
    assert!(diags.is_empty(), "{diags}");
    assert_eq!(names(&manifests), ["EchoChannel x", "EchoChannel y"]);
    assert_eq!(manifests[0]["peer"], "y");
    assert_eq!(manifests[1]["peer"], "x");
}

#[test]
fn test_generation_is_deterministic() {
    let source = r#"
        channel "echo" "hub" { }
        source "emitter" "s2" { to = channel.hub }
        source "emitter" "s1" { to = channel.hub }
        target "echo" "t" { to = channel.hub }
    "#;
    let registry = registry();
    let first = Context::new(&parse(source), &registry).generate();
    for _ in 0..5 {
        assert_eq!(Context::new(&parse(source), &registry).generate(), first);
    }
    assert_eq!(
        names(&first.0),
        ["Emitter s1", "Emitter s2", "EchoTarget t", "EchoChannel hub"]
    );
}

#[test]
fn test_errors_discard_manifests() {
    let bridge = parse(
        r#"
        source "emitter" "s" { to = target.t }
        target "echo" "t" { tag = ["not", "a", "string"] }
        "#,
    );
    let registry = registry();
    let (manifests, diags) = Context::new(&bridge, &registry).generate();
    assert!(manifests.is_empty());
    assert_eq!(diags.len(), 1);
    assert_eq!(diags.as_slice()[0].summary, "Incorrect attribute value type");
}

#[test]
fn test_graph_errors_stop_before_evaluation() {
    let bridge = parse(r#"source "emitter" "s" { to = target.nonexistent }"#);
    let registry = registry();
    let (manifests, diags) = Context::new(&bridge, &registry).generate();
    assert!(manifests.is_empty());
    assert_eq!(diags.len(), 1);
    assert!(
        diags.as_slice()[0]
            .detail
            .contains("reference to undeclared component target.nonexistent")
    );
}

#[test]
fn test_translation_panic_becomes_diagnostic() {
    let bridge = parse(r#"target "panicking" "p" { }"#);
    let registry = registry();
    let (manifests, diags) = Context::new(&bridge, &registry).generate();
    assert!(manifests.is_empty());
    assert_eq!(diags.as_slice()[0].summary, "Translation failure");
    assert!(diags.as_slice()[0].detail.contains("boom"));
}

#[test]
fn test_globals_passed_to_translators() {
    let bridge = parse(
        r#"
        bridge "b" {
            delivery {
                retries = 4
                dead_letter_sink = target.dls
            }
        }
        source "emitter" "s" { to = channel.c }
        channel "echo" "c" { peer = target.t }
        target "echo" "t" { }
        target "echo" "dls" { }
        "#,
    );
    let registry = registry();
    let (manifests, diags) = Context::new(&bridge, &registry).generate();
    assert!(diags.is_empty(), "{diags}");
    assert!(manifests.iter().skip(1).all(|m| m["retries"] == 4));
}

#[test]
fn test_globals_reach_channels_without_destination() {
    let bridge = parse(
        r#"
        bridge "b" {
            delivery {
                retries = 1
                dead_letter_sink = channel.a
            }
        }
        channel "echo" "a" { }
        channel "echo" "hub" { }
        target "echo" "t" { }
        "#,
    );
    let registry = registry();
    let (manifests, diags) = Context::new(&bridge, &registry).generate();
    assert!(diags.is_empty(), "{diags}");
    assert_eq!(names(&manifests), ["EchoChannel hub", "EchoChannel a", "EchoTarget t"]);
    assert_eq!(manifests[0]["dead_letter_sink"], "a");
    assert_eq!(manifests[1]["dead_letter_sink"], "a");
}
