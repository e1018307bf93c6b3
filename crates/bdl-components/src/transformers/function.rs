use crate::k8s::{
    API_FLOW, API_MESSAGING, API_TARGETS, Object, SubscriptionOptions, new_channel,
    new_destination_json, new_subscription, rfc1123_name, sink_ref,
};
use bdl_ast::{Type, Value};
use bdl_core::address::destination;
use bdl_core::{Addressable, BridgeGlobals, Decodable, Spec, Translatable};

const DEFAULT_ENTRYPOINT: &str = "main";

/// Runtime executed by an InfraTarget instead of a Function.
const JS_RUNTIME: &str = "js";

/// Inline code transforming events.
///
/// JavaScript functions run inside an InfraTarget subscribed to a Channel,
/// whose replies are sent to the next hop. Other runtimes run as a Function.
pub struct Function;

capabilities!(Function: decodable, translatable, addressable);

fn is_js(config: &Value) -> bool {
    config.attr("runtime").as_str() == Some(JS_RUNTIME)
}

impl Decodable for Function {
    fn spec(&self) -> Spec {
        Spec::object([
            ("runtime", Spec::required_attr("runtime", Type::String)),
            ("code", Spec::required_attr("code", Type::String)),
            ("entrypoint", Spec::optional_attr("entrypoint", Type::String)),
            ("public", Spec::optional_attr("public", Type::Bool)),
        ])
    }
}

impl Translatable for Function {
    fn manifests(
        &self,
        id: &str,
        config: &Value,
        event_dst: &Value,
        globals: &BridgeGlobals,
    ) -> Vec<serde_json::Value> {
        let name = rfc1123_name(id);

        if is_js(config) {
            let mut target = Object::new(API_TARGETS, "InfraTarget", &name);
            target.set_optional_str(config.attr("code"), &["spec", "script", "code"]);

            let subscriber = new_destination_json(API_TARGETS, "InfraTarget", &name);
            let mut opts = SubscriptionOptions::default().with_globals(globals);
            if !event_dst.is_null() {
                opts = opts.reply_to(event_dst);
            }
            return vec![
                target.into_json(),
                new_channel(&name),
                new_subscription(&name, &name, subscriber, opts),
            ];
        }

        let mut f = Object::new(API_FLOW, "Function", &name);
        f.set_optional_str(config.attr("runtime"), &["spec", "runtime"]);
        f.set_optional_str(config.attr("code"), &["spec", "code"]);
        let entrypoint = config
            .attr("entrypoint")
            .as_str()
            .unwrap_or(DEFAULT_ENTRYPOINT);
        f.set_nested(entrypoint, &["spec", "entrypoint"]);
        if !event_dst.is_null() {
            f.set_nested(sink_ref(event_dst), &["spec", "sink", "ref"]);
        }
        let public = config.attr("public").as_bool().unwrap_or(false);
        f.set_nested(public, &["spec", "public"]);
        vec![f.into_json()]
    }
}

impl Addressable for Function {
    fn address(&self, id: &str, config: &Value, _: &Value) -> Value {
        let name = rfc1123_name(id);
        if is_js(config) {
            destination(API_MESSAGING, "Channel", &name)
        } else {
            destination(API_FLOW, "Function", &name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bdl_core::address::destination as dst;
    use serde_json::json;

    fn config(runtime: &str) -> Value {
        Value::object([
            ("runtime", Value::string(runtime)),
            ("code", Value::string("return event")),
        ])
    }

    #[test]
    fn test_js_function_runs_behind_a_channel() {
        let next = dst(API_TARGETS, "AWSSNSTarget", "sns");
        let manifests = Function.manifests("f", &config("js"), &next, &BridgeGlobals::default());

        let kinds: Vec<_> = manifests.iter().map(|m| m["kind"].clone()).collect();
        assert_eq!(kinds, [json!("InfraTarget"), json!("Channel"), json!("Subscription")]);
        assert_eq!(manifests[0]["spec"]["script"]["code"], json!("return event"));
        assert_eq!(manifests[2]["spec"]["subscriber"]["ref"]["kind"], json!("InfraTarget"));
        assert_eq!(manifests[2]["spec"]["reply"]["ref"]["name"], json!("sns"));

        let addr = Function.address("f", &config("js"), &next);
        assert_eq!(addr, dst(API_MESSAGING, "Channel", "f"));
    }

    #[test]
    fn test_other_runtimes_translate_to_function() {
        let manifests =
            Function.manifests("f", &config("python"), &Value::Null, &BridgeGlobals::default());

        assert_eq!(manifests.len(), 1);
        assert_eq!(manifests[0]["kind"], json!("Function"));
        assert_eq!(manifests[0]["spec"]["entrypoint"], json!("main"));
        assert_eq!(manifests[0]["spec"]["runtime"], json!("python"));
        assert_eq!(manifests[0]["spec"]["public"], json!(false));
        assert!(manifests[0]["spec"].get("sink").is_none());

        let addr = Function.address("f", &config("python"), &Value::Null);
        assert_eq!(addr, dst(API_FLOW, "Function", "f"));
    }
}
