use crate::k8s::{API_KNATIVE_SOURCES_V1BETA1, Object, rfc1123_name, sink_ref};
use crate::secrets;
use bdl_ast::{Diagnostic, Diagnostics, Type, Value};
use bdl_core::address::{is_object_reference, object_reference_type};
use bdl_core::{BridgeGlobals, Decodable, Spec, Translatable};

/// Consumes messages from Kafka topics.
///
/// ```text
/// source "kafka" "orders" {
///   bootstrap_servers = ["kafka.example.com:9092"]
///   topics            = ["orders"]
///   sasl_auth         = secret.kafka
///   tls               = true
///   to                = target.sink
/// }
/// ```
pub struct Kafka;

capabilities!(Kafka: decodable, translatable);

impl Decodable for Kafka {
    fn spec(&self) -> Spec {
        Spec::object([
            (
                "consumer_group",
                Spec::optional_attr("consumer_group", Type::String),
            ),
            (
                "bootstrap_servers",
                Spec::required_attr("bootstrap_servers", Type::list(Type::String)),
            ),
            ("topics", Spec::required_attr("topics", Type::list(Type::String))),
            (
                "sasl_auth",
                Spec::optional_attr("sasl_auth", object_reference_type()),
            ),
            (
                "tls",
                Spec::optional_attr("tls", Type::Dynamic).validated(validate_tls),
            ),
        ])
    }
}

impl Translatable for Kafka {
    fn manifests(
        &self,
        id: &str,
        config: &Value,
        event_dst: &Value,
        _: &BridgeGlobals,
    ) -> Vec<serde_json::Value> {
        let mut s = Object::new(API_KNATIVE_SOURCES_V1BETA1, "KafkaSource", &rfc1123_name(id));

        s.set_optional_str(config.attr("consumer_group"), &["spec", "consumerGroup"]);
        s.set_nested(
            config.attr("bootstrap_servers").string_list(),
            &["spec", "bootstrapServers"],
        );
        s.set_nested(config.attr("topics").string_list(), &["spec", "topics"]);

        if let Some(secret) = config.attr("sasl_auth").attr("name").as_str() {
            let keys = secrets::kafka(secret);
            s.set_nested(true, &["spec", "net", "sasl", "enable"]);
            s.set_nested(keys.sasl_mechanism, &["spec", "net", "sasl", "type", "secretKeyRef"]);
            s.set_nested(keys.user, &["spec", "net", "sasl", "user", "secretKeyRef"]);
            s.set_nested(keys.password, &["spec", "net", "sasl", "password", "secretKeyRef"]);
        }

        let tls = config.attr("tls");
        if is_object_reference(tls) {
            let secret = tls.attr("name").as_str().unwrap_or_default();
            let keys = secrets::kafka(secret);
            s.set_nested(true, &["spec", "net", "tls", "enable"]);
            // The protocol is selected at runtime depending on which keys
            // exist in the Secret.
            for (field, key_ref) in [("caCert", keys.ca_cert), ("cert", keys.cert), ("key", keys.key)] {
                s.set_nested(key_ref, &["spec", "net", "tls", field, "secretKeyRef"]);
                s.set_nested(true, &["spec", "net", "tls", field, "secretKeyRef", "optional"]);
            }
        } else if tls.is_true() {
            s.set_nested(true, &["spec", "net", "tls", "enable"]);
        }

        s.set_nested(sink_ref(event_dst), &["spec", "sink", "ref"]);
        vec![s.into_json()]
    }
}

fn validate_tls(v: &Value) -> Diagnostics {
    if is_object_reference(v) || matches!(v, Value::Bool(_)) {
        return Diagnostics::new();
    }
    Diagnostic::error(
        "Invalid attributes type",
        r#"The "tls" attribute accepts either a secret reference or a boolean."#,
    )
    .into()
}
