use crate::k8s::{API_TARGETS, Object, reply_manifests, rfc1123_name};
use crate::secrets;
use bdl_ast::{Type, Value};
use bdl_core::address::{address_for, destination, object_reference_type};
use bdl_core::{Addressable, BridgeGlobals, Decodable, Spec, Translatable};

const KIND: &str = "AWSSNSTarget";

/// Publishes events to an Amazon SNS topic.
///
/// ```text
/// target "aws_sns" "notify" {
///   arn         = "arn:aws:sns:us-east-1:123456789012:notify"
///   credentials = secret.aws
/// }
/// ```
pub struct AwsSns;

capabilities!(AwsSns: decodable, translatable, addressable);

impl Decodable for AwsSns {
    fn spec(&self) -> Spec {
        Spec::object([
            ("arn", Spec::required_attr("arn", Type::String)),
            (
                "credentials",
                Spec::required_attr("credentials", object_reference_type()),
            ),
        ])
    }
}

impl Translatable for AwsSns {
    fn manifests(
        &self,
        id: &str,
        config: &Value,
        event_dst: &Value,
        globals: &BridgeGlobals,
    ) -> Vec<serde_json::Value> {
        let name = rfc1123_name(id);

        let mut t = Object::new(API_TARGETS, KIND, &name);
        t.set_optional_str(config.attr("arn"), &["spec", "arn"]);

        let secret = config
            .attr("credentials")
            .attr("name")
            .as_str()
            .unwrap_or_default();
        let (access_key, secret_key) = secrets::aws(secret);
        t.set_nested(access_key, &["spec", "awsApiKey", "secretKeyRef"]);
        t.set_nested(secret_key, &["spec", "awsApiSecret", "secretKeyRef"]);

        let mut manifests = vec![t.into_json()];
        manifests.extend(reply_manifests(&name, API_TARGETS, KIND, event_dst, globals));
        manifests
    }
}

impl Addressable for AwsSns {
    fn address(&self, id: &str, _: &Value, event_dst: &Value) -> Value {
        address_for(
            event_dst,
            || destination(API_TARGETS, KIND, &rfc1123_name(id)),
            id,
        )
    }
}
