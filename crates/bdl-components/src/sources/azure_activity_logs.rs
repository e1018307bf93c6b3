use crate::k8s::{API_SOURCES, Object, rfc1123_name, sink_ref};
use crate::secrets;
use bdl_ast::{Type, Value};
use bdl_core::address::object_reference_type;
use bdl_core::{BridgeGlobals, Decodable, Spec, Translatable};

/// Subscribes to Azure Activity Logs through an Event Hub.
pub struct AzureActivityLogs;

capabilities!(AzureActivityLogs: decodable, translatable);

impl Decodable for AzureActivityLogs {
    fn spec(&self) -> Spec {
        Spec::object([
            ("event_hub_id", Spec::required_attr("event_hub_id", Type::String)),
            (
                "event_hubs_sas_policy",
                Spec::optional_attr("event_hubs_sas_policy", Type::String),
            ),
            (
                "categories",
                Spec::optional_attr("categories", Type::list(Type::String)),
            ),
            ("auth", Spec::required_attr("auth", object_reference_type())),
        ])
    }
}

impl Translatable for AzureActivityLogs {
    fn manifests(
        &self,
        id: &str,
        config: &Value,
        event_dst: &Value,
        _: &BridgeGlobals,
    ) -> Vec<serde_json::Value> {
        let mut s = Object::new(API_SOURCES, "AzureActivityLogsSource", &rfc1123_name(id));

        s.set_optional_str(config.attr("event_hub_id"), &["spec", "eventHubID"]);
        s.set_optional_str(
            config.attr("event_hubs_sas_policy"),
            &["spec", "eventHubsSASPolicy"],
        );
        let categories = config.attr("categories");
        if !categories.is_null() {
            s.set_nested(categories.string_list(), &["spec", "categories"]);
        }

        let secret = config.attr("auth").attr("name").as_str().unwrap_or_default();
        let (tenant_id, client_id, client_secret) = secrets::azure_service_principal(secret);
        let sp = |field| ["spec", "auth", "servicePrincipal", field, "valueFromSecret"];
        s.set_nested(tenant_id, &sp("tenantID"));
        s.set_nested(client_id, &sp("clientID"));
        s.set_nested(client_secret, &sp("clientSecret"));

        s.set_nested(sink_ref(event_dst), &["spec", "sink", "ref"]);
        vec![s.into_json()]
    }
}
