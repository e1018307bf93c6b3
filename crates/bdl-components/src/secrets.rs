//! Secret key references.
//!
//! Credentials are given to components as references to a Secret, e.g.
//! `credentials = secret.aws`. Each integration expects specific keys in
//! that Secret; the functions here return the `secretKeyRef` objects
//! pointing at them.

use serde_json::{Value, json};

fn key_ref(secret: &str, key: &str) -> Value {
    json!({ "name": secret, "key": key })
}

/// AWS access key ID and secret access key.
pub fn aws(secret: &str) -> (Value, Value) {
    (
        key_ref(secret, "access_key_id"),
        key_ref(secret, "secret_access_key"),
    )
}

/// Kafka credentials.
pub struct KafkaKeys {
    pub sasl_mechanism: Value,
    pub user: Value,
    pub password: Value,
    pub ca_cert: Value,
    pub cert: Value,
    pub key: Value,
}

pub fn kafka(secret: &str) -> KafkaKeys {
    KafkaKeys {
        sasl_mechanism: key_ref(secret, "sasl.mechanism"),
        user: key_ref(secret, "user"),
        password: key_ref(secret, "password"),
        ca_cert: key_ref(secret, "ca.crt"),
        cert: key_ref(secret, "user.crt"),
        key: key_ref(secret, "user.key"),
    }
}

/// Datadog API key.
pub fn datadog(secret: &str) -> Value {
    key_ref(secret, "apiKey")
}

/// Azure service principal: tenant ID, client ID and client secret.
pub fn azure_service_principal(secret: &str) -> (Value, Value, Value) {
    (
        key_ref(secret, "tenantID"),
        key_ref(secret, "clientID"),
        key_ref(secret, "clientSecret"),
    )
}
