//! Manifest serialization.
//!
//! Manifests are written either as a plain list:
//!
//! ```yaml
//! apiVersion: v1
//! kind: List
//! items: [...]
//! ```
//!
//! or as the components of a Bridge object:
//!
//! ```yaml
//! apiVersion: flow.triggermesh.io/v1alpha1
//! kind: Bridge
//! metadata:
//!   name: my-bridge
//! spec:
//!   components: [...]
//! ```

use serde::Serialize;
use std::io::Write;
use thiserror::Error;
use tracing::debug;

/// Name given to Bridge objects generated from a document without a
/// `bridge` block.
pub const DEFAULT_BRIDGE_ID: &str = "til_generated";

const BRIDGE_API_VERSION: &str = "flow.triggermesh.io/v1alpha1";

/// Failure to encode or write manifests.
#[derive(Debug, Error)]
pub enum EncodeError {
    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to encode YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Envelope {
    /// A Kubernetes `List` of the manifests.
    #[default]
    List,
    /// A `Bridge` object listing the manifests as its components.
    Bridge,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct List<'a> {
    api_version: &'static str,
    kind: &'static str,
    items: &'a [serde_json::Value],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Bridge<'a> {
    api_version: &'static str,
    kind: &'static str,
    metadata: Metadata<'a>,
    spec: BridgeSpec<'a>,
}

#[derive(Serialize)]
struct Metadata<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct BridgeSpec<'a> {
    components: &'a [serde_json::Value],
}

/// Writes manifests in a given format and envelope.
#[derive(Debug, Clone, Copy, Default)]
pub struct Serializer {
    pub format: Format,
    pub envelope: Envelope,
}

impl Serializer {
    pub fn new(format: Format, envelope: Envelope) -> Self {
        Self { format, envelope }
    }

    /// Encodes `manifests` to `w`.
    ///
    /// `bridge_id` names the Bridge envelope and defaults to
    /// [`DEFAULT_BRIDGE_ID`]. It is ignored for lists.
    pub fn write<W: Write>(
        &self,
        mut w: W,
        manifests: &[serde_json::Value],
        bridge_id: Option<&str>,
    ) -> Result<(), EncodeError> {
        debug!(format = ?self.format, envelope = ?self.envelope, items = manifests.len(), "encoding manifests");
        match self.envelope {
            Envelope::List => {
                let list = List {
                    api_version: "v1",
                    kind: "List",
                    items: manifests,
                };
                self.encode(&mut w, &list)
            }
            Envelope::Bridge => {
                let bridge = Bridge {
                    api_version: BRIDGE_API_VERSION,
                    kind: "Bridge",
                    metadata: Metadata {
                        name: bridge_id.unwrap_or(DEFAULT_BRIDGE_ID),
                    },
                    spec: BridgeSpec {
                        components: manifests,
                    },
                };
                self.encode(&mut w, &bridge)
            }
        }
    }

    /// Encodes `manifests` to a string.
    pub fn to_string(
        &self,
        manifests: &[serde_json::Value],
        bridge_id: Option<&str>,
    ) -> Result<String, EncodeError> {
        let mut buf = Vec::new();
        self.write(&mut buf, manifests, bridge_id)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    fn encode<W: Write, T: Serialize>(&self, w: &mut W, value: &T) -> Result<(), EncodeError> {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *w, value)?;
                writeln!(w)?;
            }
            Format::Yaml => serde_yaml::to_writer(&mut *w, value)?,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn manifests() -> Vec<serde_json::Value> {
        vec![json!({
            "apiVersion": "eventing.knative.dev/v1",
            "kind": "Broker",
            "metadata": { "name": "hub" }
        })]
    }

    #[test]
    fn test_json_list() {
        let out = Serializer::default().to_string(&manifests(), None).unwrap();
        assert!(out.starts_with("{\n  \"apiVersion\": \"v1\",\n  \"kind\": \"List\",\n  \"items\": ["));
        assert!(out.ends_with("}\n"));

        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["items"], json!(manifests()));
    }

    #[test]
    fn test_bridge_envelope() {
        let serializer = Serializer::new(Format::Json, Envelope::Bridge);

        let out = serializer.to_string(&manifests(), Some("orders")).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["apiVersion"], json!("flow.triggermesh.io/v1alpha1"));
        assert_eq!(parsed["kind"], json!("Bridge"));
        assert_eq!(parsed["metadata"]["name"], json!("orders"));
        assert_eq!(parsed["spec"]["components"], json!(manifests()));

        let out = serializer.to_string(&manifests(), None).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["metadata"]["name"], json!("til_generated"));
    }

    #[test]
    fn test_yaml_list() {
        let serializer = Serializer::new(Format::Yaml, Envelope::List);
        let out = serializer.to_string(&manifests(), None).unwrap();
        assert!(out.starts_with("apiVersion: v1\nkind: List\nitems:\n"));

        let parsed: serde_json::Value = serde_yaml::from_str(&out).unwrap();
        assert_eq!(parsed["items"][0]["kind"], json!("Broker"));
    }

    #[test]
    fn test_empty_list() {
        let out = Serializer::default().to_string(&[], None).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed, json!({ "apiVersion": "v1", "kind": "List", "items": [] }));
    }
}
