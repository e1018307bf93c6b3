//! A BDL document and the interpreter entry points operating on it.

use bdl_ast::{Bridge, DiagnosticFormatter, Diagnostics, SourceMap};
use bdl_core::{BridgeGraph, Context, Registry};
use bdl_parser::LoadError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A parsed document together with its source text.
///
/// Parse diagnostics are kept with the document and carried into every
/// later phase.
#[derive(Debug)]
pub struct Document {
    bridge: Bridge,
    sources: SourceMap,
    diagnostics: Diagnostics,
    registry: Registry,
}

/// Manifests generated from a document, with every diagnostic reported on
/// the way. `manifests` is empty whenever an error was reported.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Output {
    pub manifests: Vec<serde_json::Value>,
    pub diagnostics: Diagnostics,
}

impl Output {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

impl Document {
    /// Reads and parses the document at `path`.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let mut sources = SourceMap::new();
        let (bridge, diagnostics) = bdl_parser::load_bridge(path, &mut sources)?;
        Ok(Self::new(bridge, sources, diagnostics))
    }

    /// Parses `text` as if it was read from `path`.
    pub fn parse(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let path = path.into();
        let text = text.into();
        let mut sources = SourceMap::new();
        let file_id = sources.add_file(path.clone(), text.clone());
        let (mut bridge, diagnostics) = bdl_parser::parse_bridge(&text, file_id);
        bridge.path = Some(path);
        Self::new(bridge, sources, diagnostics)
    }

    fn new(bridge: Bridge, sources: SourceMap, diagnostics: Diagnostics) -> Self {
        Self {
            bridge,
            sources,
            diagnostics,
            registry: bdl_components::registry(),
        }
    }

    /// Replaces the component catalogue the document is interpreted with.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    pub fn bridge(&self) -> &Bridge {
        &self.bridge
    }

    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    /// Diagnostics of the parsing phase.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Builds the component graph. The graph is empty when the document has
    /// parse errors.
    pub fn graph(&self) -> (BridgeGraph, Diagnostics) {
        if self.diagnostics.has_errors() {
            return (BridgeGraph::new(), self.diagnostics.clone());
        }
        let (graph, diags) = Context::new(&self.bridge, &self.registry).graph();
        (graph, self.diagnostics.clone().merged(diags))
    }

    /// Generates the manifests of the document.
    pub fn generate(&self) -> Output {
        if self.diagnostics.has_errors() {
            debug!("document has parse errors, skipping translation");
            return Output {
                manifests: Vec::new(),
                diagnostics: self.diagnostics.clone(),
            };
        }
        let (manifests, diags) = Context::new(&self.bridge, &self.registry).generate();
        Output {
            manifests,
            diagnostics: self.diagnostics.clone().merged(diags),
        }
    }

    /// Runs the whole translation, discarding the manifests.
    pub fn validate(&self) -> Diagnostics {
        self.generate().diagnostics
    }

    /// Renders diagnostics against the document's source text.
    pub fn format_diagnostics(&self, diags: &Diagnostics) -> String {
        DiagnosticFormatter::new(&self.sources).format_all(diags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_errors_stop_translation() {
        let doc = Document::parse("broken.brg.hcl", "source \"kafka\" {");
        assert!(doc.diagnostics().has_errors());

        let output = doc.generate();
        assert!(output.manifests.is_empty());
        assert_eq!(&output.diagnostics, doc.diagnostics());

        let (graph, diags) = doc.graph();
        assert_eq!(graph.graph().vertex_count(), 0);
        assert!(diags.has_errors());
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            source "ping" "tick" {{
              schedule = "* * * * *"
              to       = channel.hub
            }}
            channel "event_broker" "hub" {{}}
            "#
        )
        .unwrap();

        let doc = Document::load(file.path()).unwrap();
        let output = doc.generate();
        assert!(!output.has_errors(), "{}", doc.format_diagnostics(&output.diagnostics));
        assert_eq!(output.manifests.len(), 2);
    }

    #[test]
    fn test_formatted_diagnostics_point_at_source() {
        let doc = Document::parse(
            "bridge.brg.hcl",
            "source \"ping\" \"tick\" {\n  schedule = \"* * * * *\"\n  to = target.missing\n}\n",
        );
        let output = doc.generate();
        assert!(output.has_errors());

        let text = doc.format_diagnostics(&output.diagnostics);
        assert!(text.starts_with("error: Reference to undeclared component\n"), "{text}");
        assert!(text.contains("--> bridge.brg.hcl:3:"), "{text}");
        assert!(text.contains("target.missing"), "{text}");
    }
}
