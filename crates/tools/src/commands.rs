//! Implementation of the `bdl` subcommands.
//!
//! Each command loads a document, runs the interpreter up to the phase it
//! needs and writes its result to the given writer. Nothing is written when
//! the document has errors.

use bdl::{Document, EncodeError, Envelope, Format, LoadError, Serializer};
use std::io::Write;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Failure of a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The document has errors. Holds the formatted diagnostics.
    #[error("{0}")]
    Diagnostics(String),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Options of `bdl generate`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Wrap the manifests in a Bridge object.
    pub bridge: bool,
    /// Write YAML instead of JSON.
    pub yaml: bool,
}

impl GenerateOptions {
    fn serializer(self) -> Serializer {
        let format = if self.yaml { Format::Yaml } else { Format::Json };
        let envelope = if self.bridge {
            Envelope::Bridge
        } else {
            Envelope::List
        };
        Serializer::new(format, envelope)
    }
}

/// Warnings of a successful command, formatted for display.
pub type Warnings = Option<String>;

/// Writes the manifests generated from the document at `path` to `out`.
pub fn generate<W: Write>(
    path: &Path,
    opts: GenerateOptions,
    out: W,
) -> Result<Warnings, CommandError> {
    let doc = Document::load(path)?;
    let output = doc.generate();
    let warnings = check(&doc, &output.diagnostics)?;

    info!(manifests = output.manifests.len(), "translated {}", path.display());
    opts.serializer()
        .write(out, &output.manifests, doc.bridge().identifier.as_deref())?;
    Ok(warnings)
}

/// Runs the whole translation of the document at `path`, discarding its
/// output.
pub fn validate(path: &Path) -> Result<Warnings, CommandError> {
    let doc = Document::load(path)?;
    let diags = doc.validate();
    check(&doc, &diags)
}

/// Writes the component graph of the document at `path` to `out` in DOT
/// format.
pub fn graph<W: Write>(path: &Path, out: W) -> Result<Warnings, CommandError> {
    let doc = Document::load(path)?;
    let (graph, diags) = doc.graph();
    let warnings = check(&doc, &diags)?;

    debug!(
        vertices = graph.graph().vertex_count(),
        edges = graph.graph().edge_count(),
        "writing graph"
    );
    bdl::encoding::write_dot(out, &graph)?;
    Ok(warnings)
}

fn check(doc: &Document, diags: &bdl::Diagnostics) -> Result<Warnings, CommandError> {
    if diags.has_errors() {
        return Err(CommandError::Diagnostics(doc.format_diagnostics(diags)));
    }
    Ok((!diags.is_empty()).then(|| doc.format_diagnostics(diags)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn document(text: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(text.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_generate_writes_nothing_on_error() {
        let file = document(
            r#"
            source "ping" "a" {
              schedule = "* * * * *"
              to       = target.nonexistent
            }
            "#,
        );
        let mut out = Vec::new();
        let err = generate(file.path(), GenerateOptions::default(), &mut out).unwrap_err();
        assert!(out.is_empty());
        assert!(matches!(err, CommandError::Diagnostics(ref text) if text.contains("target.nonexistent")));
    }

    #[test]
    fn test_generate_yaml_bridge() {
        let file = document(r#"channel "event_broker" "hub" {}"#);
        let mut out = Vec::new();
        let opts = GenerateOptions {
            bridge: true,
            yaml: true,
        };
        let warnings = generate(file.path(), opts, &mut out).unwrap();
        assert!(warnings.is_none());

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("apiVersion: flow.triggermesh.io/v1alpha1\nkind: Bridge\n"), "{text}");
        assert!(text.contains("name: til_generated"), "{text}");
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate(&dir.path().join("nope.brg.hcl")).unwrap_err();
        assert!(matches!(err, CommandError::Load(_)));
    }
}
