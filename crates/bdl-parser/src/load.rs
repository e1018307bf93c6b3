//! Loading BDL documents from disk.

use crate::parser::parse_bridge;
use bdl_ast::{Bridge, Diagnostics, SourceMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Failure to obtain the source text of a document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads and parses the document at `path`.
///
/// The source text is registered in `sources` so diagnostics can be
/// rendered against it. The returned Bridge remembers `path`, which is the
/// base for relative `file()` arguments.
pub fn load_bridge(
    path: &Path,
    sources: &mut SourceMap,
) -> Result<(Bridge, Diagnostics), LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "loaded document");

    let file_id = sources.add_file(path.to_path_buf(), text);
    let source = sources
        .file(&bdl_ast::Span::zero(file_id))
        .map(|f| f.source.as_str())
        .unwrap_or_default();
    let (mut bridge, diags) = parse_bridge(source, file_id);
    bridge.path = Some(path.to_path_buf());
    Ok((bridge, diags))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_sets_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "bridge \"b\" {{}}").unwrap();

        let mut sources = SourceMap::new();
        let (bridge, diags) = load_bridge(file.path(), &mut sources).unwrap();
        assert!(diags.is_empty(), "{diags}");
        assert_eq!(bridge.identifier.as_deref(), Some("b"));
        assert_eq!(bridge.path.as_deref(), Some(file.path()));
        assert_eq!(sources.file_count(), 1);
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.brg.hcl");
        let err = load_bridge(&path, &mut SourceMap::new()).unwrap_err();
        assert!(err.to_string().starts_with("failed to read"));
    }
}
