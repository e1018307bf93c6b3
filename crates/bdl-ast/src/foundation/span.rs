//! Source location tracking for diagnostics.
//!
//! # Design
//!
//! - `Span`: compact byte range inside one file of a [`SourceMap`]
//! - `SourceMap`: owns every loaded source file and answers location queries
//! - `SourceFile`: one source file with a line index
//! - `SourceRange`: a span resolved to a path and line/column positions,
//!   the shape IDE integrations expect
//!
//! # Examples
//!
//! ```
//! # use bdl_ast::foundation::*;
//! # use std::path::PathBuf;
//! let mut map = SourceMap::new();
//! let file_id = map.add_file(PathBuf::from("bridge.brg.hcl"), "bridge \"b\" {}\n".to_string());
//! let span = Span::new(file_id, 0, 6);
//!
//! assert_eq!(map.snippet(&span), "bridge");
//! assert_eq!(map.range(&span).start.line, 1);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Byte range in a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    /// Index into [`SourceMap`] files
    pub file_id: u16,
    /// Byte offset of start position
    pub start: u32,
    /// Byte offset of end position (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a new span.
    pub fn new(file_id: u16, start: u32, end: u32) -> Self {
        Self {
            file_id,
            start,
            end,
        }
    }

    /// Create a zero-length span at the start of a file.
    pub fn zero(file_id: u16) -> Self {
        Self::new(file_id, 0, 0)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// Returns a span covering both `self` and `other`.
    ///
    /// Spans from different files cannot be merged; `self` is returned
    /// unchanged in that case.
    pub fn merge(&self, other: &Span) -> Span {
        if self.file_id != other.file_id {
            return *self;
        }
        Span {
            file_id: self.file_id,
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

/// 1-based line and column of a byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pos {
    pub line: u32,
    pub column: u32,
    pub byte: u32,
}

/// A [`Span`] resolved against its source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRange {
    pub path: PathBuf,
    pub start: Pos,
    pub end: Pos,
}

impl fmt::Display for SourceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.path.display(),
            self.start.line,
            self.start.column
        )
    }
}

/// Collection of all source files known to one run of the interpreter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceMap {
    files: Vec<SourceFile>,
}

/// A single source file with line indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: PathBuf,
    pub source: String,
    /// Byte offsets of each line start.
    ///
    /// `line_starts[0]` is always 0 and the last entry is the EOF sentinel.
    pub line_starts: Vec<u32>,
}

impl SourceMap {
    pub fn new() -> Self {
        Self { files: Vec::new() }
    }

    /// Add a source file and return its ID.
    pub fn add_file(&mut self, path: PathBuf, source: String) -> u16 {
        let file_id = u16::try_from(self.files.len()).unwrap_or(u16::MAX);
        self.files.push(SourceFile::new(path, source));
        file_id
    }

    /// Get the source file a span points into, if it is known.
    pub fn file(&self, span: &Span) -> Option<&SourceFile> {
        self.files.get(span.file_id as usize)
    }

    /// Get the file path for a span.
    ///
    /// Spans pointing outside the map resolve to an empty path.
    pub fn file_path(&self, span: &Span) -> &Path {
        self.file(span)
            .map(|f| f.path.as_path())
            .unwrap_or_else(|| Path::new(""))
    }

    /// Get the source text covered by a span.
    pub fn snippet(&self, span: &Span) -> &str {
        self.file(span)
            .and_then(|f| f.source.get(span.start as usize..span.end as usize))
            .unwrap_or("")
    }

    /// Get the (line, column) position for a span's start. Both are 1-based.
    pub fn line_col(&self, span: &Span) -> (u32, u32) {
        self.file(span)
            .map(|f| {
                let pos = f.pos(span.start);
                (pos.line, pos.column)
            })
            .unwrap_or((1, 1))
    }

    /// Resolve a span into a path and start/end positions.
    pub fn range(&self, span: &Span) -> SourceRange {
        match self.file(span) {
            Some(file) => SourceRange {
                path: file.path.clone(),
                start: file.pos(span.start),
                end: file.pos(span.end),
            },
            None => SourceRange {
                path: PathBuf::new(),
                start: Pos {
                    line: 1,
                    column: 1,
                    byte: span.start,
                },
                end: Pos {
                    line: 1,
                    column: 1,
                    byte: span.end,
                },
            },
        }
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

impl SourceFile {
    /// Create a new source file with precomputed line starts.
    pub fn new(path: PathBuf, source: String) -> Self {
        let line_starts = compute_line_starts(&source);
        Self {
            path,
            source,
            line_starts,
        }
    }

    /// Get the 1-based position of a byte offset.
    ///
    /// Offsets past EOF are clamped to EOF.
    pub fn pos(&self, offset: u32) -> Pos {
        let offset = offset.min(self.source.len() as u32);
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(idx) => idx.min(self.line_starts.len().saturating_sub(2)),
            Err(idx) => idx.max(1) - 1,
        };

        Pos {
            line: line_idx as u32 + 1,
            column: offset - self.line_starts[line_idx] + 1,
            byte: offset,
        }
    }

    /// Get the text of a specific line (1-based), without its line break.
    pub fn line_text(&self, line: u32) -> Option<&str> {
        if line == 0 || line as usize >= self.line_starts.len() {
            return None;
        }
        let start = self.line_starts[line as usize - 1] as usize;
        let end = self.line_starts[line as usize] as usize;
        self.source
            .get(start..end)
            .map(|l| l.trim_end_matches(['\n', '\r']))
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len().saturating_sub(1)
    }
}

/// Compute byte offsets of line starts, terminated by an EOF sentinel.
fn compute_line_starts(source: &str) -> Vec<u32> {
    let mut line_starts = vec![0];

    for (idx, ch) in source.char_indices() {
        if ch == '\n' {
            line_starts.push((idx + 1) as u32);
        }
    }

    if line_starts.last() != Some(&(source.len() as u32)) {
        line_starts.push(source.len() as u32);
    }

    line_starts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(src: &str) -> SourceFile {
        SourceFile::new(PathBuf::from("test.brg.hcl"), src.to_string())
    }

    #[test]
    fn test_compute_line_starts() {
        assert_eq!(compute_line_starts("a\nbc\nd"), vec![0, 2, 5, 6]);
        assert_eq!(compute_line_starts("a\nbc\n"), vec![0, 2, 5]);
    }

    #[test]
    fn test_positions() {
        let f = file("source \"kafka\" \"k\" {\n  topics = []\n}\n");
        assert_eq!(f.pos(0), Pos { line: 1, column: 1, byte: 0 });
        assert_eq!(f.pos(23).line, 2);
        assert_eq!(f.pos(23).column, 3);
        assert_eq!(f.pos(10_000).byte, f.source.len() as u32);
    }

    #[test]
    fn test_line_text_strips_line_break() {
        let f = file("one\ntwo\n");
        assert_eq!(f.line_text(1), Some("one"));
        assert_eq!(f.line_text(2), Some("two"));
        assert_eq!(f.line_text(3), None);
        assert_eq!(f.line_count(), 2);
    }

    #[test]
    fn test_merge() {
        let merged = Span::new(0, 4, 8).merge(&Span::new(0, 2, 6));
        assert_eq!(merged, Span::new(0, 2, 8));

        let other_file = Span::new(1, 0, 1);
        assert_eq!(Span::new(0, 4, 8).merge(&other_file), Span::new(0, 4, 8));
    }

    #[test]
    fn test_source_map_range() {
        let mut map = SourceMap::new();
        let id = map.add_file(PathBuf::from("b.hcl"), "x = 1\ny = 2\n".to_string());
        let range = map.range(&Span::new(id, 6, 11));
        assert_eq!(range.start.line, 2);
        assert_eq!(range.end.column, 6);
        assert_eq!(range.to_string(), "b.hcl:2:1");
        assert_eq!(map.snippet(&Span::new(id, 6, 11)), "y = 2");
    }

    #[test]
    fn test_unknown_file_does_not_panic() {
        let map = SourceMap::new();
        let span = Span::new(3, 1, 2);
        assert_eq!(map.snippet(&span), "");
        assert_eq!(map.line_col(&span), (1, 1));
        assert_eq!(map.file_path(&span), Path::new(""));
    }
}
