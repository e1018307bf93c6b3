//! Diagnostic accumulation shared by every phase.
//!
//! Language-level problems (syntax, schema, references, validators, graph
//! construction) are never raised as Rust errors. Each phase appends them to a
//! [`Diagnostics`] value and hands it to the next phase, which extends it with
//! its own findings. Nothing is ever removed.
//!
//! # Examples
//!
//! ```
//! # use bdl_ast::diagnostics::*;
//! let mut diags = Diagnostics::new();
//! diags.push(Diagnostic::warning("Deprecated attribute", "Use \"to\" instead."));
//! assert!(!diags.has_errors());
//!
//! diags.push(Diagnostic::error("Missing required argument", "The argument \"arn\" is required."));
//! assert!(diags.has_errors());
//! ```

use crate::foundation::{SourceMap, Span};
use std::fmt;

/// Diagnostic severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// A single report produced by any phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Short description, e.g. "Unsupported argument"
    pub summary: String,
    /// Longer explanation, usually naming the offending item
    pub detail: String,
    /// Range the diagnostic is about
    pub subject: Option<Span>,
    /// Enclosing range, e.g. the component block containing `subject`
    pub context: Option<Span>,
    /// Source text of the expression involved, when there is one
    pub expression: Option<String>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::with_severity(Severity::Error, summary, detail)
    }

    pub fn warning(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::with_severity(Severity::Warning, summary, detail)
    }

    fn with_severity(
        severity: Severity,
        summary: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            summary: summary.into(),
            detail: detail.into(),
            subject: None,
            context: None,
            expression: None,
        }
    }

    pub fn with_subject(mut self, span: Span) -> Self {
        self.subject = Some(span);
        self
    }

    /// Sets the subject only if none was set yet.
    pub fn or_subject(mut self, span: Span) -> Self {
        self.subject.get_or_insert(span);
        self
    }

    pub fn with_context(mut self, span: Span) -> Self {
        self.context = Some(span);
        self
    }

    pub fn with_expression(mut self, expression: impl Into<String>) -> Self {
        self.expression = Some(expression.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.summary)?;
        if !self.detail.is_empty() {
            write!(f, "; {}", self.detail)?;
        }
        Ok(())
    }
}

/// Ordered, append-only list of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics(Vec<Diagnostic>);

impl Diagnostics {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, diag: Diagnostic) {
        self.0.push(diag);
    }

    /// Appends every diagnostic of `other`, preserving order.
    pub fn append(&mut self, other: Diagnostics) {
        self.0.extend(other.0);
    }

    /// Chaining form of [`Diagnostics::append`].
    pub fn merged(mut self, other: Diagnostics) -> Self {
        self.append(other);
        self
    }

    pub fn has_errors(&self) -> bool {
        self.0.iter().any(Diagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.0.iter().filter(|d| d.is_error())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.0
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diag: Diagnostic) -> Self {
        Self(vec![diag])
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diag) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{diag}")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}

/// Formats diagnostics with source code context.
///
/// Produces messages with:
/// - severity and summary
/// - file path and line/column location
/// - the offending source line with `^^^` under the subject range
/// - the detail text
pub struct DiagnosticFormatter<'a> {
    sources: &'a SourceMap,
}

impl<'a> DiagnosticFormatter<'a> {
    pub fn new(sources: &'a SourceMap) -> Self {
        Self { sources }
    }

    /// Formats a diagnostic as a string with source context.
    pub fn format(&self, diag: &Diagnostic) -> String {
        let mut output = format!("{}: {}\n", diag.severity, diag.summary);

        if let Some(span) = diag.subject.as_ref() {
            let range = self.sources.range(span);
            output.push_str(&format!("  --> {range}\n"));

            if let Some(line) = self
                .sources
                .file(span)
                .and_then(|f| f.line_text(range.start.line))
            {
                let start_col = range.start.column as usize;
                let width = if range.end.line == range.start.line {
                    (range.end.column as usize).saturating_sub(start_col)
                } else {
                    line.len() + 1 - start_col.min(line.len() + 1)
                };
                output.push_str("   |\n");
                output.push_str(&format!("{:3} | {}\n", range.start.line, line));
                output.push_str(&format!(
                    "   | {}{}\n",
                    " ".repeat(start_col.saturating_sub(1)),
                    "^".repeat(width.max(1))
                ));
            }
        }

        if !diag.detail.is_empty() {
            output.push_str(&format!("   = {}\n", diag.detail));
        }

        output
    }

    /// Formats multiple diagnostics, separated by blank lines.
    pub fn format_all(&self, diags: &Diagnostics) -> String {
        diags
            .iter()
            .map(|d| self.format(d))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_has_errors_only_counts_errors() {
        let mut diags = Diagnostics::new();
        assert!(!diags.has_errors());

        diags.push(Diagnostic::warning("w", ""));
        assert!(!diags.has_errors());
        assert_eq!(diags.len(), 1);

        diags.push(Diagnostic::error("e", "detail"));
        assert!(diags.has_errors());
        assert_eq!(diags.errors().count(), 1);
    }

    #[test]
    fn test_append_preserves_order() {
        let first: Diagnostics = vec![Diagnostic::error("a", ""), Diagnostic::warning("b", "")]
            .into_iter()
            .collect();
        let second = Diagnostics::from(Diagnostic::error("c", ""));

        let all = first.merged(second);
        let summaries: Vec<_> = all.iter().map(|d| d.summary.as_str()).collect();
        assert_eq!(summaries, ["a", "b", "c"]);
    }

    #[test]
    fn test_or_subject_keeps_existing() {
        let diag = Diagnostic::error("x", "")
            .with_subject(Span::new(0, 1, 2))
            .or_subject(Span::new(0, 5, 6));
        assert_eq!(diag.subject, Some(Span::new(0, 1, 2)));
    }

    #[test]
    fn test_display() {
        let diags: Diagnostics = vec![
            Diagnostic::error("Missing required argument", "The argument \"arn\" is required."),
            Diagnostic::warning("Empty bridge", ""),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            diags.to_string(),
            "error: Missing required argument; The argument \"arn\" is required.\nwarning: Empty bridge"
        );
    }

    #[test]
    fn test_formatter_underlines_subject() {
        let mut sources = SourceMap::new();
        let id = sources.add_file(
            PathBuf::from("bridge.hcl"),
            "source \"kafka\" \"k\" {\n  tls = 42\n}\n".to_string(),
        );
        let diag = Diagnostic::error(
            "Invalid attributes type",
            "The \"tls\" attribute accepts either a secret reference or a boolean.",
        )
        .with_subject(Span::new(id, 29, 31));

        let formatted = DiagnosticFormatter::new(&sources).format(&diag);
        assert!(formatted.starts_with("error: Invalid attributes type\n"));
        assert!(formatted.contains("--> bridge.hcl:2:9"));
        assert!(formatted.contains("  2 |   tls = 42"));
        assert!(formatted.contains("   |         ^^"));
        assert!(formatted.contains("= The \"tls\" attribute"));
    }

    #[test]
    fn test_formatter_without_subject() {
        let sources = SourceMap::new();
        let formatted =
            DiagnosticFormatter::new(&sources).format(&Diagnostic::error("Failed to read", "boom"));
        assert_eq!(formatted, "error: Failed to read\n   = boom\n");
    }
}
