//! Error handling tests for the BDL parser.
//!
//! This test suite verifies that the parser reports:
//! - unclosed blocks and unexpected end of file
//! - malformed attributes and labels
//! - invalid characters and unterminated strings
//! - duplicate declarations
//!
//! and that it recovers to report independent mistakes in one run.

use bdl_ast::{Bridge, Diagnostics};
use bdl_parser::parse_bridge;

/// Helper to verify that parsing reports at least one error.
fn expect_error(source: &str) -> Diagnostics {
    let (_, diags) = parse_bridge(source, 0);
    assert!(diags.has_errors(), "Expected parse error, but parsing succeeded");
    diags
}

/// Helper for tests that expect success.
fn parse_ok(source: &str) -> Bridge {
    let (bridge, diags) = parse_bridge(source, 0);
    assert!(diags.is_empty(), "Parse should succeed, got: {diags}");
    bridge
}

fn summaries(diags: &Diagnostics) -> Vec<&str> {
    diags.iter().map(|d| d.summary.as_str()).collect()
}

// =============================================================================
// Unclosed Delimiters
// =============================================================================

#[test]
fn test_unclosed_component_block() {
    let diags = expect_error(
        r#"
        source "kafka" "k" {
            to = target.t
        "#,
    );
    assert_eq!(summaries(&diags), ["Unexpected end of file"]);
}

#[test]
fn test_unclosed_list() {
    let diags = expect_error(
        r#"
        source "kafka" "k" {
            topics = ["a", "b"
        }
        "#,
    );
    assert_eq!(summaries(&diags), ["Unexpected token"]);
    assert!(diags.as_slice()[0].detail.contains("\"]\""), "{diags}");
}

// =============================================================================
// Malformed Syntax
// =============================================================================

#[test]
fn test_missing_equals() {
    let diags = expect_error(r#"target "aws_sns" "t" { arn "x" }"#);
    assert!(diags.as_slice()[0].detail.contains("\"{\""), "{diags}");
}

#[test]
fn test_invalid_character() {
    let diags = expect_error(r#"target "aws_sns" "t" { arn = $x }"#);
    assert_eq!(summaries(&diags), ["Invalid character"]);
    let subject = diags.as_slice()[0].subject.unwrap();
    assert_eq!(subject.start, 29);
}

#[test]
fn test_unterminated_heredoc() {
    let diags = expect_error("transformer \"function\" \"f\" {\n code = <<EOF\nreturn 1\n}\n");
    assert!(
        diags.iter().any(|d| d.detail.contains("Unterminated heredoc")),
        "{diags}"
    );
}

#[test]
fn test_to_must_be_a_reference() {
    let diags = expect_error(r#"source "kafka" "k" { to = "target.t" }"#);
    assert_eq!(summaries(&diags), ["Invalid expression"]);
}

#[test]
fn test_source_requires_to() {
    let diags = expect_error(r#"source "ping" "p" {}"#);
    let diag = &diags.as_slice()[0];
    assert_eq!(diag.summary, "Missing required argument");
    assert!(diag.detail.contains("\"to\""));
}

#[test]
fn test_unsupported_block_type() {
    let diags = expect_error(r#"pipeline "p" {}"#);
    assert_eq!(summaries(&diags), ["Unsupported block type"]);
}

#[test]
fn test_function_blocks_are_reserved() {
    let diags = expect_error(r#"function "js" "f" {}"#);
    assert!(diags.as_slice()[0].detail.contains("reserved"));
}

#[test]
fn test_label_counts() {
    let diags = expect_error(r#"target "aws_sns" {}"#);
    assert_eq!(summaries(&diags), ["Missing identifier for target"]);

    let diags = expect_error(r#"bridge "a" "b" {}"#);
    assert_eq!(summaries(&diags), ["Extraneous label for bridge"]);
}

#[test]
fn test_bridge_block_contents() {
    let diags = expect_error(
        r#"
        bridge "b" {
            name = "x"
            delivery { retries = 1 }
            delivery { retries = 2 }
            tracing {}
        }
        "#,
    );
    assert_eq!(
        summaries(&diags),
        [
            "Unsupported argument",
            "Duplicate delivery block",
            "Unsupported block type"
        ]
    );
}

// =============================================================================
// Duplicates
// =============================================================================

#[test]
fn test_duplicate_component_identifier() {
    let (bridge, diags) = parse_bridge(
        r#"
        target "aws_sns" "t" { arn = "a" }
        target "kafka" "t" { topic = "b" }
        source "ping" "t" { to = target.t }
        "#,
        0,
    );
    assert_eq!(summaries(&diags), ["Duplicate component"]);
    assert!(diags.as_slice()[0].context.is_some());
    assert_eq!(bridge.targets["t"].kind, "aws_sns");
    assert_eq!(bridge.sources.len(), 1);
}

#[test]
fn test_duplicate_bridge_block() {
    let diags = expect_error("bridge \"a\" {}\nbridge \"b\" {}\n");
    assert_eq!(summaries(&diags), ["Duplicate bridge block"]);
}

// =============================================================================
// Recovery
// =============================================================================

#[test]
fn test_recovers_at_next_component() {
    let (bridge, diags) = parse_bridge(
        r#"
        source "kafka" "broken" {
            to = = target.t
            sasl_auth "plain" { user = "u" }
        }

        target "aws_sns" "t" {
            arn = "arn:aws:sns:us-east-1:123:t"
        }

        channel "pipe" "c" {
            error_to = [
        }

        target "datadog" "d" {
            metric_prefix = "til"
        }
        "#,
        0,
    );

    assert_eq!(diags.errors().count(), 2, "{diags}");
    assert!(bridge.sources.is_empty());
    assert!(bridge.channels.is_empty());
    let targets: Vec<_> = bridge.targets.keys().map(String::as_str).collect();
    assert_eq!(targets, ["t", "d"]);
}

#[test]
fn test_empty_document() {
    let bridge = parse_ok("# nothing but a comment\n");
    assert_eq!(bridge.component_count(), 0);
    assert!(bridge.identifier.is_none());
    assert!(bridge.globals.is_none());
}
