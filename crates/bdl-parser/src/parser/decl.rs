//! Top-level block parsing.
//!
//! A BDL document is a sequence of top-level blocks:
//!
//! ```text
//! bridge "<identifier>" { delivery { ... } }
//! <category> "<type>" "<identifier>" { ... }
//! ```

use super::body::{parse_body, parse_labels};
use super::{ParseError, TokenStream};
use bdl_ast::{
    Block, Body, Bridge, Component, ComponentCategory, Diagnostic, Diagnostics, Globals, Label,
    Span,
};
use bdl_lexer::Token;

const BRIDGE_BLOCK: &str = "bridge";
const DELIVERY_BLOCK: &str = "delivery";
const TO_ATTRIBUTE: &str = "to";

/// Block types accepted at the top level of a document.
pub fn is_top_level_block(name: &str) -> bool {
    name == BRIDGE_BLOCK || ComponentCategory::from_tag(name).is_some()
}

/// Parse every top-level block into `bridge`.
///
/// Syntax errors are reported and parsing resumes at the next top-level
/// block, so several independent mistakes are reported in one run.
pub fn parse_document(stream: &mut TokenStream, bridge: &mut Bridge, diags: &mut Diagnostics) {
    while !stream.at_end() {
        let before = stream.current_pos();
        if let Err(err) = parse_top_level_block(stream, bridge, diags) {
            diags.push(err.to_diagnostic());
            if stream.current_pos() == before {
                stream.advance();
            }
            stream.synchronize(is_top_level_block);
        }
    }
}

fn parse_top_level_block(
    stream: &mut TokenStream,
    bridge: &mut Bridge,
    diags: &mut Diagnostics,
) -> Result<(), ParseError> {
    let start = stream.current_pos();
    let type_span = stream.current_span();
    let type_name = match stream.peek() {
        Some(Token::Ident(name)) => name.to_string(),
        found => return Err(ParseError::expected("a block definition", found, type_span)),
    };
    stream.advance();

    let labels = parse_labels(stream);
    let def_span = stream.span_from(start);
    let body = parse_body(stream, diags)?;
    let block = Block {
        type_name,
        labels,
        body,
        type_span,
        span: stream.span_from(start),
    };

    if block.type_name == BRIDGE_BLOCK {
        add_bridge_block(bridge, block, def_span, diags);
        return Ok(());
    }

    match ComponentCategory::from_tag(&block.type_name) {
        Some(ComponentCategory::Function) => diags.push(
            Diagnostic::error(
                "Unsupported block type",
                "Blocks of type \"function\" are reserved and can not be declared.",
            )
            .with_subject(def_span),
        ),
        Some(category) => add_component(bridge, category, block, def_span, diags),
        None => diags.push(
            Diagnostic::error(
                "Unsupported block type",
                format!(
                    "Blocks of type \"{}\" are not expected here.",
                    block.type_name
                ),
            )
            .with_subject(def_span),
        ),
    }
    Ok(())
}

/// Reports a label count mismatch. Returns false when the block must be
/// skipped.
fn check_labels(
    block: &Block,
    names: &[&str],
    def_span: Span,
    diags: &mut Diagnostics,
) -> bool {
    let expected = names.len();
    let description = format!("{} labels ({})", expected, names.join(", "));

    if block.labels.len() < expected {
        let missing = names[block.labels.len()];
        diags.push(
            Diagnostic::error(
                format!("Missing {missing} for {}", block.type_name),
                format!("All {} blocks must have {description}.", block.type_name),
            )
            .with_subject(def_span),
        );
        return false;
    }

    if let Some(extra) = block.labels.get(expected) {
        diags.push(
            Diagnostic::error(
                format!("Extraneous label for {}", block.type_name),
                format!(
                    "Only {description} are expected for {} blocks.",
                    block.type_name
                ),
            )
            .with_subject(extra.span)
            .with_context(def_span),
        );
        return false;
    }

    true
}

fn add_bridge_block(bridge: &mut Bridge, block: Block, def_span: Span, diags: &mut Diagnostics) {
    if !check_labels(&block, &["name"], def_span, diags) {
        return;
    }

    if let Some(previous) = bridge.span {
        diags.push(
            Diagnostic::error(
                "Duplicate bridge block",
                "Only one \"bridge\" block is allowed per document.",
            )
            .with_subject(def_span)
            .with_context(previous),
        );
        return;
    }

    for attr in block.body.attributes.values() {
        diags.push(unsupported_argument(&attr.name, attr.name_span));
    }

    let mut delivery: Option<Body> = None;
    for nested in block.body.blocks {
        if nested.type_name != DELIVERY_BLOCK {
            diags.push(
                Diagnostic::error(
                    "Unsupported block type",
                    format!(
                        "Blocks of type \"{}\" are not expected here.",
                        nested.type_name
                    ),
                )
                .with_subject(nested.def_span()),
            );
            continue;
        }
        if let Some(label) = nested.labels.first() {
            diags.push(
                Diagnostic::error(
                    "Extraneous label for delivery",
                    "No labels are expected for delivery blocks.",
                )
                .with_subject(label.span),
            );
            continue;
        }
        if delivery.is_some() {
            diags.push(
                Diagnostic::error(
                    "Duplicate delivery block",
                    "Only one \"delivery\" block is allowed.",
                )
                .with_subject(nested.def_span()),
            );
            continue;
        }
        delivery = Some(nested.body);
    }

    bridge.identifier = block.labels.into_iter().next().map(|l: Label| l.value);
    bridge.span = Some(def_span);
    bridge.globals = Some(Globals {
        delivery,
        span: block.span,
    });
}

fn add_component(
    bridge: &mut Bridge,
    category: ComponentCategory,
    block: Block,
    def_span: Span,
    diags: &mut Diagnostics,
) {
    if !check_labels(&block, &["type", "identifier"], def_span, diags) {
        return;
    }

    let mut labels = block.labels.into_iter().map(|l| l.value);
    let kind = labels.next().unwrap_or_default();
    let identifier = labels.next().unwrap_or_default();

    // Sources, transformers and targets route their events with `to`.
    // Channels and routers declare their destinations in their own schema.
    let mut body = block.body;
    let mut to = None;
    if routes_with_to(category) {
        match body.attributes.shift_remove(TO_ATTRIBUTE) {
            Some(attr) => match attr.expr.as_traversal() {
                Some(traversal) => to = Some(traversal.clone()),
                None => diags.push(
                    Diagnostic::error(
                        "Invalid expression",
                        "A single static variable reference is required.",
                    )
                    .with_subject(attr.expr.span)
                    .with_context(def_span),
                ),
            },
            None if requires_to(category) => diags.push(
                Diagnostic::error(
                    "Missing required argument",
                    "The argument \"to\" is required, but no definition was found.",
                )
                .with_subject(def_span),
            ),
            None => {}
        }
    }

    let component = Component {
        category,
        kind,
        identifier,
        to,
        body,
        def_span,
        span: block.span,
    };

    if let Err(rejected) = bridge.insert(component) {
        let previous = bridge
            .component(category, &rejected.identifier)
            .map(|c| c.def_span);
        let mut diag = Diagnostic::error(
            "Duplicate component",
            format!(
                "A {category} component with identifier \"{}\" was already declared. Identifiers must be unique within a category.",
                rejected.identifier
            ),
        )
        .with_subject(def_span);
        if let Some(previous) = previous {
            diag = diag.with_context(previous);
        }
        diags.push(diag);
    }
}

fn routes_with_to(category: ComponentCategory) -> bool {
    matches!(
        category,
        ComponentCategory::Source | ComponentCategory::Transformer | ComponentCategory::Target
    )
}

fn requires_to(category: ComponentCategory) -> bool {
    matches!(
        category,
        ComponentCategory::Source | ComponentCategory::Transformer
    )
}

fn unsupported_argument(name: &str, span: Span) -> Diagnostic {
    Diagnostic::error(
        "Unsupported argument",
        format!("An argument named \"{name}\" is not expected here."),
    )
    .with_subject(span)
}
