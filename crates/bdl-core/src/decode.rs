//! Decoding of configuration bodies against a [`Spec`].
//!
//! Decoding evaluates the attributes a spec consumes, converts them to their
//! declared types and assembles the result value. Every problem is reported;
//! the decoder never stops at the first one.

use crate::context::EvalContext;
use crate::convert::convert;
use crate::eval::evaluate;
use crate::schema::Spec;
use bdl_ast::{Block, Body, Diagnostic, Diagnostics, Label, Span, Traversal, Value};
use indexmap::IndexMap;

/// Decodes `body` with `spec`.
///
/// Attributes and blocks the schema does not consume are reported.
pub fn decode(body: &Body, spec: &Spec, ctx: &EvalContext) -> (Value, Diagnostics) {
    let mut diags = Diagnostics::new();
    check_content(body, spec, &mut diags);
    let value = decode_spec(spec, body, &[], ctx, &mut diags);
    (value, diags)
}

/// Free variables of the parts of `body` consumed by `spec`, in source
/// order.
pub fn variables(body: &Body, spec: &Spec) -> Vec<Traversal> {
    let mut vars = Vec::new();
    collect_variables(spec, body, &mut vars);
    vars
}

fn collect_variables(spec: &Spec, body: &Body, out: &mut Vec<Traversal>) {
    match spec {
        Spec::Object(children) => children
            .values()
            .for_each(|child| collect_variables(child, body, out)),
        Spec::Attr { name, .. } => {
            if let Some(attr) = body.attribute(name) {
                out.extend(attr.expr.variables());
            }
        }
        Spec::Block {
            type_name, nested, ..
        }
        | Spec::BlockList {
            type_name, nested, ..
        } => {
            for block in body.blocks_of_type(type_name) {
                collect_variables(nested, &block.body, out);
            }
        }
        Spec::BlockLabel { .. } => {}
        Spec::Default { wrapped, .. } | Spec::Validate { wrapped, .. } => {
            collect_variables(wrapped, body, out)
        }
    }
}

fn check_content(body: &Body, spec: &Spec, diags: &mut Diagnostics) {
    let attributes = spec.attribute_names();
    let block_types = spec.block_types();

    for attr in body.attributes.values() {
        if !attributes.contains(&attr.name.as_str()) {
            diags.push(
                Diagnostic::error(
                    "Unsupported argument",
                    format!("An argument named \"{}\" is not expected here.", attr.name),
                )
                .with_subject(attr.name_span),
            );
        }
    }

    for block in &body.blocks {
        if !block_types.contains(&block.type_name.as_str()) {
            diags.push(
                Diagnostic::error(
                    "Unsupported block type",
                    format!(
                        "Blocks of type \"{}\" are not expected here.",
                        block.type_name
                    ),
                )
                .with_subject(block.def_span()),
            );
        }
    }
}

fn decode_spec(
    spec: &Spec,
    body: &Body,
    labels: &[Label],
    ctx: &EvalContext,
    diags: &mut Diagnostics,
) -> Value {
    match spec {
        Spec::Object(children) => {
            let mut attrs = IndexMap::with_capacity(children.len());
            for (name, child) in children {
                attrs.insert(name.clone(), decode_spec(child, body, labels, ctx, diags));
            }
            Value::Object(attrs)
        }

        Spec::Attr { name, ty, required } => match body.attribute(name) {
            Some(attr) => {
                let (value, expr_diags) = evaluate(&attr.expr, ctx);
                let has_errors = expr_diags.has_errors();
                diags.append(expr_diags);
                if has_errors {
                    return Value::Unknown(ty.clone());
                }
                match convert(&value, ty) {
                    Ok(v) => v,
                    Err(msg) => {
                        diags.push(
                            Diagnostic::error(
                                "Incorrect attribute value type",
                                format!("Inappropriate value for attribute \"{name}\": {msg}."),
                            )
                            .with_subject(attr.expr.span),
                        );
                        Value::Unknown(ty.clone())
                    }
                }
            }
            None => {
                if *required {
                    diags.push(
                        Diagnostic::error(
                            "Missing required argument",
                            format!(
                                "The argument \"{name}\" is required, but no definition was found."
                            ),
                        )
                        .with_subject(open_brace(body)),
                    );
                }
                Value::Null
            }
        },

        Spec::Block {
            type_name,
            nested,
            required,
        } => {
            let blocks: Vec<&Block> = body.blocks_of_type(type_name).collect();
            match blocks.as_slice() {
                [] => {
                    if *required {
                        diags.push(
                            Diagnostic::error(
                                format!("Missing {type_name} block"),
                                format!("A block of type \"{type_name}\" is required here."),
                            )
                            .with_subject(open_brace(body)),
                        );
                    }
                    Value::Null
                }
                [first, rest @ ..] => {
                    for duplicate in rest {
                        diags.push(
                            Diagnostic::error(
                                format!("Duplicate {type_name} block"),
                                format!("Only one block of type \"{type_name}\" is allowed."),
                            )
                            .with_subject(duplicate.def_span())
                            .with_context(first.def_span()),
                        );
                    }
                    decode_block(first, nested, ctx, diags)
                }
            }
        }

        Spec::BlockList {
            type_name,
            nested,
            min_items,
            max_items,
        } => {
            let blocks: Vec<&Block> = body.blocks_of_type(type_name).collect();
            if blocks.len() < *min_items {
                diags.push(
                    Diagnostic::error(
                        format!("Insufficient {type_name} blocks"),
                        format!("At least {min_items} \"{type_name}\" blocks are required."),
                    )
                    .with_subject(open_brace(body)),
                );
            }
            if *max_items > 0 && blocks.len() > *max_items {
                diags.push(
                    Diagnostic::error(
                        format!("Too many {type_name} blocks"),
                        format!("No more than {max_items} \"{type_name}\" blocks are allowed."),
                    )
                    .with_subject(blocks[*max_items].def_span()),
                );
            }
            Value::List(
                blocks
                    .into_iter()
                    .map(|b| decode_block(b, nested, ctx, diags))
                    .collect(),
            )
        }

        Spec::BlockLabel { index, .. } => labels
            .get(*index)
            .map(|l| Value::String(l.value.clone()))
            .unwrap_or(Value::Null),

        Spec::Default { wrapped, default } => {
            let value = decode_spec(wrapped, body, labels, ctx, diags);
            if value.is_null() {
                default.clone()
            } else {
                value
            }
        }

        Spec::Validate { wrapped, func } => {
            let mut inner = Diagnostics::new();
            let value = decode_spec(wrapped, body, labels, ctx, &mut inner);
            let valid_input = !inner.has_errors() && !value.is_null() && value.is_wholly_known();
            diags.append(inner);
            if valid_input {
                let subject = validation_subject(wrapped, body);
                for diag in func(&value) {
                    diags.push(diag.or_subject(subject));
                }
            }
            value
        }
    }
}

fn decode_block(block: &Block, spec: &Spec, ctx: &EvalContext, diags: &mut Diagnostics) -> Value {
    let names = spec.label_names();
    if block.labels.len() < names.len() {
        diags.push(
            Diagnostic::error(
                format!("Missing {} for {}", names[block.labels.len()], block.type_name),
                format!(
                    "All {} blocks must have {} labels ({}).",
                    block.type_name,
                    names.len(),
                    names.join(", ")
                ),
            )
            .with_subject(block.def_span()),
        );
    } else if let Some(extra) = block.labels.get(names.len()) {
        let detail = if names.is_empty() {
            format!("No labels are expected for {} blocks.", block.type_name)
        } else {
            format!(
                "Only {} labels ({}) are expected for {} blocks.",
                names.len(),
                names.join(", "),
                block.type_name
            )
        };
        diags.push(
            Diagnostic::error(format!("Extraneous label for {}", block.type_name), detail)
                .with_subject(extra.span)
                .with_context(block.def_span()),
        );
    }

    check_content(&block.body, spec, diags);
    decode_spec(spec, &block.body, &block.labels, ctx, diags)
}

/// Range a validator diagnostic is attached to when it names none itself.
fn validation_subject(spec: &Spec, body: &Body) -> Span {
    match spec {
        Spec::Attr { name, .. } => body
            .attribute(name)
            .map(|a| a.expr.span)
            .unwrap_or(body.span),
        Spec::Block { type_name, .. } | Spec::BlockList { type_name, .. } => body
            .blocks_of_type(type_name)
            .next()
            .map(Block::def_span)
            .unwrap_or(body.span),
        Spec::Default { wrapped, .. } | Spec::Validate { wrapped, .. } => {
            validation_subject(wrapped, body)
        }
        Spec::Object(_) | Spec::BlockLabel { .. } => body.span,
    }
}

fn open_brace(body: &Body) -> Span {
    Span::new(body.span.file_id, body.span.start, body.span.start + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{destination, destination_type, object_reference_type};
    use bdl_ast::{ComponentCategory, Type};

    fn component_body(source: &str) -> Body {
        let (bridge, diags) = bdl_parser::parse_bridge(source, 0);
        assert!(diags.is_empty(), "{diags}");
        bridge.components().next().unwrap().body.clone()
    }

    fn route_spec() -> Spec {
        Spec::object([
            ("attributes", Spec::required_attr("attributes", Type::map(Type::String))),
            ("to", Spec::required_attr("to", destination_type())),
        ])
    }

    fn router_spec() -> Spec {
        Spec::object([("route", Spec::block_list("route", route_spec(), 1, 0))])
    }

    fn ctx() -> EvalContext {
        let mut ctx = EvalContext::new("");
        ctx.add_address(ComponentCategory::Target, "a", destination("v1", "Service", "a"));
        ctx.add_address(ComponentCategory::Target, "b", destination("v1", "Service", "b"));
        ctx
    }

    #[test]
    fn test_decode_block_list() {
        let body = component_body(
            r#"router "content_based" "r" {
                route {
                    attributes = { type = "a.created" }
                    to = target.a
                }
                route {
                    attributes = { type = "b.created" }
                    to = target.b
                }
            }"#,
        );
        let (value, diags) = decode(&body, &router_spec(), &ctx());
        assert!(diags.is_empty(), "{diags}");

        let routes = value.attr("route").as_list().unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[1].attr("to").attr("ref").attr("name"), &Value::string("b"));
        assert_eq!(
            routes[0].attr("attributes").attr("type"),
            &Value::string("a.created")
        );
    }

    #[test]
    fn test_variables_follow_spec() {
        let body = component_body(
            r#"router "content_based" "r" {
                route {
                    attributes = { type = "a" }
                    to = target.a
                }
                ignored = channel.c
            }"#,
        );
        let vars: Vec<String> = variables(&body, &router_spec())
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(vars, ["target.a"]);
    }

    #[test]
    fn test_unsupported_content() {
        let body = component_body(
            r#"target "aws_sns" "t" {
                arn = "arn:aws:sns:eu-west-1:123:t"
                region = "eu-west-1"
                auth { }
            }"#,
        );
        let spec = Spec::object([("arn", Spec::required_attr("arn", Type::String))]);
        let (_, diags) = decode(&body, &spec, &ctx());
        let summaries: Vec<_> = diags.iter().map(|d| d.summary.as_str()).collect();
        assert_eq!(summaries, ["Unsupported argument", "Unsupported block type"]);
        assert_eq!(
            diags.as_slice()[0].detail,
            "An argument named \"region\" is not expected here."
        );
    }

    #[test]
    fn test_missing_required_and_block_counts() {
        let body = component_body(r#"router "content_based" "r" { }"#);
        let (_, diags) = decode(&body, &router_spec(), &ctx());
        assert_eq!(diags.as_slice()[0].summary, "Insufficient route blocks");

        let body = component_body(r#"router "content_based" "r" { route { attributes = {} } }"#);
        let (_, diags) = decode(&body, &router_spec(), &ctx());
        assert_eq!(diags.as_slice()[0].summary, "Missing required argument");
        assert_eq!(
            diags.as_slice()[0].detail,
            "The argument \"to\" is required, but no definition was found."
        );

        let spec = Spec::object([(
            "auth",
            Spec::block("auth", Spec::object([]), false),
        )]);
        let body = component_body(r#"target "x" "t" { auth { } auth { } }"#);
        let (_, diags) = decode(&body, &spec, &ctx());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.as_slice()[0].summary, "Duplicate auth block");
    }

    #[test]
    fn test_incorrect_type() {
        let body = component_body(r#"source "kafka" "s" { topics = "orders" to = target.a }"#);
        let spec = Spec::object([(
            "topics",
            Spec::required_attr("topics", Type::list(Type::String)),
        )]);
        let (value, diags) = decode(&body, &spec, &ctx());
        assert_eq!(diags.as_slice()[0].summary, "Incorrect attribute value type");
        assert_eq!(
            diags.as_slice()[0].detail,
            "Inappropriate value for attribute \"topics\": list of string required."
        );
        assert!(value.attr("topics").is_unknown());
    }

    #[test]
    fn test_labels_and_defaults() {
        let spec = Spec::object([(
            "header",
            Spec::block_list(
                "header",
                Spec::object([
                    ("name", Spec::label(0, "name")),
                    (
                        "value",
                        Spec::optional_attr("value", Type::String).with_default(Value::string("")),
                    ),
                ]),
                0,
                2,
            ),
        )]);

        let body = component_body(r#"target "x" "t" { header "X-A" { } }"#);
        let (value, diags) = decode(&body, &spec, &ctx());
        assert!(diags.is_empty(), "{diags}");
        let header = &value.attr("header").as_list().unwrap()[0];
        assert_eq!(header.attr("name"), &Value::string("X-A"));
        assert_eq!(header.attr("value"), &Value::string(""));

        let body = component_body(r#"target "x" "t" { header { } }"#);
        let (_, diags) = decode(&body, &spec, &ctx());
        assert_eq!(diags.as_slice()[0].summary, "Missing name for header");

        let body = component_body(r#"target "x" "t" { header "a" "b" { } }"#);
        let (_, diags) = decode(&body, &spec, &ctx());
        assert_eq!(diags.as_slice()[0].summary, "Extraneous label for header");

        let body = component_body(r#"target "x" "t" { header "a" {} header "b" {} header "c" {} }"#);
        let (_, diags) = decode(&body, &spec, &ctx());
        assert_eq!(diags.as_slice()[0].summary, "Too many header blocks");
    }

    #[test]
    fn test_validator_runs_on_known_values_only() {
        fn reject(_: &Value) -> Diagnostics {
            Diagnostic::error("Invalid attributes type", "rejected").into()
        }
        let spec = Spec::object([(
            "tls",
            Spec::optional_attr("tls", Type::Dynamic).validated(reject),
        )]);

        let body = component_body(r#"source "kafka" "s" { tls = 42 to = target.a }"#);
        let (_, diags) = decode(&body, &spec, &ctx());
        assert_eq!(diags.len(), 1);
        let diag = &diags.as_slice()[0];
        assert_eq!(diag.summary, "Invalid attributes type");
        assert!(diag.subject.is_some());

        let body = component_body(r#"source "kafka" "s" { to = target.a }"#);
        let (_, diags) = decode(&body, &spec, &ctx());
        assert!(diags.is_empty());

        let mut unknown = ctx();
        unknown.add_address(ComponentCategory::Channel, "c", Value::Unknown(destination_type()));
        let body = component_body(r#"source "kafka" "s" { tls = channel.c to = target.a }"#);
        let (_, diags) = decode(&body, &spec, &unknown);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_reference_to_unbound_component() {
        let spec = Spec::object([(
            "credentials",
            Spec::optional_attr("credentials", object_reference_type()),
        )]);
        let body = component_body(r#"target "x" "t" { credentials = channel.c }"#);
        let (value, diags) = decode(&body, &spec, &ctx());
        assert_eq!(diags.as_slice()[0].summary, "Unknown variable");
        assert_eq!(value.attr("credentials"), &Value::Unknown(object_reference_type()));
    }
}
