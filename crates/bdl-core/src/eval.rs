//! Expression evaluation.
//!
//! Evaluation never fails outright: problems are reported as diagnostics and
//! the offending expression evaluates to an unknown value, so that a single
//! mistake does not hide the ones after it.

use crate::address::{SECRET_NAMESPACE, secret_reference};
use crate::context::EvalContext;
use crate::convert::convert;
use bdl_ast::{
    Diagnostic, Diagnostics, Expr, ExprKind, IndexKey, Span, Step, Traversal, Type, Value,
};
use indexmap::IndexMap;
use tracing::trace;

pub fn evaluate(expr: &Expr, ctx: &EvalContext) -> (Value, Diagnostics) {
    let mut diags = Diagnostics::new();
    let value = eval_expr(expr, ctx, &mut diags);
    (value, diags)
}

/// Evaluates an absolute traversal such as `target.my_sns` or
/// `secret.creds.name`.
pub fn traverse_abs(traversal: &Traversal, ctx: &EvalContext) -> (Value, Diagnostics) {
    let mut diags = Diagnostics::new();
    let value = eval_traversal(traversal, ctx, &mut diags);
    (value, diags)
}

fn eval_expr(expr: &Expr, ctx: &EvalContext, diags: &mut Diagnostics) -> Value {
    match &expr.kind {
        ExprKind::Null => Value::Null,
        ExprKind::Bool(b) => Value::Bool(*b),
        ExprKind::Number(n) => Value::Number(*n),
        ExprKind::String(s) => Value::String(s.clone()),
        ExprKind::List(items) => {
            Value::List(items.iter().map(|e| eval_expr(e, ctx, diags)).collect())
        }
        ExprKind::Object(items) => {
            let mut attrs = IndexMap::with_capacity(items.len());
            for item in items {
                attrs.insert(item.key.clone(), eval_expr(&item.value, ctx, diags));
            }
            Value::Object(attrs)
        }
        ExprKind::Traversal(t) => eval_traversal(t, ctx, diags),
        ExprKind::Call { name, args } => eval_call(name, args, expr.span, ctx, diags),
    }
}

fn eval_traversal(traversal: &Traversal, ctx: &EvalContext, diags: &mut Diagnostics) -> Value {
    let mut steps = traversal.steps.as_slice();

    let mut current = match ctx.variable(traversal.root_name()) {
        Some(v) => v.clone(),
        None if traversal.root_name() == SECRET_NAMESPACE => match steps.split_first() {
            Some((Step::Attr(name), rest)) => {
                steps = rest;
                secret_reference(name)
            }
            _ => {
                diags.push(traversal_error(
                    traversal,
                    "Invalid secret reference",
                    "A secret reference must name the secret, e.g. secret.my_credentials."
                        .to_string(),
                ));
                return Value::Unknown(Type::Dynamic);
            }
        },
        None => {
            diags.push(traversal_error(
                traversal,
                "Unknown variable",
                format!("There is no variable named \"{}\".", traversal.root_name()),
            ));
            return Value::Unknown(Type::Dynamic);
        }
    };

    for step in steps {
        current = match apply_step(&current, step) {
            Ok(next) => next,
            Err((summary, detail)) => {
                diags.push(traversal_error(traversal, summary, detail));
                return Value::Unknown(Type::Dynamic);
            }
        };
    }

    trace!(%traversal, known = current.is_wholly_known(), "traversed");
    current
}

fn apply_step(value: &Value, step: &Step) -> Result<Value, (&'static str, String)> {
    match (value, step) {
        (Value::Unknown(ty), Step::Attr(name) | Step::Index(IndexKey::Key(name))) => {
            Ok(Value::Unknown(attribute_type(ty, name)))
        }
        (Value::Unknown(ty), Step::Index(IndexKey::Int(_))) => Ok(Value::Unknown(match ty {
            Type::List(elem) => (**elem).clone(),
            _ => Type::Dynamic,
        })),
        (Value::Null, _) => Err((
            "Attempt to get attribute from null value",
            "This value is null, so it does not have any attributes.".to_string(),
        )),
        (Value::Object(attrs), Step::Attr(name) | Step::Index(IndexKey::Key(name))) => {
            attrs.get(name).cloned().ok_or_else(|| {
                (
                    "Unsupported attribute",
                    format!("This object does not have an attribute named \"{name}\"."),
                )
            })
        }
        (Value::List(items), Step::Index(IndexKey::Int(i))) => usize::try_from(*i)
            .ok()
            .and_then(|i| items.get(i))
            .cloned()
            .ok_or_else(|| {
                (
                    "Invalid index",
                    "The given key does not identify an element in this collection value."
                        .to_string(),
                )
            }),
        (other, Step::Attr(name)) => Err((
            "Unsupported attribute",
            format!(
                "Can't access attribute \"{name}\" on a value of type {}.",
                other.kind_name()
            ),
        )),
        (other, Step::Index(_)) => Err((
            "Invalid index",
            format!("A value of type {} can not be indexed.", other.kind_name()),
        )),
    }
}

fn attribute_type(ty: &Type, name: &str) -> Type {
    match ty {
        Type::Object(attrs) => attrs.get(name).cloned().unwrap_or(Type::Dynamic),
        Type::Map(elem) => (**elem).clone(),
        _ => Type::Dynamic,
    }
}

fn eval_call(
    name: &str,
    args: &[Expr],
    span: Span,
    ctx: &EvalContext,
    diags: &mut Diagnostics,
) -> Value {
    let Some(function) = ctx.function(name) else {
        diags.push(
            Diagnostic::error(
                "Call to unknown function",
                format!("There is no function named \"{name}\"."),
            )
            .with_subject(span),
        );
        return Value::Unknown(Type::Dynamic);
    };

    if args.len() != function.params.len() {
        diags.push(
            Diagnostic::error(
                "Wrong number of arguments",
                format!(
                    "Function \"{name}\" expects {} argument(s), but {} were given.",
                    function.params.len(),
                    args.len()
                ),
            )
            .with_subject(span),
        );
        return Value::Unknown(function.return_type.clone());
    }

    let mut converted = Vec::with_capacity(args.len());
    let mut failed = false;
    for (arg, param) in args.iter().zip(&function.params) {
        let value = eval_expr(arg, ctx, diags);
        match convert(&value, &param.ty) {
            Ok(v) if v.is_null() => {
                diags.push(
                    Diagnostic::error(
                        "Invalid function argument",
                        format!("Invalid value for \"{}\" parameter: argument must not be null.", param.name),
                    )
                    .with_subject(arg.span),
                );
                failed = true;
            }
            Ok(v) => converted.push(v),
            Err(msg) => {
                diags.push(
                    Diagnostic::error(
                        "Invalid function argument",
                        format!("Invalid value for \"{}\" parameter: {msg}.", param.name),
                    )
                    .with_subject(arg.span),
                );
                failed = true;
            }
        }
    }

    if failed || !converted.iter().all(Value::is_wholly_known) {
        return Value::Unknown(function.return_type.clone());
    }

    match (function.imp)(ctx.base_dir(), &converted) {
        Ok(v) => v,
        Err(msg) => {
            diags.push(
                Diagnostic::error(
                    "Error in function call",
                    format!("Call to function \"{name}\" failed: {msg}."),
                )
                .with_subject(span),
            );
            Value::Unknown(function.return_type.clone())
        }
    }
}

fn traversal_error(traversal: &Traversal, summary: &str, detail: String) -> Diagnostic {
    Diagnostic::error(summary, detail)
        .with_subject(traversal.span)
        .with_expression(traversal.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::{destination, destination_type};
    use bdl_ast::ComponentCategory;

    fn expr(source: &str) -> Expr {
        bdl_parser::parse_expression(source, 0).unwrap()
    }

    fn ctx() -> EvalContext {
        let mut ctx = EvalContext::new("");
        ctx.add_address(
            ComponentCategory::Target,
            "sns",
            destination("targets.triggermesh.io/v1alpha1", "AWSSNSTarget", "sns"),
        );
        ctx
    }

    #[test]
    fn test_literals_and_collections() {
        let (v, diags) = evaluate(&expr(r#"{ a = [1, "x", true], b = null }"#), &ctx());
        assert!(diags.is_empty());
        assert_eq!(
            v,
            Value::object([
                (
                    "a",
                    Value::List(vec![Value::Number(1.0), Value::string("x"), Value::Bool(true)])
                ),
                ("b", Value::Null),
            ])
        );
    }

    #[test]
    fn test_component_reference() {
        let (v, diags) = evaluate(&expr("target.sns.ref.kind"), &ctx());
        assert!(diags.is_empty());
        assert_eq!(v, Value::string("AWSSNSTarget"));
    }

    #[test]
    fn test_unknown_variable() {
        let (v, diags) = evaluate(&expr("channel.missing"), &ctx());
        assert!(v.is_unknown());
        assert_eq!(diags.len(), 1);
        let diag = &diags.as_slice()[0];
        assert_eq!(diag.summary, "Unknown variable");
        assert_eq!(diag.detail, "There is no variable named \"channel\".");
        assert_eq!(diag.expression.as_deref(), Some("channel.missing"));
    }

    #[test]
    fn test_missing_attribute() {
        let (_, diags) = evaluate(&expr("target.other"), &ctx());
        assert_eq!(diags.as_slice()[0].summary, "Unsupported attribute");
        assert!(diags.as_slice()[0].detail.contains("\"other\""));
    }

    #[test]
    fn test_unknown_propagates_through_steps() {
        let mut ctx = ctx();
        ctx.add_address(
            ComponentCategory::Channel,
            "c",
            Value::Unknown(destination_type()),
        );
        let (v, diags) = evaluate(&expr("channel.c.ref.name"), &ctx);
        assert!(diags.is_empty());
        assert_eq!(v, Value::Unknown(Type::String));
    }

    #[test]
    fn test_secret_namespace() {
        let (v, diags) = evaluate(&expr("secret.kafka_creds"), &ctx());
        assert!(diags.is_empty());
        assert_eq!(v, secret_reference("kafka_creds"));

        let (v, _) = evaluate(&expr("secret.kafka_creds.name"), &ctx());
        assert_eq!(v, Value::string("kafka_creds"));

        let (_, diags) = evaluate(&expr("secret"), &ctx());
        assert_eq!(diags.as_slice()[0].summary, "Invalid secret reference");
    }

    #[test]
    fn test_index_steps() {
        let mut ctx = EvalContext::new("");
        ctx.add_address(
            ComponentCategory::Channel,
            "c",
            Value::object([("items", Value::List(vec![Value::string("a")]))]),
        );
        let (v, diags) = evaluate(&expr(r#"channel["c"].items[0]"#), &ctx);
        assert!(diags.is_empty(), "{diags}");
        assert_eq!(v, Value::string("a"));

        let (_, diags) = evaluate(&expr("channel.c.items[3]"), &ctx);
        assert_eq!(diags.as_slice()[0].summary, "Invalid index");
    }

    #[test]
    fn test_function_calls() {
        let (v, diags) = evaluate(&expr(r#"secret_name("creds")"#), &ctx());
        assert!(diags.is_empty());
        assert_eq!(v, secret_reference("creds"));

        let (_, diags) = evaluate(&expr("nope()"), &ctx());
        assert_eq!(diags.as_slice()[0].summary, "Call to unknown function");

        let (_, diags) = evaluate(&expr(r#"secret_name("a", "b")"#), &ctx());
        assert_eq!(diags.as_slice()[0].summary, "Wrong number of arguments");

        let (_, diags) = evaluate(&expr("secret_name([1])"), &ctx());
        assert_eq!(diags.as_slice()[0].summary, "Invalid function argument");

        let (_, diags) = evaluate(&expr(r#"file("does/not/exist")"#), &ctx());
        assert_eq!(diags.as_slice()[0].summary, "Error in function call");
    }

    #[test]
    fn test_unknown_argument_gives_unknown_result() {
        let mut ctx = ctx();
        ctx.add_address(
            ComponentCategory::Channel,
            "c",
            Value::Unknown(destination_type()),
        );
        let (v, diags) = evaluate(&expr("secret_name(channel.c.ref.name)"), &ctx);
        assert!(diags.is_empty());
        assert!(v.is_unknown());
    }
}
