//! Renders a [`Bridge`] back to BDL source text.
//!
//! The output is canonical: two-space indentation, one attribute per line,
//! `to` first in component bodies, strings always double-quoted. Parsing the
//! output yields a Bridge equal to the input up to source ranges.

use crate::body::{Block, Body};
use crate::bridge::{Bridge, Component};
use crate::expr::{Expr, ExprKind};
use std::fmt::Write;

const INDENT: &str = "  ";

/// Prints a whole Bridge.
pub fn print_bridge(bridge: &Bridge) -> String {
    let mut out = String::new();

    if bridge.identifier.is_some() || bridge.globals.is_some() {
        let id = bridge.identifier.as_deref().unwrap_or_default();
        let _ = write!(out, "bridge {}", quote(id));
        match bridge.delivery() {
            Some(delivery) => {
                out.push_str(" {\n");
                print_block_header(&mut out, 1, "delivery", &[]);
                print_body(&mut out, 2, delivery);
                let _ = writeln!(out, "{INDENT}}}");
                out.push_str("}\n");
            }
            None => out.push_str(" {}\n"),
        }
    }

    for component in bridge.components() {
        if !out.is_empty() {
            out.push('\n');
        }
        print_component(&mut out, component);
    }

    out
}

fn print_component(out: &mut String, component: &Component) {
    let _ = writeln!(
        out,
        "{} {} {} {{",
        component.category,
        quote(&component.kind),
        quote(&component.identifier)
    );
    if let Some(to) = &component.to {
        let _ = writeln!(out, "{INDENT}to = {to}");
    }
    print_body(out, 1, &component.body);
    out.push_str("}\n");
}

fn print_body(out: &mut String, depth: usize, body: &Body) {
    let indent = INDENT.repeat(depth);
    for attr in body.attributes.values() {
        let _ = writeln!(out, "{indent}{} = {}", attr.name, print_expr(&attr.expr));
    }
    for block in &body.blocks {
        print_block(out, depth, block);
    }
}

fn print_block(out: &mut String, depth: usize, block: &Block) {
    let labels: Vec<&str> = block.labels.iter().map(|l| l.value.as_str()).collect();
    print_block_header(out, depth, &block.type_name, &labels);
    print_body(out, depth + 1, &block.body);
    let _ = writeln!(out, "{}}}", INDENT.repeat(depth));
}

fn print_block_header(out: &mut String, depth: usize, type_name: &str, labels: &[&str]) {
    out.push_str(&INDENT.repeat(depth));
    out.push_str(type_name);
    for label in labels {
        out.push(' ');
        out.push_str(&quote(label));
    }
    out.push_str(" {\n");
}

/// Prints an expression on a single line.
pub fn print_expr(expr: &Expr) -> String {
    match &expr.kind {
        ExprKind::Null => "null".to_string(),
        ExprKind::Bool(b) => b.to_string(),
        ExprKind::Number(n) => format_number(*n),
        ExprKind::String(s) => quote(s),
        ExprKind::List(items) => {
            let items: Vec<String> = items.iter().map(print_expr).collect();
            format!("[{}]", items.join(", "))
        }
        ExprKind::Object(items) if items.is_empty() => "{}".to_string(),
        ExprKind::Object(items) => {
            let items: Vec<String> = items
                .iter()
                .map(|i| format!("{} = {}", object_key(&i.key), print_expr(&i.value)))
                .collect();
            format!("{{ {} }}", items.join(", "))
        }
        ExprKind::Traversal(t) => t.to_string(),
        ExprKind::Call { name, args } => {
            let args: Vec<String> = args.iter().map(print_expr).collect();
            format!("{name}({})", args.join(", "))
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Quotes a string literal, escaping what the lexer unescapes.
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
    out
}

fn object_key(key: &str) -> String {
    if is_identifier(key) {
        key.to_string()
    } else {
        quote(key)
    }
}

/// True for names the lexer reads back as a bare identifier.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let starts_ok = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_ok
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !matches!(s, "true" | "false" | "null")
}
