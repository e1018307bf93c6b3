//! Expression syntax tree.
//!
//! Attribute values in a BDL body are expressions. They are kept unevaluated
//! until a component is decoded, because references to other components can
//! only be resolved once those components have been given an address.

use crate::foundation::Span;
use std::fmt;

/// An expression with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// `[a, b, c]`
    List(Vec<Expr>),
    /// `{ key = value, ... }`
    Object(Vec<ObjectItem>),
    /// `root.attr[index]...`
    Traversal(Traversal),
    /// `name(arg, ...)`
    Call { name: String, args: Vec<Expr> },
}

/// One `key = value` entry of an object constructor.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectItem {
    pub key: String,
    pub key_span: Span,
    pub value: Expr,
}

/// An absolute traversal: a root variable name followed by attribute and
/// index steps.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Traversal {
    pub root: String,
    pub steps: Vec<Step>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// `.name`
    Attr(String),
    /// `[0]` or `["key"]`
    Index(IndexKey),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndexKey {
    Int(u64),
    Key(String),
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Returns the traversal if this expression is nothing but a traversal.
    pub fn as_traversal(&self) -> Option<&Traversal> {
        match &self.kind {
            ExprKind::Traversal(t) => Some(t),
            _ => None,
        }
    }

    /// Collects every traversal that appears in the expression, in source
    /// order. These are the expression's free variables.
    pub fn variables(&self) -> Vec<Traversal> {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars
    }

    fn collect_variables(&self, out: &mut Vec<Traversal>) {
        match &self.kind {
            ExprKind::Traversal(t) => out.push(t.clone()),
            ExprKind::List(items) => items.iter().for_each(|e| e.collect_variables(out)),
            ExprKind::Object(items) => items.iter().for_each(|i| i.value.collect_variables(out)),
            ExprKind::Call { args, .. } => args.iter().for_each(|e| e.collect_variables(out)),
            ExprKind::Null | ExprKind::Bool(_) | ExprKind::Number(_) | ExprKind::String(_) => {}
        }
    }
}

impl Traversal {
    pub fn new(root: impl Into<String>, steps: Vec<Step>, span: Span) -> Self {
        Self {
            root: root.into(),
            steps,
            span,
        }
    }

    pub fn root_name(&self) -> &str {
        &self.root
    }

    /// Name of the first attribute step, if the traversal starts with one.
    ///
    /// For a component reference `target.sns` this is the identifier `sns`.
    pub fn first_attr(&self) -> Option<&str> {
        match self.steps.first() {
            Some(Step::Attr(name)) => Some(name),
            _ => None,
        }
    }
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.root)?;
        for step in &self.steps {
            match step {
                Step::Attr(name) => write!(f, ".{name}")?,
                Step::Index(IndexKey::Int(i)) => write!(f, "[{i}]")?,
                Step::Index(IndexKey::Key(k)) => write!(f, "[{}]", crate::printer::quote(k))?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp() -> Span {
        Span::zero(0)
    }

    fn trav(root: &str, attrs: &[&str]) -> Expr {
        Expr::new(
            ExprKind::Traversal(Traversal::new(
                root,
                attrs.iter().map(|a| Step::Attr(a.to_string())).collect(),
                sp(),
            )),
            sp(),
        )
    }

    #[test]
    fn test_variables_in_source_order() {
        let expr = Expr::new(
            ExprKind::Object(vec![
                ObjectItem {
                    key: "a".into(),
                    key_span: sp(),
                    value: trav("target", &["x"]),
                },
                ObjectItem {
                    key: "b".into(),
                    key_span: sp(),
                    value: Expr::new(
                        ExprKind::List(vec![
                            Expr::new(ExprKind::String("lit".into()), sp()),
                            Expr::new(
                                ExprKind::Call {
                                    name: "file".into(),
                                    args: vec![trav("channel", &["c"])],
                                },
                                sp(),
                            ),
                        ]),
                        sp(),
                    ),
                },
            ]),
            sp(),
        );

        let names: Vec<_> = expr.variables().iter().map(|t| t.to_string()).collect();
        assert_eq!(names, ["target.x", "channel.c"]);
    }

    #[test]
    fn test_traversal_display() {
        let t = Traversal::new(
            "router",
            vec![
                Step::Attr("r".into()),
                Step::Index(IndexKey::Int(0)),
                Step::Index(IndexKey::Key("k".into())),
            ],
            sp(),
        );
        assert_eq!(t.to_string(), r#"router.r[0]["k"]"#);
        assert_eq!(t.first_attr(), Some("r"));
    }
}
