//! Configuration bodies.
//!
//! A body is the content between the braces of a block: `name = expr`
//! attributes and nested blocks. Bodies stay opaque until a component's
//! schema decodes them.

use crate::expr::{Expr, Traversal};
use crate::foundation::Span;
use indexmap::IndexMap;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Body {
    /// Attributes keyed by name, in source order
    pub attributes: IndexMap<String, Attribute>,
    /// Nested blocks in source order
    pub blocks: Vec<Block>,
    /// Range of the body including its braces
    pub span: Span,
}

/// `name = expr`
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub expr: Expr,
    pub name_span: Span,
    pub span: Span,
}

/// `type "label" ... { body }`
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub type_name: String,
    pub labels: Vec<Label>,
    pub body: Body,
    pub type_span: Span,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub value: String,
    pub span: Span,
}

impl Body {
    pub fn new(span: Span) -> Self {
        Self {
            span,
            ..Self::default()
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn blocks_of_type<'a>(&'a self, type_name: &'a str) -> impl Iterator<Item = &'a Block> {
        self.blocks.iter().filter(move |b| b.type_name == type_name)
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.blocks.is_empty()
    }

    /// Every traversal appearing anywhere in the body, nested blocks
    /// included, in source order.
    ///
    /// This ignores any schema: attributes the schema would reject are
    /// still searched.
    pub fn all_variables(&self) -> Vec<Traversal> {
        let mut vars: Vec<Traversal> = self
            .attributes
            .values()
            .flat_map(|a| a.expr.variables())
            .collect();
        for block in &self.blocks {
            vars.extend(block.body.all_variables());
        }
        vars
    }

    /// Returns a copy of the body without the named attribute.
    pub fn without_attribute(&self, name: &str) -> Body {
        let mut body = self.clone();
        body.attributes.shift_remove(name);
        body
    }
}

impl Block {
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(|l| l.value.as_str())
    }

    /// Range covering the block type and its labels, used as the subject of
    /// block level diagnostics.
    pub fn def_span(&self) -> Span {
        self.labels
            .last()
            .map(|l| self.type_span.merge(&l.span))
            .unwrap_or(self.type_span)
    }
}
