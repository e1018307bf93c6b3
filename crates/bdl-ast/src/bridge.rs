//! The Bridge: top-level aggregate of a BDL document.

use crate::addr::MessagingComponent;
use crate::body::Body;
use crate::category::ComponentCategory;
use crate::expr::Traversal;
use crate::foundation::Span;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};

/// A parsed Bridge description.
///
/// Components live in one ordered collection per category, keyed by
/// identifier. Identifiers are unique within a category only, so
/// `source "kafka" "k"` and `target "kafka" "k"` may coexist.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bridge {
    /// Label of the `bridge` block, if any
    pub identifier: Option<String>,
    /// File the Bridge was loaded from
    pub path: Option<PathBuf>,
    pub channels: IndexMap<String, Component>,
    pub routers: IndexMap<String, Component>,
    pub transformers: IndexMap<String, Component>,
    pub sources: IndexMap<String, Component>,
    pub targets: IndexMap<String, Component>,
    pub globals: Option<Globals>,
    /// Range of the `bridge` block header
    pub span: Option<Span>,
}

/// Settings of the `bridge` block that apply to every component.
#[derive(Debug, Clone, PartialEq)]
pub struct Globals {
    /// Body of the `delivery` block
    pub delivery: Option<Body>,
    pub span: Span,
}

/// One component block, e.g. `target "aws_sns" "my_topic" { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub category: ComponentCategory,
    /// Type selector, the first label
    pub kind: String,
    /// Identifier, the second label
    pub identifier: String,
    /// Destination of the events this component emits or replies with
    pub to: Option<Traversal>,
    /// Configuration body, without the `to` attribute
    pub body: Body,
    /// Range of the block header (type and labels)
    pub def_span: Span,
    /// Range of the whole block
    pub span: Span,
}

impl Component {
    pub fn addr(&self) -> MessagingComponent {
        MessagingComponent::new(self.category, self.kind.clone(), self.identifier.clone())
    }
}

impl Bridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mutable collection for a category. The reserved `function` category
    /// has none.
    pub fn collection_mut(
        &mut self,
        category: ComponentCategory,
    ) -> Option<&mut IndexMap<String, Component>> {
        match category {
            ComponentCategory::Channel => Some(&mut self.channels),
            ComponentCategory::Router => Some(&mut self.routers),
            ComponentCategory::Transformer => Some(&mut self.transformers),
            ComponentCategory::Source => Some(&mut self.sources),
            ComponentCategory::Target => Some(&mut self.targets),
            ComponentCategory::Function => None,
        }
    }

    pub fn collection(&self, category: ComponentCategory) -> Option<&IndexMap<String, Component>> {
        match category {
            ComponentCategory::Channel => Some(&self.channels),
            ComponentCategory::Router => Some(&self.routers),
            ComponentCategory::Transformer => Some(&self.transformers),
            ComponentCategory::Source => Some(&self.sources),
            ComponentCategory::Target => Some(&self.targets),
            ComponentCategory::Function => None,
        }
    }

    /// Adds a component to the collection of its category.
    ///
    /// Returns the component back when its identifier is already taken, or
    /// when its category has no collection.
    pub fn insert(&mut self, component: Component) -> Result<(), Box<Component>> {
        let Some(collection) = self.collection_mut(component.category) else {
            return Err(Box::new(component));
        };
        if collection.contains_key(&component.identifier) {
            return Err(Box::new(component));
        }
        collection.insert(component.identifier.clone(), component);
        Ok(())
    }

    pub fn component(&self, category: ComponentCategory, identifier: &str) -> Option<&Component> {
        self.collection(category)?.get(identifier)
    }

    /// Every component: channels, routers, transformers, sources, then
    /// targets, each in declaration order.
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.channels
            .values()
            .chain(self.routers.values())
            .chain(self.transformers.values())
            .chain(self.sources.values())
            .chain(self.targets.values())
    }

    pub fn component_count(&self) -> usize {
        self.components().count()
    }

    pub fn delivery(&self) -> Option<&Body> {
        self.globals.as_ref()?.delivery.as_ref()
    }

    /// Directory that relative `file()` paths are resolved against.
    pub fn base_dir(&self) -> PathBuf {
        self.path
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }
}
