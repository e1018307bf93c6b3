//! The graph of a Bridge's components.

use crate::graph::{DirectedGraph, VertexId};
use crate::translation::ComponentImpl;
use bdl_ast::{Component, ComponentCategory, MessagingComponent};
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

/// A component of the Bridge, materialized as a graph vertex.
#[derive(Clone)]
pub struct ComponentVertex {
    pub component: Component,
    /// Absent when no implementation is registered for the component's type.
    pub implementation: Option<Rc<dyn ComponentImpl>>,
}

impl ComponentVertex {
    pub fn addr(&self) -> MessagingComponent {
        self.component.addr()
    }

    pub fn category(&self) -> ComponentCategory {
        self.component.category
    }

    pub fn identifier(&self) -> &str {
        &self.component.identifier
    }
}

impl fmt::Debug for ComponentVertex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentVertex")
            .field("addr", &self.addr().to_string())
            .field("implemented", &self.implementation.is_some())
            .finish()
    }
}

/// Component graph with lookup by (category, identifier).
///
/// Edges follow the event flow: `u → v` means `u` sends events to `v` and
/// needs `v`'s address.
#[derive(Debug, Clone, Default)]
pub struct BridgeGraph {
    graph: DirectedGraph<ComponentVertex>,
    index: IndexMap<(ComponentCategory, String), VertexId>,
}

impl BridgeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, vertex: ComponentVertex) -> VertexId {
        let key = (vertex.category(), vertex.identifier().to_string());
        let id = self.graph.add_vertex(vertex);
        self.index.insert(key, id);
        id
    }

    pub fn lookup(&self, category: ComponentCategory, identifier: &str) -> Option<VertexId> {
        self.index
            .get(&(category, identifier.to_string()))
            .copied()
    }

    pub fn vertex(&self, id: VertexId) -> Option<&ComponentVertex> {
        self.graph.vertex(id)
    }

    pub fn connect(&mut self, from: VertexId, to: VertexId) -> bool {
        self.graph.connect(from, to)
    }

    pub fn graph(&self) -> &DirectedGraph<ComponentVertex> {
        &self.graph
    }

    /// Whether the manifests of `id` embed the Bridge's delivery defaults.
    ///
    /// Channels, routers and transformers always subscribe to or dispatch
    /// events. Other components only do when they reply somewhere.
    pub fn embeds_delivery(&self, id: VertexId) -> bool {
        match self.vertex(id).map(ComponentVertex::category) {
            None | Some(ComponentCategory::Source) => false,
            Some(ComponentCategory::Target | ComponentCategory::Function) => {
                !self.graph.successors(id).is_empty()
            }
            Some(_) => true,
        }
    }

    /// Sort key placing vertices along a typical event flow, then by
    /// identifier.
    pub fn sort_key(&self, id: VertexId) -> (u8, &str) {
        self.graph
            .vertex(id)
            .map(|v| (v.category().rank(), v.identifier()))
            .unwrap_or((u8::MAX, ""))
    }
}
