//! Translation pipeline: graph construction followed by evaluation.

use crate::evaluator::evaluate_graph;
use crate::registry::Registry;
use crate::transform::build_graph;
use crate::vertex::BridgeGraph;
use bdl_ast::{Bridge, Diagnostics};
use tracing::debug;

/// A Bridge together with the implementations of its components.
pub struct Context<'a> {
    bridge: &'a Bridge,
    registry: &'a Registry,
}

impl<'a> Context<'a> {
    pub fn new(bridge: &'a Bridge, registry: &'a Registry) -> Self {
        Self { bridge, registry }
    }

    pub fn bridge(&self) -> &Bridge {
        self.bridge
    }

    /// Builds the component graph.
    pub fn graph(&self) -> (BridgeGraph, Diagnostics) {
        build_graph(self.bridge, self.registry)
    }

    /// Generates the manifests of the Bridge.
    ///
    /// The manifest list is empty whenever an error was reported. Graph
    /// errors stop the pipeline before evaluation.
    pub fn generate(&self) -> (Vec<serde_json::Value>, Diagnostics) {
        let (graph, mut diags) = self.graph();
        if diags.has_errors() {
            debug!(errors = diags.errors().count(), "graph has errors, skipping evaluation");
            return (Vec::new(), diags);
        }

        let (manifests, eval_diags) = evaluate_graph(self.bridge, &graph);
        diags.append(eval_diags);
        if diags.has_errors() {
            return (Vec::new(), diags);
        }

        debug!(manifests = manifests.len(), "generated manifests");
        (manifests, diags)
    }
}
