//! Evaluation and translation of the component graph.
//!
//! Components are visited dependencies first, i.e. along the reverse of the
//! presentation order. For each vertex the evaluator:
//!
//! 1. decodes its configuration with [`decode_safe`],
//! 2. resolves the destination of its events with [`traverse_abs_safe`],
//! 3. computes its own address and records it in the context,
//! 4. translates it into manifests, when both 1 and 2 were complete, along
//!    with the Bridge's delivery defaults.
//!
//! Members of a reference cycle are visited twice. The first sweep only
//! records addresses, so that the second sweep sees every address of the
//! cycle and can translate.

use crate::context::EvalContext;
use crate::globals::{BridgeGlobals, delivery_spec};
use crate::graph::VertexId;
use crate::order::presentation_order;
use crate::safe::{decode_safe, traverse_abs_safe};
use crate::vertex::{BridgeGraph, ComponentVertex};
use bdl_ast::{Bridge, Diagnostic, Diagnostics, Value};
use indexmap::IndexMap;
use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sweep {
    /// Decode and record the address only.
    AddressOnly,
    /// Decode, record the address and translate.
    Full,
}

/// Evaluates every vertex of `graph` and returns the manifests in
/// presentation order.
///
/// Manifests are only meaningful when the returned diagnostics have no
/// errors.
pub fn evaluate_graph(bridge: &Bridge, graph: &BridgeGraph) -> (Vec<serde_json::Value>, Diagnostics) {
    let mut evaluator = Evaluator::new(bridge, graph);
    let order = presentation_order(graph);

    for scc in order.iter().rev() {
        if scc.cyclic {
            debug!(members = scc.members.len(), "evaluating reference cycle");
            for &v in &scc.members {
                // Addresses only; the second sweep reports what remains.
                let _ = evaluator.visit(v, Sweep::AddressOnly);
            }
        }
        for &v in &scc.members {
            let diags = evaluator.visit(v, Sweep::Full);
            evaluator.diags.append(diags);
        }
    }

    let manifests = order
        .iter()
        .flat_map(|scc| scc.members.iter())
        .filter_map(|v| evaluator.manifests.shift_remove(v))
        .flatten()
        .collect();
    (manifests, evaluator.diags)
}

struct Evaluator<'a> {
    bridge: &'a Bridge,
    graph: &'a BridgeGraph,
    ctx: EvalContext,
    diags: Diagnostics,
    manifests: IndexMap<VertexId, Vec<serde_json::Value>>,
    globals_reported: bool,
}

impl<'a> Evaluator<'a> {
    fn new(bridge: &'a Bridge, graph: &'a BridgeGraph) -> Self {
        Self {
            bridge,
            graph,
            ctx: EvalContext::new(bridge.base_dir()),
            diags: Diagnostics::new(),
            manifests: IndexMap::new(),
            globals_reported: false,
        }
    }

    fn visit(&mut self, id: VertexId, sweep: Sweep) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let graph = self.graph;
        let Some(vertex) = graph.vertex(id) else {
            return diags;
        };
        let Some(implementation) = vertex.implementation.clone() else {
            return diags;
        };
        let addr = vertex.addr();
        trace!(%addr, ?sweep, "visiting");

        let (config, config_complete) = match implementation.decodable() {
            Some(decodable) => {
                let decoded = decode_safe(&vertex.component.body, &decodable.spec(), &self.ctx);
                diags.append(decoded.diags);
                (decoded.value, decoded.complete)
            }
            None => (Value::Null, true),
        };

        let (event_dst, dst_complete) = match &vertex.component.to {
            Some(to) => {
                let resolved = traverse_abs_safe(to, &self.ctx);
                diags.append(resolved.diags);
                (resolved.value, resolved.complete)
            }
            None => (Value::Null, true),
        };

        if let Some(addressable) = implementation.addressable() {
            let address = addressable.address(&vertex.component.identifier, &config, &event_dst);
            self.ctx
                .add_address(vertex.category(), &vertex.component.identifier, address);
        }

        if sweep == Sweep::AddressOnly {
            return diags;
        }

        if !(config_complete && dst_complete) {
            if !self.diags.has_errors() && !diags.has_errors() {
                warn!(%addr, "event destination could not be resolved");
                diags.push(
                    Diagnostic::error(
                        "Unresolved event destination",
                        format!("The event destination of {addr} could not be resolved."),
                    )
                    .with_subject(vertex.component.def_span),
                );
            }
            return diags;
        }

        if diags.has_errors() {
            return diags;
        }

        let Some(translatable) = implementation.translatable() else {
            return diags;
        };

        let (globals, globals_complete) = self.globals(&mut diags);
        if diags.has_errors() {
            return diags;
        }
        if !globals_complete && graph.embeds_delivery(id) {
            if !self.diags.has_errors() {
                warn!(%addr, "dead-letter sink could not be resolved");
                diags.push(
                    Diagnostic::error(
                        "Unresolved dead-letter sink",
                        format!("The dead-letter sink used by {addr} could not be resolved."),
                    )
                    .with_subject(vertex.component.def_span),
                );
            }
            return diags;
        }

        let result = catch_unwind(AssertUnwindSafe(|| {
            translatable.manifests(&vertex.component.identifier, &config, &event_dst, &globals)
        }));
        match result {
            Ok(manifests) => {
                trace!(%addr, count = manifests.len(), "translated");
                self.manifests.insert(id, manifests);
            }
            Err(panic) => diags.push(translation_failure(vertex, panic)),
        }
        diags
    }

    /// Decodes the Bridge's delivery defaults with the current context, and
    /// tells whether the decode was complete.
    ///
    /// Problems are reported the first time only.
    fn globals(&mut self, diags: &mut Diagnostics) -> (BridgeGlobals, bool) {
        let Some(body) = self.bridge.delivery() else {
            return (BridgeGlobals::default(), true);
        };
        let decoded = decode_safe(body, &delivery_spec(), &self.ctx);
        if !self.globals_reported {
            self.globals_reported = true;
            diags.append(decoded.diags);
        }
        (BridgeGlobals::new(decoded.value), decoded.complete)
    }
}

fn translation_failure(vertex: &ComponentVertex, panic: Box<dyn Any + Send>) -> Diagnostic {
    let message = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown error".to_string());
    Diagnostic::error(
        "Translation failure",
        format!("Translating {} failed: {message}.", vertex.addr()),
    )
    .with_subject(vertex.component.def_span)
}
