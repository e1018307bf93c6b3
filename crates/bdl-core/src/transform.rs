//! Graph transformers.
//!
//! The component graph is built by a fixed sequence of transformers, each
//! run to completion before the next. Every transformer reports problems as
//! diagnostics and keeps going.
//!
//! | transformer | effect |
//! |---|---|
//! | [`AddComponents`] | one vertex per component, with a valid object name |
//! | [`ReferenceEdges`] | `v → w` for each component `w` referenced in `v`'s body |
//! | [`EventRouting`] | `v → to(v)` |
//! | [`Delivery`] | `v → dead_letter_sink` for every vertex embedding delivery settings |
//! | [`SourceEdgesCheck`] | rejects edges into sources |

use crate::address::rfc1123_name;
use crate::decode::variables;
use crate::graph::VertexId;
use crate::registry::Registry;
use crate::vertex::{BridgeGraph, ComponentVertex};
use bdl_ast::{Bridge, ComponentCategory, Diagnostic, Diagnostics, Span, Traversal};
use tracing::debug;

const DEAD_LETTER_SINK: &str = "dead_letter_sink";

pub trait GraphTransformer {
    fn name(&self) -> &'static str;

    fn transform(&self, bridge: &Bridge, registry: &Registry, graph: &mut BridgeGraph)
    -> Diagnostics;
}

/// The transformers building a Bridge's graph, in order.
pub fn default_transformers() -> Vec<Box<dyn GraphTransformer>> {
    vec![
        Box::new(AddComponents),
        Box::new(ReferenceEdges),
        Box::new(EventRouting),
        Box::new(Delivery),
        Box::new(SourceEdgesCheck),
    ]
}

/// Builds the graph of `bridge` by running every transformer.
pub fn build_graph(bridge: &Bridge, registry: &Registry) -> (BridgeGraph, Diagnostics) {
    let mut graph = BridgeGraph::new();
    let mut diags = Diagnostics::new();
    for transformer in default_transformers() {
        let found = transformer.transform(bridge, registry, &mut graph);
        debug!(
            transformer = transformer.name(),
            vertices = graph.graph().vertex_count(),
            edges = graph.graph().edge_count(),
            diagnostics = found.len(),
            "graph transformer done"
        );
        diags.append(found);
    }
    (graph, diags)
}

pub struct AddComponents;

impl GraphTransformer for AddComponents {
    fn name(&self) -> &'static str {
        "add-components"
    }

    fn transform(
        &self,
        bridge: &Bridge,
        registry: &Registry,
        graph: &mut BridgeGraph,
    ) -> Diagnostics {
        let mut diags = Diagnostics::new();
        for component in bridge.components() {
            let implementation = registry.get(component.category, &component.kind);
            if implementation.is_none() {
                diags.push(
                    Diagnostic::error(
                        "Unsupported component type",
                        format!(
                            "There is no {} of type \"{}\".",
                            component.category, component.kind
                        ),
                    )
                    .with_subject(component.def_span),
                );
            }
            if rfc1123_name(&component.identifier).is_empty() {
                diags.push(
                    Diagnostic::error(
                        "Invalid identifier",
                        format!(
                            "The identifier \"{}\" must contain at least one letter or digit.",
                            component.identifier
                        ),
                    )
                    .with_subject(component.def_span),
                );
            }
            graph.add(ComponentVertex {
                component: component.clone(),
                implementation,
            });
        }
        diags
    }
}

pub struct ReferenceEdges;

impl GraphTransformer for ReferenceEdges {
    fn name(&self) -> &'static str {
        "reference-edges"
    }

    fn transform(&self, _: &Bridge, _: &Registry, graph: &mut BridgeGraph) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let mut edges = Vec::new();

        for (id, vertex) in graph.graph().vertices() {
            let vars = match vertex.implementation.as_ref().and_then(|i| i.decodable()) {
                Some(decodable) => variables(&vertex.component.body, &decodable.spec()),
                None => vertex.component.body.all_variables(),
            };
            for var in &vars {
                if let Some(target) = resolve_reference(graph, var, vertex.component.def_span, &mut diags) {
                    edges.push((id, target));
                }
            }
        }

        for (from, to) in edges {
            graph.connect(from, to);
        }
        diags
    }
}

pub struct EventRouting;

impl GraphTransformer for EventRouting {
    fn name(&self) -> &'static str {
        "event-routing"
    }

    fn transform(&self, _: &Bridge, _: &Registry, graph: &mut BridgeGraph) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let mut edges = Vec::new();

        for (id, vertex) in graph.graph().vertices() {
            let Some(to) = &vertex.component.to else {
                continue;
            };
            if ComponentCategory::from_tag(to.root_name()).is_none() {
                diags.push(
                    Diagnostic::error(
                        "Invalid event destination",
                        "The event destination must be a reference to a component, e.g. target.my_target.",
                    )
                    .with_subject(to.span)
                    .with_expression(to.to_string()),
                );
                continue;
            }
            if let Some(target) = resolve_reference(graph, to, vertex.component.def_span, &mut diags) {
                edges.push((id, target));
            }
        }

        for (from, to) in edges {
            graph.connect(from, to);
        }
        diags
    }
}

/// Connects every vertex embedding the Bridge's delivery defaults to the
/// dead-letter sink, whose address those defaults carry.
pub struct Delivery;

impl GraphTransformer for Delivery {
    fn name(&self) -> &'static str {
        "delivery"
    }

    fn transform(&self, bridge: &Bridge, _: &Registry, graph: &mut BridgeGraph) -> Diagnostics {
        let mut diags = Diagnostics::new();
        let Some(attr) = bridge
            .delivery()
            .and_then(|body| body.attribute(DEAD_LETTER_SINK))
        else {
            return diags;
        };

        let context = bridge.span.unwrap_or(attr.span);
        let mut sinks = Vec::new();
        for var in attr.expr.variables() {
            if let Some(sink) = resolve_reference(graph, &var, context, &mut diags) {
                sinks.push(sink);
            }
        }

        let g = graph.graph();
        let mut edges = Vec::new();
        for &sink in &sinks {
            for id in g.vertex_ids() {
                if id != sink && graph.embeds_delivery(id) {
                    edges.push((id, sink));
                }
            }
        }

        for (from, to) in edges {
            graph.connect(from, to);
        }
        diags
    }
}

/// Sources originate events and can not be sent any.
pub struct SourceEdgesCheck;

impl GraphTransformer for SourceEdgesCheck {
    fn name(&self) -> &'static str {
        "source-edges-check"
    }

    fn transform(&self, _: &Bridge, _: &Registry, graph: &mut BridgeGraph) -> Diagnostics {
        let g = graph.graph();
        g.edges()
            .filter_map(|(from, to)| {
                let sender = g.vertex(from)?;
                let source = g.vertex(to)?;
                (source.category() == ComponentCategory::Source).then(|| {
                    Diagnostic::error(
                        "Invalid event destination",
                        format!(
                            "{} sends events to the source {}, but sources can not receive events.",
                            sender.component.addr().reference(),
                            source.component.addr().reference()
                        ),
                    )
                    .with_subject(sender.component.def_span)
                    .with_context(source.component.def_span)
                })
            })
            .collect()
    }
}

/// Resolves a component reference to its vertex, reporting references that
/// name no component.
///
/// Traversals whose root is not a component category (e.g. `secret.x`) are
/// not component references and resolve to nothing without a diagnostic.
fn resolve_reference(
    graph: &BridgeGraph,
    reference: &Traversal,
    context: Span,
    diags: &mut Diagnostics,
) -> Option<VertexId> {
    let category = ComponentCategory::from_tag(reference.root_name())?;

    if !category.is_referenceable() {
        diags.push(
            Diagnostic::error(
                "Invalid reference",
                format!("Components of category \"{category}\" can not be referenced."),
            )
            .with_subject(reference.span)
            .with_context(context)
            .with_expression(reference.to_string()),
        );
        return None;
    }

    let Some(identifier) = reference.first_attr() else {
        diags.push(
            Diagnostic::error(
                "Invalid reference",
                format!(
                    "A reference to a {category} must include its identifier, e.g. {category}.my_{category}."
                ),
            )
            .with_subject(reference.span)
            .with_context(context)
            .with_expression(reference.to_string()),
        );
        return None;
    };

    let found = graph.lookup(category, identifier);
    if found.is_none() {
        diags.push(
            Diagnostic::error(
                "Reference to undeclared component",
                format!("This is a reference to undeclared component {category}.{identifier}."),
            )
            .with_subject(reference.span)
            .with_context(context)
            .with_expression(reference.to_string()),
        );
    }
    found
}
