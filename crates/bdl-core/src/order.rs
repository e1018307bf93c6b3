//! Deterministic ordering of the component graph.
//!
//! Strongly connected components are ordered along the event flow with
//! Kahn's algorithm on the condensation. Ties are broken by the smallest
//! (category rank, identifier) among each component's members, so the same
//! Bridge always yields the same order.

use crate::graph::VertexId;
use crate::vertex::BridgeGraph;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::debug;

/// A strongly connected component of the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scc {
    /// Members ordered by (category rank, identifier).
    pub members: Vec<VertexId>,
    /// True for components with several members or a self-loop.
    pub cyclic: bool,
}

/// Components in presentation order: every component comes before the
/// components it sends events to. Evaluation walks this order backwards.
pub fn presentation_order(graph: &BridgeGraph) -> Vec<Scc> {
    let g = graph.graph();
    let mut sccs: Vec<Scc> = g
        .strongly_connected_components()
        .into_iter()
        .map(|mut members| {
            members.sort_by(|a, b| graph.sort_key(*a).cmp(&graph.sort_key(*b)));
            let cyclic = members.len() > 1 || g.has_edge(members[0], members[0]);
            Scc { members, cyclic }
        })
        .collect();

    let mut scc_of = vec![0; g.vertex_count()];
    for (i, scc) in sccs.iter().enumerate() {
        for v in &scc.members {
            scc_of[v.0] = i;
        }
    }

    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); sccs.len()];
    let mut in_degree = vec![0usize; sccs.len()];
    for (from, to) in g.edges() {
        let (a, b) = (scc_of[from.0], scc_of[to.0]);
        if a != b && !successors[a].contains(&b) {
            successors[a].push(b);
            in_degree[b] += 1;
        }
    }

    let key = |i: usize| {
        let lead = sccs[i].members[0];
        let (rank, id) = graph.sort_key(lead);
        Reverse((rank, id.to_string(), i))
    };

    let mut ready: BinaryHeap<_> = (0..sccs.len())
        .filter(|&i| in_degree[i] == 0)
        .map(key)
        .collect();
    let mut order = Vec::with_capacity(sccs.len());
    while let Some(Reverse((_, _, i))) = ready.pop() {
        order.push(i);
        for &next in &successors[i] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.push(key(next));
            }
        }
    }

    debug!(
        components = order.len(),
        cyclic = sccs.iter().filter(|s| s.cyclic).count(),
        "ordered component graph"
    );

    let mut slots: Vec<Option<Scc>> = sccs.drain(..).map(Some).collect();
    order
        .into_iter()
        .filter_map(|i| slots[i].take())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;
    use crate::transform::build_graph;
    use crate::translation::ComponentImpl;
    use bdl_ast::ComponentCategory;

    struct Inert;
    impl ComponentImpl for Inert {}

    fn order(source: &str) -> Vec<Vec<String>> {
        let (bridge, diags) = bdl_parser::parse_bridge(source, 0);
        assert!(diags.is_empty(), "{diags}");
        let mut registry = Registry::new();
        for category in ComponentCategory::REFERENCEABLE {
            registry.register(category, "x", Inert);
        }
        let (graph, diags) = build_graph(&bridge, &registry);
        assert!(diags.is_empty(), "{diags}");
        presentation_order(&graph)
            .iter()
            .map(|scc| {
                scc.members
                    .iter()
                    .map(|v| graph.vertex(*v).unwrap().addr().reference())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_fan_in() {
        let sccs = order(
            r#"
            channel "x" "c" { }
            source "x" "s2" { to = channel.c }
            source "x" "s1" { to = channel.c }
            "#,
        );
        assert_eq!(sccs, [["source.s1"], ["source.s2"], ["channel.c"]]);
    }

    #[test]
    fn test_cycle_members_sorted() {
        let sccs = order(
            r#"
            source "x" "a" { to = transformer.b }
            transformer "x" "b" { to = target.c }
            target "x" "c" { to = transformer.b }
            "#,
        );
        assert_eq!(
            sccs,
            vec![vec!["source.a"], vec!["transformer.b", "target.c"]]
        );
    }

    #[test]
    fn test_independent_components_by_rank() {
        let sccs = order(
            r#"
            target "x" "a" { }
            router "x" "b" { }
            channel "x" "z" { }
            "#,
        );
        assert_eq!(sccs, [["channel.z"], ["router.b"], ["target.a"]]);
    }

    #[test]
    fn test_self_loop_is_cyclic() {
        let (bridge, _) = bdl_parser::parse_bridge(r#"target "x" "t" { to = target.t }"#, 0);
        let mut registry = Registry::new();
        registry.register(ComponentCategory::Target, "x", Inert);
        let (graph, _) = build_graph(&bridge, &registry);
        let sccs = presentation_order(&graph);
        assert_eq!(sccs.len(), 1);
        assert!(sccs[0].cyclic);
    }
}
