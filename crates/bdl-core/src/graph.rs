//! Directed graph with insertion-ordered vertices and edges.

use indexmap::IndexSet;
use std::fmt;

/// Index of a vertex in a [`DirectedGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Directed, unweighted graph without parallel edges.
///
/// Vertices and edges are kept in insertion order, so every traversal is
/// deterministic.
#[derive(Debug, Clone)]
pub struct DirectedGraph<V> {
    vertices: Vec<V>,
    edges: IndexSet<(VertexId, VertexId)>,
    succ: Vec<Vec<VertexId>>,
    pred: Vec<Vec<VertexId>>,
}

impl<V> Default for DirectedGraph<V> {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            edges: IndexSet::new(),
            succ: Vec::new(),
            pred: Vec::new(),
        }
    }
}

impl<V> DirectedGraph<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, vertex: V) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.vertices.push(vertex);
        self.succ.push(Vec::new());
        self.pred.push(Vec::new());
        id
    }

    /// Adds the edge `from → to`. Returns false when it already existed or
    /// either end is not a vertex of this graph.
    pub fn connect(&mut self, from: VertexId, to: VertexId) -> bool {
        if from.0 >= self.vertices.len() || to.0 >= self.vertices.len() {
            return false;
        }
        if !self.edges.insert((from, to)) {
            return false;
        }
        self.succ[from.0].push(to);
        self.pred[to.0].push(from);
        true
    }

    pub fn has_edge(&self, from: VertexId, to: VertexId) -> bool {
        self.edges.contains(&(from, to))
    }

    pub fn vertex(&self, id: VertexId) -> Option<&V> {
        self.vertices.get(id.0)
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &V)> {
        self.vertices.iter().enumerate().map(|(i, v)| (VertexId(i), v))
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> {
        (0..self.vertices.len()).map(VertexId)
    }

    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.edges.iter().copied()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn successors(&self, id: VertexId) -> &[VertexId] {
        self.succ.get(id.0).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn predecessors(&self, id: VertexId) -> &[VertexId] {
        self.pred.get(id.0).map(Vec::as_slice).unwrap_or_default()
    }

    /// Vertices without incoming edges.
    pub fn roots(&self) -> Vec<VertexId> {
        self.vertex_ids()
            .filter(|v| self.pred[v.0].is_empty())
            .collect()
    }

    /// Vertices reachable from `id`, excluding `id` itself unless it lies on
    /// a cycle. Breadth-first order.
    pub fn descendants(&self, id: VertexId) -> Vec<VertexId> {
        self.reachable(id, |v| self.successors(v))
    }

    /// Vertices `id` is reachable from. Breadth-first order.
    pub fn ancestors(&self, id: VertexId) -> Vec<VertexId> {
        self.reachable(id, |v| self.predecessors(v))
    }

    fn reachable<'a>(
        &'a self,
        start: VertexId,
        next: impl Fn(VertexId) -> &'a [VertexId],
    ) -> Vec<VertexId> {
        let mut seen = vec![false; self.vertices.len()];
        let mut order = Vec::new();
        let mut queue = std::collections::VecDeque::from([start]);
        while let Some(v) = queue.pop_front() {
            for &w in next(v) {
                if !seen[w.0] {
                    seen[w.0] = true;
                    order.push(w);
                    queue.push_back(w);
                }
            }
        }
        order
    }

    /// Strongly connected components, computed with Tarjan's algorithm.
    ///
    /// Components come out in reverse topological order: a component is
    /// emitted before any component with an edge into it. Members keep the
    /// order in which the search reached them.
    pub fn strongly_connected_components(&self) -> Vec<Vec<VertexId>> {
        const UNVISITED: usize = usize::MAX;

        let n = self.vertices.len();
        let mut index = vec![UNVISITED; n];
        let mut lowlink = vec![0; n];
        let mut on_stack = vec![false; n];
        let mut stack: Vec<VertexId> = Vec::new();
        let mut next_index = 0;
        let mut components = Vec::new();

        for root in self.vertex_ids() {
            if index[root.0] != UNVISITED {
                continue;
            }

            // (vertex, position of the next successor to visit)
            let mut call_stack: Vec<(VertexId, usize)> = vec![(root, 0)];
            index[root.0] = next_index;
            lowlink[root.0] = next_index;
            next_index += 1;
            stack.push(root);
            on_stack[root.0] = true;

            while let Some(frame) = call_stack.last_mut() {
                let v = frame.0;
                if let Some(&w) = self.succ[v.0].get(frame.1) {
                    frame.1 += 1;
                    if index[w.0] == UNVISITED {
                        index[w.0] = next_index;
                        lowlink[w.0] = next_index;
                        next_index += 1;
                        stack.push(w);
                        on_stack[w.0] = true;
                        call_stack.push((w, 0));
                    } else if on_stack[w.0] {
                        lowlink[v.0] = lowlink[v.0].min(index[w.0]);
                    }
                    continue;
                }

                call_stack.pop();
                if let Some(&(parent, _)) = call_stack.last() {
                    lowlink[parent.0] = lowlink[parent.0].min(lowlink[v.0]);
                }

                if lowlink[v.0] == index[v.0] {
                    let mut component = Vec::new();
                    while let Some(w) = stack.pop() {
                        on_stack[w.0] = false;
                        component.push(w);
                        if w == v {
                            break;
                        }
                    }
                    component.reverse();
                    components.push(component);
                }
            }
        }

        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(n: usize, edges: &[(usize, usize)]) -> DirectedGraph<usize> {
        let mut g = DirectedGraph::new();
        for i in 0..n {
            g.add_vertex(i);
        }
        for &(a, b) in edges {
            g.connect(VertexId(a), VertexId(b));
        }
        g
    }

    fn ids(v: &[VertexId]) -> Vec<usize> {
        v.iter().map(|v| v.0).collect()
    }

    #[test]
    fn test_edges_unique_and_ordered() {
        let mut g = graph(3, &[(0, 2), (0, 1)]);
        assert!(!g.connect(VertexId(0), VertexId(2)));
        assert!(!g.connect(VertexId(0), VertexId(9)));
        assert_eq!(g.edges().collect::<Vec<_>>(), [(VertexId(0), VertexId(2)), (VertexId(0), VertexId(1))]);
        assert_eq!(ids(g.successors(VertexId(0))), [2, 1]);
        assert_eq!(ids(g.predecessors(VertexId(1))), [0]);
        assert_eq!(ids(&g.roots()), [0]);
    }

    #[test]
    fn test_descendants_and_ancestors() {
        let g = graph(4, &[(0, 1), (1, 2), (3, 2)]);
        assert_eq!(ids(&g.descendants(VertexId(0))), [1, 2]);
        assert_eq!(ids(&g.ancestors(VertexId(2))), [1, 3, 0]);
        assert!(g.descendants(VertexId(2)).is_empty());
    }

    #[test]
    fn test_scc_reverse_topological() {
        // 0 → 1 ⇄ 2 → 3
        let g = graph(4, &[(0, 1), (1, 2), (2, 1), (2, 3)]);
        let sccs: Vec<Vec<usize>> = g
            .strongly_connected_components()
            .iter()
            .map(|c| ids(c))
            .collect();
        assert_eq!(sccs, vec![vec![3], vec![1, 2], vec![0]]);
    }

    #[test]
    fn test_scc_self_loop_and_isolated() {
        let g = graph(3, &[(1, 1)]);
        let sccs = g.strongly_connected_components();
        assert_eq!(sccs.len(), 3);
        assert!(g.has_edge(VertexId(1), VertexId(1)));
        assert_eq!(ids(&g.descendants(VertexId(1))), [1]);
    }

    #[test]
    fn test_scc_long_chain_does_not_recurse() {
        let n = 10_000;
        let edges: Vec<_> = (0..n - 1).map(|i| (i, i + 1)).chain([(n - 1, 0)]).collect();
        let g = graph(n, &edges);
        let sccs = g.strongly_connected_components();
        assert_eq!(sccs.len(), 1);
        assert_eq!(sccs[0].len(), n);
    }
}
