//! Graphviz DOT rendering of the component graph.
//!
//! ```text
//! digraph bridge {
//!   "source.kafka.orders";
//!   "target.aws_sns.sns";
//!   "source.kafka.orders" -> "target.aws_sns.sns";
//! }
//! ```
//!
//! Vertices and edges are listed in insertion order, so the output of a
//! given document is stable.

use bdl_core::BridgeGraph;
use std::io::{self, Write};

/// Writes `graph` to `w` in DOT format.
pub fn write_dot<W: Write>(mut w: W, graph: &BridgeGraph) -> io::Result<()> {
    let g = graph.graph();
    writeln!(w, "digraph bridge {{")?;
    for (_, vertex) in g.vertices() {
        writeln!(w, "  {};", quoted(&vertex.addr().to_string()))?;
    }
    for (from, to) in g.edges() {
        let (Some(from), Some(to)) = (g.vertex(from), g.vertex(to)) else {
            continue;
        };
        writeln!(
            w,
            "  {} -> {};",
            quoted(&from.addr().to_string()),
            quoted(&to.addr().to_string())
        )?;
    }
    writeln!(w, "}}")
}

/// Renders `graph` as a DOT string.
pub fn to_dot(graph: &BridgeGraph) -> String {
    let mut buf = Vec::new();
    // Writing to a Vec cannot fail.
    let _ = write_dot(&mut buf, graph);
    String::from_utf8_lossy(&buf).into_owned()
}

fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}
