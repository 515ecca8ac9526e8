//! Minimal node/edge carrier for graph-shaped datasets.

/// An undirected graph described by labeled nodes and index pairs.
///
/// The crawler only reports structural counts; adjacency semantics stay
/// with the producing code.
#[derive(Debug, Clone, Default)]
pub struct GraphData {
    /// Node labels; edge endpoints index into this list.
    pub nodes: Vec<String>,
    /// Edges as `(from, to)` node indices.
    pub edges: Vec<(usize, usize)>,
}

impl GraphData {
    /// Create a graph from nodes and edges.
    pub fn new(nodes: Vec<String>, edges: Vec<(usize, usize)>) -> Self {
        Self { nodes, edges }
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts() {
        let graph = GraphData::new(
            vec!["a".into(), "b".into(), "c".into()],
            vec![(0, 1), (0, 2)],
        );

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 2);
    }
}
