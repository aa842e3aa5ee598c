use crate::error::SteinerError;
use crate::graph::{normalize, Edge, WeightedGraph};

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fmt::{Display, Formatter};

/// A candidate Steiner tree, stored as a set of normalized edges.
/// Iteration order is the edge order, which keeps seeded runs reproducible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution<IndexType> {
    edges: BTreeSet<Edge<IndexType>>,
}

impl<IndexType: Copy + Ord> Default for Solution<IndexType> {
    fn default() -> Self {
        Solution::new()
    }
}

impl<IndexType: Copy + Ord> Solution<IndexType> {
    pub fn new() -> Self {
        Solution {
            edges: BTreeSet::new(),
        }
    }

    pub fn from_edges<I: IntoIterator<Item = Edge<IndexType>>>(edges: I) -> Self {
        Solution {
            edges: edges.into_iter().map(normalize).collect(),
        }
    }

    /// Selects every edge of the graph.
    pub fn from_graph<G: WeightedGraph<IndexType = IndexType>>(graph: &G) -> Self {
        Solution::from_edges(graph.iter_edges().map(|(edge, _)| edge))
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn contains(&self, edge: Edge<IndexType>) -> bool {
        self.edges.contains(&normalize(edge))
    }

    /// Returns true if the edge was not selected before.
    pub fn insert(&mut self, edge: Edge<IndexType>) -> bool {
        self.edges.insert(normalize(edge))
    }

    /// Returns true if the edge was selected.
    pub fn remove(&mut self, edge: Edge<IndexType>) -> bool {
        self.edges.remove(&normalize(edge))
    }

    /// Selects every edge along a vertex sequence and returns how many were new.
    pub fn insert_path(&mut self, path: &[IndexType]) -> usize {
        path.windows(2)
            .filter(|pair| self.insert((pair[0], pair[1])))
            .count()
    }

    pub fn iter_edges(&self) -> Box<dyn Iterator<Item = Edge<IndexType>> + '_> {
        Box::new(self.edges.iter().copied())
    }

    pub fn edges(&self) -> Vec<Edge<IndexType>> {
        self.iter_edges().collect()
    }

    pub fn nth_edge(&self, n: usize) -> Option<Edge<IndexType>> {
        self.edges.iter().nth(n).copied()
    }

    /// The vertices spanned by the selected edges.
    pub fn nodes(&self) -> BTreeSet<IndexType> {
        self.edges
            .iter()
            .flat_map(|&(from, to)| vec![from, to])
            .collect()
    }

    pub fn has_node(&self, node: IndexType) -> bool {
        self.edges
            .iter()
            .any(|&(from, to)| from == node || to == node)
    }

    pub fn incident_edges(&self, node: IndexType) -> Vec<Edge<IndexType>> {
        self.edges
            .iter()
            .filter(|&&(from, to)| from == node || to == node)
            .copied()
            .collect()
    }

    /// Deselects every edge touching `node`, returns how many were removed.
    pub fn remove_node(&mut self, node: IndexType) -> usize {
        let before = self.edges.len();
        self.edges.retain(|&(from, to)| from != node && to != node);
        before - self.edges.len()
    }

    /// Sum of the weights of all selected edges.
    pub fn weight<G: WeightedGraph<IndexType = IndexType>>(
        &self,
        graph: &G,
    ) -> Result<f64, SteinerError<IndexType>> {
        let mut total = 0.0;
        for edge in self.edges.iter() {
            total += graph
                .edge_weight(*edge)
                .map_err(|_| SteinerError::EdgeNotInGraph(*edge))?;
        }

        Ok(total)
    }

    /// Number of connected components of the induced subgraph. Zero for the empty solution.
    pub fn components(&self) -> usize {
        let index: BTreeMap<IndexType, usize> = self
            .nodes()
            .into_iter()
            .enumerate()
            .map(|(i, node)| (node, i))
            .collect();
        let mut parent: Vec<usize> = (0..index.len()).collect();
        let mut components = index.len();

        for (from, to) in self.edges.iter() {
            let a = find_root(&mut parent, index[from]);
            let b = find_root(&mut parent, index[to]);
            if a != b {
                parent[a] = b;
                components -= 1;
            }
        }

        components
    }

    /// True for a non-empty, connected and acyclic edge set.
    pub fn is_tree(&self) -> bool {
        !self.is_empty() && self.components() == 1 && self.nodes().len() == self.len() + 1
    }
}

fn find_root(parent: &mut [usize], mut node: usize) -> usize {
    while parent[node] != node {
        parent[node] = parent[parent[node]];
        node = parent[node];
    }
    node
}

impl<IndexType: Copy + Ord + Display> Display for Solution<IndexType> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let edges: Vec<String> = self
            .edges
            .iter()
            .map(|(from, to)| format!("({}, {})", from, to))
            .collect();
        write!(f, "[{}]", edges.join(", "))
    }
}
