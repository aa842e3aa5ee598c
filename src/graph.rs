mod error;

pub mod export;
pub mod generate;
pub mod import;
mod matrix_graph;

pub use error::GraphError;
pub use matrix_graph::MatrixGraph;

use std::collections::BTreeMap;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// An undirected edge. Edges handed out by a graph are always normalized.
pub type Edge<IndexType> = (IndexType, IndexType);

/// Returns the edge with its smaller endpoint first.
pub fn normalize<IndexType: Ord>(edge: Edge<IndexType>) -> Edge<IndexType> {
    if edge.0 <= edge.1 {
        edge
    } else {
        (edge.1, edge.0)
    }
}

/// Distances and vertex sequences from one source to every reachable node.
pub type PathMaps<IndexType> = (BTreeMap<IndexType, f64>, BTreeMap<IndexType, Vec<IndexType>>);

pub trait WeightedGraph {
    type IndexType: Copy + Eq + Hash + Ord + Debug + Display;

    /// Returns true if there are no nodes, or false otherwise.
    fn is_empty(&self) -> bool;

    /// Returns the number of nodes in this graph.
    fn order(&self) -> usize;

    /// Returns the number of edges in this graph.
    fn size(&self) -> usize;

    /// Returns an iterator over node ids.
    fn iter_node_ids(&self) -> Box<dyn Iterator<Item = Self::IndexType> + '_>;

    /// Returns the node ids of this graph.
    fn node_ids(&self) -> Vec<Self::IndexType> {
        self.iter_node_ids().collect()
    }

    /// Returns true if node with id is a member, or false otherwise.
    fn has_node(&self, id: Self::IndexType) -> bool;

    /// Returns an iterator over the neighbor ids together with the weight of the connecting edge.
    /// Returns an error if the node is not in the graph.
    #[allow(clippy::type_complexity)]
    fn iter_neighbors(
        &self,
        id: Self::IndexType,
    ) -> Result<Box<dyn Iterator<Item = (Self::IndexType, f64)> + '_>, GraphError<Self::IndexType>>;

    /// Returns the count of neighbors at node with given id.
    /// Returns an error if the node is not in the graph.
    fn degree(&self, id: Self::IndexType) -> Result<usize, GraphError<Self::IndexType>> {
        Ok(self.iter_neighbors(id)?.count())
    }

    /// Returns an iterator over all edges with their weights.
    /// Every undirected edge is reported once, normalized.
    fn iter_edges(&self) -> Box<dyn Iterator<Item = (Edge<Self::IndexType>, f64)> + '_>;

    /// Returns a vec of all normalized edge ids.
    fn edge_ids(&self) -> Vec<Edge<Self::IndexType>> {
        self.iter_edges().map(|(edge, _)| edge).collect()
    }

    /// Returns the weight of an edge, regardless of the order of its endpoints.
    fn edge_weight(&self, edge: Edge<Self::IndexType>) -> Result<f64, GraphError<Self::IndexType>>;

    /// Returns true if the edge exists, or false otherwise.
    fn has_edge(&self, edge: Edge<Self::IndexType>) -> bool;

    /// Adds a new node to the graph.
    /// Returns an error if a node with the same id already exists.
    fn add_node(&mut self, id: Self::IndexType) -> Result<(), GraphError<Self::IndexType>>;

    /// Adds a new weighted edge to the graph.
    /// Returns an error if the edge already exists, is a loop, has a non-finite weight
    /// or one of the nodes is missing.
    fn add_edge(
        &mut self,
        edge: Edge<Self::IndexType>,
        weight: f64,
    ) -> Result<(), GraphError<Self::IndexType>>;

    /// Changes the weight of a edge to the new weight.
    /// If the edge did not exist before, it gets created in this process.
    fn change_edge(
        &mut self,
        edge: Edge<Self::IndexType>,
        weight: f64,
    ) -> Result<(), GraphError<Self::IndexType>>;

    /// Runs Dijkstra from the given node.
    /// Only reachable nodes are part of the returned maps. Requires non-negative weights.
    fn shortest_paths(
        &self,
        from_node: Self::IndexType,
    ) -> Result<PathMaps<Self::IndexType>, GraphError<Self::IndexType>>;
}
