mod dot;

pub use dot::Dot;

use std::collections::BTreeSet;

use crate::graph::WeightedGraph;
use crate::metaheuristic::Solution;

/// An exporter for weighted graphs and Steiner tree candidates on them.
pub trait Export {
    /// Returns a String representation of the graph according to the export format used.
    fn from_weighted_graph<G: WeightedGraph>(graph: &G, name: &str) -> String;

    /// Returns a String representation of the graph with terminals and selected edges highlighted.
    fn from_steiner_solution<G: WeightedGraph>(
        graph: &G,
        terminals: &BTreeSet<G::IndexType>,
        solution: &Solution<G::IndexType>,
        name: &str,
    ) -> String;
}
