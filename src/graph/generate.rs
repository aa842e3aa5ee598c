mod erdos_renyi;
mod grid;

pub use erdos_renyi::ErdosRenyi;
pub use grid::Grid;

use oorandom::Rand64;
use std::collections::BTreeSet;

use crate::graph::{MatrixGraph, WeightedGraph};

/// A generator for weighted graphs with consecutive `usize` node ids starting at 0.
pub trait Generate {
    /// Generates a graph, drawing all randomness from `rng`.
    fn generate(&self, rng: &mut Rand64) -> MatrixGraph<usize>;
}

/// Draws an edge weight uniformly from `[low, high)`.
pub fn random_weight(rng: &mut Rand64, (low, high): (f64, f64)) -> f64 {
    low + rng.rand_float() * (high - low)
}

/// Picks `count` distinct nodes, or every node if the graph has fewer.
pub fn random_terminals<G: WeightedGraph>(
    graph: &G,
    count: usize,
    rng: &mut Rand64,
) -> BTreeSet<G::IndexType> {
    let mut nodes = graph.node_ids();
    let count = count.min(nodes.len());

    // partial Fisher-Yates
    for i in 0..count {
        let j = i + rng.rand_range(0..(nodes.len() - i) as u64) as usize;
        nodes.swap(i, j);
    }

    nodes.into_iter().take(count).collect()
}
