use oorandom::Rand64;

use super::{random_weight, Generate};
use crate::graph::{MatrixGraph, WeightedGraph};

/// Rectangular grid, every node connected to its horizontal and vertical neighbors.
pub struct Grid {
    size: (usize, usize),
    weight_range: (f64, f64),
}

impl Grid {
    pub fn new(size: (usize, usize), weight_range: (f64, f64)) -> Self {
        Grid { size, weight_range }
    }

    fn id(&self, i: usize, j: usize) -> usize {
        i * self.size.1 + j
    }
}

impl Generate for Grid {
    fn generate(&self, rng: &mut Rand64) -> MatrixGraph<usize> {
        let (width, height) = self.size;
        let mut graph = MatrixGraph::with_size(width * height);
        let mut edges = Vec::new();

        for i in 0..width {
            for j in 0..height {
                // right and below neighbor
                if i + 1 < width {
                    edges.push((self.id(i, j), self.id(i + 1, j)));
                }
                if j + 1 < height {
                    edges.push((self.id(i, j), self.id(i, j + 1)));
                }
            }
        }

        // ids are consecutive and edges are unique, neither can fail
        for id in 0..width * height {
            let _ = graph.add_node(id);
        }
        for edge in edges.into_iter() {
            let _ = graph.add_edge(edge, random_weight(rng, self.weight_range));
        }

        graph
    }
}
