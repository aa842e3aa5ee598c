use oorandom::Rand64;

use super::{random_weight, Generate};
use crate::graph::{MatrixGraph, WeightedGraph};

/// G(n, p): every pair of nodes is connected independently with probability p.
pub struct ErdosRenyi {
    size: usize,
    connection_probability: f64,
    weight_range: (f64, f64),
}

impl ErdosRenyi {
    pub fn new(size: usize, connection_probability: f64, weight_range: (f64, f64)) -> Self {
        ErdosRenyi {
            size,
            connection_probability,
            weight_range,
        }
    }
}

impl Generate for ErdosRenyi {
    fn generate(&self, rng: &mut Rand64) -> MatrixGraph<usize> {
        let mut graph = MatrixGraph::with_size(self.size);
        for id in 0..self.size {
            let _ = graph.add_node(id);
        }

        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if rng.rand_float() < self.connection_probability {
                    let _ = graph.add_edge((i, j), random_weight(rng, self.weight_range));
                }
            }
        }

        graph
    }
}
