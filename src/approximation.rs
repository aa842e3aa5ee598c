//! Kou-Markowsky-Berman 2-approximation for the Steiner tree problem.
//!
//! Builds the metric closure over the terminals, takes its minimum spanning tree
//! and expands every tree edge back into the shortest path it stands for.

use log::debug;
use std::collections::BTreeSet;

use crate::error::SteinerError;
use crate::graph::WeightedGraph;
use crate::metaheuristic::Solution;
use crate::shortest_path::ShortestPathTable;

/// Computes a Steiner tree of at most twice the optimal weight.
/// A single terminal yields the empty solution.
pub fn approximate<G: WeightedGraph>(
    graph: &G,
    terminals: &BTreeSet<G::IndexType>,
) -> Result<Solution<G::IndexType>, SteinerError<G::IndexType>> {
    if terminals.is_empty() {
        return Err(SteinerError::NoTerminals);
    }
    if let Some(&missing) = terminals.iter().find(|t| !graph.has_node(**t)) {
        return Err(SteinerError::MissingNode(missing));
    }

    let table = ShortestPathTable::from_sources(graph, terminals.iter().copied())?;
    let terminals: Vec<G::IndexType> = terminals.iter().copied().collect();

    let mut solution = Solution::new();
    for (from, to) in metric_closure_mst(&table, &terminals)? {
        if let Some(path) = table.path(from, to) {
            solution.insert_path(path);
        }
    }

    debug!(
        "Approximation spans {} terminals with {} edges",
        terminals.len(),
        solution.len()
    );
    Ok(solution)
}

/// Prim's algorithm on the complete graph over `terminals`, weighted by shortest distance.
fn metric_closure_mst<IndexType>(
    table: &ShortestPathTable<IndexType>,
    terminals: &[IndexType],
) -> Result<Vec<(IndexType, IndexType)>, SteinerError<IndexType>>
where
    IndexType: Copy + Ord + std::fmt::Display,
{
    let mut tree = Vec::with_capacity(terminals.len().saturating_sub(1));
    if terminals.is_empty() {
        return Ok(tree);
    }

    let mut in_tree = vec![false; terminals.len()];
    // cheapest known connection into the tree: (distance, tree endpoint)
    let mut best: Vec<Option<(f64, usize)>> = vec![None; terminals.len()];
    in_tree[0] = true;
    relax(table, terminals, 0, &in_tree, &mut best);

    for _ in 1..terminals.len() {
        let next = (0..terminals.len())
            .filter(|&i| !in_tree[i])
            .filter_map(|i| best[i].map(|(dist, parent)| (i, dist, parent)))
            .min_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));

        let (added, _, parent) = match next {
            Some(next) => next,
            None => {
                let left_out = (0..terminals.len()).find(|&i| !in_tree[i]).unwrap_or(0);
                return Err(SteinerError::DisconnectedInstance(
                    terminals[0],
                    terminals[left_out],
                ));
            }
        };

        in_tree[added] = true;
        tree.push((terminals[parent], terminals[added]));
        relax(table, terminals, added, &in_tree, &mut best);
    }

    Ok(tree)
}

fn relax<IndexType>(
    table: &ShortestPathTable<IndexType>,
    terminals: &[IndexType],
    added: usize,
    in_tree: &[bool],
    best: &mut [Option<(f64, usize)>],
) where
    IndexType: Copy + Ord + std::fmt::Display,
{
    for (i, &terminal) in terminals.iter().enumerate() {
        if in_tree[i] {
            continue;
        }
        if let Some(dist) = table.distance(terminals[added], terminal) {
            if best[i].map_or(true, |(known, _)| dist < known) {
                best[i] = Some((dist, added));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::generate::{random_terminals, Generate, Grid};
    use crate::graph::MatrixGraph;
    use crate::metaheuristic::{score, Scorer};
    use crate::rng::rng64;
    use proptest::prelude::*;

    fn terminal_set(ids: &[usize]) -> BTreeSet<usize> {
        ids.iter().copied().collect()
    }

    #[test]
    fn path_works() {
        let graph = MatrixGraph::new(
            vec![1, 2, 3, 4, 5],
            vec![((1, 2), 1.0), ((2, 3), 1.0), ((3, 4), 1.0), ((4, 5), 1.0)],
        )
        .unwrap();
        let terminals = terminal_set(&[1, 5]);
        let solution = approximate(&graph, &terminals).unwrap();

        assert_eq!(solution.edges(), vec![(1, 2), (2, 3), (3, 4), (4, 5)]);
        assert_eq!(score(&graph, &terminals, &solution), Ok(4));
    }

    #[test]
    fn star_works() {
        // centre 0, leaves 1, 2 and 3
        let graph = MatrixGraph::new(
            vec![0, 1, 2, 3],
            vec![((0, 1), 1.0), ((0, 2), 1.0), ((0, 3), 1.0)],
        )
        .unwrap();
        let terminals = terminal_set(&[1, 2, 3]);
        let solution = approximate(&graph, &terminals).unwrap();

        assert_eq!(solution.edges(), vec![(0, 1), (0, 2), (0, 3)]);
        assert_eq!(score(&graph, &terminals, &solution), Ok(3));
    }

    #[test]
    fn shortcut_is_preferred() {
        let graph = MatrixGraph::new(
            vec![1, 2, 3, 4],
            vec![((1, 2), 1.0), ((2, 4), 1.0), ((1, 3), 1.0), ((3, 4), 5.0)],
        )
        .unwrap();
        let solution = approximate(&graph, &terminal_set(&[1, 4])).unwrap();

        assert_eq!(solution.edges(), vec![(1, 2), (2, 4)]);
    }

    #[test]
    fn single_terminal_gives_empty_solution() {
        let graph = MatrixGraph::new(vec![1, 2], vec![((1, 2), 1.0)]).unwrap();

        assert!(approximate(&graph, &terminal_set(&[2])).unwrap().is_empty());
    }

    #[test]
    fn disconnected_terminals_error() {
        let graph =
            MatrixGraph::new(vec![1, 2, 3, 4], vec![((1, 2), 1.0), ((3, 4), 1.0)]).unwrap();

        assert_eq!(
            approximate(&graph, &terminal_set(&[1, 4])),
            Err(SteinerError::DisconnectedInstance(1, 4))
        );
    }

    #[test]
    fn malformed_input_errors() {
        let graph = MatrixGraph::new(vec![1, 2], vec![((1, 2), -1.0)]).unwrap();

        assert_eq!(
            approximate(&graph, &BTreeSet::new()),
            Err(SteinerError::NoTerminals)
        );
        assert_eq!(
            approximate(&graph, &terminal_set(&[1, 7])),
            Err(SteinerError::MissingNode(7))
        );
        assert_eq!(
            approximate(&graph, &terminal_set(&[1, 2])),
            Err(SteinerError::InvalidWeight {
                edge: (1, 2),
                weight: -1.0
            })
        );
    }

    proptest! {
        #[test]
        fn approximation_spans_terminals_on_grids(
            width in 2usize..6,
            height in 2usize..6,
            terminal_count in 1usize..6,
            seed in any::<u64>(),
        ) {
            let mut rng = rng64(seed as u128);
            let graph = Grid::new((width, height), (1.0, 10.0)).generate(&mut rng);
            let terminals = random_terminals(&graph, terminal_count, &mut rng);
            let solution = approximate(&graph, &terminals).unwrap();

            let breakdown = Scorer::default()
                .evaluate(&graph, &terminals, &solution)
                .unwrap();
            if terminals.len() > 1 {
                prop_assert_eq!(breakdown.uncovered_terminals, 0);
                prop_assert_eq!(breakdown.components, 1);
            } else {
                prop_assert!(solution.is_empty());
            }
            prop_assert!(solution.iter_edges().all(|edge| graph.has_edge(edge)));
        }
    }
}
