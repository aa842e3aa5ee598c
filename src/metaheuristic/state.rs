use log::trace;
use oorandom::Rand64;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use crate::error::SteinerError;
use crate::graph::{Edge, WeightedGraph};
use crate::metaheuristic::{Cost, Scorer, Solution};
use crate::rng::{choose_index, coin_flip};
use crate::shortest_path::ShortestPathTable;

/// How many of the most distant vertices a node-add move chooses from.
const FURTHEST_CANDIDATES: usize = 3;

/// Neighbourhood used to perturb a state.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MoveFamily {
    Edge,
    Node,
}

impl fmt::Display for MoveFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Edge => write!(f, "edge"),
            Self::Node => write!(f, "node"),
        }
    }
}

/// A solution together with the cooling schedule it was reached under.
pub struct State<'a, G: WeightedGraph> {
    graph: &'a G,
    terminals: &'a BTreeSet<G::IndexType>,
    solution: Solution<G::IndexType>,
    temperature: f64,
    speed: f64,
}

impl<'a, G: WeightedGraph> Clone for State<'a, G> {
    fn clone(&self) -> Self {
        State {
            graph: self.graph,
            terminals: self.terminals,
            solution: self.solution.clone(),
            temperature: self.temperature,
            speed: self.speed,
        }
    }
}

impl<'a, G: WeightedGraph> State<'a, G> {
    pub fn new(
        graph: &'a G,
        terminals: &'a BTreeSet<G::IndexType>,
        solution: Solution<G::IndexType>,
        temperature: f64,
        speed: f64,
    ) -> Self {
        State {
            graph,
            terminals,
            solution,
            temperature: temperature.max(0.0),
            speed,
        }
    }

    pub fn solution(&self) -> &Solution<G::IndexType> {
        &self.solution
    }

    pub fn into_solution(self) -> Solution<G::IndexType> {
        self.solution
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn cost(&self, scorer: &Scorer) -> Result<Cost, SteinerError<G::IndexType>> {
        scorer.score(self.graph, self.terminals, &self.solution)
    }

    pub fn number_components(&self) -> usize {
        self.solution.components()
    }

    pub fn number_uncovered_terminals(&self) -> usize {
        let nodes = self.solution.nodes();
        self.terminals
            .iter()
            .filter(|terminal| !nodes.contains(terminal))
            .count()
    }

    /// Deletes a random selected edge or adds a random unselected one, then cools down.
    pub fn random_edge_action(&mut self, rng: &mut Rand64) {
        if coin_flip(rng) {
            self.delete_random_edge(rng);
        } else {
            self.add_random_edge(rng);
        }
        self.cool();
    }

    /// Drops a random spanned vertex or grows the solution from a random terminal
    /// towards one of its most distant vertices, then cools down.
    pub fn random_node_action(
        &mut self,
        rng: &mut Rand64,
        shortest_paths: &ShortestPathTable<G::IndexType>,
        spare_terminals: bool,
    ) {
        if coin_flip(rng) {
            self.delete_random_node(rng, spare_terminals);
        } else {
            self.add_random_node(rng, shortest_paths);
        }
        self.cool();
    }

    fn delete_random_edge(&mut self, rng: &mut Rand64) -> Option<Edge<G::IndexType>> {
        if self.solution.is_empty() {
            return None;
        }

        let edge = self.solution.nth_edge(choose_index(rng, self.solution.len()))?;
        self.solution.remove(edge);
        trace!("Removed edge {} - {}", edge.0, edge.1);
        Some(edge)
    }

    fn add_random_edge(&mut self, rng: &mut Rand64) -> Option<Edge<G::IndexType>> {
        let candidates: Vec<Edge<G::IndexType>> = self
            .graph
            .iter_edges()
            .map(|(edge, _)| edge)
            .filter(|edge| !self.solution.contains(*edge))
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let edge = candidates[choose_index(rng, candidates.len())];
        self.solution.insert(edge);
        trace!("Added edge {} - {}", edge.0, edge.1);
        Some(edge)
    }

    fn delete_random_node(
        &mut self,
        rng: &mut Rand64,
        spare_terminals: bool,
    ) -> Option<G::IndexType> {
        let candidates: Vec<G::IndexType> = self
            .solution
            .nodes()
            .into_iter()
            .filter(|node| !spare_terminals || !self.terminals.contains(node))
            .collect();
        if candidates.is_empty() {
            return None;
        }

        let node = candidates[choose_index(rng, candidates.len())];
        let removed = self.solution.remove_node(node);
        trace!("Removed node {} with {} edges", node, removed);
        Some(node)
    }

    fn add_random_node(
        &mut self,
        rng: &mut Rand64,
        shortest_paths: &ShortestPathTable<G::IndexType>,
    ) -> Option<G::IndexType> {
        if self.terminals.is_empty() {
            return None;
        }

        let terminal = self
            .terminals
            .iter()
            .nth(choose_index(rng, self.terminals.len()))
            .copied()?;
        let furthest = shortest_paths.get(terminal)?.furthest(FURTHEST_CANDIDATES);
        if furthest.is_empty() {
            return None;
        }

        let target = furthest[choose_index(rng, furthest.len())];
        let path = shortest_paths.path(terminal, target)?;
        let added = self.solution.insert_path(path);
        trace!("Connected terminal {} to {} with {} new edges", terminal, target, added);
        Some(target)
    }

    fn cool(&mut self) {
        self.temperature = (self.temperature - self.speed).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MatrixGraph;
    use crate::rng::rng64;
    use float_cmp::approx_eq;

    fn path_graph() -> MatrixGraph<usize> {
        MatrixGraph::new(
            vec![1, 2, 3, 4, 5],
            vec![((1, 2), 1.0), ((2, 3), 1.0), ((3, 4), 1.0), ((4, 5), 1.0)],
        )
        .unwrap()
    }

    fn terminal_set(ids: &[usize]) -> BTreeSet<usize> {
        ids.iter().copied().collect()
    }

    #[test]
    fn edge_action_changes_at_most_one_edge() {
        let graph = path_graph();
        let terminals = terminal_set(&[1, 5]);
        let mut rng = rng64(11);
        let solution = Solution::from_edges(vec![(2, 3)]);
        let mut state = State::new(&graph, &terminals, solution, 1.0, 0.1);

        for _ in 0..50 {
            let before = state.solution().clone();
            state.random_edge_action(&mut rng);
            let after = state.solution();

            let difference = before
                .iter_edges()
                .filter(|edge| !after.contains(*edge))
                .count()
                + after.iter_edges().filter(|edge| !before.contains(*edge)).count();
            assert!(difference <= 1, "More than one edge changed.");
            assert!(after.iter_edges().all(|edge| graph.has_edge(edge)));
        }
    }

    #[test]
    fn cooling_is_floored_at_zero() {
        let graph = path_graph();
        let terminals = terminal_set(&[1, 5]);
        let mut rng = rng64(5);
        let mut state = State::new(&graph, &terminals, Solution::new(), 0.25, 0.1);

        state.random_edge_action(&mut rng);
        assert!(approx_eq!(f64, state.temperature(), 0.15, epsilon = 1e-12));

        for _ in 0..5 {
            state.random_edge_action(&mut rng);
        }
        assert_eq!(state.temperature(), 0.0);
    }

    #[test]
    fn add_edge_on_full_solution_is_noop() {
        let graph = path_graph();
        let terminals = terminal_set(&[1, 5]);
        let mut rng = rng64(1);
        let mut state = State::new(&graph, &terminals, Solution::from_graph(&graph), 1.0, 0.0);

        assert_eq!(state.add_random_edge(&mut rng), None);
        assert_eq!(state.solution().len(), 4);
    }

    #[test]
    fn delete_on_empty_solution_is_noop() {
        let graph = path_graph();
        let terminals = terminal_set(&[1, 5]);
        let mut rng = rng64(1);
        let mut state = State::new(&graph, &terminals, Solution::new(), 1.0, 0.0);

        assert_eq!(state.delete_random_edge(&mut rng), None);
        assert_eq!(state.delete_random_node(&mut rng, false), None);
        assert!(state.solution().is_empty());
    }

    #[test]
    fn spare_terminals_keeps_terminal_edges() {
        let graph = path_graph();
        let terminals = terminal_set(&[1, 2]);
        let mut rng = rng64(9);
        let solution = Solution::from_edges(vec![(1, 2)]);
        let mut state = State::new(&graph, &terminals, solution, 1.0, 0.0);

        assert_eq!(state.delete_random_node(&mut rng, true), None);
        assert_eq!(state.solution().len(), 1);
        assert!(state.delete_random_node(&mut rng, false).is_some());
        assert!(state.solution().is_empty());
    }

    #[test]
    fn add_node_follows_a_shortest_path() {
        let graph = path_graph();
        let terminals = terminal_set(&[1]);
        let table = ShortestPathTable::from_sources(&graph, terminals.iter().copied()).unwrap();
        let mut rng = rng64(21);
        let mut state = State::new(&graph, &terminals, Solution::new(), 1.0, 0.0);

        let target = state.add_random_node(&mut rng, &table).unwrap();
        // the three most distant vertices from 1 are 5, 4 and 3
        assert!(target >= 3, "Target {} is not among the furthest.", target);
        assert_eq!(state.solution().len(), target - 1);
        assert_eq!(state.number_uncovered_terminals(), 0);
        assert_eq!(state.number_components(), 1);
    }

    #[test]
    fn node_action_keeps_edges_in_graph() {
        let graph = path_graph();
        let terminals = terminal_set(&[1, 3, 5]);
        let table = ShortestPathTable::from_sources(&graph, terminals.iter().copied()).unwrap();
        let mut rng = rng64(2);
        let mut state = State::new(&graph, &terminals, Solution::new(), 1.0, 0.01);

        for _ in 0..100 {
            state.random_node_action(&mut rng, &table, false);
            assert!(state.solution().iter_edges().all(|edge| graph.has_edge(edge)));
        }
        assert!(approx_eq!(f64, state.temperature(), 0.0, epsilon = 1e-9));
    }
}
