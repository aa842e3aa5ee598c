use std::collections::BTreeSet;

use crate::error::SteinerError;
use crate::graph::WeightedGraph;
use crate::metaheuristic::Solution;

/// Integer cost of a candidate, lower is better.
pub type Cost = i64;

/// Penalty charged per uncovered terminal and per surplus component.
pub const DEFAULT_PENALTY: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub weight: f64,
    pub uncovered_terminals: usize,
    pub components: usize,
    pub cost: Cost,
}

/// Turns solutions into costs: tree weight plus penalties for infeasibility.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scorer {
    penalty: f64,
}

impl Default for Scorer {
    fn default() -> Self {
        Scorer::new(DEFAULT_PENALTY)
    }
}

impl Scorer {
    pub fn new(penalty: f64) -> Self {
        Scorer { penalty }
    }

    pub fn penalty(&self) -> f64 {
        self.penalty
    }

    pub fn evaluate<G: WeightedGraph>(
        &self,
        graph: &G,
        terminals: &BTreeSet<G::IndexType>,
        solution: &Solution<G::IndexType>,
    ) -> Result<ScoreBreakdown, SteinerError<G::IndexType>> {
        let weight = solution.weight(graph)?;
        let nodes = solution.nodes();
        let uncovered_terminals = terminals.iter().filter(|t| !nodes.contains(t)).count();
        let components = solution.components();

        let violations = uncovered_terminals + components.saturating_sub(1);
        let cost = (weight + self.penalty * violations as f64) as Cost;

        Ok(ScoreBreakdown {
            weight,
            uncovered_terminals,
            components,
            cost,
        })
    }

    pub fn score<G: WeightedGraph>(
        &self,
        graph: &G,
        terminals: &BTreeSet<G::IndexType>,
        solution: &Solution<G::IndexType>,
    ) -> Result<Cost, SteinerError<G::IndexType>> {
        Ok(self.evaluate(graph, terminals, solution)?.cost)
    }
}

/// Scores a solution with the default penalty.
pub fn score<G: WeightedGraph>(
    graph: &G,
    terminals: &BTreeSet<G::IndexType>,
    solution: &Solution<G::IndexType>,
) -> Result<Cost, SteinerError<G::IndexType>> {
    Scorer::default().score(graph, terminals, solution)
}

/// Weight of a solution that must be a proper Steiner tree.
/// Errors if the edges do not form a tree or leave a terminal out.
pub fn evaluate_tree<G: WeightedGraph>(
    graph: &G,
    terminals: &BTreeSet<G::IndexType>,
    solution: &Solution<G::IndexType>,
) -> Result<Cost, SteinerError<G::IndexType>> {
    let weight = solution.weight(graph)?;

    if solution.is_empty() {
        // a single terminal is a tree by itself
        return match terminals.iter().nth(1) {
            Some(&terminal) => Err(SteinerError::MissingTerminal(terminal)),
            None => Ok(0),
        };
    }
    if !solution.is_tree() {
        return Err(SteinerError::NotATree);
    }

    let nodes = solution.nodes();
    if let Some(&missing) = terminals.iter().find(|t| !nodes.contains(t)) {
        return Err(SteinerError::MissingTerminal(missing));
    }

    Ok(weight as Cost)
}
