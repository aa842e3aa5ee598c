pub mod annealing;
mod score;
mod solution;
mod state;

pub use annealing::{
    run_annealing, Acceptance, Annealing, AnnealingParams, AnnealingResult, Sample, Trajectory,
};
pub use score::{evaluate_tree, score, Cost, ScoreBreakdown, Scorer, DEFAULT_PENALTY};
pub use solution::Solution;
pub use state::{MoveFamily, State};

use std::collections::BTreeSet;

use crate::error::SteinerError;
use crate::graph::WeightedGraph;

/// A local search that improves a given solution one iteration at a time.
pub trait Metaheuristic<'a, G: WeightedGraph>: Sized {
    type Params;

    fn new(
        problem: ProblemInstance<'a, G>,
        initial_solution: Solution<G::IndexType>,
        params: Self::Params,
    ) -> Result<Self, SteinerError<G::IndexType>>;

    fn single_iteration(&mut self) -> Result<Option<Cost>, SteinerError<G::IndexType>>;
}

/// The graph and terminal set a search runs on, both borrowed for the whole run.
pub struct ProblemInstance<'a, G: WeightedGraph> {
    graph: &'a G,
    terminals: &'a BTreeSet<G::IndexType>,
}

impl<'a, G: WeightedGraph> Clone for ProblemInstance<'a, G> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, G: WeightedGraph> Copy for ProblemInstance<'a, G> {}

impl<'a, G: WeightedGraph> ProblemInstance<'a, G> {
    pub fn new(graph: &'a G, terminals: &'a BTreeSet<G::IndexType>) -> Self {
        ProblemInstance { graph, terminals }
    }

    pub fn graph(&self) -> &'a G {
        self.graph
    }

    pub fn terminals(&self) -> &'a BTreeSet<G::IndexType> {
        self.terminals
    }
}
