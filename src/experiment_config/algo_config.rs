use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::experiment_config::ExperimentConfigError;
use crate::graph::WeightedGraph;
use crate::metaheuristic::{Acceptance, AnnealingParams, MoveFamily, Solution, DEFAULT_PENALTY};

/// Where the annealing starts from.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InitialSolution {
    Approximation,
    AllEdges,
    Empty,
}

impl Default for InitialSolution {
    fn default() -> Self {
        InitialSolution::Approximation
    }
}

impl InitialSolution {
    /// Picks the starting solution, reusing an already computed approximation.
    /// None if an approximation start is asked for but none is available.
    pub fn select<G: WeightedGraph>(
        &self,
        graph: &G,
        approximation: Option<&Solution<G::IndexType>>,
    ) -> Option<Solution<G::IndexType>> {
        match self {
            Self::Approximation => approximation.cloned(),
            Self::AllEdges => Some(Solution::from_graph(graph)),
            Self::Empty => Some(Solution::new()),
        }
    }
}

#[derive(Clone, Deserialize, Serialize, Debug)]
pub struct AnnealingExperiment {
    pub temperature: f64,
    pub speed: f64,
    pub iterations: usize,
    #[serde(default = "default_move_families")]
    pub move_families: Vec<MoveFamily>,
    #[serde(default)]
    pub acceptance: Acceptance,
    #[serde(default = "default_penalty")]
    pub penalty: f64,
    #[serde(default)]
    pub initial_solution: InitialSolution,
    #[serde(default)]
    pub spare_terminals: bool,
}

fn default_move_families() -> Vec<MoveFamily> {
    vec![MoveFamily::Edge]
}

fn default_penalty() -> f64 {
    DEFAULT_PENALTY
}

impl AnnealingExperiment {
    pub fn to_params(
        &self,
        move_family: MoveFamily,
        seed: u64,
        sample_stride: usize,
    ) -> AnnealingParams {
        AnnealingParams::new(self.temperature, self.speed, self.iterations, move_family)
            .with_sample_stride(sample_stride)
            .with_penalty(self.penalty)
            .with_acceptance(self.acceptance)
            .with_spare_terminals(self.spare_terminals)
            .with_seed(seed as u128)
    }

    pub fn validate(&self) -> Result<(), ExperimentConfigError> {
        if self.move_families.is_empty() {
            return Err(ExperimentConfigError::InvalidAlgorithmConfig(
                "At least one move family is needed.".to_string(),
            ));
        }
        let unique: BTreeSet<String> = self.move_families.iter().map(|f| f.to_string()).collect();
        if unique.len() != self.move_families.len() {
            return Err(ExperimentConfigError::InvalidAlgorithmConfig(
                "Move families are listed more than once.".to_string(),
            ));
        }

        self.to_params(MoveFamily::Edge, 0, 1)
            .validate()
            .map_err(ExperimentConfigError::InvalidAlgorithmConfig)
    }
}
