pub mod approximation;
pub mod error;
pub mod experiment;
pub mod experiment_config;
pub mod graph;
pub mod metaheuristic;
pub mod rng;
pub mod shortest_path;

pub use approximation::approximate;
pub use error::SteinerError;
pub use graph::{MatrixGraph, WeightedGraph};
pub use metaheuristic::{
    evaluate_tree, run_annealing, score, AnnealingParams, AnnealingResult, Cost, MoveFamily,
    Solution,
};
