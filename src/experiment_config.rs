mod algo_config;
mod general_experiment_config;
mod instance_config;

pub use algo_config::{AnnealingExperiment, InitialSolution};
pub use general_experiment_config::{FullConfig, GeneralExperimentConfig, UnseededConfig};
pub use instance_config::{
    ErdosRenyiGeneration, FileLoad, GridGeneration, InstanceConfig, UnseededErdosRenyiGeneration,
    UnseededGridGeneration,
};

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::error::SteinerError;
use crate::graph::import::ImportError;

/// Resolves a config that leaves values open (e.g. the seed) into a complete one.
pub trait Fix<CorrectType> {
    fn to_fixed(&self) -> CorrectType;
}

#[derive(Deserialize, Serialize, Debug)]
pub struct ExperimentConfig {
    pub experiment: GeneralExperimentConfig,
    pub algorithm: AnnealingExperiment,
    pub instance: InstanceConfig,
}

impl ExperimentConfig {
    /// Reads a YAML (`.yaml`, `.yml`) or RON (`.ron`) config file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ExperimentConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|_| {
            ExperimentConfigError::Import(ImportError::MissingFile(path.display().to_string()))
        })?;

        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_ascii_lowercase());
        let config: ExperimentConfig = match extension.as_deref() {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .map_err(|e| ExperimentConfigError::Parse(e.to_string()))?,
            Some("ron") => ron::de::from_str(&content)
                .map_err(|e| ExperimentConfigError::Parse(e.to_string()))?,
            _ => {
                return Err(ExperimentConfigError::Parse(format!(
                    "{} is neither a yaml nor a ron file.",
                    path.display()
                )))
            }
        };

        config.algorithm.validate()?;
        Ok(config)
    }
}

#[derive(Debug)]
pub enum ExperimentConfigError {
    NotFileBased,
    NotGrid,
    NotErdosRenyi,
    InvalidAlgorithmConfig(String),
    InvalidGraphConfig(String),
    Parse(String),
    Import(ImportError),
    Solver(SteinerError<usize>),
    Output(String),
}

impl fmt::Display for ExperimentConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFileBased => write!(f, "Config is not a valid file import config."),
            Self::NotGrid => write!(f, "Config is not a valid grid generation config."),
            Self::NotErdosRenyi => write!(f, "Config is not a valid ErdosRenyi generation config."),
            Self::InvalidAlgorithmConfig(msg) => write!(f, "{}", msg),
            Self::InvalidGraphConfig(msg) => write!(f, "{}", msg),
            Self::Parse(msg) => write!(f, "Could not parse config: {}", msg),
            Self::Import(error) => write!(f, "{}", error),
            Self::Solver(error) => write!(f, "{}", error),
            Self::Output(msg) => write!(f, "Could not write results: {}", msg),
        }
    }
}

impl Error for ExperimentConfigError {}

impl From<ImportError> for ExperimentConfigError {
    fn from(error: ImportError) -> Self {
        Self::Import(error)
    }
}

impl From<SteinerError<usize>> for ExperimentConfigError {
    fn from(error: SteinerError<usize>) -> Self {
        Self::Solver(error)
    }
}

impl From<csv::Error> for ExperimentConfigError {
    fn from(error: csv::Error) -> Self {
        Self::Output(error.to_string())
    }
}

impl From<std::io::Error> for ExperimentConfigError {
    fn from(error: std::io::Error) -> Self {
        Self::Output(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metaheuristic::{Acceptance, MoveFamily};

    const YAML: &str = "
experiment:
  seed: 42
  sample_stride: 5
  export_dot: true
algorithm:
  temperature: 30.0
  speed: 0.01
  iterations: 3000
  move_families: [edge, node]
  acceptance: sigmoid
instance:
  pattern: \"data/B/*.stp\"
";

    const RON: &str = "(
    temperature: 5.0,
    speed: 0.5,
    iterations: 10,
    move_families: [node],
    initial_solution: all_edges,
    spare_terminals: true,
)";

    #[test]
    fn yaml_works() {
        let config: ExperimentConfig = serde_yaml::from_str(YAML).unwrap();
        let general = config.experiment.cfg();

        assert_eq!(general.seed, 42);
        assert_eq!(general.sample_stride, 5);
        assert!(general.export_dot);
        assert_eq!(config.algorithm.move_families, vec![MoveFamily::Edge, MoveFamily::Node]);
        assert_eq!(config.algorithm.acceptance, Acceptance::Sigmoid);
        assert_eq!(config.algorithm.initial_solution, InitialSolution::Approximation);
        assert_eq!(config.instance.file().unwrap().pattern, "data/B/*.stp");
        assert!(config.instance.grid().is_err());
    }

    #[test]
    fn ron_works() {
        let algorithm: AnnealingExperiment = ron::de::from_str(RON).unwrap();

        assert_eq!(algorithm.move_families, vec![MoveFamily::Node]);
        assert_eq!(algorithm.initial_solution, InitialSolution::AllEdges);
        assert_eq!(algorithm.acceptance, Acceptance::Metropolis);
        assert_eq!(algorithm.penalty, 100.0);
        assert!(algorithm.spare_terminals);
    }

    #[test]
    fn grid_instance_works() {
        let instance: InstanceConfig = serde_yaml::from_str(
            "
seed: 7
size: [4, 3]
ew_range: [1.0, 10.0]
terminal_count: 3
",
        )
        .unwrap();
        let grid = instance.grid().unwrap();

        assert_eq!(grid.seed, 7);
        assert_eq!(grid.size, (4, 3));
        assert_eq!(grid.terminal_count, 3);
        assert!(instance.file().is_err());
        assert!(instance.erdos_renyi().is_err());
    }

    #[test]
    fn unseeded_experiment_works() {
        let general: GeneralExperimentConfig = serde_yaml::from_str("sample_stride: 10\n").unwrap();

        assert!(matches!(general, GeneralExperimentConfig::Unseeded(_)));
        assert_eq!(general.cfg().sample_stride, 10);
        assert!(!general.cfg().export_dot);
    }

    #[test]
    fn unknown_extension_errors() {
        let path = std::env::temp_dir().join("stpg_with_sa_config.txt");
        fs::write(&path, YAML).unwrap();

        assert!(matches!(
            ExperimentConfig::from_path(&path),
            Err(ExperimentConfigError::Parse(_))
        ));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn from_path_works() {
        let path = std::env::temp_dir().join("stpg_with_sa_config.yaml");
        fs::write(&path, YAML).unwrap();

        let config = ExperimentConfig::from_path(&path).unwrap();
        assert_eq!(config.algorithm.iterations, 3000);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_errors() {
        assert!(matches!(
            ExperimentConfig::from_path("does/not/exist.yaml"),
            Err(ExperimentConfigError::Import(ImportError::MissingFile(_)))
        ));
    }
}
