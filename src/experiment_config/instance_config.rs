use serde::{Deserialize, Serialize};

use super::{ExperimentConfigError, Fix};
use crate::rng::os_random_seed;

#[derive(Deserialize, Serialize, Debug)]
#[serde(untagged)]
pub enum InstanceConfig {
    File(FileLoad),
    Grid(GridGeneration),
    ErdosRenyi(ErdosRenyiGeneration),
    UnseededGrid(UnseededGridGeneration),
    UnseededErdosRenyi(UnseededErdosRenyiGeneration),
}

impl InstanceConfig {
    pub fn file(&self) -> Result<FileLoad, ExperimentConfigError> {
        match self {
            Self::File(file) => Ok(file.clone()),
            _ => Err(ExperimentConfigError::NotFileBased),
        }
    }

    pub fn grid(&self) -> Result<GridGeneration, ExperimentConfigError> {
        match self {
            Self::Grid(grid) => Ok(*grid),
            Self::UnseededGrid(grid) => Ok(grid.to_fixed()),
            _ => Err(ExperimentConfigError::NotGrid),
        }
    }

    pub fn erdos_renyi(&self) -> Result<ErdosRenyiGeneration, ExperimentConfigError> {
        match self {
            Self::ErdosRenyi(erdos_renyi) => Ok(*erdos_renyi),
            Self::UnseededErdosRenyi(erdos_renyi) => Ok(erdos_renyi.to_fixed()),
            _ => Err(ExperimentConfigError::NotErdosRenyi),
        }
    }
}

/// SteinLib files matching a glob pattern, e.g. `data/B/*.stp`.
#[derive(Clone, Deserialize, Serialize, Debug)]
pub struct FileLoad {
    pub pattern: String,
}

#[derive(Copy, Clone, Deserialize, Serialize, Debug)]
pub struct GridGeneration {
    pub seed: u64,
    pub size: (usize, usize),
    pub ew_range: (f64, f64),
    pub terminal_count: usize,
}

#[derive(Copy, Clone, Deserialize, Serialize, Debug)]
pub struct UnseededGridGeneration {
    pub size: (usize, usize),
    pub ew_range: (f64, f64),
    pub terminal_count: usize,
}

impl Fix<GridGeneration> for UnseededGridGeneration {
    fn to_fixed(&self) -> GridGeneration {
        GridGeneration {
            seed: (os_random_seed() >> 64) as u64,
            size: self.size,
            ew_range: self.ew_range,
            terminal_count: self.terminal_count,
        }
    }
}

#[derive(Copy, Clone, Deserialize, Serialize, Debug)]
pub struct ErdosRenyiGeneration {
    pub seed: u64,
    pub size: usize,
    pub connection_probability: f64,
    pub ew_range: (f64, f64),
    pub terminal_count: usize,
}

#[derive(Copy, Clone, Deserialize, Serialize, Debug)]
pub struct UnseededErdosRenyiGeneration {
    pub size: usize,
    pub connection_probability: f64,
    pub ew_range: (f64, f64),
    pub terminal_count: usize,
}

impl Fix<ErdosRenyiGeneration> for UnseededErdosRenyiGeneration {
    fn to_fixed(&self) -> ErdosRenyiGeneration {
        ErdosRenyiGeneration {
            seed: (os_random_seed() >> 64) as u64,
            size: self.size,
            connection_probability: self.connection_probability,
            ew_range: self.ew_range,
            terminal_count: self.terminal_count,
        }
    }
}
