use serde::{Deserialize, Serialize};

use crate::experiment_config::Fix;
use crate::rng::os_random_seed;

#[derive(Deserialize, Serialize, Debug)]
#[serde(untagged)]
pub enum GeneralExperimentConfig {
    Full(FullConfig),
    Unseeded(UnseededConfig),
}

impl GeneralExperimentConfig {
    pub fn cfg(&self) -> FullConfig {
        match self {
            Self::Full(cfg) => *cfg,
            Self::Unseeded(cfg) => cfg.to_fixed(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy)]
pub struct FullConfig {
    pub seed: u64,
    pub sample_stride: usize,
    #[serde(default)]
    pub export_dot: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, Copy)]
pub struct UnseededConfig {
    pub sample_stride: usize,
    #[serde(default)]
    pub export_dot: bool,
}

impl Fix<FullConfig> for UnseededConfig {
    fn to_fixed(&self) -> FullConfig {
        FullConfig {
            seed: (os_random_seed() >> 64) as u64,
            sample_stride: self.sample_stride,
            export_dot: self.export_dot,
        }
    }
}
