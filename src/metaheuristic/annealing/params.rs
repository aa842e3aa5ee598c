use serde::{Deserialize, Serialize};

use crate::metaheuristic::score::DEFAULT_PENALTY;
use crate::metaheuristic::{Cost, MoveFamily};

/// Rule turning a cost change and a temperature into an acceptance probability.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Acceptance {
    /// 1 for non-worsening moves, exp(-delta / T) otherwise and 0 once frozen.
    Metropolis,
    /// Logistic curve over the cost change, scaled by min(1, 1 / T).
    Sigmoid,
}

impl Default for Acceptance {
    fn default() -> Self {
        Acceptance::Metropolis
    }
}

impl Acceptance {
    pub fn probability(&self, old_cost: Cost, new_cost: Cost, temperature: f64) -> f64 {
        let delta = (new_cost - old_cost) as f64;
        match self {
            Acceptance::Metropolis => {
                if new_cost <= old_cost {
                    1.0
                } else if temperature <= 0.0 {
                    0.0
                } else {
                    (-delta / temperature).exp()
                }
            }
            Acceptance::Sigmoid => {
                let coefficient = if temperature <= 0.0 {
                    1.0
                } else {
                    (1.0 / temperature).min(1.0)
                };
                1.0 / (1.0 + (coefficient * delta).exp())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnealingParams {
    pub temperature: f64,
    pub speed: f64,
    pub iterations: usize,
    pub move_family: MoveFamily,
    pub sample_stride: usize,
    pub penalty: f64,
    pub acceptance: Acceptance,
    pub spare_terminals: bool,
    pub seed: Option<u128>,
}

impl Default for AnnealingParams {
    fn default() -> Self {
        AnnealingParams {
            temperature: 30.0,
            speed: 0.01,
            iterations: 3000,
            move_family: MoveFamily::Edge,
            sample_stride: 10,
            penalty: DEFAULT_PENALTY,
            acceptance: Acceptance::Metropolis,
            spare_terminals: false,
            seed: None,
        }
    }
}

impl AnnealingParams {
    pub fn new(temperature: f64, speed: f64, iterations: usize, move_family: MoveFamily) -> Self {
        AnnealingParams {
            temperature,
            speed,
            iterations,
            move_family,
            ..AnnealingParams::default()
        }
    }

    pub fn with_sample_stride(mut self, sample_stride: usize) -> Self {
        self.sample_stride = sample_stride;
        self
    }

    pub fn with_penalty(mut self, penalty: f64) -> Self {
        self.penalty = penalty;
        self
    }

    pub fn with_acceptance(mut self, acceptance: Acceptance) -> Self {
        self.acceptance = acceptance;
        self
    }

    pub fn with_spare_terminals(mut self, spare_terminals: bool) -> Self {
        self.spare_terminals = spare_terminals;
        self
    }

    pub fn with_seed(mut self, seed: u128) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.temperature.is_finite() || self.temperature < 0.0 {
            return Err(format!("temperature must be finite and >= 0, got {}", self.temperature));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(format!("speed must be finite and >= 0, got {}", self.speed));
        }
        if self.sample_stride == 0 {
            return Err("sample_stride must be positive".to_string());
        }
        if !self.penalty.is_finite() || self.penalty < 0.0 {
            return Err(format!("penalty must be finite and >= 0, got {}", self.penalty));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::approx_eq;

    #[test]
    fn metropolis_works() {
        let rule = Acceptance::Metropolis;

        assert_eq!(rule.probability(10, 10, 0.0), 1.0);
        assert_eq!(rule.probability(10, 4, 5.0), 1.0);
        assert_eq!(rule.probability(10, 11, 0.0), 0.0);
        assert!(approx_eq!(
            f64,
            rule.probability(10, 12, 2.0),
            (-1.0f64).exp(),
            ulps = 2
        ));
    }

    #[test]
    fn sigmoid_works() {
        let rule = Acceptance::Sigmoid;

        assert!(approx_eq!(f64, rule.probability(5, 5, 3.0), 0.5, ulps = 2));
        assert!(rule.probability(5, 1, 0.0) > 0.5);
        assert!(rule.probability(1, 5, 0.5) < 0.5);
        // coefficient is capped at 1 for low temperatures
        assert!(approx_eq!(
            f64,
            rule.probability(0, 2, 0.1),
            rule.probability(0, 2, 1.0),
            ulps = 2
        ));
    }

    #[test]
    fn builder_works() {
        let params = AnnealingParams::new(5.0, 0.5, 20, MoveFamily::Node)
            .with_sample_stride(3)
            .with_penalty(10.0)
            .with_acceptance(Acceptance::Sigmoid)
            .with_spare_terminals(true)
            .with_seed(9);

        assert_eq!(params.move_family, MoveFamily::Node);
        assert_eq!(params.sample_stride, 3);
        assert_eq!(params.acceptance, Acceptance::Sigmoid);
        assert!(params.spare_terminals);
        assert_eq!(params.seed, Some(9));
        assert!(params.validate().is_ok());
    }

    #[test]
    fn invalid_params_error() {
        assert!(AnnealingParams::default().with_sample_stride(0).validate().is_err());
        assert!(AnnealingParams::new(-1.0, 0.1, 10, MoveFamily::Edge)
            .validate()
            .is_err());
        assert!(AnnealingParams::new(1.0, f64::NAN, 10, MoveFamily::Edge)
            .validate()
            .is_err());
    }
}
