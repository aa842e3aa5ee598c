use indicatif::ProgressBar;
use log::{info, warn};
use serde::Serialize;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::approximation::approximate;
use crate::experiment_config::{ExperimentConfig, ExperimentConfigError, InitialSolution};
use crate::graph::export::{Dot, Export};
use crate::graph::generate::{random_terminals, ErdosRenyi, Generate, Grid};
use crate::graph::import::{import_stp, SteinerInstance};
use crate::metaheuristic::{evaluate_tree, run_annealing, Cost, Scorer};
use crate::rng::rng64;

/// One row of `summary.csv`: a single annealing run on a single instance.
#[derive(Serialize, Debug, Clone)]
pub struct RunReport {
    pub instance: String,
    pub move_family: String,
    pub approximation_cost: Option<Cost>,
    pub initial_cost: Cost,
    pub final_cost: Cost,
    pub best_cost: Cost,
    pub tree_cost: Option<Cost>,
    pub accepted_moves: usize,
    pub improving_moves: usize,
    pub elapsed_secs: f64,
}

pub struct Experiment {}

impl Experiment {
    /// Runs every configured move family on every instance of the config.
    /// With an output directory, trajectories, the summary and optionally DOT renderings
    /// of the best solutions are written there.
    pub fn run(
        config: &ExperimentConfig,
        output_dir: Option<&Path>,
    ) -> Result<Vec<RunReport>, ExperimentConfigError> {
        let general = config.experiment.cfg();
        let instances = Self::load_instances(config)?;
        info!("Running {} instance(s) with seed {}", instances.len(), general.seed);

        if let Some(dir) = output_dir {
            fs::create_dir_all(dir)?;
        }

        let algorithm = &config.algorithm;
        let scorer = Scorer::new(algorithm.penalty);
        let progress = ProgressBar::new((instances.len() * algorithm.move_families.len()) as u64);
        let mut reports = Vec::new();

        for instance in instances.iter() {
            let SteinerInstance {
                name,
                graph,
                terminals,
            } = instance;

            // only an approximation start needs a connected instance
            let approximation = match approximate(graph, terminals) {
                Ok(solution) => Some(solution),
                Err(e) if algorithm.initial_solution != InitialSolution::Approximation => {
                    warn!("{}: no approximation available: {}", name, e);
                    None
                }
                Err(e) => return Err(e.into()),
            };
            let approximation_cost = match &approximation {
                Some(solution) => Some(scorer.score(graph, terminals, solution)?),
                None => None,
            };
            let initial = algorithm
                .initial_solution
                .select(graph, approximation.as_ref())
                .ok_or_else(|| {
                    ExperimentConfigError::InvalidGraphConfig(format!(
                        "{} has no approximation to start from.",
                        name
                    ))
                })?;
            let initial_cost = scorer.score(graph, terminals, &initial)?;
            match approximation_cost {
                Some(cost) => info!(
                    "{}: approximation costs {}, annealing starts at {}",
                    name, cost, initial_cost
                ),
                None => info!("{}: annealing starts at {}", name, initial_cost),
            }

            for (k, family) in algorithm.move_families.iter().enumerate() {
                progress.set_message(&format!("{} ({})", name, family));
                let params = algorithm.to_params(
                    *family,
                    general.seed.wrapping_add(k as u64),
                    general.sample_stride,
                );

                let start = Instant::now();
                let result = run_annealing(initial.clone(), graph, terminals, params)?;
                let elapsed_secs = start.elapsed().as_secs_f64();

                let tree_cost = match evaluate_tree(graph, terminals, &result.best_solution) {
                    Ok(cost) => Some(cost),
                    Err(e) => {
                        warn!("{} ({}): best solution is no Steiner tree: {}", name, family, e);
                        None
                    }
                };
                info!(
                    "{} ({}): best cost {} after {} iterations in {:.3}s",
                    name, family, result.best_cost, result.iterations, elapsed_secs
                );

                if let Some(dir) = output_dir {
                    let trajectory_file =
                        File::create(dir.join(format!("{}_{}.csv", name, family)))?;
                    result.trajectory.write_csv(trajectory_file)?;

                    if general.export_dot {
                        let dot = Dot::from_steiner_solution(
                            graph,
                            terminals,
                            &result.best_solution,
                            &format!("{}_{}", name, family),
                        );
                        fs::write(dir.join(format!("{}_{}.dot", name, family)), dot)?;
                    }
                }

                reports.push(RunReport {
                    instance: name.clone(),
                    move_family: family.to_string(),
                    approximation_cost,
                    initial_cost,
                    final_cost: result.cost,
                    best_cost: result.best_cost,
                    tree_cost,
                    accepted_moves: result.accepted_moves,
                    improving_moves: result.improving_moves,
                    elapsed_secs,
                });
                progress.inc(1);
            }
        }
        progress.finish_and_clear();

        if let Some(dir) = output_dir {
            let mut writer = csv::Writer::from_path(dir.join("summary.csv"))?;
            for report in reports.iter() {
                writer.serialize(report)?;
            }
            writer.flush()?;
        }

        Ok(reports)
    }

    /// Loads the matching `.stp` files in path order, or generates a single instance.
    pub fn load_instances(
        config: &ExperimentConfig,
    ) -> Result<Vec<SteinerInstance>, ExperimentConfigError> {
        if let Ok(file) = config.instance.file() {
            let paths = glob::glob(&file.pattern)
                .map_err(|e| ExperimentConfigError::InvalidGraphConfig(e.to_string()))?;
            let mut paths: Vec<PathBuf> = paths.filter_map(Result::ok).collect();
            paths.sort();
            if paths.is_empty() {
                return Err(ExperimentConfigError::InvalidGraphConfig(format!(
                    "No instance matches {}.",
                    file.pattern
                )));
            }

            let mut instances = Vec::with_capacity(paths.len());
            for path in paths.iter() {
                instances.push(import_stp(path)?);
            }
            Ok(instances)
        } else if let Ok(grid) = config.instance.grid() {
            let mut rng = rng64(grid.seed as u128);
            let graph = Grid::new(grid.size, grid.ew_range).generate(&mut rng);
            let terminals = random_terminals(&graph, grid.terminal_count, &mut rng);
            Ok(vec![SteinerInstance {
                name: format!("grid_{}x{}_{}", grid.size.0, grid.size.1, grid.seed),
                graph,
                terminals,
            }])
        } else if let Ok(erdos_renyi) = config.instance.erdos_renyi() {
            let mut rng = rng64(erdos_renyi.seed as u128);
            let graph = ErdosRenyi::new(
                erdos_renyi.size,
                erdos_renyi.connection_probability,
                erdos_renyi.ew_range,
            )
            .generate(&mut rng);
            let terminals = random_terminals(&graph, erdos_renyi.terminal_count, &mut rng);
            Ok(vec![SteinerInstance {
                name: format!("erdos_renyi_{}_{}", erdos_renyi.size, erdos_renyi.seed),
                graph,
                terminals,
            }])
        } else {
            Err(ExperimentConfigError::InvalidGraphConfig(
                "Unknown instance config.".to_string(),
            ))
        }
    }
}
