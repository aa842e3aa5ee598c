mod params;
mod trajectory;

pub use params::{Acceptance, AnnealingParams};
pub use trajectory::{Sample, Trajectory};

use log::{debug, info, trace};
use oorandom::Rand64;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::SteinerError;
use crate::graph::WeightedGraph;
use crate::metaheuristic::{
    Cost, Metaheuristic, MoveFamily, ProblemInstance, Scorer, Solution, State,
};
use crate::rng::{preseeded_rng64, rng64};
use crate::shortest_path::ShortestPathTable;

/// What a finished (or cancelled) run hands back.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnealingResult<IndexType> {
    pub solution: Solution<IndexType>,
    pub cost: Cost,
    pub best_solution: Solution<IndexType>,
    pub best_cost: Cost,
    pub trajectory: Trajectory,
    pub final_temperature: f64,
    pub iterations: usize,
    pub accepted_moves: usize,
    pub improving_moves: usize,
    pub cancelled: bool,
}

enum Neighborhood<IndexType> {
    Edge,
    Node {
        shortest_paths: ShortestPathTable<IndexType>,
        spare_terminals: bool,
    },
}

/// Simulated annealing over Steiner tree candidates.
/// Every iteration perturbs the current state, scores the candidate and accepts it
/// according to the configured rule, cooling down linearly as it goes.
pub struct Annealing<'a, G: WeightedGraph> {
    problem: ProblemInstance<'a, G>,
    params: AnnealingParams,
    scorer: Scorer,
    neighborhood: Neighborhood<G::IndexType>,
    state: State<'a, G>,
    current_cost: Cost,
    best_solution: Solution<G::IndexType>,
    best_cost: Cost,
    trajectory: Trajectory,
    rng: Rand64,
    i: usize,
    accepted_moves: usize,
    improving_moves: usize,
}

impl<'a, G: WeightedGraph> Metaheuristic<'a, G> for Annealing<'a, G> {
    type Params = AnnealingParams;

    fn new(
        problem: ProblemInstance<'a, G>,
        initial_solution: Solution<G::IndexType>,
        params: AnnealingParams,
    ) -> Result<Self, SteinerError<G::IndexType>> {
        params.validate().map_err(SteinerError::InvalidParameter)?;

        let scorer = Scorer::new(params.penalty);
        let current_cost = scorer.score(problem.graph, problem.terminals, &initial_solution)?;
        let neighborhood = match params.move_family {
            MoveFamily::Edge => Neighborhood::Edge,
            MoveFamily::Node => Neighborhood::Node {
                shortest_paths: ShortestPathTable::from_sources(
                    problem.graph,
                    problem.terminals.iter().copied(),
                )?,
                spare_terminals: params.spare_terminals,
            },
        };
        let rng = match params.seed {
            Some(seed) => rng64(seed),
            None => preseeded_rng64(),
        };

        info!(
            "Annealing with {} moves: T0 = {}, speed = {}, {} iterations, initial cost {}",
            params.move_family, params.temperature, params.speed, params.iterations, current_cost
        );

        let state = State::new(
            problem.graph,
            problem.terminals,
            initial_solution.clone(),
            params.temperature,
            params.speed,
        );

        Ok(Annealing {
            problem,
            scorer,
            neighborhood,
            state,
            current_cost,
            best_solution: initial_solution,
            best_cost: current_cost,
            trajectory: Trajectory::new(params.sample_stride),
            rng,
            i: 0,
            accepted_moves: 0,
            improving_moves: 0,
            params,
        })
    }

    /// Runs one move. Returns the cost after it, or None once the budget is spent.
    fn single_iteration(&mut self) -> Result<Option<Cost>, SteinerError<G::IndexType>> {
        if self.is_done() {
            return Ok(None);
        }

        let old_solution = self.state.solution().clone();
        let old_cost = self.current_cost;

        let mut candidate = self.state.clone();
        match &self.neighborhood {
            Neighborhood::Edge => candidate.random_edge_action(&mut self.rng),
            Neighborhood::Node {
                shortest_paths,
                spare_terminals,
            } => candidate.random_node_action(&mut self.rng, shortest_paths, *spare_terminals),
        }
        let new_cost = candidate.cost(&self.scorer)?;

        let probability = self
            .params
            .acceptance
            .probability(old_cost, new_cost, candidate.temperature());
        if self.accept(probability) {
            self.accepted_moves += 1;
            if new_cost < old_cost {
                self.improving_moves += 1;
            }
            self.current_cost = new_cost;
            self.state = candidate;

            if new_cost < self.best_cost {
                self.best_cost = new_cost;
                self.best_solution = self.state.solution().clone();
            }
        } else {
            self.state = State::new(
                self.problem.graph,
                self.problem.terminals,
                old_solution,
                candidate.temperature(),
                candidate.speed(),
            );
        }

        trace!(
            "Iteration {}: cost {} -> {}, p = {:.4}, T = {:.4}",
            self.i,
            old_cost,
            new_cost,
            probability,
            self.state.temperature()
        );

        self.trajectory.record(self.i, self.current_cost);
        self.i += 1;
        Ok(Some(self.current_cost))
    }
}

impl<'a, G: WeightedGraph> Annealing<'a, G> {
    /// Probability 1 and 0 are decided without touching the generator.
    fn accept(&mut self, probability: f64) -> bool {
        if probability >= 1.0 {
            true
        } else if probability <= 0.0 {
            false
        } else {
            self.rng.rand_float() < probability
        }
    }

    pub fn is_done(&self) -> bool {
        self.i >= self.params.iterations
    }

    pub fn iteration(&self) -> usize {
        self.i
    }

    pub fn temperature(&self) -> f64 {
        self.state.temperature()
    }

    pub fn current_solution(&self) -> (&Solution<G::IndexType>, Cost) {
        (self.state.solution(), self.current_cost)
    }

    pub fn best_solution(&self) -> (&Solution<G::IndexType>, Cost) {
        (&self.best_solution, self.best_cost)
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    /// Runs the whole iteration budget.
    pub fn solve(self) -> Result<AnnealingResult<G::IndexType>, SteinerError<G::IndexType>> {
        self.run_with_cancel(None)
    }

    /// Runs the iteration budget, stopping early once `cancel` is set.
    pub fn run_with_cancel(
        mut self,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<AnnealingResult<G::IndexType>, SteinerError<G::IndexType>> {
        let mut cancelled = false;
        while !self.is_done() {
            if let Some(flag) = &cancel {
                if flag.load(Ordering::Relaxed) {
                    debug!("Annealing cancelled after {} iterations", self.i);
                    cancelled = true;
                    break;
                }
            }
            self.single_iteration()?;
        }

        info!(
            "Annealing finished after {} iterations: cost {}, best {}, {} accepted, {} improving",
            self.i, self.current_cost, self.best_cost, self.accepted_moves, self.improving_moves
        );
        Ok(self.into_result(cancelled))
    }

    fn into_result(self, cancelled: bool) -> AnnealingResult<G::IndexType> {
        let final_temperature = self.state.temperature();
        AnnealingResult {
            solution: self.state.into_solution(),
            cost: self.current_cost,
            best_solution: self.best_solution,
            best_cost: self.best_cost,
            trajectory: self.trajectory,
            final_temperature,
            iterations: self.i,
            accepted_moves: self.accepted_moves,
            improving_moves: self.improving_moves,
            cancelled,
        }
    }
}

/// Anneals `initial_solution` on the given instance with a fixed budget.
pub fn run_annealing<G: WeightedGraph>(
    initial_solution: Solution<G::IndexType>,
    graph: &G,
    terminals: &BTreeSet<G::IndexType>,
    params: AnnealingParams,
) -> Result<AnnealingResult<G::IndexType>, SteinerError<G::IndexType>> {
    Annealing::new(ProblemInstance::new(graph, terminals), initial_solution, params)?.solve()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approximation::approximate;
    use crate::graph::generate::{random_terminals, Generate, Grid};
    use crate::graph::MatrixGraph;
    use proptest::prelude::*;

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
    fn zero_iterations_keeps_initial_solution() {
        let graph = path_graph();
        let terminals = terminal_set(&[1, 5]);
        let initial = approximate(&graph, &terminals).unwrap();
        let params = AnnealingParams::new(10.0, 0.1, 0, MoveFamily::Edge).with_seed(1);

        let result = run_annealing(initial.clone(), &graph, &terminals, params).unwrap();

        assert_eq!(result.solution, initial);
        assert_eq!(result.cost, 4);
        assert!(result.trajectory.is_empty());
        assert_eq!(result.iterations, 0);
        assert_eq!(result.final_temperature, 10.0);
    }

    #[test]
    fn frozen_run_never_worsens() {
        let graph = path_graph();
        let terminals = terminal_set(&[1, 5]);
        let initial = approximate(&graph, &terminals).unwrap();

        for family in [MoveFamily::Edge, MoveFamily::Node].iter() {
            let params = AnnealingParams::new(0.0, 0.0, 200, *family)
                .with_sample_stride(1)
                .with_seed(17);
            let result = run_annealing(initial.clone(), &graph, &terminals, params).unwrap();

            assert!(result.cost <= 4);
            assert_eq!(result.trajectory.len(), 200);
            assert!(result.trajectory.samples().iter().all(|sample| sample.cost <= 4));
            assert_eq!(result.final_temperature, 0.0);
        }
    }

    #[test]
    fn trajectory_is_sampled_by_stride() {
        let graph = path_graph();
        let terminals = terminal_set(&[1, 5]);
        let params = AnnealingParams::new(5.0, 0.01, 25, MoveFamily::Edge)
            .with_sample_stride(10)
            .with_seed(3);

        let result = run_annealing(Solution::new(), &graph, &terminals, params).unwrap();
        let iterations: Vec<usize> = result
            .trajectory
            .samples()
            .iter()
            .map(|sample| sample.iteration)
            .collect();

        assert_eq!(iterations, vec![0, 10, 20]);
        assert_eq!(result.iterations, 25);
        assert!(result.best_cost <= result.cost);
    }

    #[test]
    fn seeded_runs_are_reproducible() {
        let graph = path_graph();
        let terminals = terminal_set(&[1, 3, 5]);
        let params = AnnealingParams::new(20.0, 0.05, 300, MoveFamily::Node).with_seed(99);

        let first = run_annealing(Solution::new(), &graph, &terminals, params.clone()).unwrap();
        let second = run_annealing(Solution::new(), &graph, &terminals, params).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn empty_start_finds_path() {
        let graph = path_graph();
        let terminals = terminal_set(&[1, 5]);
        let params = AnnealingParams::new(2.0, 0.002, 1000, MoveFamily::Node).with_seed(5);

        let result = run_annealing(Solution::new(), &graph, &terminals, params).unwrap();

        assert_eq!(result.best_cost, 4);
        assert!(result.improving_moves > 0);
    }

    #[test]
    fn cancelled_run_stops_immediately() {
        let graph = path_graph();
        let terminals = terminal_set(&[1, 5]);
        let params = AnnealingParams::new(5.0, 0.01, 100, MoveFamily::Edge).with_seed(8);
        let annealing =
            Annealing::new(ProblemInstance::new(&graph, &terminals), Solution::new(), params)
                .unwrap();

        let result = annealing
            .run_with_cancel(Some(Arc::new(AtomicBool::new(true))))
            .unwrap();

        assert!(result.cancelled);
        assert_eq!(result.iterations, 0);
        assert_eq!(result.cost, 200);
    }

    #[test]
    fn single_iteration_works() {
        let graph = path_graph();
        let terminals = terminal_set(&[1, 5]);
        let params = AnnealingParams::new(1.0, 0.25, 2, MoveFamily::Edge).with_seed(4);
        let mut annealing =
            Annealing::new(ProblemInstance::new(&graph, &terminals), Solution::new(), params)
                .unwrap();

        assert!(annealing.single_iteration().unwrap().is_some());
        assert_eq!(annealing.iteration(), 1);
        assert_eq!(annealing.temperature(), 0.75);
        assert!(annealing.single_iteration().unwrap().is_some());
        assert_eq!(annealing.single_iteration(), Ok(None));
        assert!(annealing.is_done());
    }

    #[test]
    fn non_worsening_moves_draw_no_random_number() {
        let graph = path_graph();
        let terminals = terminal_set(&[1, 5]);
        let initial = Solution::from_graph(&graph);

        // without penalty every move from the full edge set is non-worsening
        for seed in 0..10u128 {
            let params = AnnealingParams::new(5.0, 0.5, 1, MoveFamily::Edge)
                .with_penalty(0.0)
                .with_seed(seed);
            let mut annealing =
                Annealing::new(ProblemInstance::new(&graph, &terminals), initial.clone(), params)
                    .unwrap();
            let mut reference_rng = rng64(seed);
            let mut reference = State::new(&graph, &terminals, initial.clone(), 5.0, 0.5);
            reference.random_edge_action(&mut reference_rng);

            annealing.single_iteration().unwrap();

            assert_eq!(annealing.accepted_moves, 1, "Seed {}: move should be taken.", seed);
            assert_eq!(annealing.current_solution().0, reference.solution());
            assert_eq!(
                annealing.rng.rand_u64(),
                reference_rng.rand_u64(),
                "Seed {}: only the move itself may consume random numbers.",
                seed
            );
        }
    }

    #[test]
    fn zero_speed_keeps_temperature() {
        let graph = path_graph();
        let terminals = terminal_set(&[1, 3, 5]);
        let params = AnnealingParams::new(7.0, 0.0, 50, MoveFamily::Node).with_seed(12);

        let result = run_annealing(Solution::new(), &graph, &terminals, params).unwrap();

        assert_eq!(result.iterations, 50);
        assert_eq!(result.final_temperature, 7.0, "Temperature must not decay at speed 0.");
    }

    #[test]
    fn invalid_initial_solution_errors() {
        let graph = path_graph();
        let terminals = terminal_set(&[1, 5]);
        let params = AnnealingParams::default().with_seed(1);

        assert_eq!(
            run_annealing(Solution::from_edges(vec![(1, 5)]), &graph, &terminals, params).err(),
            Some(SteinerError::EdgeNotInGraph((1, 5)))
        );
        assert!(matches!(
            run_annealing(
                Solution::new(),
                &graph,
                &terminals,
                AnnealingParams::default().with_sample_stride(0)
            ),
            Err(SteinerError::InvalidParameter(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]
        #[test]
        fn best_cost_never_exceeds_initial_cost(
            side in 2usize..5,
            terminal_count in 2usize..5,
            seed in any::<u64>(),
            node_moves in any::<bool>(),
        ) {
            let mut rng = rng64(seed as u128);
            let graph = Grid::new((side, side), (1.0, 5.0)).generate(&mut rng);
            let terminals = random_terminals(&graph, terminal_count, &mut rng);
            let initial = approximate(&graph, &terminals).unwrap();
            let family = if node_moves { MoveFamily::Node } else { MoveFamily::Edge };
            let params = AnnealingParams::new(10.0, 0.1, 150, family).with_seed(seed as u128);

            let initial_cost = Scorer::default().score(&graph, &terminals, &initial).unwrap();
            let result = run_annealing(initial, &graph, &terminals, params).unwrap();

            prop_assert!(result.best_cost <= initial_cost);
            prop_assert!(result.best_cost <= result.cost);
            prop_assert!(result.final_temperature >= 0.0);
        }
    }
}
