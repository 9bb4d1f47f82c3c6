//! Concurrent multi-round execution.

use super::config::OptimizerSpec;
use super::registry::{ResolvedOptimizer, StrategyRegistry};
use crate::anneal::{AnnealResult, Annealer};
use crate::error::{ConfigError, ModelError, OptimizeError};
use crate::program::Program;
use crate::random::{create_rng, derive_seed};
use crate::schedule::Schedule;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of a concurrent optimization run.
#[derive(Debug, Clone)]
pub struct OptimizeResult {
    /// The best schedule seen in any round, or the initial one.
    pub best: Schedule,

    /// Score of the best schedule.
    pub best_score: f64,

    /// Number of rounds run.
    pub rounds: usize,

    /// Rounds whose candidate became the current schedule.
    pub accepted_rounds: usize,

    /// Best score after each round.
    pub score_history: Vec<f64>,
}

/// Runs annealing trajectories in parallel over several outer rounds.
///
/// The worker pool is built once in [`new`](Self::new) and released when
/// the optimizer is dropped.
///
/// # Determinism
///
/// Each trajectory seeds its own generator from `(seed, round,
/// trajectory)` and results are folded in trajectory order, so the outcome
/// does not depend on pool size or thread interleaving.
pub struct ConcurrentOptimizer {
    config: ResolvedOptimizer,
    pool: ThreadPool,
}

impl ConcurrentOptimizer {
    /// Provisions the worker pool for `config`.
    pub fn new(config: ResolvedOptimizer) -> Result<Self, ConfigError> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.threads.max(1))
            .thread_name(|i| format!("timetable-worker-{i}"))
            .build()
            .map_err(|e| ConfigError::ThreadPool(e.to_string()))?;
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &ResolvedOptimizer {
        &self.config
    }

    /// Runs every round from `initial` and returns the best schedule found.
    ///
    /// `initial` is checked against its program first. A failing trajectory
    /// aborts the run; no partial result is returned.
    #[tracing::instrument(
        level = "debug",
        name = "optimize",
        skip_all,
        fields(
            iterations = self.config.iterations,
            sub_optimizers = self.config.sub_optimizers,
            steps = self.config.sub_optimizer_steps,
            seed = self.config.seed,
        )
    )]
    pub fn iterate(&self, initial: Schedule) -> Result<OptimizeResult, OptimizeError> {
        initial.validate()?;
        let config = &self.config;
        let initial_score = config.scorer.score(&initial);

        if config.iterations == 0 || config.sub_optimizer_steps == 0 {
            debug!("nothing to run, returning the initial schedule");
            return Ok(OptimizeResult {
                best: initial,
                best_score: initial_score,
                rounds: 0,
                accepted_rounds: 0,
                score_history: Vec::new(),
            });
        }

        let mut outer_rng = create_rng(config.seed);
        let mut current = initial;
        let mut current_score = initial_score;
        let mut best = current.clone();
        let mut best_score = current_score;
        let mut accepted_rounds = 0usize;
        let mut score_history = Vec::with_capacity(config.iterations);

        for round in 0..config.iterations {
            let results = self.run_round(round, &current)?;

            // First maximum wins ties, so the choice is independent of
            // completion order.
            let mut winner: Option<(usize, AnnealResult)> = None;
            for (i, result) in results.into_iter().enumerate() {
                let better = match &winner {
                    Some((_, held)) => result.best_score > held.best_score,
                    None => true,
                };
                if better {
                    winner = Some((i, result));
                }
            }
            let (trajectory, candidate) = winner.ok_or(ConfigError::NotPositive {
                field: "sub_optimizers",
            })?;

            let delta = candidate.best_score - current_score;
            let temperature = config.primary_temperature.temperature(round, config.iterations);
            let accepted = config.acceptance.accept(delta, temperature, &mut outer_rng);

            if candidate.best_score > best_score {
                best = candidate.best.clone();
                best_score = candidate.best_score;
            }
            if accepted {
                current = candidate.best;
                current_score = candidate.best_score;
                accepted_rounds += 1;
            }
            score_history.push(best_score);

            debug!(
                round,
                trajectory,
                candidate_score = candidate.best_score,
                temperature,
                accepted,
                best_score,
                "round complete"
            );
        }

        info!(
            best_score,
            sections = best.scheduled_sections().len(),
            class_hours = best.class_hours(),
            accepted_rounds,
            "optimization finished"
        );
        let unscheduled = best.unscheduled_sections();
        if !unscheduled.is_empty() {
            warn!(count = unscheduled.len(), "some sections were not scheduled");
        }

        Ok(OptimizeResult {
            best,
            best_score,
            rounds: config.iterations,
            accepted_rounds,
            score_history,
        })
    }

    /// Runs one round's trajectories on the pool and waits for all of them.
    fn run_round(&self, round: usize, snapshot: &Schedule) -> Result<Vec<AnnealResult>, OptimizeError> {
        let config = &self.config;
        let annealer = Annealer::new(
            config.perturber.as_ref(),
            config.scorer.as_ref(),
            config.sub_temperature.as_ref(),
            config.acceptance.as_ref(),
            &config.rules,
        );

        let outcomes: Vec<Result<AnnealResult, OptimizeError>> = self.pool.install(|| {
            (0..config.sub_optimizers)
                .into_par_iter()
                .map(|trajectory| {
                    let start = snapshot.clone();
                    panic::catch_unwind(AssertUnwindSafe(|| {
                        let mut rng = create_rng(derive_seed(config.seed, round, trajectory));
                        annealer.run(start, config.sub_optimizer_steps, &mut rng)
                    }))
                    .map_err(|payload| OptimizeError::SubOptimizer {
                        round,
                        trajectory,
                        message: panic_message(payload.as_ref()),
                    })
                })
                .collect()
        });

        outcomes.into_iter().collect()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "trajectory panicked".to_string()
    }
}

/// Optimizes `initial` with the built-in strategies.
///
/// `initial` must have been built for `program`. Configuration problems are
/// reported before any round starts.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use u_timetable::optimizer::{optimize, OptimizerSpec};
/// use u_timetable::program::{Program, Room, Section, TimeBlock};
/// use u_timetable::schedule::Schedule;
///
/// let mut builder = Program::builder();
/// builder.add_room(Room::new("R1"));
/// builder.add_time_block(TimeBlock::new("Mon 9:00", 0));
/// builder.add_time_block(TimeBlock::new("Mon 10:00", 0));
/// builder.add_section(Section::new("Algebra", 1));
/// let program = Arc::new(builder.build().unwrap());
///
/// let spec = OptimizerSpec::default()
///     .with_iterations(5)
///     .with_sub_optimizers(2)
///     .with_sub_optimizer_steps(20)
///     .with_seed(1);
/// let best = optimize(&spec, &program, Schedule::new(program.clone())).unwrap();
/// assert_eq!(best.len(), 1);
/// ```
pub fn optimize(
    spec: &OptimizerSpec,
    program: &Arc<Program>,
    initial: Schedule,
) -> Result<Schedule, OptimizeError> {
    program.validate()?;
    if !Arc::ptr_eq(initial.program(), program) && **initial.program() != **program {
        return Err(ModelError::ProgramMismatch.into());
    }
    initial.validate()?;
    let resolved = StrategyRegistry::standard().resolve(spec)?;
    let optimizer = ConcurrentOptimizer::new(resolved)?;
    Ok(optimizer.iterate(initial)?.best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::RuleSet;
    use crate::perturb::InsertPerturber;
    use crate::program::{Room, RoomId, Section, SectionId, TimeBlock, TimeBlockId};
    use crate::schedule::StartAssignment;
    use crate::score::Scorer;

    fn campus() -> Arc<Program> {
        let mut b = Program::builder();
        let lab = b.add_property("lab", true);
        let proj = b.add_property("projector", false);
        let ann = b.add_teacher("Ann");
        let bob = b.add_teacher("Bob");
        b.add_room(Room::new("Lab").with_property(lab).with_capacity(16));
        b.add_room(Room::new("Hall").with_property(proj).with_capacity(80));
        b.add_room(Room::new("Seminar").with_capacity(12));
        for day in 0..2 {
            for slot in 0..3 {
                b.add_time_block(TimeBlock::new(format!("D{day} S{slot}"), day));
            }
        }
        for s in 0..10 {
            let mut section = Section::new(format!("S{s}"), 1 + s % 2)
                .with_class_size(10 + 3 * s as u32)
                .taught_by(if s % 2 == 0 { ann } else { bob })
                .preferring(TimeBlockId(s % 6));
            if s % 4 == 0 {
                section = section.requiring(lab);
            }
            if s % 3 == 0 {
                section = section.requiring(proj);
            }
            b.add_section(section);
        }
        Arc::new(b.build().unwrap())
    }

    fn spec() -> OptimizerSpec {
        OptimizerSpec::default()
            .with_iterations(6)
            .with_sub_optimizers(3)
            .with_sub_optimizer_steps(40)
            .with_seed(2024)
    }

    fn run(spec: &OptimizerSpec, initial: Schedule) -> OptimizeResult {
        let resolved = StrategyRegistry::standard().resolve(spec).unwrap();
        ConcurrentOptimizer::new(resolved)
            .unwrap()
            .iterate(initial)
            .unwrap()
    }

    fn assert_legal(schedule: &Schedule) {
        let rules = RuleSet::standard();
        for a in schedule.assignments() {
            let rest = schedule.without_section(a.section);
            assert!(rules.admits(&rest, a), "illegal placement {a}");
        }
    }

    #[test]
    fn test_zero_iterations_returns_input() {
        let program = campus();
        let initial = Schedule::new(program.clone()).with_added(StartAssignment::new(
            SectionId(1),
            RoomId(1),
            TimeBlockId(0),
        ));
        let out = optimize(&spec().with_iterations(0), &program, initial.clone()).unwrap();
        assert_eq!(out, initial);
    }

    #[test]
    fn test_zero_steps_returns_input() {
        let program = campus();
        let initial = Schedule::new(program.clone());
        let result = run(&spec().with_sub_optimizer_steps(0), initial.clone());
        assert_eq!(result.best, initial);
        assert_eq!(result.rounds, 0);
    }

    #[test]
    fn test_improves_and_stays_legal() {
        let program = campus();
        let result = run(&spec(), Schedule::new(program));
        assert!(result.best_score > 0.0);
        assert_eq!(result.rounds, 6);
        assert_eq!(result.score_history.len(), 6);
        assert_legal(&result.best);
        for w in result.score_history.windows(2) {
            assert!(w[1] >= w[0]);
        }
    }

    #[test]
    fn test_deterministic_across_runs_and_pool_sizes() {
        let program = campus();
        let a = run(&spec(), Schedule::new(program.clone()));
        let b = run(&spec(), Schedule::new(program.clone()));
        let c = run(&spec().with_threads(1), Schedule::new(program));
        assert_eq!(a.best, b.best);
        assert_eq!(a.best, c.best);
        assert_eq!(a.score_history, c.score_history);
    }

    #[test]
    fn test_best_score_non_decreasing_in_iterations() {
        let program = campus();
        let mut previous = f64::NEG_INFINITY;
        for iterations in 1..=6 {
            let result = run(
                &spec().with_iterations(iterations),
                Schedule::new(program.clone()),
            );
            assert!(
                result.best_score >= previous,
                "{iterations} rounds scored {} after {previous}",
                result.best_score
            );
            previous = result.best_score;
        }
    }

    /// A lab-only section A and an unconstrained section B compete for a
    /// single binding lab at a single time block.
    fn lab_scenario() -> Arc<Program> {
        let mut b = Program::builder();
        let lab = b.add_property("lab", true);
        b.add_room(Room::new("R").with_property(lab));
        b.add_time_block(TimeBlock::new("T", 0));
        b.add_section(Section::new("A", 1).requiring(lab));
        b.add_section(Section::new("B", 1));
        Arc::new(b.build().unwrap())
    }

    #[test]
    fn test_lab_scenario_minimal_run() {
        let program = lab_scenario();
        let spec = OptimizerSpec::default()
            .with_iterations(1)
            .with_sub_optimizers(1)
            .with_sub_optimizer_steps(2)
            .with_seed(7);
        let out = optimize(&spec, &program, Schedule::new(program.clone())).unwrap();
        assert!(out.len() <= 1);
        assert!(!out.is_scheduled(SectionId(1)));
        if let Some(a) = out.assignment_for(SectionId(0)) {
            assert_eq!(a.room, RoomId(0));
        }
    }

    #[test]
    fn test_lab_scenario_prefers_lab_section() {
        let program = lab_scenario();
        let spec = OptimizerSpec::default()
            .with_iterations(4)
            .with_sub_optimizers(2)
            .with_sub_optimizer_steps(20)
            .with_seed(7);
        let resolved = StrategyRegistry::standard().resolve(&spec).unwrap();
        let empty = Schedule::new(program.clone());
        let with_a = empty.with_added(StartAssignment::new(SectionId(0), RoomId(0), TimeBlockId(0)));
        assert!(resolved.scorer.score(&with_a) > resolved.scorer.score(&empty));

        let out = optimize(&spec, &program, empty).unwrap();
        assert_eq!(out.assignments(), with_a.assignments());
    }

    #[test]
    fn test_config_error_before_run() {
        let program = campus();
        let err = optimize(
            &spec().with_sub_optimizers(0),
            &program,
            Schedule::new(program.clone()),
        )
        .unwrap_err();
        assert!(matches!(err, OptimizeError::Config(_)));
    }

    #[test]
    fn test_program_mismatch() {
        let program = campus();
        let other = lab_scenario();
        let err = optimize(&spec(), &program, Schedule::new(other)).unwrap_err();
        assert_eq!(err, OptimizeError::Model(ModelError::ProgramMismatch));
    }

    #[test]
    fn test_unknown_ids_in_initial_schedule() {
        let program = campus();
        let initial = Schedule::new(program.clone()).with_added(StartAssignment::new(
            SectionId(42),
            RoomId(0),
            TimeBlockId(0),
        ));
        let err = optimize(&spec(), &program, initial.clone()).unwrap_err();
        assert_eq!(err, OptimizeError::Model(ModelError::UnknownSection(42)));

        // The lower-level entry checks too, and before any scoring.
        let resolved = StrategyRegistry::standard().resolve(&spec()).unwrap();
        let err = ConcurrentOptimizer::new(resolved)
            .unwrap()
            .iterate(Schedule::new(program).with_added(StartAssignment::new(
                SectionId(0),
                RoomId(9),
                TimeBlockId(0),
            )))
            .unwrap_err();
        assert_eq!(err, OptimizeError::Model(ModelError::UnknownRoom(9)));
    }

    #[test]
    fn test_custom_rules_are_honored() {
        // Without the room-property rule the lab may host anything.
        let program = lab_scenario();
        let spec = OptimizerSpec::default()
            .with_iterations(3)
            .with_sub_optimizers(2)
            .with_sub_optimizer_steps(30)
            .with_seed(11);
        let resolved = StrategyRegistry::standard()
            .resolve(&spec)
            .unwrap()
            .with_rules(RuleSet::new().with_rule(crate::logic::DuplicateSectionRule));
        let result = ConcurrentOptimizer::new(resolved)
            .unwrap()
            .iterate(Schedule::new(program))
            .unwrap();
        assert_eq!(result.best.len(), 2);
    }

    struct Exploding;

    impl Scorer for Exploding {
        fn name(&self) -> &str {
            "Exploding"
        }

        fn score(&self, schedule: &Schedule) -> f64 {
            if !schedule.is_empty() {
                panic!("scorer invariant broken");
            }
            0.0
        }
    }

    #[test]
    fn test_trajectory_failure_aborts_run() {
        let program = campus();
        let resolved = StrategyRegistry::standard()
            .resolve(&spec())
            .unwrap()
            .with_perturber(Arc::new(InsertPerturber { attempts: 64 }))
            .with_scorer(Arc::new(Exploding));
        let optimizer = ConcurrentOptimizer::new(resolved).unwrap();
        let err = optimizer.iterate(Schedule::new(program)).unwrap_err();
        match err {
            OptimizeError::SubOptimizer {
                round,
                trajectory,
                message,
            } => {
                assert_eq!(round, 0);
                assert_eq!(trajectory, 0);
                assert_eq!(message, "scorer invariant broken");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }
}
