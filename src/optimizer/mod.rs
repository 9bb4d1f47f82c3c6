//! Concurrent timetable optimization.
//!
//! An outer loop of rounds, each running several independent annealing
//! trajectories in parallel from the current schedule. The best
//! trajectory result of a round is offered to the outer acceptance
//! criterion at the round's primary temperature; the best schedule ever
//! seen is returned.
//!
//! [`OptimizerSpec`] names strategies by selector, a [`StrategyRegistry`]
//! resolves them, and a [`ConcurrentOptimizer`] owns the worker pool for
//! the lifetime of a run. [`optimize`] wires the three together.

mod config;
mod registry;
mod runner;

pub use config::OptimizerSpec;
pub use registry::{ResolvedOptimizer, StrategyRegistry};
pub use runner::{optimize, ConcurrentOptimizer, OptimizeResult};
