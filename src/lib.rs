//! Course timetabling by concurrent simulated annealing.
//!
//! Places course sections into (room, start time block) slots so that as
//! many sections and class hours as possible are scheduled, without
//! breaking any placement rule:
//!
//! - **Program**: the read-only catalog of sections, rooms, time blocks,
//!   room properties and teachers.
//! - **Schedule**: an immutable set of placements sharing one program.
//! - **Logic**: composable placement rules that reject illegal moves.
//! - **Perturb**: insert, relocate, swap and remove moves plus their
//!   sequential and weighted compositions.
//! - **Score**: weighted components; higher is better.
//! - **Anneal**: temperature functions, acceptance criteria and a
//!   single-trajectory annealer.
//! - **Optimizer**: rounds of parallel trajectories on a rayon pool with
//!   reproducible per-trajectory seeding.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use u_timetable::optimize;
//! use u_timetable::optimizer::OptimizerSpec;
//! use u_timetable::program::{Program, Room, Section, TimeBlock};
//! use u_timetable::schedule::Schedule;
//!
//! let mut builder = Program::builder();
//! let lab = builder.add_property("lab", true);
//! builder.add_room(Room::new("Chem Lab").with_property(lab));
//! builder.add_room(Room::new("Room 101"));
//! builder.add_time_block(TimeBlock::new("Mon 9:00", 0));
//! builder.add_section(Section::new("Chemistry", 1).requiring(lab));
//! builder.add_section(Section::new("History", 1));
//! let program = Arc::new(builder.build().unwrap());
//!
//! let spec = OptimizerSpec::default()
//!     .with_iterations(10)
//!     .with_sub_optimizers(2)
//!     .with_sub_optimizer_steps(50)
//!     .with_seed(42);
//! let best = optimize(&spec, &program, Schedule::new(program.clone())).unwrap();
//! assert_eq!(best.len(), 2);
//! ```

pub mod anneal;
pub mod error;
pub mod logic;
pub mod optimizer;
pub mod perturb;
pub mod program;
pub mod random;
pub mod schedule;
pub mod score;

pub use error::{ConfigError, ModelError, OptimizeError};
pub use optimizer::{optimize, OptimizerSpec};
pub use schedule::{Schedule, StartAssignment};
