//! Schedule perturbation.
//!
//! Perturbers propose the next schedule of a trajectory: insert an
//! unscheduled section, relocate or swap placed ones, or drop one. Every
//! introduced placement is checked against the rule set; a move that
//! finds nothing admissible within its retry budget returns the parent
//! unchanged.

mod composite;
mod moves;
mod spec;
mod types;

pub use composite::{SequencePerturber, WeightedPerturber};
pub use moves::{InsertPerturber, RelocatePerturber, RemovePerturber, SwapPerturber};
pub use spec::{PerturberSpec, WeightedStrategy, DEFAULT_ATTEMPTS};
pub use types::Perturber;
