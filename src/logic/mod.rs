//! Placement legality rules.
//!
//! Each rule inspects a candidate placement in isolation (*local* checks)
//! and against the placements already in the schedule (*global* checks).
//! Rules accumulate [`Violation`]s instead of failing, and a
//! [`RuleSet`] chains them in order.

mod rule_set;
mod rules;
mod types;

pub use rule_set::{RuleKind, RuleSet};
pub use rules::{
    BlockFitRule, DuplicateSectionRule, RoomCapacityRule, RoomConflictRule, RoomPropertyRule,
    TeacherConflictRule,
};
pub use types::{ScheduleRule, Validator, Violation, ViolationKind};
