//! Core rule trait and the violation accumulator.

use crate::schedule::{Schedule, StartAssignment};

/// Whether a violation concerns the placement alone or its interaction
/// with other placements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// The placement is illegal in isolation.
    Local,
    /// The placement conflicts with already scheduled placements.
    Global,
}

/// One failed check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub rule: String,
    pub kind: ViolationKind,
    pub candidate: StartAssignment,
    pub message: String,
    /// Scheduled placements the candidate collides with. Empty for local
    /// violations.
    pub conflicts: Vec<StartAssignment>,
}

/// Collects the outcome of running rules against one candidate.
///
/// Rules never fail; they report through [`validate_local`](Self::validate_local)
/// and [`validate_global`](Self::validate_global).
#[derive(Debug, Clone, Default)]
pub struct Validator {
    current_rule: String,
    violations: Vec<Violation>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags subsequent violations with `rule`.
    pub(crate) fn enter_rule(&mut self, rule: &str) {
        self.current_rule.clear();
        self.current_rule.push_str(rule);
    }

    /// Records a violation unless `ok` holds.
    pub fn validate_local(&mut self, ok: bool, candidate: &StartAssignment, message: &str) {
        if !ok {
            self.violations.push(Violation {
                rule: self.current_rule.clone(),
                kind: ViolationKind::Local,
                candidate: *candidate,
                message: message.to_string(),
                conflicts: Vec::new(),
            });
        }
    }

    /// Records a violation if `conflicts` yields anything.
    pub fn validate_global<'a, I>(&mut self, candidate: &StartAssignment, conflicts: I, message: &str)
    where
        I: IntoIterator<Item = &'a StartAssignment>,
    {
        let conflicts: Vec<StartAssignment> = conflicts.into_iter().copied().collect();
        if !conflicts.is_empty() {
            self.violations.push(Violation {
                rule: self.current_rule.clone(),
                kind: ViolationKind::Global,
                candidate: *candidate,
                message: message.to_string(),
                conflicts,
            });
        }
    }

    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Human-readable diagnostics, one per violation.
    pub fn messages(&self) -> Vec<String> {
        self.violations
            .iter()
            .map(|v| format!("{}: {} ({})", v.rule, v.message, v.candidate))
            .collect()
    }
}

/// A stateless legality check for a candidate placement.
///
/// `schedule` is the schedule the candidate would be added to; it does not
/// yet contain the candidate.
///
/// # Examples
///
/// ```
/// use u_timetable::logic::{ScheduleRule, Validator};
/// use u_timetable::schedule::{Schedule, StartAssignment};
///
/// // Keep the first time block free for assemblies.
/// struct NoFirstBlock;
///
/// impl ScheduleRule for NoFirstBlock {
///     fn name(&self) -> &str { "NoFirstBlock" }
///     fn validate(&self, v: &mut Validator, _s: &Schedule, a: &StartAssignment) {
///         v.validate_local(a.start.0 != 0, a, "the first block is reserved");
///     }
/// }
/// ```
pub trait ScheduleRule: Send + Sync {
    /// Returns the name of this rule.
    fn name(&self) -> &str;

    /// Reports every way `candidate` is illegal with respect to `schedule`.
    fn validate(&self, validator: &mut Validator, schedule: &Schedule, candidate: &StartAssignment);
}
