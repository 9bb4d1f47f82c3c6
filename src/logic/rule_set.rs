//! Ordered rule composition.

use super::rules::{
    BlockFitRule, DuplicateSectionRule, RoomCapacityRule, RoomConflictRule, RoomPropertyRule,
    TeacherConflictRule,
};
use super::types::{ScheduleRule, Validator};
use crate::error::ConfigError;
use crate::schedule::{Schedule, StartAssignment};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Selector tags for the built-in rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum RuleKind {
    RoomProperty,
    DuplicateSection,
    RoomConflict,
    TeacherConflict,
    BlockFit,
    RoomCapacity,
}

impl RuleKind {
    pub const ALL: [RuleKind; 6] = [
        RuleKind::DuplicateSection,
        RuleKind::BlockFit,
        RuleKind::RoomProperty,
        RuleKind::RoomCapacity,
        RuleKind::RoomConflict,
        RuleKind::TeacherConflict,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            RuleKind::RoomProperty => "ROOM_PROPERTY",
            RuleKind::DuplicateSection => "DUPLICATE_SECTION",
            RuleKind::RoomConflict => "ROOM_CONFLICT",
            RuleKind::TeacherConflict => "TEACHER_CONFLICT",
            RuleKind::BlockFit => "BLOCK_FIT",
            RuleKind::RoomCapacity => "ROOM_CAPACITY",
        }
    }

    /// Instantiates the built-in rule behind this tag.
    pub fn build(self) -> Arc<dyn ScheduleRule> {
        match self {
            RuleKind::RoomProperty => Arc::new(RoomPropertyRule),
            RuleKind::DuplicateSection => Arc::new(DuplicateSectionRule),
            RuleKind::RoomConflict => Arc::new(RoomConflictRule),
            RuleKind::TeacherConflict => Arc::new(TeacherConflictRule),
            RuleKind::BlockFit => Arc::new(BlockFitRule),
            RuleKind::RoomCapacity => Arc::new(RoomCapacityRule),
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for RuleKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RuleKind::ALL
            .into_iter()
            .find(|k| k.tag() == s)
            .ok_or_else(|| ConfigError::UnknownSelector {
                kind: "rule",
                tag: s.to_string(),
            })
    }
}

/// An ordered list of independent rules.
///
/// Every rule sees every candidate; a candidate is legal only if no rule
/// reports a violation. Refining the checks means appending a rule, so a
/// set can only grow stricter.
///
/// # Examples
///
/// ```
/// use u_timetable::logic::{RoomPropertyRule, DuplicateSectionRule, RuleSet};
///
/// let rules = RuleSet::new()
///     .with_rule(DuplicateSectionRule)
///     .with_rule(RoomPropertyRule);
/// assert_eq!(rules.rule_names(), vec!["DuplicateSection", "RoomProperty"]);
/// ```
#[derive(Clone, Default)]
pub struct RuleSet {
    rules: Vec<Arc<dyn ScheduleRule>>,
}

impl RuleSet {
    /// Creates an empty set, which admits every candidate.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// All built-in rules.
    pub fn standard() -> Self {
        RuleKind::ALL
            .into_iter()
            .fold(Self::new(), |set, kind| set.with_shared_rule(kind.build()))
    }

    pub fn with_rule<R: ScheduleRule + 'static>(self, rule: R) -> Self {
        self.with_shared_rule(Arc::new(rule))
    }

    pub fn with_shared_rule(mut self, rule: Arc<dyn ScheduleRule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    /// Runs every rule and returns the collected diagnostics.
    pub fn validate(&self, schedule: &Schedule, candidate: &StartAssignment) -> Validator {
        let mut validator = Validator::new();
        for rule in &self.rules {
            validator.enter_rule(rule.name());
            rule.validate(&mut validator, schedule, candidate);
        }
        validator
    }

    /// Whether `candidate` may be added to `schedule`.
    pub fn admits(&self, schedule: &Schedule, candidate: &StartAssignment) -> bool {
        let mut validator = Validator::new();
        for rule in &self.rules {
            rule.validate(&mut validator, schedule, candidate);
            if !validator.is_valid() {
                return false;
            }
        }
        true
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSet")
            .field("rules", &self.rule_names())
            .finish()
    }
}
