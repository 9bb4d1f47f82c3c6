//! Schedule scoring.
//!
//! A score is a deterministic function of a schedule, higher is better.
//! [`CompleteScorer`] is a weighted sum of independent components.

use crate::error::ConfigError;
use crate::schedule::Schedule;

/// Maps a schedule to a quality value. Higher is better.
pub trait Scorer: Send + Sync {
    /// Returns the name of this scorer.
    fn name(&self) -> &str;

    fn score(&self, schedule: &Schedule) -> f64;
}

/// Number of distinct sections placed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SectionsScheduled;

impl Scorer for SectionsScheduled {
    fn name(&self) -> &str {
        "SectionsScheduled"
    }

    fn score(&self, schedule: &Schedule) -> f64 {
        schedule.scheduled_sections().len() as f64
    }
}

/// Total blocks of instruction placed.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassHours;

impl Scorer for ClassHours {
    fn name(&self) -> &str {
        "ClassHours"
    }

    fn score(&self, schedule: &Schedule) -> f64 {
        schedule.class_hours() as f64
    }
}

/// Distinct sections whose placement starts in one of their preferred
/// blocks. A section placed more than once is judged by its first placement.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreferencesSatisfied;

impl Scorer for PreferencesSatisfied {
    fn name(&self) -> &str {
        "PreferencesSatisfied"
    }

    fn score(&self, schedule: &Schedule) -> f64 {
        let program = schedule.program();
        schedule
            .scheduled_sections()
            .into_iter()
            .filter(|&s| {
                schedule
                    .assignment_for(s)
                    .is_some_and(|a| program.section(s).preferred_blocks.contains(&a.start))
            })
            .count() as f64
    }
}

/// Weights of the built-in score components.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScorerWeights {
    pub sections_scheduled: f64,
    pub class_hours: f64,
    pub preferences_satisfied: f64,
}

impl Default for ScorerWeights {
    fn default() -> Self {
        Self {
            sections_scheduled: 10.0,
            class_hours: 1.0,
            preferences_satisfied: 0.5,
        }
    }
}

impl ScorerWeights {
    pub fn with_sections_scheduled(mut self, w: f64) -> Self {
        self.sections_scheduled = w;
        self
    }

    pub fn with_class_hours(mut self, w: f64) -> Self {
        self.class_hours = w;
        self
    }

    pub fn with_preferences_satisfied(mut self, w: f64) -> Self {
        self.preferences_satisfied = w;
        self
    }

    /// Validates the weights.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("scorer.sections_scheduled", self.sections_scheduled),
            ("scorer.class_hours", self.class_hours),
            ("scorer.preferences_satisfied", self.preferences_satisfied),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { field, value });
            }
        }
        Ok(())
    }
}

struct WeightedComponent {
    scorer: Box<dyn Scorer>,
    weight: f64,
}

/// Weighted sum of score components.
///
/// # Examples
///
/// ```
/// use u_timetable::score::{CompleteScorer, ScorerWeights};
///
/// let scorer = CompleteScorer::new(ScorerWeights::default().with_class_hours(2.0));
/// assert_eq!(scorer.component_names(), vec!["SectionsScheduled", "ClassHours", "PreferencesSatisfied"]);
/// ```
pub struct CompleteScorer {
    components: Vec<WeightedComponent>,
}

impl CompleteScorer {
    pub fn new(weights: ScorerWeights) -> Self {
        Self {
            components: Vec::new(),
        }
        .with_component(SectionsScheduled, weights.sections_scheduled)
        .with_component(ClassHours, weights.class_hours)
        .with_component(PreferencesSatisfied, weights.preferences_satisfied)
    }

    /// Adds a component with the given weight.
    pub fn with_component<S: Scorer + 'static>(mut self, scorer: S, weight: f64) -> Self {
        self.components.push(WeightedComponent {
            scorer: Box::new(scorer),
            weight,
        });
        self
    }

    pub fn component_names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.scorer.name()).collect()
    }
}

impl Scorer for CompleteScorer {
    fn name(&self) -> &str {
        "Complete"
    }

    fn score(&self, schedule: &Schedule) -> f64 {
        self.components
            .iter()
            .filter(|c| c.weight != 0.0)
            .map(|c| c.scorer.score(schedule) * c.weight)
            .sum()
    }
}
