//! Core perturbation trait.

use crate::logic::RuleSet;
use crate::schedule::Schedule;
use rand::RngCore;

/// Generates a candidate successor of a schedule.
///
/// Every placement a perturber introduces or moves must be admitted by
/// `rules` before it is committed. When no admissible move is found within
/// the perturber's retry budget, the parent is returned unchanged. The
/// parent itself is never modified.
///
/// # Examples
///
/// ```
/// use rand::RngCore;
/// use u_timetable::logic::RuleSet;
/// use u_timetable::perturb::Perturber;
/// use u_timetable::schedule::Schedule;
///
/// // Leaves every schedule as it is.
/// struct Idle;
///
/// impl Perturber for Idle {
///     fn name(&self) -> &str { "Idle" }
///     fn perturb(&self, s: &Schedule, _: &RuleSet, _: &mut dyn RngCore) -> Schedule {
///         s.clone()
///     }
/// }
/// ```
pub trait Perturber: Send + Sync {
    /// Returns a human-readable name for this perturber.
    fn name(&self) -> &str;

    fn perturb(&self, schedule: &Schedule, rules: &RuleSet, rng: &mut dyn RngCore) -> Schedule;
}
