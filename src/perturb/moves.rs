//! Single-move perturbers.

use super::types::Perturber;
use crate::logic::RuleSet;
use crate::program::{RoomId, TimeBlockId};
use crate::schedule::{Schedule, StartAssignment};
use rand::{Rng, RngCore};

/// Draws a room and start block uniformly, or `None` for a program without
/// rooms or blocks.
fn random_slot(schedule: &Schedule, rng: &mut dyn RngCore) -> Option<(RoomId, TimeBlockId)> {
    let program = schedule.program();
    if program.room_count() == 0 || program.time_block_count() == 0 {
        return None;
    }
    let room = RoomId(rng.random_range(0..program.room_count()));
    let start = TimeBlockId(rng.random_range(0..program.time_block_count()));
    Some((room, start))
}

/// Places one unscheduled section in a random room and start block.
#[derive(Debug, Clone, Copy)]
pub struct InsertPerturber {
    pub attempts: usize,
}

impl Perturber for InsertPerturber {
    fn name(&self) -> &str {
        "Insert"
    }

    fn perturb(&self, schedule: &Schedule, rules: &RuleSet, rng: &mut dyn RngCore) -> Schedule {
        let unscheduled = schedule.unscheduled_sections();
        if unscheduled.is_empty() {
            return schedule.clone();
        }
        for _ in 0..self.attempts {
            let section = unscheduled[rng.random_range(0..unscheduled.len())];
            let Some((room, start)) = random_slot(schedule, rng) else {
                break;
            };
            let candidate = StartAssignment::new(section, room, start);
            if rules.admits(schedule, &candidate) {
                return schedule.with_added(candidate);
            }
        }
        schedule.clone()
    }
}

/// Moves one placed section to a random room and start block.
#[derive(Debug, Clone, Copy)]
pub struct RelocatePerturber {
    pub attempts: usize,
}

impl Perturber for RelocatePerturber {
    fn name(&self) -> &str {
        "Relocate"
    }

    fn perturb(&self, schedule: &Schedule, rules: &RuleSet, rng: &mut dyn RngCore) -> Schedule {
        let placed = schedule.assignments();
        if placed.is_empty() {
            return schedule.clone();
        }
        for _ in 0..self.attempts {
            let current = placed[rng.random_range(0..placed.len())];
            let Some((room, start)) = random_slot(schedule, rng) else {
                break;
            };
            let candidate = StartAssignment::new(current.section, room, start);
            if candidate == current {
                continue;
            }
            let base = schedule.without_section(current.section);
            if rules.admits(&base, &candidate) {
                return base.with_added(candidate);
            }
        }
        schedule.clone()
    }
}

/// Exchanges the rooms and start blocks of two placements.
#[derive(Debug, Clone, Copy)]
pub struct SwapPerturber {
    pub attempts: usize,
}

impl Perturber for SwapPerturber {
    fn name(&self) -> &str {
        "Swap"
    }

    fn perturb(&self, schedule: &Schedule, rules: &RuleSet, rng: &mut dyn RngCore) -> Schedule {
        let placed = schedule.assignments();
        if placed.len() < 2 {
            return schedule.clone();
        }
        for _ in 0..self.attempts {
            let i = rng.random_range(0..placed.len());
            let j = rng.random_range(0..placed.len() - 1);
            let j = if j >= i { j + 1 } else { j };
            let (a, b) = (placed[i], placed[j]);
            if a.section == b.section || (a.room == b.room && a.start == b.start) {
                continue;
            }
            let moved_a = StartAssignment::new(a.section, b.room, b.start);
            let moved_b = StartAssignment::new(b.section, a.room, a.start);
            let base = schedule
                .without_section(a.section)
                .without_section(b.section);
            if !rules.admits(&base, &moved_a) {
                continue;
            }
            let half = base.with_added(moved_a);
            if rules.admits(&half, &moved_b) {
                return half.with_added(moved_b);
            }
        }
        schedule.clone()
    }
}

/// Drops one random placement.
///
/// Removal introduces nothing, so it needs no validation and never retries.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemovePerturber;

impl Perturber for RemovePerturber {
    fn name(&self) -> &str {
        "Remove"
    }

    fn perturb(&self, schedule: &Schedule, _rules: &RuleSet, rng: &mut dyn RngCore) -> Schedule {
        let placed = schedule.assignments();
        if placed.is_empty() {
            return schedule.clone();
        }
        let victim = placed[rng.random_range(0..placed.len())];
        schedule.without_section(victim.section)
    }
}
