//! Schedules and start assignments.
//!
//! A [`Schedule`] is never mutated once created. Every move the search
//! makes produces a fresh schedule derived from its parent, so snapshots
//! can be handed to parallel trajectories without locking.

use crate::error::ModelError;
use crate::program::{Program, RoomId, SectionId, TimeBlockId};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// One concrete placement of a section into a room at a start block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StartAssignment {
    pub section: SectionId,
    pub room: RoomId,
    pub start: TimeBlockId,
}

impl StartAssignment {
    pub fn new(section: SectionId, room: RoomId, start: TimeBlockId) -> Self {
        Self {
            section,
            room,
            start,
        }
    }
}

impl fmt::Display for StartAssignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "section {} in room {} at block {}",
            self.section, self.room, self.start
        )
    }
}

/// A set of start assignments for one program.
///
/// That a section is placed at most once is a rule
/// ([`DuplicateSectionRule`](crate::logic::DuplicateSectionRule)), not a
/// structural guarantee.
#[derive(Debug, Clone)]
pub struct Schedule {
    program: Arc<Program>,
    assignments: Vec<StartAssignment>,
}

impl Schedule {
    /// An empty schedule.
    pub fn new(program: Arc<Program>) -> Self {
        Self {
            program,
            assignments: Vec::new(),
        }
    }

    /// Builds a schedule from existing placements, checking that every id
    /// exists in `program`.
    pub fn from_assignments<I>(program: Arc<Program>, assignments: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = StartAssignment>,
    {
        let schedule = Self {
            program,
            assignments: assignments.into_iter().collect(),
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Checks that every placement refers to a section, room and time
    /// block of the schedule's program.
    pub fn validate(&self) -> Result<(), ModelError> {
        let program = &self.program;
        for a in &self.assignments {
            if a.section.index() >= program.section_count() {
                return Err(ModelError::UnknownSection(a.section.index()));
            }
            if a.room.index() >= program.room_count() {
                return Err(ModelError::UnknownRoom(a.room.index()));
            }
            if a.start.index() >= program.time_block_count() {
                return Err(ModelError::UnknownTimeBlock(a.start.index()));
            }
        }
        Ok(())
    }

    pub fn program(&self) -> &Arc<Program> {
        &self.program
    }

    pub fn assignments(&self) -> &[StartAssignment] {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn is_scheduled(&self, section: SectionId) -> bool {
        self.assignments.iter().any(|a| a.section == section)
    }

    /// The first placement of `section`, if any.
    pub fn assignment_for(&self, section: SectionId) -> Option<&StartAssignment> {
        self.assignments.iter().find(|a| a.section == section)
    }

    pub fn scheduled_sections(&self) -> BTreeSet<SectionId> {
        self.assignments.iter().map(|a| a.section).collect()
    }

    /// Sections of the program with no placement, in id order.
    pub fn unscheduled_sections(&self) -> Vec<SectionId> {
        let scheduled = self.scheduled_sections();
        self.program
            .section_ids()
            .filter(|s| !scheduled.contains(s))
            .collect()
    }

    /// Total time blocks of instruction across distinct scheduled sections.
    pub fn class_hours(&self) -> usize {
        self.scheduled_sections()
            .into_iter()
            .map(|s| self.program.section(s).duration)
            .sum()
    }

    /// Block indices `assignment` would occupy, or `None` if it does not fit.
    pub fn occupied_blocks(&self, assignment: &StartAssignment) -> Option<Range<usize>> {
        let duration = self.program.section(assignment.section).duration;
        self.program.occupied_blocks(assignment.start, duration)
    }

    /// A new schedule with `assignment` appended.
    pub fn with_added(&self, assignment: StartAssignment) -> Schedule {
        let mut assignments = Vec::with_capacity(self.assignments.len() + 1);
        assignments.extend_from_slice(&self.assignments);
        assignments.push(assignment);
        Schedule {
            program: Arc::clone(&self.program),
            assignments,
        }
    }

    /// A new schedule with every placement of `section` removed.
    pub fn without_section(&self, section: SectionId) -> Schedule {
        Schedule {
            program: Arc::clone(&self.program),
            assignments: self
                .assignments
                .iter()
                .filter(|a| a.section != section)
                .copied()
                .collect(),
        }
    }

    /// A new schedule where `replacement` takes the place of whatever
    /// placement its section had.
    pub fn with_replaced(&self, replacement: StartAssignment) -> Schedule {
        self.without_section(replacement.section)
            .with_added(replacement)
    }
}

impl PartialEq for Schedule {
    /// Equal when built for equal programs with the same placements in the
    /// same order.
    fn eq(&self, other: &Self) -> bool {
        (Arc::ptr_eq(&self.program, &other.program) || self.program == other.program)
            && self.assignments == other.assignments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::program::{Room, Section, TimeBlock};

    fn program() -> Arc<Program> {
        let mut b = Program::builder();
        b.add_room(Room::new("R0"));
        b.add_room(Room::new("R1"));
        b.add_time_block(TimeBlock::new("T0", 0));
        b.add_time_block(TimeBlock::new("T1", 0));
        b.add_section(Section::new("A", 1));
        b.add_section(Section::new("B", 2));
        Arc::new(b.build().unwrap())
    }

    fn sa(s: usize, r: usize, t: usize) -> StartAssignment {
        StartAssignment::new(SectionId(s), RoomId(r), TimeBlockId(t))
    }

    #[test]
    fn test_derived_schedules_leave_parent_untouched() {
        let parent = Schedule::new(program());
        let child = parent.with_added(sa(0, 0, 0));
        assert!(parent.is_empty());
        assert_eq!(child.len(), 1);

        let moved = child.with_replaced(sa(0, 1, 1));
        assert_eq!(child.assignments(), &[sa(0, 0, 0)]);
        assert_eq!(moved.assignments(), &[sa(0, 1, 1)]);

        let removed = moved.without_section(SectionId(0));
        assert!(removed.is_empty());
        assert_eq!(moved.len(), 1);
    }

    #[test]
    fn test_from_assignments_checks_ids() {
        let p = program();
        assert!(Schedule::from_assignments(p.clone(), vec![sa(0, 0, 0)]).is_ok());
        assert_eq!(
            Schedule::from_assignments(p.clone(), vec![sa(5, 0, 0)]),
            Err(ModelError::UnknownSection(5))
        );
        assert_eq!(
            Schedule::from_assignments(p.clone(), vec![sa(0, 9, 0)]),
            Err(ModelError::UnknownRoom(9))
        );
        assert_eq!(
            Schedule::from_assignments(p, vec![sa(0, 0, 4)]),
            Err(ModelError::UnknownTimeBlock(4))
        );
    }

    #[test]
    fn test_validate_catches_unchecked_additions() {
        let s = Schedule::new(program()).with_added(sa(1, 1, 1));
        assert_eq!(s.validate(), Ok(()));
        assert_eq!(
            s.with_added(sa(7, 0, 0)).validate(),
            Err(ModelError::UnknownSection(7))
        );
        assert_eq!(
            s.with_added(sa(0, 0, 2)).validate(),
            Err(ModelError::UnknownTimeBlock(2))
        );
    }

    #[test]
    fn test_stats() {
        let s = Schedule::new(program()).with_added(sa(1, 0, 0));
        assert_eq!(s.class_hours(), 2);
        assert_eq!(s.unscheduled_sections(), vec![SectionId(0)]);
        assert!(s.is_scheduled(SectionId(1)));
        assert_eq!(s.assignment_for(SectionId(1)), Some(&sa(1, 0, 0)));
        assert_eq!(s.occupied_blocks(&sa(1, 0, 0)), Some(0..2));
        assert_eq!(s.occupied_blocks(&sa(1, 0, 1)), None);
    }
}
