//! The built-in placement rules.

use super::types::{ScheduleRule, Validator};
use crate::schedule::{Schedule, StartAssignment};
use std::ops::Range;

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

/// Rooms must offer what a section requires, and a section may only use a
/// room's binding properties if it asks for them.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomPropertyRule;

impl ScheduleRule for RoomPropertyRule {
    fn name(&self) -> &str {
        "RoomProperty"
    }

    fn validate(&self, validator: &mut Validator, schedule: &Schedule, candidate: &StartAssignment) {
        let program = schedule.program();
        let room_properties = program.room_properties(candidate.room);
        let requirements = program.room_requirements(candidate.section);
        validator.validate_local(
            room_properties.is_superset(requirements),
            candidate,
            "sections must be assigned to rooms with all the required properties",
        );
        let binding = program.binding_properties(candidate.room);
        validator.validate_local(
            requirements.is_superset(&binding),
            candidate,
            "sections must require the binding properties of their room",
        );
    }
}

/// A section may appear at most once in a schedule.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateSectionRule;

impl ScheduleRule for DuplicateSectionRule {
    fn name(&self) -> &str {
        "DuplicateSection"
    }

    fn validate(&self, validator: &mut Validator, schedule: &Schedule, candidate: &StartAssignment) {
        validator.validate_global(
            candidate,
            schedule
                .assignments()
                .iter()
                .filter(|a| a.section == candidate.section),
            "sections must not already be scheduled in the schedule",
        );
    }
}

/// A room hosts at most one section per time block.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomConflictRule;

impl ScheduleRule for RoomConflictRule {
    fn name(&self) -> &str {
        "RoomConflict"
    }

    fn validate(&self, validator: &mut Validator, schedule: &Schedule, candidate: &StartAssignment) {
        // Unplaceable candidates are BlockFitRule's to report.
        let Some(span) = schedule.occupied_blocks(candidate) else {
            return;
        };
        validator.validate_global(
            candidate,
            schedule.assignments().iter().filter(|a| {
                a.room == candidate.room
                    && schedule
                        .occupied_blocks(a)
                        .is_some_and(|other| overlaps(&span, &other))
            }),
            "rooms must not host two sections at once",
        );
    }
}

/// A teacher teaches at most one section per time block.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeacherConflictRule;

impl ScheduleRule for TeacherConflictRule {
    fn name(&self) -> &str {
        "TeacherConflict"
    }

    fn validate(&self, validator: &mut Validator, schedule: &Schedule, candidate: &StartAssignment) {
        let program = schedule.program();
        let teachers = &program.section(candidate.section).teachers;
        if teachers.is_empty() {
            return;
        }
        let Some(span) = schedule.occupied_blocks(candidate) else {
            return;
        };
        validator.validate_global(
            candidate,
            schedule.assignments().iter().filter(|a| {
                program
                    .section(a.section)
                    .teachers
                    .iter()
                    .any(|t| teachers.contains(t))
                    && schedule
                        .occupied_blocks(a)
                        .is_some_and(|other| overlaps(&span, &other))
            }),
            "teachers must not teach two sections at once",
        );
    }
}

/// A section's blocks must exist and lie on the day it starts.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockFitRule;

impl ScheduleRule for BlockFitRule {
    fn name(&self) -> &str {
        "BlockFit"
    }

    fn validate(&self, validator: &mut Validator, schedule: &Schedule, candidate: &StartAssignment) {
        validator.validate_local(
            schedule.occupied_blocks(candidate).is_some(),
            candidate,
            "sections must fit in consecutive blocks of a single day",
        );
    }
}

/// A room with a declared capacity must seat the whole class.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomCapacityRule;

impl ScheduleRule for RoomCapacityRule {
    fn name(&self) -> &str {
        "RoomCapacity"
    }

    fn validate(&self, validator: &mut Validator, schedule: &Schedule, candidate: &StartAssignment) {
        let program = schedule.program();
        let fits = program
            .room(candidate.room)
            .capacity
            .is_none_or(|cap| program.section(candidate.section).class_size <= cap);
        validator.validate_local(fits, candidate, "rooms must seat the whole class");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::ViolationKind;
    use crate::program::{
        Program, PropertyId, Room, RoomId, Section, SectionId, TimeBlock, TimeBlockId,
    };
    use proptest::prelude::*;
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn sa(s: usize, r: usize, t: usize) -> StartAssignment {
        StartAssignment::new(SectionId(s), RoomId(r), TimeBlockId(t))
    }

    fn check<R: ScheduleRule>(rule: &R, schedule: &Schedule, candidate: StartAssignment) -> Validator {
        let mut v = Validator::new();
        v.enter_rule(rule.name());
        rule.validate(&mut v, schedule, &candidate);
        v
    }

    /// Rooms 0..3: lab (binding), projector, lab+projector; one block.
    fn property_program() -> Arc<Program> {
        let mut b = Program::builder();
        let lab = b.add_property("lab", true);
        let proj = b.add_property("projector", false);
        b.add_room(Room::new("Lab").with_property(lab));
        b.add_room(Room::new("Projector").with_property(proj));
        b.add_room(Room::new("Both").with_property(lab).with_property(proj));
        b.add_time_block(TimeBlock::new("T", 0));
        b.add_section(Section::new("Chem", 1).requiring(lab));
        b.add_section(Section::new("Poetry", 1));
        b.add_section(Section::new("Film", 1).requiring(proj));
        Arc::new(b.build().unwrap())
    }

    #[test]
    fn test_room_property_required_and_binding() {
        let s = Schedule::new(property_program());
        let rule = RoomPropertyRule;
        assert!(check(&rule, &s, sa(0, 0, 0)).is_valid());
        // Chem needs a lab.
        assert!(!check(&rule, &s, sa(0, 1, 0)).is_valid());
        // Poetry would silently inherit the binding lab.
        assert!(!check(&rule, &s, sa(1, 0, 0)).is_valid());
        assert!(check(&rule, &s, sa(1, 1, 0)).is_valid());
        // Film gets a projector but not the binding lab.
        assert!(!check(&rule, &s, sa(2, 2, 0)).is_valid());
        assert!(check(&rule, &s, sa(2, 1, 0)).is_valid());
    }

    #[test]
    fn test_room_property_reports_both_clauses() {
        let mut b = Program::builder();
        let lab = b.add_property("lab", true);
        let kiln = b.add_property("kiln", false);
        b.add_room(Room::new("Lab").with_property(lab));
        b.add_time_block(TimeBlock::new("T", 0));
        b.add_section(Section::new("Pottery", 1).requiring(kiln));
        let s = Schedule::new(Arc::new(b.build().unwrap()));
        let v = check(&RoomPropertyRule, &s, sa(0, 0, 0));
        assert_eq!(v.violations().len(), 2);
        assert!(v.violations().iter().all(|x| x.kind == ViolationKind::Local));
        assert_eq!(v.violations()[0].rule, "RoomProperty");
    }

    #[test]
    fn test_duplicate_section_any_room_or_time() {
        let s = Schedule::new(property_program()).with_added(sa(1, 1, 0));
        let rule = DuplicateSectionRule;
        let v = check(&rule, &s, sa(1, 2, 0));
        assert!(!v.is_valid());
        assert_eq!(v.violations()[0].kind, ViolationKind::Global);
        assert_eq!(v.violations()[0].conflicts, vec![sa(1, 1, 0)]);
        assert!(check(&rule, &s, sa(2, 1, 0)).is_valid());
    }

    fn timed_program() -> Arc<Program> {
        let mut b = Program::builder();
        let ann = b.add_teacher("Ann");
        let bob = b.add_teacher("Bob");
        b.add_room(Room::new("R0").with_capacity(20));
        b.add_room(Room::new("R1"));
        for i in 0..3 {
            b.add_time_block(TimeBlock::new(format!("Mon {i}"), 0));
        }
        b.add_time_block(TimeBlock::new("Tue 0", 1));
        b.add_section(Section::new("Long", 2).taught_by(ann).with_class_size(30));
        b.add_section(Section::new("Short", 1).taught_by(ann));
        b.add_section(Section::new("Other", 1).taught_by(bob));
        Arc::new(b.build().unwrap())
    }

    #[test]
    fn test_room_conflict_respects_duration() {
        let s = Schedule::new(timed_program()).with_added(sa(0, 1, 0));
        let rule = RoomConflictRule;
        assert!(!check(&rule, &s, sa(2, 1, 1)).is_valid());
        assert!(check(&rule, &s, sa(2, 1, 2)).is_valid());
        assert!(check(&rule, &s, sa(2, 0, 1)).is_valid());
    }

    #[test]
    fn test_teacher_conflict() {
        let s = Schedule::new(timed_program()).with_added(sa(0, 1, 0));
        let rule = TeacherConflictRule;
        assert!(!check(&rule, &s, sa(1, 0, 1)).is_valid());
        assert!(check(&rule, &s, sa(1, 0, 2)).is_valid());
        assert!(check(&rule, &s, sa(2, 0, 1)).is_valid());
    }

    #[test]
    fn test_block_fit() {
        let s = Schedule::new(timed_program());
        let rule = BlockFitRule;
        assert!(check(&rule, &s, sa(0, 1, 1)).is_valid());
        assert!(!check(&rule, &s, sa(0, 1, 2)).is_valid());
        assert!(!check(&rule, &s, sa(0, 1, 3)).is_valid());
    }

    #[test]
    fn test_room_capacity() {
        let s = Schedule::new(timed_program());
        let rule = RoomCapacityRule;
        assert!(!check(&rule, &s, sa(0, 0, 0)).is_valid());
        assert!(check(&rule, &s, sa(0, 1, 0)).is_valid());
        assert!(check(&rule, &s, sa(1, 0, 0)).is_valid());
    }

    fn subset_program(room: &BTreeSet<usize>, binding: &BTreeSet<usize>, req: &BTreeSet<usize>) -> Arc<Program> {
        let mut b = Program::builder();
        for p in 0..4 {
            b.add_property(format!("p{p}"), binding.contains(&p));
        }
        let mut r = Room::new("R");
        for &p in room {
            r = r.with_property(PropertyId(p));
        }
        b.add_room(r);
        b.add_time_block(TimeBlock::new("T", 0));
        let mut sec = Section::new("S", 1);
        for &p in req {
            sec = sec.requiring(PropertyId(p));
        }
        b.add_section(sec);
        Arc::new(b.build().unwrap())
    }

    proptest! {
        #[test]
        fn prop_room_property_iff_both_clauses(
            room in proptest::collection::btree_set(0usize..4, 0..4),
            binding in proptest::collection::btree_set(0usize..4, 0..4),
            req in proptest::collection::btree_set(0usize..4, 0..4),
        ) {
            let s = Schedule::new(subset_program(&room, &binding, &req));
            let bound: BTreeSet<usize> = room.intersection(&binding).copied().collect();
            let expected = room.is_superset(&req) && req.is_superset(&bound);
            prop_assert_eq!(check(&RoomPropertyRule, &s, sa(0, 0, 0)).is_valid(), expected);
        }

        #[test]
        fn prop_duplicate_section_always_rejected(
            placed in proptest::collection::vec((0usize..3, 0usize..2, 0usize..4), 0..6),
            candidate in (0usize..3, 0usize..2, 0usize..4),
        ) {
            let mut s = Schedule::new(timed_program());
            for (sec, room, t) in placed {
                s = s.with_added(sa(sec, room, t));
            }
            let c = sa(candidate.0, candidate.1, candidate.2);
            let already = s.is_scheduled(c.section);
            prop_assert_eq!(check(&DuplicateSectionRule, &s, c).is_valid(), !already);
        }
    }
}
