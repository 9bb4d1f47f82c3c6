//! The program catalog and its builder.

use super::types::{
    PropertyId, Room, RoomId, RoomProperty, Section, SectionId, Teacher, TeacherId, TimeBlock,
    TimeBlockId,
};
use crate::error::ModelError;
use std::collections::BTreeSet;
use std::ops::Range;

/// Immutable catalog of everything that can be scheduled.
///
/// Entities are stored in tables and addressed by their typed ids.
/// A program is read-only once built; schedules share it through an
/// `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Program {
    properties: Vec<RoomProperty>,
    rooms: Vec<Room>,
    time_blocks: Vec<TimeBlock>,
    teachers: Vec<Teacher>,
    sections: Vec<Section>,
}

impl Program {
    /// Starts building a program.
    pub fn builder() -> ProgramBuilder {
        ProgramBuilder::default()
    }

    pub fn section(&self, id: SectionId) -> &Section {
        &self.sections[id.index()]
    }

    pub fn room(&self, id: RoomId) -> &Room {
        &self.rooms[id.index()]
    }

    pub fn time_block(&self, id: TimeBlockId) -> &TimeBlock {
        &self.time_blocks[id.index()]
    }

    pub fn property(&self, id: PropertyId) -> &RoomProperty {
        &self.properties[id.index()]
    }

    pub fn teacher(&self, id: TeacherId) -> &Teacher {
        &self.teachers[id.index()]
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn time_block_count(&self) -> usize {
        self.time_blocks.len()
    }

    pub fn section_ids(&self) -> impl Iterator<Item = SectionId> + '_ {
        (0..self.sections.len()).map(SectionId)
    }

    pub fn room_properties(&self, room: RoomId) -> &BTreeSet<PropertyId> {
        &self.room(room).properties
    }

    /// The room's properties that are marked binding.
    pub fn binding_properties(&self, room: RoomId) -> BTreeSet<PropertyId> {
        self.room(room)
            .properties
            .iter()
            .copied()
            .filter(|&p| self.property(p).binding)
            .collect()
    }

    pub fn room_requirements(&self, section: SectionId) -> &BTreeSet<PropertyId> {
        &self.section(section).required_properties
    }

    /// Block indices covered by a section of `duration` blocks starting at
    /// `start`.
    ///
    /// Returns `None` when the run leaves the block table or crosses into
    /// another day.
    pub fn occupied_blocks(&self, start: TimeBlockId, duration: usize) -> Option<Range<usize>> {
        if duration == 0 {
            return None;
        }
        let first = start.index();
        let end = first.checked_add(duration)?;
        if end > self.time_blocks.len() {
            return None;
        }
        let day = self.time_block(start).day;
        if self.time_blocks[first..end].iter().any(|b| b.day != day) {
            return None;
        }
        Some(first..end)
    }

    /// Checks every cross reference in the catalog.
    pub fn validate(&self) -> Result<(), ModelError> {
        for room in &self.rooms {
            if let Some(p) = room.properties.iter().find(|p| p.0 >= self.properties.len()) {
                return Err(ModelError::UnknownRoomProperty {
                    room: room.name.clone(),
                    property: p.0,
                });
            }
        }
        for section in &self.sections {
            if section.duration == 0 {
                return Err(ModelError::ZeroDuration {
                    section: section.name.clone(),
                });
            }
            if let Some(p) = section
                .required_properties
                .iter()
                .find(|p| p.0 >= self.properties.len())
            {
                return Err(ModelError::UnknownProperty {
                    section: section.name.clone(),
                    property: p.0,
                });
            }
            if let Some(t) = section.teachers.iter().find(|t| t.0 >= self.teachers.len()) {
                return Err(ModelError::UnknownTeacher {
                    section: section.name.clone(),
                    teacher: t.0,
                });
            }
            if let Some(b) = section
                .preferred_blocks
                .iter()
                .find(|b| b.0 >= self.time_blocks.len())
            {
                return Err(ModelError::UnknownPreferredBlock {
                    section: section.name.clone(),
                    block: b.0,
                });
            }
        }
        Ok(())
    }
}

/// Incrementally assembles a [`Program`], handing out ids as entities
/// are added.
///
/// # Examples
///
/// ```
/// use u_timetable::program::{Program, Room, Section, TimeBlock};
///
/// let mut builder = Program::builder();
/// let lab = builder.add_property("lab", true);
/// builder.add_room(Room::new("R101").with_property(lab));
/// builder.add_time_block(TimeBlock::new("Mon 9:00", 0));
/// builder.add_section(Section::new("Chemistry", 1).requiring(lab));
/// let program = builder.build().unwrap();
/// assert_eq!(program.section_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProgramBuilder {
    program: Program,
}

impl ProgramBuilder {
    pub fn add_property(&mut self, name: impl Into<String>, binding: bool) -> PropertyId {
        self.program.properties.push(RoomProperty {
            name: name.into(),
            binding,
        });
        PropertyId(self.program.properties.len() - 1)
    }

    pub fn add_room(&mut self, room: Room) -> RoomId {
        self.program.rooms.push(room);
        RoomId(self.program.rooms.len() - 1)
    }

    pub fn add_time_block(&mut self, block: TimeBlock) -> TimeBlockId {
        self.program.time_blocks.push(block);
        TimeBlockId(self.program.time_blocks.len() - 1)
    }

    pub fn add_teacher(&mut self, name: impl Into<String>) -> TeacherId {
        self.program.teachers.push(Teacher { name: name.into() });
        TeacherId(self.program.teachers.len() - 1)
    }

    pub fn add_section(&mut self, section: Section) -> SectionId {
        self.program.sections.push(section);
        SectionId(self.program.sections.len() - 1)
    }

    /// Validates the assembled catalog and freezes it.
    pub fn build(self) -> Result<Program, ModelError> {
        self.program.validate()?;
        Ok(self.program)
    }
}
