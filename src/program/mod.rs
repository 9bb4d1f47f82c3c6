//! Program model.
//!
//! The read-only catalog a schedule is built against: sections, rooms,
//! time blocks, room properties and teachers. Nothing in the search ever
//! mutates a program.

mod model;
mod types;

pub use model::{Program, ProgramBuilder};
pub use types::{
    PropertyId, Room, RoomId, RoomProperty, Section, SectionId, Teacher, TeacherId, TimeBlock,
    TimeBlockId,
};
