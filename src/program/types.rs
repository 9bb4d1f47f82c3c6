//! Program entities and their typed ids.

use std::collections::BTreeSet;
use std::fmt;

macro_rules! id_type {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub usize);

        impl $name {
            /// Position of the entity in its program table.
            pub fn index(self) -> usize {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Identifies a [`Section`].
    SectionId
);
id_type!(
    /// Identifies a [`Room`].
    RoomId
);
id_type!(
    /// Identifies a [`TimeBlock`]. Ids follow chronological order.
    TimeBlockId
);
id_type!(
    /// Identifies a [`RoomProperty`].
    PropertyId
);
id_type!(
    /// Identifies a [`Teacher`].
    TeacherId
);

/// A capability a room can offer, such as a lab bench or a piano.
///
/// A *binding* property may only be used by sections that explicitly
/// require it: a chemistry lab is not handed to a poetry seminar.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomProperty {
    pub name: String,
    pub binding: bool,
}

/// A physical room.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    pub name: String,
    /// Seats available. `None` means unbounded.
    pub capacity: Option<u32>,
    pub properties: BTreeSet<PropertyId>,
}

impl Room {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capacity: None,
            properties: BTreeSet::new(),
        }
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn with_property(mut self, property: PropertyId) -> Self {
        self.properties.insert(property);
        self
    }
}

/// One schedulable period. Consecutive blocks on the same day can be
/// chained by multi-block sections.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeBlock {
    pub label: String,
    pub day: u32,
}

impl TimeBlock {
    pub fn new(label: impl Into<String>, day: u32) -> Self {
        Self {
            label: label.into(),
            day,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Teacher {
    pub name: String,
}

/// A class meeting that needs a room and a start time.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Section {
    pub name: String,
    /// Number of consecutive time blocks the section occupies.
    pub duration: usize,
    pub required_properties: BTreeSet<PropertyId>,
    pub teachers: Vec<TeacherId>,
    /// Expected attendance, checked against room capacity.
    pub class_size: u32,
    /// Start blocks the teachers would like; empty means no preference.
    pub preferred_blocks: BTreeSet<TimeBlockId>,
}

impl Section {
    pub fn new(name: impl Into<String>, duration: usize) -> Self {
        Self {
            name: name.into(),
            duration,
            required_properties: BTreeSet::new(),
            teachers: Vec::new(),
            class_size: 0,
            preferred_blocks: BTreeSet::new(),
        }
    }

    pub fn requiring(mut self, property: PropertyId) -> Self {
        self.required_properties.insert(property);
        self
    }

    pub fn taught_by(mut self, teacher: TeacherId) -> Self {
        if !self.teachers.contains(&teacher) {
            self.teachers.push(teacher);
        }
        self
    }

    pub fn with_class_size(mut self, size: u32) -> Self {
        self.class_size = size;
        self
    }

    pub fn preferring(mut self, block: TimeBlockId) -> Self {
        self.preferred_blocks.insert(block);
        self
    }
}
