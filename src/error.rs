//! Error types for the timetable search.

use std::fmt;
use thiserror::Error;

/// The kind of catalog entity an identifier refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Group,
    Subgroup,
    Subject,
    Lecturer,
    Room,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Group => "group",
            EntityKind::Subgroup => "subgroup",
            EntityKind::Subject => "subject",
            EntityKind::Lecturer => "lecturer",
            EntityKind::Room => "room",
        };
        f.write_str(name)
    }
}

/// Errors raised by the timetable search.
///
/// Badly scored schedules are never errors; these variants cover malformed
/// input data and configuration only.
#[derive(Debug, Error)]
pub enum TimetableError {
    /// An id or index that does not exist in the catalogs.
    #[error("unknown {kind} reference: {id}")]
    UnknownEntity { kind: EntityKind, id: String },

    /// Two catalog entries of the same kind share an id.
    #[error("duplicate {kind} id: {id}")]
    DuplicateEntity { kind: EntityKind, id: String },

    /// A day or period outside the weekly grid.
    #[error("timeslot outside the weekly grid: day {day}, period {period}")]
    InvalidTimeSlot { day: u8, period: u8 },

    /// Event data that breaks an event invariant.
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    /// A configuration value outside of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Selection left nothing to evolve and no individual was ever scored.
    #[error("population is empty after selection")]
    EmptyPopulation,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl TimetableError {
    /// Shorthand for an unknown entity addressed by catalog index.
    pub fn unknown_index(kind: EntityKind, index: usize) -> Self {
        TimetableError::UnknownEntity {
            kind,
            id: format!("#{}", index),
        }
    }

    /// Shorthand for an unknown entity addressed by its string id.
    pub fn unknown_id(kind: EntityKind, id: &str) -> Self {
        TimetableError::UnknownEntity {
            kind,
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TimetableError>;
