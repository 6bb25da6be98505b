use thiserror::Error;

use crate::data::{BatchId, ExamId, SeatCoord};

/// Request-level failures. Any of these aborts the run before a single seat is assigned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// The stored request could not be parsed.
    #[error("invalid allocation request: {0}")]
    InvalidRequest(String),

    /// A batch bound has no trailing registration number, or the bounds disagree on prefix.
    #[error("malformed registration range for {batch}: {reason}")]
    MalformedBatchRange { batch: BatchId, reason: String },

    /// A batch range ends before it starts.
    #[error("registration range for {batch} is inverted: {start_reg} > {end_reg}")]
    InvertedBatchRange {
        batch: BatchId,
        start_reg: String,
        end_reg: String,
    },

    /// More students than usable seats across all rooms.
    #[error("capacity exceeded: {student_count} students for {capacity} seats")]
    CapacityExceeded { student_count: usize, capacity: usize },

    /// The same registration number is produced by two batches.
    #[error("registration {reg} appears in both {first} and {second}")]
    OverlappingBatches {
        reg: String,
        first: BatchId,
        second: BatchId,
    },

    /// Two rooms share a name.
    #[error("room {0:?} is listed more than once")]
    DuplicateRoom(String),

    /// A room's layout or zone map is inconsistent.
    #[error("invalid room {room:?}: {reason}")]
    InvalidRoom { room: String, reason: String },
}

impl AllocationError {
    pub(crate) fn invalid_room(room: &str, reason: impl Into<String>) -> Self {
        Self::InvalidRoom {
            room: room.to_string(),
            reason: reason.into(),
        }
    }
}

/// Failures of the seating store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("seat {seat} in room {room:?} assigned twice")]
    DuplicateSeat { room: String, seat: SeatCoord },

    #[error("student {0} assigned more than one seat")]
    DuplicateStudent(String),

    #[error("seating store lock poisoned")]
    Poisoned,
}

/// Failures of the exam seating flows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeatingError {
    #[error(transparent)]
    Allocation(#[from] AllocationError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{0} already has seating; edit it instead")]
    ExamAlreadySeated(ExamId),
}
