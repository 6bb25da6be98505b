//! Exam seat allocation.
//!
//! Expands batch registration ranges into students and assigns each one a seat
//! across a list of rooms, honouring disabled seats, zone pinning, adjacency
//! rules and fill order. The engine is pure and deterministic; persistence and
//! reporting sit behind [`store::SeatStore`] and [`report`].

pub mod adjacency;
pub mod allocator;
pub mod capacity;
pub mod data;
pub mod error;
pub mod exam;
pub mod queues;
pub mod registration;
pub mod report;
pub mod seat_order;
pub mod store;
pub mod zones;

pub use allocator::allocate;
pub use data::{
    AllocationOutcome, AllocationRequest, Batch, BatchId, ExamId, FillStrategy, RoomConfig,
    SeatAssignment, SeatCoord, SeatingShortfall,
};
pub use error::{AllocationError, SeatingError, StoreError};
pub use exam::{SeatingService, SeatingSummary};
pub use store::{InMemorySeatStore, SeatStore};
