use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::error::AllocationError;

/// Position of a batch within the request's batch list.
///
/// This index is the batch's identity for the whole allocation run; it is never
/// re-derived from the batch's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(pub usize);

impl BatchId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "batch#{}", self.0)
    }
}

/// Identifies an exam in the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExamId(pub u64);

impl fmt::Display for ExamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "exam#{}", self.0)
    }
}

/// A group of students sharing one contiguous registration range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    pub branch: String,
    pub year: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub start_reg: String,
    pub end_reg: String,
}

impl Batch {
    /// Branch normalized for comparison.
    pub fn branch_key(&self) -> String {
        self.branch.trim().to_uppercase()
    }

    /// Subject normalized for comparison, `None` when absent or blank.
    pub fn subject_key(&self) -> Option<String> {
        self.subject
            .as_deref()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
    }
}

/// A 1-based seat position, written `"r-c"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SeatCoord {
    pub row: u32,
    pub col: u32,
}

impl SeatCoord {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    pub fn within(&self, rows: u32, cols: u32) -> bool {
        (1..=rows).contains(&self.row) && (1..=cols).contains(&self.col)
    }
}

impl fmt::Display for SeatCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.row, self.col)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSeatError(pub String);

impl fmt::Display for ParseSeatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid seat label {:?}, expected \"row-col\"", self.0)
    }
}

impl std::error::Error for ParseSeatError {}

impl FromStr for SeatCoord {
    type Err = ParseSeatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseSeatError(s.to_string());
        let (row, col) = s.trim().split_once('-').ok_or_else(err)?;
        let row = row.trim().parse().map_err(|_| err())?;
        let col = col.trim().parse().map_err(|_| err())?;
        Ok(Self { row, col })
    }
}

impl TryFrom<String> for SeatCoord {
    type Error = ParseSeatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SeatCoord> for String {
    fn from(seat: SeatCoord) -> Self {
        seat.to_string()
    }
}

/// Order in which a room's seats are filled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FillStrategy {
    /// Row by row, left to right.
    #[default]
    Row,
    /// Column by column, front to back.
    Col,
}

/// Physical layout and seating rules of one exam room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomConfig {
    pub name: String,
    pub rows: u32,
    pub cols: u32,
    #[serde(default)]
    pub disabled_seats: BTreeSet<SeatCoord>,
    #[serde(default)]
    pub zone_config: HashMap<SeatCoord, BatchId>,
    #[serde(default)]
    pub fill_strategy: FillStrategy,
    #[serde(default)]
    pub prevent_adjacency: bool,
    #[serde(default)]
    pub aisle_interval: u32,
    #[serde(default)]
    pub strict_flow: bool,
}

impl RoomConfig {
    /// A plain room with every seat usable and no seating rules.
    pub fn new(name: impl Into<String>, rows: u32, cols: u32) -> Self {
        Self {
            name: name.into(),
            rows,
            cols,
            disabled_seats: BTreeSet::new(),
            zone_config: HashMap::new(),
            fill_strategy: FillStrategy::Row,
            prevent_adjacency: false,
            aisle_interval: 0,
            strict_flow: false,
        }
    }

    pub fn is_disabled(&self, seat: SeatCoord) -> bool {
        self.disabled_seats.contains(&seat)
    }
}

/// Everything the allocator needs for one exam.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub batches: Vec<Batch>,
    pub rooms: Vec<RoomConfig>,
    #[serde(default)]
    pub excluded_reg: BTreeSet<String>,
}

impl AllocationRequest {
    /// Parses a request from its stored JSON form.
    pub fn from_json(json: &str) -> Result<Self, AllocationError> {
        serde_json::from_str(json).map_err(|e| AllocationError::InvalidRequest(e.to_string()))
    }
}

/// A student placed in a seat.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeatAssignment {
    pub student_reg: String,
    pub room_name: String,
    pub seat_number: SeatCoord,
    pub row: u32,
    pub col: u32,
    pub batch: BatchId,
}

/// Students left without a seat after allocation. Reported as a warning only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatingShortfall {
    pub unseated_count: usize,
    pub total_students: usize,
}

impl fmt::Display for SeatingShortfall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Partial Seating] {} of {} students could not be seated because of zone or adjacency rules",
            self.unseated_count, self.total_students
        )
    }
}

/// The final output of the allocator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationOutcome {
    pub assignments: Vec<SeatAssignment>,
    pub unseated_count: usize,
    /// Registration numbers left in the queues, in batch order.
    pub unseated: Vec<String>,
}

impl AllocationOutcome {
    pub fn total_students(&self) -> usize {
        self.assignments.len() + self.unseated_count
    }

    pub fn shortfall(&self) -> Option<SeatingShortfall> {
        (self.unseated_count > 0).then(|| SeatingShortfall {
            unseated_count: self.unseated_count,
            total_students: self.total_students(),
        })
    }
}
