//! Proximity rules that keep related batches apart.
//!
//! Two batches conflict when they are the same batch, share a subject, or share
//! a branch (all compared trimmed and case-insensitive). A seat is blocked for
//! every batch conflicting with an already seated neighbour.

use std::collections::{BTreeSet, HashMap};

use itertools::Itertools;

use crate::data::{Batch, BatchId, RoomConfig, SeatCoord};

/// Seats filled so far in one room, with the batch that filled each.
pub type Occupancy = HashMap<SeatCoord, BatchId>;

/// Precomputed conflict sets, one per batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictTable {
    conflicts: Vec<BTreeSet<BatchId>>,
}

impl ConflictTable {
    pub fn new(batches: &[Batch]) -> Self {
        let by_branch: HashMap<String, Vec<BatchId>> = batches
            .iter()
            .enumerate()
            .map(|(i, b)| (b.branch_key(), BatchId(i)))
            .into_group_map();
        let by_subject: HashMap<String, Vec<BatchId>> = batches
            .iter()
            .enumerate()
            .filter_map(|(i, b)| b.subject_key().map(|s| (s, BatchId(i))))
            .into_group_map();

        let conflicts = batches
            .iter()
            .enumerate()
            .map(|(i, batch)| {
                let mut set = BTreeSet::from([BatchId(i)]);
                if let Some(peers) = by_branch.get(&batch.branch_key()) {
                    set.extend(peers.iter().copied());
                }
                if let Some(peers) = batch.subject_key().and_then(|s| by_subject.get(&s)) {
                    set.extend(peers.iter().copied());
                }
                set
            })
            .collect();
        Self { conflicts }
    }

    /// Batches that may not sit next to `batch`.
    pub fn conflicts_of(&self, batch: BatchId) -> impl Iterator<Item = BatchId> + '_ {
        self.conflicts
            .get(batch.index())
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }
}

/// Columns in the same row whose occupants count as neighbours of `seat`.
pub fn neighbour_columns(room: &RoomConfig, seat: SeatCoord) -> Vec<u32> {
    if seat.col <= 1 {
        return Vec::new();
    }
    let prev = seat.col - 1;
    match (room.aisle_interval, room.strict_flow) {
        (0, _) => vec![prev],
        (aisle, false) => {
            if prev % aisle == 0 {
                Vec::new()
            } else {
                vec![prev]
            }
        }
        (aisle, true) => {
            let bench_start = (seat.col - 1) / aisle * aisle + 1;
            (bench_start..seat.col).collect()
        }
    }
}

/// Batches forbidden at `seat` given what is already seated in the room.
///
/// Always empty when the room does not prevent adjacency.
pub fn blocked_batches(
    room: &RoomConfig,
    seat: SeatCoord,
    occupancy: &Occupancy,
    table: &ConflictTable,
) -> BTreeSet<BatchId> {
    if !room.prevent_adjacency {
        return BTreeSet::new();
    }
    neighbour_columns(room, seat)
        .into_iter()
        .filter_map(|col| occupancy.get(&SeatCoord::new(seat.row, col)))
        .flat_map(|neighbour| table.conflicts_of(*neighbour))
        .collect()
}
