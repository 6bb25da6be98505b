use std::collections::{BTreeSet, HashMap};

use crate::data::{BatchId, RoomConfig, SeatCoord};

/// What a seat accepts, as far as zoning goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatRule {
    /// Pinned to one batch; left empty if that batch cannot take it.
    Zoned(BatchId),
    /// Any batch not restricted to a zone in this room.
    Open,
}

/// Zone pinning of one room, with its restricted batches derived once.
#[derive(Debug, Clone)]
pub struct RoomZones<'a> {
    zones: &'a HashMap<SeatCoord, BatchId>,
    restricted: BTreeSet<BatchId>,
}

impl<'a> RoomZones<'a> {
    pub fn new(room: &'a RoomConfig) -> Self {
        Self {
            zones: &room.zone_config,
            restricted: room.zone_config.values().copied().collect(),
        }
    }

    pub fn rule(&self, seat: SeatCoord) -> SeatRule {
        match self.zones.get(&seat) {
            Some(batch) => SeatRule::Zoned(*batch),
            None => SeatRule::Open,
        }
    }

    /// Batches that only ever fill their own zone seats in this room.
    pub fn restricted(&self) -> &BTreeSet<BatchId> {
        &self.restricted
    }

    /// Whether `batch` may be drawn for an open seat with the given adjacency blocks.
    pub fn open_seat_allows(&self, batch: BatchId, blocked: &BTreeSet<BatchId>) -> bool {
        !self.restricted.contains(&batch) && !blocked.contains(&batch)
    }

    /// Whether a seat zoned to `batch` may take it, given adjacency blocks.
    ///
    /// A blocked zone batch forfeits the seat; no other batch is tried.
    pub fn zoned_seat_allows(&self, batch: BatchId, blocked: &BTreeSet<BatchId>) -> bool {
        !blocked.contains(&batch)
    }
}
