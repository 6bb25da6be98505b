use std::collections::{BTreeSet, HashSet};

use crate::data::{Batch, RoomConfig};
use crate::error::AllocationError;
use crate::registration::RegRange;

/// Usable seats in one room: the grid minus its disabled seats.
pub fn room_capacity(room: &RoomConfig) -> usize {
    let grid = room.rows as usize * room.cols as usize;
    let disabled = room
        .disabled_seats
        .iter()
        .filter(|seat| seat.within(room.rows, room.cols))
        .count();
    grid.saturating_sub(disabled)
}

pub fn total_capacity(rooms: &[RoomConfig]) -> usize {
    rooms.iter().map(room_capacity).sum()
}

/// Post-exclusion student count, computed from the ranges without expanding them.
pub fn student_count(ranges: &[RegRange], excluded: &BTreeSet<String>) -> usize {
    ranges
        .iter()
        .map(|range| range.student_count(excluded))
        .fold(0usize, usize::saturating_add)
}

/// Fails with `CapacityExceeded` when the students cannot all fit.
pub fn check_capacity(student_count: usize, capacity: usize) -> Result<(), AllocationError> {
    if student_count > capacity {
        return Err(AllocationError::CapacityExceeded {
            student_count,
            capacity,
        });
    }
    Ok(())
}

/// Structural checks on the room list that must hold before seats are counted.
pub fn validate_rooms(rooms: &[RoomConfig], batches: &[Batch]) -> Result<(), AllocationError> {
    let mut names = HashSet::new();
    for room in rooms {
        if !names.insert(room.name.trim().to_lowercase()) {
            return Err(AllocationError::DuplicateRoom(room.name.clone()));
        }
        if room.rows == 0 || room.cols == 0 {
            return Err(AllocationError::invalid_room(
                &room.name,
                format!("grid {}x{} has no seats", room.rows, room.cols),
            ));
        }
        if let Some(seat) = room
            .disabled_seats
            .iter()
            .find(|seat| !seat.within(room.rows, room.cols))
        {
            return Err(AllocationError::invalid_room(
                &room.name,
                format!("disabled seat {seat} is outside the grid"),
            ));
        }
        for (seat, batch) in &room.zone_config {
            if !seat.within(room.rows, room.cols) {
                return Err(AllocationError::invalid_room(
                    &room.name,
                    format!("zone seat {seat} is outside the grid"),
                ));
            }
            if room.is_disabled(*seat) {
                return Err(AllocationError::invalid_room(
                    &room.name,
                    format!("zone seat {seat} is disabled"),
                ));
            }
            if batch.index() >= batches.len() {
                return Err(AllocationError::invalid_room(
                    &room.name,
                    format!("zone seat {seat} names unknown {batch}"),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{BatchId, SeatCoord};

    #[test]
    fn disabled_seats_reduce_capacity() {
        let mut room = RoomConfig::new("A", 4, 5);
        room.disabled_seats.insert(SeatCoord::new(1, 1));
        room.disabled_seats.insert(SeatCoord::new(4, 5));
        assert_eq!(room_capacity(&room), 18);
        assert_eq!(total_capacity(&[room, RoomConfig::new("B", 2, 2)]), 22);
    }

    #[test]
    fn capacity_check_carries_both_counts() {
        assert!(check_capacity(5, 5).is_ok());
        assert_eq!(
            check_capacity(6, 5),
            Err(AllocationError::CapacityExceeded {
                student_count: 6,
                capacity: 5
            })
        );
    }

    #[test]
    fn rejects_zone_on_disabled_seat() {
        let mut room = RoomConfig::new("A", 2, 2);
        room.disabled_seats.insert(SeatCoord::new(1, 2));
        room.zone_config.insert(SeatCoord::new(1, 2), BatchId(0));
        let err = validate_rooms(&[room], &[]).unwrap_err();
        assert!(matches!(err, AllocationError::InvalidRoom { .. }));
    }

    #[test]
    fn rejects_duplicate_and_empty_rooms() {
        let rooms = [RoomConfig::new("A", 1, 1), RoomConfig::new(" a", 1, 1)];
        assert_eq!(
            validate_rooms(&rooms, &[]),
            Err(AllocationError::DuplicateRoom(" a".into()))
        );
        assert!(validate_rooms(&[RoomConfig::new("A", 0, 3)], &[]).is_err());
    }
}
