use itertools::iproduct;

use crate::data::{FillStrategy, RoomConfig, SeatCoord};

/// Every grid position of `room` in fill order, disabled seats included.
pub fn traversal(room: &RoomConfig) -> Vec<SeatCoord> {
    match room.fill_strategy {
        FillStrategy::Row => iproduct!(1..=room.rows, 1..=room.cols)
            .map(|(row, col)| SeatCoord::new(row, col))
            .collect(),
        FillStrategy::Col => iproduct!(1..=room.cols, 1..=room.rows)
            .map(|(col, row)| SeatCoord::new(row, col))
            .collect(),
    }
}

/// Usable seats of `room` in fill order.
pub fn seat_order(room: &RoomConfig) -> impl Iterator<Item = SeatCoord> + '_ {
    traversal(room)
        .into_iter()
        .filter(|seat| !room.is_disabled(*seat))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(room: &RoomConfig) -> Vec<String> {
        seat_order(room).map(|s| s.to_string()).collect()
    }

    #[test]
    fn row_major_by_default() {
        let room = RoomConfig::new("A", 2, 3);
        assert_eq!(labels(&room), ["1-1", "1-2", "1-3", "2-1", "2-2", "2-3"]);
    }

    #[test]
    fn column_major_walks_down_first() {
        let mut room = RoomConfig::new("A", 2, 3);
        room.fill_strategy = FillStrategy::Col;
        assert_eq!(labels(&room), ["1-1", "2-1", "1-2", "2-2", "1-3", "2-3"]);
    }

    #[test]
    fn disabled_seats_are_skipped_in_place() {
        let mut room = RoomConfig::new("A", 2, 2);
        room.disabled_seats.insert(SeatCoord::new(1, 2));
        assert_eq!(labels(&room), ["1-1", "2-1", "2-2"]);
    }
}
