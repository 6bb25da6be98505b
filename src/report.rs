//! Read-side helpers for chart and attendance renderers.

use std::collections::BTreeMap;

use itertools::Itertools;

use crate::data::{Batch, BatchId, RoomConfig, SeatAssignment};
use crate::registration::{RegRange, normalize_reg};

/// Maps registration numbers back to the batch they were drawn from.
///
/// Matches on prefix and numeric suffix within each batch's min/max; the first
/// matching batch wins. Batches with unparsable ranges never match.
#[derive(Debug, Clone)]
pub struct BatchResolver<'a> {
    batches: Vec<(&'a Batch, RegRange)>,
}

impl<'a> BatchResolver<'a> {
    pub fn new(batches: &'a [Batch]) -> Self {
        let batches = batches
            .iter()
            .enumerate()
            .filter_map(|(i, batch)| {
                RegRange::parse(BatchId(i), batch)
                    .ok()
                    .map(|range| (batch, range))
            })
            .collect();
        Self { batches }
    }

    pub fn resolve(&self, reg: &str) -> Option<&'a Batch> {
        let reg = normalize_reg(reg);
        self.batches
            .iter()
            .find(|(_, range)| range.numeric_match(&reg).is_some())
            .map(|(batch, _)| *batch)
    }
}

/// Registration numbers laid out on a room's grid, `grid[row-1][col-1]`.
pub fn room_grid<'a>(room: &RoomConfig, assignments: &'a [SeatAssignment]) -> Vec<Vec<Option<&'a str>>> {
    let mut grid = vec![vec![None; room.cols as usize]; room.rows as usize];
    for a in assignments.iter().filter(|a| a.room_name == room.name) {
        if let Some(cell) = grid
            .get_mut(a.row.wrapping_sub(1) as usize)
            .and_then(|r| r.get_mut(a.col.wrapping_sub(1) as usize))
        {
            *cell = Some(a.student_reg.as_str());
        }
    }
    grid
}

/// Assignments grouped by room, each room's seats sorted row then column.
pub fn seats_by_room(assignments: &[SeatAssignment]) -> BTreeMap<&str, Vec<&SeatAssignment>> {
    assignments
        .iter()
        .map(|a| (a.room_name.as_str(), a))
        .into_group_map()
        .into_iter()
        .map(|(room, mut seats)| {
            seats.sort_by_key(|a| a.seat_number);
            (room, seats)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::SeatCoord;

    fn batch(branch: &str, start: &str, end: &str) -> Batch {
        Batch {
            branch: branch.into(),
            year: "2".into(),
            subject: Some("Maths".into()),
            start_reg: start.into(),
            end_reg: end.into(),
        }
    }

    fn seat(room: &str, reg: &str, row: u32, col: u32) -> SeatAssignment {
        SeatAssignment {
            student_reg: reg.into(),
            room_name: room.into(),
            seat_number: SeatCoord::new(row, col),
            row,
            col,
            batch: BatchId(0),
        }
    }

    #[test]
    fn resolves_by_prefix_and_number() {
        let batches = [batch("CSE", "CSE001", "CSE050"), batch("ECE", "ECE001", "ECE030")];
        let resolver = BatchResolver::new(&batches);
        assert_eq!(resolver.resolve("ece012").map(|b| b.branch.as_str()), Some("ECE"));
        assert_eq!(resolver.resolve("CSE50").map(|b| b.branch.as_str()), Some("CSE"));
        assert!(resolver.resolve("CSE051").is_none());
        assert!(resolver.resolve("MECH").is_none());
    }

    #[test]
    fn grid_places_room_seats_only() {
        let room = RoomConfig::new("A", 2, 2);
        let seats = [seat("A", "CSE001", 1, 2), seat("B", "CSE002", 1, 1), seat("A", "CSE003", 2, 1)];
        let grid = room_grid(&room, &seats);
        assert_eq!(grid, vec![vec![None, Some("CSE001")], vec![Some("CSE003"), None]]);
    }

    #[test]
    fn groups_and_sorts_by_room() {
        let seats = [seat("B", "X1", 2, 1), seat("A", "X2", 1, 1), seat("B", "X3", 1, 2)];
        let grouped = seats_by_room(&seats);
        let b: Vec<_> = grouped["B"].iter().map(|a| a.student_reg.as_str()).collect();
        assert_eq!(b, ["X3", "X1"]);
        assert_eq!(grouped["A"].len(), 1);
    }
}
