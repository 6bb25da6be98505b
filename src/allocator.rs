use log::{debug, info, trace, warn};
use std::time::Instant;

use crate::adjacency::{ConflictTable, Occupancy, blocked_batches};
use crate::capacity::{check_capacity, student_count, total_capacity, validate_rooms};
use crate::data::{AllocationOutcome, AllocationRequest, BatchId, RoomConfig, SeatAssignment};
use crate::error::AllocationError;
use crate::queues::BatchQueues;
use crate::registration::{normalize_exclusions, parse_ranges};
use crate::seat_order::seat_order;
use crate::zones::{RoomZones, SeatRule};

/// Seats every student of `request`, room by room and seat by seat.
///
/// Validation errors abort before any seat is assigned. Students that cannot be
/// placed because of zone or adjacency rules are reported in the outcome rather
/// than failing the run.
pub fn allocate(request: &AllocationRequest) -> Result<AllocationOutcome, AllocationError> {
    let start_time = Instant::now();

    validate_rooms(&request.rooms, &request.batches)?;
    let ranges = parse_ranges(&request.batches)?;
    let excluded = normalize_exclusions(&request.excluded_reg);

    let students = student_count(&ranges, &excluded);
    let capacity = total_capacity(&request.rooms);
    check_capacity(students, capacity)?;

    let mut queues = BatchQueues::build(&ranges, &excluded)?;
    let table = ConflictTable::new(&request.batches);

    info!(
        "Allocating {} students from {} batches across {} rooms ({} usable seats)...",
        students,
        request.batches.len(),
        request.rooms.len(),
        capacity
    );

    let mut assignments = Vec::with_capacity(students);
    for room in &request.rooms {
        let before = assignments.len();
        fill_room(room, &mut queues, &table, &mut assignments);
        debug!(
            "Room {:?}: seated {} students, {} still queued",
            room.name,
            assignments.len() - before,
            queues.remaining()
        );
    }

    let unseated = queues.into_remaining();
    let outcome = AllocationOutcome {
        assignments,
        unseated_count: unseated.len(),
        unseated,
    };

    let duration = start_time.elapsed();
    info!(
        "Allocation finished in {:.2?}: {} seated, {} unseated",
        duration,
        outcome.assignments.len(),
        outcome.unseated_count
    );
    if let Some(shortfall) = outcome.shortfall() {
        warn!("{shortfall}");
    }
    Ok(outcome)
}

/// Walks one room in fill order, pulling students from the queues.
fn fill_room(
    room: &RoomConfig,
    queues: &mut BatchQueues,
    table: &ConflictTable,
    assignments: &mut Vec<SeatAssignment>,
) {
    let zones = RoomZones::new(room);
    let mut occupancy = Occupancy::new();

    for seat in seat_order(room) {
        let blocked = blocked_batches(room, seat, &occupancy, table);

        let chosen: Option<BatchId> = match zones.rule(seat) {
            SeatRule::Zoned(batch) => {
                if !zones.zoned_seat_allows(batch, &blocked) {
                    warn!(
                        "Room {:?} seat {seat}: zone {batch} is blocked by a neighbour, seat left empty",
                        room.name
                    );
                    None
                } else {
                    Some(batch).filter(|b| queues.has_students(*b))
                }
            }
            SeatRule::Open => queues
                .ids()
                .find(|b| zones.open_seat_allows(*b, &blocked) && queues.has_students(*b)),
        };

        let Some(batch) = chosen else {
            trace!("Room {:?} seat {seat}: no eligible student", room.name);
            continue;
        };
        let Some(student_reg) = queues.pop(batch) else {
            continue;
        };

        trace!("Room {:?} seat {seat}: {student_reg} from {batch}", room.name);
        occupancy.insert(seat, batch);
        assignments.push(SeatAssignment {
            student_reg,
            room_name: room.name.clone(),
            seat_number: seat,
            row: seat.row,
            col: seat.col,
            batch,
        });
    }
}
