use log::{info, warn};
use serde::Serialize;

use crate::allocator::allocate;
use crate::data::{AllocationRequest, ExamId, SeatingShortfall};
use crate::error::SeatingError;
use crate::store::SeatStore;

/// Result of seating an exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatingSummary {
    pub exam: ExamId,
    pub seated: usize,
    pub unseated_count: usize,
    pub shortfall: Option<SeatingShortfall>,
}

/// Runs allocations for exams and persists the results.
#[derive(Debug)]
pub struct SeatingService<S> {
    store: S,
}

impl<S: SeatStore> SeatingService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Seats a new exam. Fails if the exam already has seating.
    pub fn create_exam_seating(
        &self,
        exam: ExamId,
        request: &AllocationRequest,
    ) -> Result<SeatingSummary, SeatingError> {
        if self.store.has_seating(exam)? {
            return Err(SeatingError::ExamAlreadySeated(exam));
        }
        self.seat(exam, request)
    }

    /// Regenerates an exam's seating from scratch, replacing whatever was stored.
    ///
    /// A request that fails validation leaves the stored seating untouched.
    pub fn edit_exam_seating(
        &self,
        exam: ExamId,
        request: &AllocationRequest,
    ) -> Result<SeatingSummary, SeatingError> {
        self.seat(exam, request)
    }

    fn seat(&self, exam: ExamId, request: &AllocationRequest) -> Result<SeatingSummary, SeatingError> {
        let outcome = allocate(request)?;
        let shortfall = outcome.shortfall();
        let summary = SeatingSummary {
            exam,
            seated: outcome.assignments.len(),
            unseated_count: outcome.unseated_count,
            shortfall: shortfall.clone(),
        };

        self.store.replace_exam_seating(exam, outcome.assignments)?;

        info!("{exam}: stored {} seat assignments", summary.seated);
        if let Some(shortfall) = shortfall {
            warn!("{exam}: {shortfall}");
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Batch, RoomConfig};
    use crate::error::AllocationError;
    use crate::store::InMemorySeatStore;

    fn request(end_reg: &str, rows: u32) -> AllocationRequest {
        AllocationRequest {
            batches: vec![Batch {
                branch: "CSE".into(),
                year: "1".into(),
                subject: None,
                start_reg: "CSE001".into(),
                end_reg: end_reg.into(),
            }],
            rooms: vec![RoomConfig::new("Hall", rows, 2)],
            excluded_reg: Default::default(),
        }
    }

    #[test]
    fn create_then_edit_replaces_seating() {
        let service = SeatingService::new(InMemorySeatStore::new());
        let created = service.create_exam_seating(ExamId(7), &request("CSE004", 2)).unwrap();
        assert_eq!(created.seated, 4);

        assert_eq!(
            service.create_exam_seating(ExamId(7), &request("CSE002", 2)),
            Err(SeatingError::ExamAlreadySeated(ExamId(7)))
        );

        let edited = service.edit_exam_seating(ExamId(7), &request("CSE002", 2)).unwrap();
        assert_eq!(edited.seated, 2);
        assert_eq!(service.store().exam_seating(ExamId(7)).unwrap().len(), 2);
    }

    #[test]
    fn failed_edit_keeps_stored_seating() {
        let service = SeatingService::new(InMemorySeatStore::new());
        service.create_exam_seating(ExamId(1), &request("CSE004", 2)).unwrap();

        let err = service.edit_exam_seating(ExamId(1), &request("CSE009", 2)).unwrap_err();
        assert_eq!(
            err,
            SeatingError::Allocation(AllocationError::CapacityExceeded {
                student_count: 9,
                capacity: 4
            })
        );
        assert_eq!(service.store().exam_seating(ExamId(1)).unwrap().len(), 4);
    }
}
