use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use log::debug;

use crate::data::{ExamId, SeatAssignment};
use crate::error::StoreError;

/// Persistence for an exam's seat assignments.
pub trait SeatStore {
    /// Replaces all seating of `exam` in one step.
    ///
    /// On error the exam's previous seating must be left exactly as it was.
    fn replace_exam_seating(
        &self,
        exam: ExamId,
        assignments: Vec<SeatAssignment>,
    ) -> Result<(), StoreError>;

    fn exam_seating(&self, exam: ExamId) -> Result<Vec<SeatAssignment>, StoreError>;

    /// Removes the exam's seating, returning how many assignments were dropped.
    fn clear_exam(&self, exam: ExamId) -> Result<usize, StoreError>;

    fn has_seating(&self, exam: ExamId) -> Result<bool, StoreError> {
        Ok(!self.exam_seating(exam)?.is_empty())
    }
}

/// Checks the per-exam uniqueness of seats and students.
pub fn check_unique(assignments: &[SeatAssignment]) -> Result<(), StoreError> {
    let mut seats = HashSet::new();
    let mut students = HashSet::new();
    for a in assignments {
        if !seats.insert((a.room_name.as_str(), a.seat_number)) {
            return Err(StoreError::DuplicateSeat {
                room: a.room_name.clone(),
                seat: a.seat_number,
            });
        }
        if !students.insert(a.student_reg.as_str()) {
            return Err(StoreError::DuplicateStudent(a.student_reg.clone()));
        }
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct InMemorySeatStore {
    exams: Mutex<HashMap<ExamId, Vec<SeatAssignment>>>,
}

impl InMemorySeatStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SeatStore for InMemorySeatStore {
    fn replace_exam_seating(
        &self,
        exam: ExamId,
        assignments: Vec<SeatAssignment>,
    ) -> Result<(), StoreError> {
        check_unique(&assignments)?;
        let mut exams = self.exams.lock().map_err(|_| StoreError::Poisoned)?;
        let previous = exams.insert(exam, assignments).map_or(0, |old| old.len());
        debug!("{exam}: replaced {previous} stored seats");
        Ok(())
    }

    fn exam_seating(&self, exam: ExamId) -> Result<Vec<SeatAssignment>, StoreError> {
        let exams = self.exams.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(exams.get(&exam).cloned().unwrap_or_default())
    }

    fn clear_exam(&self, exam: ExamId) -> Result<usize, StoreError> {
        let mut exams = self.exams.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(exams.remove(&exam).map_or(0, |old| old.len()))
    }
}
