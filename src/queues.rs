use std::collections::{BTreeSet, HashMap, VecDeque};

use log::trace;

use crate::data::BatchId;
use crate::error::AllocationError;
use crate::registration::RegRange;

/// One FIFO of registration numbers per batch, in ascending registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchQueues {
    queues: Vec<VecDeque<String>>,
}

impl BatchQueues {
    /// Expands every range into its queue, rejecting registrations produced by two batches.
    pub fn build(ranges: &[RegRange], excluded: &BTreeSet<String>) -> Result<Self, AllocationError> {
        let mut owner: HashMap<String, BatchId> = HashMap::new();
        let mut queues = Vec::with_capacity(ranges.len());
        for (i, range) in ranges.iter().enumerate() {
            let batch = BatchId(i);
            let regs = range.expand(excluded);
            for reg in &regs {
                if let Some(first) = owner.insert(reg.clone(), batch) {
                    return Err(AllocationError::OverlappingBatches {
                        reg: reg.clone(),
                        first,
                        second: batch,
                    });
                }
            }
            trace!("{batch} queued {} students", regs.len());
            queues.push(VecDeque::from(regs));
        }
        Ok(Self { queues })
    }

    pub fn batch_count(&self) -> usize {
        self.queues.len()
    }

    pub fn ids(&self) -> impl Iterator<Item = BatchId> + use<> {
        (0..self.queues.len()).map(BatchId)
    }

    pub fn has_students(&self, batch: BatchId) -> bool {
        self.queues.get(batch.index()).is_some_and(|q| !q.is_empty())
    }

    /// Takes the lowest unallocated registration from `batch`.
    pub fn pop(&mut self, batch: BatchId) -> Option<String> {
        self.queues.get_mut(batch.index())?.pop_front()
    }

    pub fn remaining(&self) -> usize {
        self.queues.iter().map(VecDeque::len).sum()
    }

    /// Registrations still queued, in batch order.
    pub fn into_remaining(self) -> Vec<String> {
        self.queues.into_iter().flatten().collect()
    }
}
