use crate::block_store::RunId;
use crate::error::{Result, TapeSortError};
use crate::Element;

/// Bytes one element occupies on tape.
pub const ELEMENT_SIZE: u64 = std::mem::size_of::<Element>() as u64;

/// How a sort invocation splits its input into runs.
///
/// Each run holds at most `max_elements_per_run` elements. The merge phase
/// keeps one cached element per run, so the run count itself must also fit
/// in `max_elements_per_run` slots.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryBudget {
    pub max_memory_size: u64,
    pub number_of_elements: u64,
    pub elements_memory_size: u64,
    pub run_count: usize,
    pub max_elements_per_run: u64,
}

impl MemoryBudget {
    pub fn compute(max_memory_size: u64, number_of_elements: u64) -> Result<Self> {
        let insufficient = || TapeSortError::MemoryInsufficient {
            max_memory_size,
            number_of_elements,
        };

        let max_elements_per_run = max_memory_size / ELEMENT_SIZE;
        if max_elements_per_run == 0 {
            return Err(insufficient());
        }
        let elements_memory_size = number_of_elements
            .checked_mul(ELEMENT_SIZE)
            .ok_or_else(insufficient)?;

        let run_count = number_of_elements.div_ceil(max_elements_per_run);
        if run_count > max_elements_per_run {
            return Err(insufficient());
        }
        let run_count = usize::try_from(run_count).map_err(|_| insufficient())?;

        Ok(Self {
            max_memory_size,
            number_of_elements,
            elements_memory_size,
            run_count,
            max_elements_per_run,
        })
    }

    /// Number of elements that go into `run`. Every run is full except
    /// possibly the last.
    pub fn run_len(&self, run: RunId) -> u64 {
        let start = (run as u64).saturating_mul(self.max_elements_per_run);
        self.number_of_elements
            .saturating_sub(start)
            .min(self.max_elements_per_run)
    }
}
