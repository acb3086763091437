use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::block_store::RunId;
use crate::sort::budget::MemoryBudget;
use crate::sort::merge::MergeStrategy;
use crate::Element;

/// Counters for simulated tape accesses.
///
/// Cloning shares the counters, so a tracker can be handed to several readers
/// and writers of the same sort invocation.
#[derive(Clone, Debug, Default)]
pub struct TapeStatsTracker {
    inner: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    reads: AtomicU64,
    writes: AtomicU64,
    shifts: AtomicU64,
    rewinds: AtomicU64,
    delay_ns: AtomicU64,
}

impl TapeStatsTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_read(&self) {
        self.inner.reads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write(&self) {
        self.inner.writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_shift(&self) {
        self.inner.shifts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rewind(&self) {
        self.inner.rewinds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_delay(&self, delay: Duration) {
        let ns = u64::try_from(delay.as_nanos()).unwrap_or(u64::MAX);
        self.inner.delay_ns.fetch_add(ns, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> TapeStats {
        TapeStats {
            reads: self.inner.reads.load(Ordering::Relaxed),
            writes: self.inner.writes.load(Ordering::Relaxed),
            shifts: self.inner.shifts.load(Ordering::Relaxed),
            rewinds: self.inner.rewinds.load(Ordering::Relaxed),
            simulated_delay: Duration::from_nanos(self.inner.delay_ns.load(Ordering::Relaxed)),
        }
    }
}

/// Point-in-time copy of a [`TapeStatsTracker`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TapeStats {
    pub reads: u64,
    pub writes: u64,
    pub shifts: u64,
    pub rewinds: u64,
    pub simulated_delay: Duration,
}

impl fmt::Display for TapeStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "reads={}, writes={}, shifts={}, rewinds={}, simulated_delay={:?}",
            self.reads, self.writes, self.shifts, self.rewinds, self.simulated_delay
        )
    }
}

/// Information about a single run
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunInfo {
    pub id: RunId,
    pub entries: usize,
    pub first: Element,
    pub last: Element,
}

impl fmt::Display for RunInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "run={}, entries={}, range=[{}, {}]",
            self.id, self.entries, self.first, self.last
        )
    }
}

/// Statistics from the run generation phase
#[derive(Clone, Debug, Default)]
pub struct RunGenerationStats {
    pub num_runs: usize,
    pub runs_info: Vec<RunInfo>,
    pub time_ms: u128,
    pub load_time_ms: u128,
    pub sort_time_ms: u128,
    pub store_time_ms: u128,
}

/// Statistics from the merge phase
#[derive(Clone, Debug)]
pub struct MergeStats {
    pub fan_in: usize,
    pub strategy: MergeStrategy,
    pub elements: u64,
    pub time_ms: u128,
}

/// Statistics about a sort invocation
#[derive(Clone, Debug)]
pub struct SortStats {
    pub budget: MemoryBudget,
    pub run_gen_stats: RunGenerationStats,
    pub merge_stats: MergeStats,
    pub tape: TapeStats,
    pub time_ms: u128,
}

impl fmt::Display for SortStats {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "SortStats:")?;
        let b = &self.budget;
        writeln!(
            f,
            "  Budget: {} elements, {} bytes ceiling, {} per run",
            b.number_of_elements, b.max_memory_size, b.max_elements_per_run
        )?;
        let rg = &self.run_gen_stats;
        writeln!(f, "  Number of runs: {}", rg.num_runs)?;
        writeln!(f, "  (R) time: {} ms", rg.time_ms)?;
        writeln!(
            f,
            "  (R) breakdown: load={} ms, sort={} ms, store={} ms",
            rg.load_time_ms, rg.sort_time_ms, rg.store_time_ms
        )?;
        if rg.runs_info.len() <= 16 {
            for info in &rg.runs_info {
                writeln!(f, "    {}", info)?;
            }
        }

        let m = &self.merge_stats;
        writeln!(f, "  (M) time: {} ms", m.time_ms)?;
        writeln!(
            f,
            "  (M) fan-in: {}, strategy: {}, elements: {}",
            m.fan_in, m.strategy, m.elements
        )?;
        writeln!(f, "  Tape: {}", self.tape)?;
        write!(f, "  Total time: {} ms", self.time_ms)
    }
}
