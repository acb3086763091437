use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use log::info;

use crate::block_store::{BlockStore, DirBlockStore};
use crate::error::{Result, TapeSortError};
use crate::latency::{LatencyConfig, LatencyModel};
use crate::sort::budget::MemoryBudget;
use crate::sort::merge::{KWayMerger, MergeStrategy};
use crate::sort::run::RunSet;
use crate::sort::run_generation::produce_runs;
use crate::stats::SortStats;
use crate::tape::{TapeReader, TapeWriter};

/// External sorter for integer tapes.
///
/// The latency config is copied into every invocation, so it stays fixed
/// for the whole sort.
#[derive(Clone, Copy, Debug, Default)]
pub struct TapeSorter {
    latency: LatencyConfig,
    strategy: MergeStrategy,
}

impl TapeSorter {
    pub fn new(latency: LatencyConfig) -> Self {
        Self {
            latency,
            strategy: MergeStrategy::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: MergeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn latency(&self) -> &LatencyConfig {
        &self.latency
    }

    pub fn strategy(&self) -> MergeStrategy {
        self.strategy
    }

    /// Sorts `input` into `output`, keeping runs in `store`.
    ///
    /// `input` holds an element count followed by that many integers;
    /// `output` receives the same integers in ascending order. Every run
    /// created in `store` is released before this returns, on success or
    /// failure.
    pub fn sort<R, W, S>(
        &self,
        max_memory_size: u64,
        input: R,
        output: W,
        store: &mut S,
    ) -> Result<SortStats>
    where
        R: BufRead,
        W: Write,
        S: BlockStore,
    {
        let sort_start = Instant::now();
        let latency = LatencyModel::new(self.latency);

        let mut input = TapeReader::new(input, &latency, "input tape");
        let number_of_elements = input.read_count()?;
        let budget = MemoryBudget::compute(max_memory_size, number_of_elements)?;
        info!(
            "Sorting {} elements with {} bytes: {} runs of up to {} elements",
            budget.number_of_elements,
            budget.max_memory_size,
            budget.run_count,
            budget.max_elements_per_run
        );

        let mut runs = RunSet::new(store);
        let run_gen_stats = produce_runs(&mut input, &budget, &mut runs, &latency)?;
        drop(input);

        let mut output = TapeWriter::new(output, &latency, "output tape");
        let merger = KWayMerger::open(&runs, &latency, self.strategy)?;
        let merge_stats = merger.merge_into(number_of_elements, &mut output)?;
        output.finish()?;
        runs.release_all()?;

        Ok(SortStats {
            budget,
            run_gen_stats,
            merge_stats,
            tape: latency.stats(),
            time_ms: sort_start.elapsed().as_millis(),
        })
    }

    /// Sorts the file at `input` into a new file at `output`, keeping runs
    /// in a private directory under `temp_dir` (the system temporary
    /// directory when `None`).
    pub fn sort_files(
        &self,
        max_memory_size: u64,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        temp_dir: Option<&Path>,
    ) -> Result<SortStats> {
        let input = input.as_ref();
        let output = output.as_ref();

        let input_file = File::open(input).map_err(TapeSortError::resource(format!(
            "input file {}",
            input.display()
        )))?;
        let output_file = File::create(output).map_err(TapeSortError::resource(format!(
            "output file {}",
            output.display()
        )))?;
        let mut store = match temp_dir {
            Some(dir) => DirBlockStore::new_in(dir)?,
            None => DirBlockStore::new()?,
        };

        self.sort(
            max_memory_size,
            BufReader::new(input_file),
            BufWriter::new(output_file),
            &mut store,
        )
    }
}
