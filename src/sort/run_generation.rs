use std::io::BufRead;
use std::time::Instant;

use log::{debug, info};

use crate::block_store::BlockStore;
use crate::error::{Result, TapeSortError};
use crate::latency::LatencyModel;
use crate::sort::budget::MemoryBudget;
use crate::sort::run::RunSet;
use crate::stats::{RunGenerationStats, RunInfo};
use crate::tape::{TapeReader, TapeWriter};

/// Upper bound on the elements reserved up front for a run buffer. The
/// declared count is not trusted until the elements have actually been read.
const INITIAL_RUN_CAPACITY: usize = 1 << 16;

/// Splits the input tape into `budget.run_count` sorted runs.
///
/// Runs are produced one at a time, in input order: load up to
/// `max_elements_per_run` elements, sort them in memory, store them as run
/// `0, 1, ...`. The reader must be positioned just after the count token.
pub fn produce_runs<R, S>(
    input: &mut TapeReader<'_, R>,
    budget: &MemoryBudget,
    runs: &mut RunSet<'_, S>,
    latency: &LatencyModel,
) -> Result<RunGenerationStats>
where
    R: BufRead,
    S: BlockStore,
{
    let run_generation_start = Instant::now();
    let mut stats = RunGenerationStats::default();
    let mut loaded: u64 = 0;

    for run in 0..budget.run_count {
        let load_start = Instant::now();
        let expected = budget.run_len(run);
        let mut buffer = Vec::with_capacity(
            usize::try_from(expected)
                .unwrap_or(usize::MAX)
                .min(INITIAL_RUN_CAPACITY),
        );
        while (buffer.len() as u64) < expected {
            match input.read_one()? {
                Some(value) => {
                    buffer.push(value);
                    loaded += 1;
                }
                None => {
                    return Err(TapeSortError::UnexpectedEndOfInput(format!(
                        "{} declares {} elements but holds only {}",
                        input.name(),
                        budget.number_of_elements,
                        loaded
                    )));
                }
            }
        }
        stats.load_time_ms += load_start.elapsed().as_millis();

        let sort_start = Instant::now();
        buffer.sort_unstable();
        stats.sort_time_ms += sort_start.elapsed().as_millis();

        let store_start = Instant::now();
        let sink = runs.create(run)?;
        let mut writer = TapeWriter::new(sink, latency, format!("sorted run {run}"));
        for &value in &buffer {
            writer.write_one(value)?;
        }
        let sink = writer.finish()?;
        runs.close(run, sink)?;
        stats.store_time_ms += store_start.elapsed().as_millis();

        if let (Some(&first), Some(&last)) = (buffer.first(), buffer.last()) {
            debug!("Run {run}: {} elements in [{first}, {last}]", buffer.len());
            stats.runs_info.push(RunInfo {
                id: run,
                entries: buffer.len(),
                first,
                last,
            });
        }
    }

    stats.num_runs = budget.run_count;
    stats.time_ms = run_generation_start.elapsed().as_millis();
    info!("Generated {} runs in {} ms", stats.num_runs, stats.time_ms);
    Ok(stats)
}
