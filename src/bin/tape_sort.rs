use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use log::{error, info};

use tape_sort::{LatencyConfig, MergeStrategy, SortedOutputVerifier, TapeSortError, TapeSorter};

#[derive(Parser, Debug)]
#[command(
    name = "tape_sort",
    version,
    about = "Sort an integer tape under a memory ceiling and simulated tape latency"
)]
struct Args {
    /// Memory ceiling in kilobytes
    max_memory_kb: u64,

    /// Input tape: an element count followed by that many integers
    input: PathBuf,

    /// Output tape, written in ascending order
    output: PathBuf,

    /// JSON file with read_write_latency, rewind_latency and shift_latency in seconds
    latency_config: Option<PathBuf>,

    /// How the merge picks the next element (linear-scan or loser-tree)
    #[arg(long, default_value_t = MergeStrategy::LinearScan)]
    merge_strategy: MergeStrategy,

    /// Directory under which sorted runs are kept
    #[arg(long)]
    temp_dir: Option<PathBuf>,

    /// Verify the output after sorting
    #[arg(short, long)]
    verify: bool,

    /// Print sort statistics
    #[arg(long)]
    stats: bool,
}

fn run(args: &Args) -> Result<(), TapeSortError> {
    let max_memory_size = args.max_memory_kb.saturating_mul(1024);

    let latency = match &args.latency_config {
        Some(path) => LatencyConfig::from_path(path)?,
        None => LatencyConfig::default(),
    };

    let sorter = TapeSorter::new(latency).with_strategy(args.merge_strategy);
    let stats = sorter.sort_files(
        max_memory_size,
        &args.input,
        &args.output,
        args.temp_dir.as_deref(),
    )?;

    if args.verify {
        let output = File::open(&args.output).map_err(TapeSortError::resource(format!(
            "output file {}",
            args.output.display()
        )))?;
        let summary = SortedOutputVerifier::expecting(stats.budget.number_of_elements)
            .verify(BufReader::new(output))?;
        info!("Verification passed: {} elements", summary.count);
    }

    if args.stats {
        println!("{stats}");
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
