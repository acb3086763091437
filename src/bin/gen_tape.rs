use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use clap::Parser;
use env_logger::Env;
use log::info;
use rand::SeedableRng;
use rand::rngs::StdRng;

use tape_sort::fixtures::{shuffled_sequence, write_input_tape};

#[derive(Parser, Debug)]
#[command(name = "gen_tape", version, about = "Write a shuffled 0..COUNT input tape")]
struct Args {
    /// Number of elements
    count: i32,

    /// Output path
    output: PathBuf,

    /// RNG seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    if args.count < 0 {
        return Err("count must not be negative".into());
    }

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let values = shuffled_sequence(args.count, &mut rng);
    let out = BufWriter::new(File::create(&args.output)?);
    write_input_tape(out, &values)?;

    info!("Wrote {} elements to {}", values.len(), args.output.display());
    Ok(())
}
