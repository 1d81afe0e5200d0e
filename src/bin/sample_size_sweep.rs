//! Sample-size sweep over a fixed set of test populations.
//!
//! Prints, per population, the entropy and the average expected reward for each
//! sample size (powers of two up to 4096, 1000 trials each), followed by a
//! two-column table for curve fitting.
//!
//! Run with:
//!   cargo run --release --bin sample_size_sweep
//!
//! Set `SAMPLE_SURPRISE_SEED=<u64>` for a reproducible run and `RUST_LOG=debug`
//! for per-sample-size progress on stderr.

use std::io::{self, BufWriter, Write};

use sample_surprise::{write_report, Experiment, ExperimentConfig};
use tracing_subscriber::EnvFilter;

const SEED_VAR: &str = "SAMPLE_SURPRISE_SEED";

fn populations() -> Vec<Vec<char>> {
    vec![
        // Uniform over two symbols: entropy ln 2.
        vec!['a', 'b'],
        // Uniform over five symbols: entropy ln 5.
        vec!['a', 'b', 'c', 'd', 'e'],
        // Skewed, with a tail of rare symbols.
        vec!['a', 'a', 'a', 'a', 'a', 'a', 'a', 'b', 'c', 'd'],
        // Two common symbols, one rare.
        vec!['a', 'a', 'a', 'a', 'b', 'b', 'b', 'b', 'c'],
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let config = ExperimentConfig::new(populations());
    let mut experiment = Experiment::new(config);
    if let Ok(raw) = std::env::var(SEED_VAR) {
        let seed: u64 = raw
            .trim()
            .parse()
            .map_err(|e| format!("{SEED_VAR}={raw:?} is not a u64: {e}"))?;
        experiment = experiment.with_seed(seed);
    }

    #[cfg(feature = "parallel")]
    let results = experiment.run_parallel()?;
    #[cfg(not(feature = "parallel"))]
    let results = experiment.run()?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_report(&mut out, &results)?;
    out.flush()?;
    Ok(())
}
