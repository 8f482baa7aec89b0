//! Writes the bundled sample datasets: `number` plus `modN = number % N`
//! columns for a fixed set of moduli.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(name = "generate_sample")]
#[command(about = "Generate the small and large sample datasets", long_about = None)]
struct Args {
    /// Output directory
    #[arg(long, default_value = "data")]
    out_dir: PathBuf,

    /// Rows in dataset_small.csv
    #[arg(long, default_value_t = 300)]
    small_rows: u64,

    /// Rows in dataset_large.csv
    #[arg(long, default_value_t = 50_000)]
    large_rows: u64,
}

#[derive(Debug, Serialize)]
struct SampleRow {
    number: u64,
    mod3: u64,
    mod4: u64,
    mod350: u64,
    mod8000: u64,
}

impl SampleRow {
    fn new(number: u64) -> Self {
        SampleRow {
            number,
            mod3: number % 3,
            mod4: number % 4,
            mod350: number % 350,
            mod8000: number % 8000,
        }
    }
}

fn write_dataset(path: &Path, rows: u64) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for number in 1..=rows {
        writer
            .serialize(SampleRow::new(number))
            .with_context(|| format!("writing row {number}"))?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;

    for (name, rows) in [
        ("dataset_small.csv", args.small_rows),
        ("dataset_large.csv", args.large_rows),
    ] {
        let path = args.out_dir.join(name);
        write_dataset(&path, rows)?;
        log::info!("Wrote {rows} rows to {}", path.display());
        println!("{}", path.display());
    }
    Ok(())
}
