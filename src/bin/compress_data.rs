//! Batch dataset compressor.
//!
//! Usage: `compress_data [input.csv] [output.csv]`
//! Defaults match the shipped data layout.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use aadhaar_pulse::compress::Compressor;

const DEFAULT_INPUT: &str = "data/merged_data_clean.csv";
const DEFAULT_OUTPUT: &str = "data/merged_data_compressed.csv";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let input = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_INPUT.to_string()));
    let output = PathBuf::from(args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string()));

    let report = Compressor::run(&input, &output)
        .with_context(|| format!("compressing {} -> {}", input.display(), output.display()))?;

    println!("Original size: {:.2} MB", report.original_mb());
    println!("Compressed size: {:.2} MB", report.compressed_mb());
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
