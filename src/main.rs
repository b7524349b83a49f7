use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env, Target};
use log::info;

use rust_bed2vcf::{Config, Conversion};

/// Convert a BED-like table into a VCF file as described by a YAML config.
#[derive(Parser, Debug)]
#[command(name = "bed2vcf", version, about)]
struct Cli {
    /// YAML file describing how columns map to VCF fields
    #[arg(short, long)]
    config: PathBuf,

    /// Input table, optionally gzip compressed
    #[arg(short, long)]
    bed: PathBuf,

    /// Fasta index (or any name<TAB>length table) listing the contigs
    #[arg(short, long)]
    fai: PathBuf,

    /// Output file; defaults to standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Sample name; defaults to the input file name up to its first dot
    #[arg(short, long)]
    sample: Option<String>,

    /// The first line after the skipped ones names the columns
    #[arg(short = 'l', long)]
    header: bool,

    /// Number of leading lines to discard
    #[arg(short = 'k', long, default_value_t = 0)]
    skip: usize,
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Stderr)
        .init();
    let cli = Cli::parse();

    let config = Config::from_path(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;
    let vcf = Conversion::new(&cli.bed, &cli.fai)
        .sample(cli.sample.clone())
        .skip(cli.skip)
        .has_header(cli.header)
        .run(&config)
        .with_context(|| format!("failed to convert {}", cli.bed.display()))?;
    vcf.write_to(cli.output.as_deref())
        .context("failed to write output")?;

    match &cli.output {
        Some(path) => info!("wrote {} variants to {}", vcf.variants().len(), path.display()),
        None => info!("wrote {} variants", vcf.variants().len()),
    }
    Ok(())
}
