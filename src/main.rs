use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use charge_pipeline::logging::init_logging;
use charge_pipeline::{
    aggregate, extract, ingest_file, render_line, transform, DocumentStore, MemoryStore,
    NaturalNumbersSet, PipelineConfig, SqliteStore,
};

/// Each switch runs when present, always in the order
/// load → extract → transform → view → api.
#[derive(Parser, Debug)]
#[command(name = "charge-pipeline")]
#[command(about = "Load, repair, transform and summarize company charge records")]
#[command(version)]
struct Cli {
    /// CSV file to load into raw_data (replaces its contents)
    #[arg(long, value_name = "CSV")]
    load: Option<PathBuf>,

    /// Export raw_data to this CSV file
    #[arg(long, value_name = "CSV")]
    extract: Option<PathBuf>,

    /// Rebuild charges and companies from raw_data
    #[arg(long)]
    transform: bool,

    /// Print total amount per day and company
    #[arg(long)]
    view: bool,

    /// Extract this number from 1..=100 and report the missing one
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    api: Option<i64>,

    /// SQLite database path (overrides the config file)
    #[arg(long, env = "CHARGE_PIPELINE_DB")]
    db: Option<PathBuf>,

    /// TOML config file (default: ./pipeline.toml if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Field delimiter for input and export files
    #[arg(long)]
    delimiter: Option<char>,

    /// Keep everything in memory for this invocation only
    #[arg(long)]
    in_memory: bool,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn needs_store(&self) -> bool {
        self.load.is_some() || self.extract.is_some() || self.transform || self.view
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = PipelineConfig::load(cli.config.as_deref())?;
    if let Some(db) = &cli.db {
        config.database_path = db.clone();
    }
    if let Some(delimiter) = cli.delimiter {
        config.delimiter = delimiter;
    }

    if !cli.needs_store() && cli.api.is_none() {
        println!("Nothing to do. Run with --help to see the available switches.");
        return Ok(());
    }

    if cli.needs_store() {
        let mut store: Box<dyn DocumentStore> = if cli.in_memory {
            Box::new(MemoryStore::new())
        } else {
            Box::new(SqliteStore::open(&config.database_path, config.wal)?)
        };
        run_stages(&cli, &config, store.as_mut())?;
    }

    if let Some(number) = cli.api {
        run_naturals(number)?;
    }

    Ok(())
}

fn run_stages(cli: &Cli, config: &PipelineConfig, store: &mut dyn DocumentStore) -> Result<()> {
    let delimiter = config.delimiter_byte()?;

    if let Some(input) = &cli.load {
        println!("📂 Loading {}...", input.display());
        let report = ingest_file(store, input, delimiter)?;
        println!(
            "✓ {} records processed and repaired into 'raw_data' ({} read, {} dropped, {} names repaired, {} unknown)",
            report.kept, report.read, report.dropped, report.repaired, report.defaulted
        );
    }

    if let Some(output) = &cli.extract {
        let rows = extract(&*store, output, delimiter)?;
        println!("✓ Extracted {} records to {}", rows, output.display());
    }

    if cli.transform {
        let report = transform(store)?;
        println!(
            "✓ Transform complete: {} charges, {} companies (fingerprint {})",
            report.charges,
            report.companies,
            &report.fingerprint[..12]
        );
    }

    if cli.view {
        println!("\n📊 Total amount per day and company:\n");
        for total in aggregate(&*store)? {
            println!("{}", render_line(&total));
        }
    }

    Ok(())
}

fn run_naturals(number: i64) -> Result<()> {
    let mut set = NaturalNumbersSet::new();
    set.extract(number)?;
    let missing = set.find_missing_number()?;
    println!("The missing number is: {}", missing);
    Ok(())
}
