//! Project automation tasks for finchat

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use finchat::dataset::{MetricColumn, load_csv};
use finchat::{MetricMapping, config::DEFAULT_DATA_PATH};
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Project automation tasks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all tests
    Test,
    /// Run clippy lints
    Lint,
    /// Load a dataset and print what the bot would see
    CheckData {
        #[arg(default_value = DEFAULT_DATA_PATH)]
        path: PathBuf,
    },
    /// Validate a metric vocabulary file
    CheckMetrics { path: PathBuf },
}

fn cargo(args: &[&str]) -> anyhow::Result<()> {
    println!("$ cargo {}", args.join(" "));
    let status = Command::new(std::env::var("CARGO").unwrap_or_else(|_| "cargo".to_string()))
        .args(args)
        .status()
        .context("failed to run cargo")?;
    if !status.success() {
        bail!("cargo {} failed with {status}", args.join(" "));
    }
    Ok(())
}

fn check_data(path: &Path) -> anyhow::Result<()> {
    let table = load_csv(path).with_context(|| format!("failed to load {}", path.display()))?;

    println!("{}: {} rows", path.display(), table.len());
    for company in table.companies() {
        let years: Vec<String> = table
            .rows_for(company)
            .map(|r| r.year.to_string())
            .collect();
        println!("  {company}: {}", years.join(", "));
    }

    let zero_revenue = table
        .records()
        .iter()
        .filter(|r| r.total_revenue.abs() < f64::EPSILON)
        .count();
    if zero_revenue > 0 {
        println!(
            "  {zero_revenue} row(s) with zero revenue; {} reads 0 there",
            MetricColumn::OperatingMargin
        );
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Test => cargo(&["test", "--workspace"]),
        Commands::Lint => cargo(&[
            "clippy",
            "--workspace",
            "--all-targets",
            "--",
            "-D",
            "warnings",
        ]),
        Commands::CheckData { path } => check_data(&path),
        Commands::CheckMetrics { path } => {
            let mapping = MetricMapping::from_file(&path)
                .with_context(|| format!("invalid vocabulary {}", path.display()))?;
            for entry in mapping.entries() {
                println!("  {:<24} -> {}", entry.phrase, entry.column);
            }
            Ok(())
        }
    }
}
