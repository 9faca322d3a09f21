//! Financial Chatbot CLI
//!
//! Ask questions about company financial records from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Interactive session
//! cargo run --bin finchat -- --data data/financial_data.csv
//!
//! # One-shot questions
//! cargo run --bin finchat -- -q "What is the net income of Amazon in 2022?"
//! ```

use anyhow::Context;
use clap::Parser;
use finchat::bot::{FinChatBot, Reply};
use finchat::config::{DATA_PATH_ENV, DEFAULT_DATA_PATH, METRICS_PATH_ENV};
use finchat::{FinChatConfig, FinChatError};
use finchat_utils::LogFormat;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "finchat")]
#[command(about = "Answer questions about company financial records", long_about = None)]
struct Args {
    /// CSV file with the financial records
    #[arg(short, long, env = DATA_PATH_ENV, default_value = DEFAULT_DATA_PATH)]
    data: PathBuf,

    /// JSON metric vocabulary replacing the built-in one
    #[arg(short, long, env = METRICS_PATH_ENV)]
    metrics: Option<PathBuf>,

    /// Answer these inputs and exit instead of starting a session
    #[arg(short, long = "query")]
    queries: Vec<String>,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, default_value = "warn,finchat=info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Show timestamps in /history
    #[arg(long)]
    show_timestamps: bool,
}

fn print_samples() {
    println!(
        r"
Sample queries:
  - What is the total revenue for Tesla in 2023?
  - Show the operating margin for Apple in 2021.
  - What is the debt-to-assets ratio for Microsoft in 2020?
  - Tell me the net income of Amazon in 2022.
"
    );
}

/// Print a recoverable error and keep going; hand fatal ones back to `main`
fn report(err: FinChatError) -> anyhow::Result<()> {
    if err.is_fatal() {
        return Err(err.into());
    }
    eprintln!("Error: {err}");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.json_logs {
        finchat_utils::init_tracing_with(LogFormat::Json, &args.log_level);
    } else {
        finchat_utils::init_tracing(&args.log_level);
    }

    let mut builder = FinChatConfig::builder()
        .data_path(&args.data)
        .show_timestamps(args.show_timestamps);
    if let Some(metrics) = &args.metrics {
        builder = builder.metrics_path(metrics);
    }
    let config = builder.build()?;

    let mut bot = match FinChatBot::from_config(config) {
        Ok(bot) => bot,
        Err(e) if e.is_fatal() => {
            return Err(e)
                .with_context(|| format!("failed to load data from {}", args.data.display()));
        }
        Err(e) => return Err(e).context("invalid configuration"),
    };

    if !args.queries.is_empty() {
        for query in &args.queries {
            match bot.process_input(query) {
                Ok(Reply::Text(text)) => println!("{text}"),
                Ok(Reply::Exit) => break,
                Err(e) => report(e)?,
            }
        }
        return Ok(());
    }

    println!("{}", bot.welcome());
    print_samples();

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{}", bot.prompt());
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                // EOF
                println!("\nGoodbye!");
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {e}");
                continue;
            }
        }

        match bot.process_input(&input) {
            Ok(Reply::Text(text)) => println!("{text}\n"),
            Ok(Reply::Exit) => {
                println!("Goodbye!");
                break;
            }
            Err(e) => report(e)?,
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors_keep_the_session() {
        assert!(report(FinChatError::CommandError("Unknown command: x".to_string())).is_ok());
        assert!(report(FinChatError::UnknownCompany("Nokia".to_string())).is_ok());
    }

    #[test]
    fn test_fatal_errors_end_the_session() {
        let err = report(FinChatError::DataLoad {
            source_name: "financial_data.csv".to_string(),
            reason: "No such file or directory".to_string(),
        })
        .unwrap_err();
        assert!(err.to_string().contains("financial_data.csv"));
    }
}
