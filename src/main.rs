mod errors;
mod operations;
mod ui;

use clap::{ArgAction, Args, Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;
use vacstat_core::QueryParams;

use crate::errors::user_message;
use crate::operations::{load_translator, run_stats, run_table};

/// Vacancy statistics - query and aggregate job postings exported to CSV
///
/// Examples:
///   # Print every vacancy as a table
///   vacstat table vacancies.csv
///
///   # Filter, sort by salary descending and show rows 1-10
///   vacstat table vacancies.csv --filter "Навыки: SQL" --sort Оклад --reverse Да --range "1 10"
///
///   # Yearly and per-city statistics for one profession
///   vacstat stats vacancies.csv --profession Программист
#[derive(Parser, Debug)]
#[command(name = "vacstat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON file overriding the built-in translation tables and currency rates
    #[arg(long, global = true, value_name = "FILE")]
    tables: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Filter, sort and print vacancies as a table
    #[command(after_help = "Parameters use display names:\n  \
        --filter \"Название региона: Москва\"\n  \
        --sort Оклад --reverse Да\n  \
        --range \"10 20\" (1-based, inclusive)\n  \
        --columns \"Название, Оклад\"")]
    Table(TableArgs),
    /// Print yearly and per-city salary statistics
    Stats(StatsArgs),
}

#[derive(Args, Debug)]
struct TableArgs {
    /// Path to the vacancies CSV file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Filter in the form "Field: value"
    #[arg(short, long, default_value = "")]
    filter: String,

    /// Field display name to sort by
    #[arg(short, long, default_value = "")]
    sort: String,

    /// Sort descending ("Да") or ascending ("Нет")
    #[arg(short, long, default_value = "")]
    reverse: String,

    /// Rows to show: "start" or "start end"
    #[arg(long, default_value = "")]
    range: String,

    /// Comma-separated column display names
    #[arg(short, long, default_value = "")]
    columns: String,

    /// Print the result as JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct StatsArgs {
    /// Path to the vacancies CSV file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Substring of the vacancy name selecting the profession
    #[arg(short, long, default_value = "")]
    profession: String,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> anyhow::Result<String> {
    let translator = load_translator(cli.tables.as_deref())?;

    match cli.command {
        Command::Table(args) => {
            let params = QueryParams {
                filter: args.filter,
                sort_field: args.sort,
                reverse: args.reverse,
                range: args.range,
                columns: args.columns,
            };
            run_table(&args.file, &params, args.json, &translator)
        }
        Command::Stats(args) => run_stats(&args.file, &args.profession, args.json, &translator),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(output) => println!("{}", output.trim_end()),
        Err(err) => {
            tracing::debug!(error = ?err, "run failed");
            eprintln!("{}", user_message(&err).red());
            process::exit(1);
        }
    }
}
