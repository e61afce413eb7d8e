use anyhow::{Context, Result};
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;

use sheet_filter::app::{FormOptions, FormState};
use sheet_filter::filter::{FilterCriteria, parse_date_input};
use sheet_filter::pipeline::{self, RunConfig};
use sheet_filter::{logging, ui};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Excel file with sheets named dd.mm.yyyy
    file_path: Option<PathBuf>,

    /// Filter and write the output without opening the form
    #[arg(long, short = 'p')]
    process: bool,

    /// Team leader to keep (case-insensitive)
    #[arg(long, short = 't')]
    team_leader: Option<String>,

    /// First sheet date to include, dd.mm.yyyy (default: earliest sheet)
    #[arg(long)]
    from: Option<String>,

    /// Last sheet date to include, dd.mm.yyyy (default: latest sheet)
    #[arg(long)]
    to: Option<String>,

    /// Output file (default: <input>_filtered.xlsx next to the input)
    #[arg(long, short = 'o')]
    output: Option<PathBuf>,

    /// Append a 'Source Sheet' column naming the sheet each row came from
    #[arg(long)]
    source_sheet: bool,

    /// Print the run summary as JSON (with --process)
    #[arg(long)]
    json: bool,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if !std::io::stdout().is_terminal() && !cli.process {
        eprintln!("Sheet-filter error: Pipe detected but -p or --process flag not provided.");
        std::process::exit(1);
    }

    logging::init(cli.log_file.as_deref(), !cli.process)?;

    if cli.process {
        return process(cli);
    }

    let mut state = FormState::new(
        cli.file_path.clone(),
        FormOptions {
            output: cli.output,
            include_source_sheet: cli.source_sheet,
        },
    );

    if cli.file_path.is_some() {
        state.load_workbook();
    }

    ui::run_app(state)
}

fn process(cli: Cli) -> Result<()> {
    let input = cli
        .file_path
        .context("An input file is required with --process")?;
    let team_leader = cli
        .team_leader
        .context("--team-leader is required with --process")?;

    // Open-ended ranges default to the workbook's own date bounds.
    let summary = if cli.from.is_none() || cli.to.is_none() {
        Some(pipeline::scan_workbook(&input)?)
    } else {
        None
    };
    let bound = |date: Option<chrono::NaiveDate>| {
        date.context("No sheets found with date format dd.mm.yyyy; pass --from and --to")
    };

    let start = match cli.from.as_deref() {
        Some(text) => parse_date_input(text)?,
        None => bound(summary.as_ref().and_then(|s| s.first_date()))?,
    };
    let end = match cli.to.as_deref() {
        Some(text) => parse_date_input(text)?,
        None => bound(summary.as_ref().and_then(|s| s.last_date()))?,
    };

    let config = RunConfig {
        input,
        output: cli.output,
        criteria: FilterCriteria::new(&team_leader, start, end)?,
        include_source_sheet: cli.source_sheet,
    };

    let outcome = pipeline::run(&config)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        println!(
            "{} rows for {} written to {}",
            outcome.rows_written,
            config.criteria.team_leader(),
            outcome.output.display()
        );
        for skipped in &outcome.skipped {
            eprintln!("skipped sheet '{}': {}", skipped.name, skipped.reason.describe());
        }
    }

    Ok(())
}
