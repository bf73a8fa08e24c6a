//! nfe-report command line tool
//!
//! Compiles every NF-e XML file in a directory into `notas_fiscais.xlsx`.
//!
//! # Usage
//!
//! ```bash
//! # Ask for the folder interactively
//! nfe-report
//!
//! # Process a given folder
//! nfe-report ./notas
//!
//! # Print the run summary as JSON, with per-file skip logging
//! nfe-report ./notas --json -vv
//! ```

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;
use nfe_report::{
    ConverterBuilder, DirectorySelector, FileOrder, FixedDirectory, NfeReportError,
    PromptSelector, RunOutcome,
};
use serde_json::{json, Value};

/// Extract NF-e invoice fields from a folder of XML files into an Excel report
#[derive(Parser, Debug)]
#[command(name = "nfe-report")]
#[command(version, about, long_about = None)]
struct Args {
    /// Folder containing the NF-e XML files (asked interactively when omitted)
    directory: Option<PathBuf>,

    /// Keep filesystem listing order instead of sorting file names
    #[arg(long)]
    listing_order: bool,

    /// Skip input files larger than this many bytes
    #[arg(long, default_value_t = 67_108_864)]
    max_file_size: u64,

    /// Print the run outcome as a JSON status object instead of a message
    #[arg(long)]
    json: bool,

    /// Verbose output (-v: info, -vv: debug, shows skipped files)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            handle_error(e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), NfeReportError> {
    let order = if args.listing_order {
        FileOrder::Listing
    } else {
        FileOrder::Sorted
    };
    let converter = ConverterBuilder::new()
        .with_file_order(order)
        .with_max_file_size(args.max_file_size)
        .build()?;

    let mut selector: Box<dyn DirectorySelector> = match &args.directory {
        Some(dir) => Box::new(FixedDirectory::new(dir)),
        None => Box::new(PromptSelector::new(io::stdin().lock(), io::stderr())),
    };

    let outcome = converter.run(selector.as_mut())?;

    if args.json {
        let json = outcome_json(&outcome)
            .and_then(|value| serde_json::to_string_pretty(&value))
            .map_err(|e| NfeReportError::Io(e.into()))?;
        println!("{}", json);
        return Ok(());
    }

    match outcome {
        RunOutcome::NoDirectorySelected => println!("No folder selected."),
        RunOutcome::NoData(_) => println!("No data extracted."),
        RunOutcome::Written(summary) => {
            println!("Excel file saved to: {}", summary.output_path.display());
        }
    }

    Ok(())
}

/// JSON status for `--json`; every outcome carries a `status` key
fn outcome_json(outcome: &RunOutcome) -> serde_json::Result<Value> {
    let value = match outcome {
        RunOutcome::NoDirectorySelected => json!({ "status": "no_folder_selected" }),
        RunOutcome::NoData(batch) => json!({
            "status": "no_data",
            "scanned": batch.scanned,
            "skipped": batch.skipped.len(),
        }),
        RunOutcome::Written(summary) => {
            let mut value = serde_json::to_value(summary)?;
            value["status"] = json!("written");
            value
        }
    };
    Ok(value)
}

fn handle_error(error: NfeReportError) {
    match error {
        NfeReportError::Io(io_err) => {
            eprintln!("I/O Error: {}", io_err);
            eprintln!("Please check that the folder exists and is writable.");
        }
        NfeReportError::Xlsx(xlsx_err) => {
            eprintln!("Excel Error: {}", xlsx_err);
            eprintln!("The report could not be written.");
        }
        NfeReportError::Config(msg) => {
            eprintln!("Configuration Error: {}", msg);
        }
        NfeReportError::NotADirectory(path) => {
            eprintln!("Not a directory: {}", path.display());
        }
    }
}
