// leadsync CLI - find ad-platform leads missing from a CRM export

mod compare;
mod config;
mod diff;
mod exit_codes;
mod logging;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use leadsync_io::{IoError, SessionError};
use leadsync_recon::{ConfigError, Dataset};

use exit_codes::{
    io_exit_code, session_exit_code, EXIT_CONFIG, EXIT_SUCCESS, EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "leadsync")]
#[command(about = "Find ad-platform leads missing from a CRM export")]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// More diagnostics on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile a lead export against a CRM export
    #[command(after_help = "\
Examples:
  leadsync compare facebook.csv highlevel.csv
  leadsync compare facebook.tsv highlevel.csv --out-dir exports/
  leadsync compare facebook.csv highlevel.csv --json > result.json
  leadsync compare facebook.csv highlevel.csv --search smith
  leadsync compare facebook.csv highlevel.csv --strict --quiet")]
    Compare(compare::CompareArgs),

    /// Compare two CSV files row by row
    #[command(after_help = "\
Examples:
  leadsync diff before.csv after.csv
  leadsync diff before.csv after.csv --json
  leadsync diff before.csv after.csv --strict")]
    Diff {
        /// First file
        left: PathBuf,

        /// Second file
        right: PathBuf,

        /// Output JSON to stdout instead of a row listing
        #[arg(long)]
        json: bool,

        /// Exit 1 when any row differs
        #[arg(long)]
        strict: bool,
    },

    /// Validate a config file without running
    #[command(after_help = "\
Examples:
  leadsync validate leadsync.toml")]
    Validate {
        /// Path to the TOML config file
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    logging::install_panic_hook();

    let result = match cli.command {
        None => {
            eprintln!("Usage: leadsync <command> [options]");
            eprintln!("       leadsync --help for more information");
            Ok(())
        }
        Some(Commands::Compare(args)) => compare::cmd_compare(args),
        Some(Commands::Diff { left, right, json, strict }) => diff::cmd_diff(left, right, json, strict),
        Some(Commands::Validate { config }) => config::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn io(err: IoError) -> Self {
        Self::new(io_exit_code(&err), err.to_string())
    }

    pub fn config(err: ConfigError) -> Self {
        Self::new(EXIT_CONFIG, err.to_string())
    }

    pub fn session(err: SessionError) -> Self {
        let hint = match &err {
            SessionError::ComparisonFailed => {
                Some("check that both files start with a header row".to_string())
            }
            SessionError::Export(_) => None,
        };
        Self { code: session_exit_code(&err), message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Read an input file, decoding and parsing it into a dataset.
pub fn read_input(path: &Path) -> Result<Dataset, CliError> {
    leadsync_io::csv::read_dataset(path).map_err(CliError::io)
}
