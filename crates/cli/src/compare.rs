//! `leadsync compare`: find source leads missing from the reference export.

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::Args;
use leadsync_io::json::write_pretty;
use leadsync_io::{ComparisonSession, ExportHandle};
use leadsync_recon::diff::format_row;
use leadsync_recon::search::filter_records;
use leadsync_recon::{Dataset, ReconciliationResult, Record};
use serde::Serialize;
use tracing::info;

use crate::config::resolve_config;
use crate::exit_codes::{EXIT_IO, EXIT_MISSING_LEADS};
use crate::{read_input, CliError};

#[derive(Args)]
pub struct CompareArgs {
    /// Lead export to check (ad platform, CSV or TSV)
    pub source: PathBuf,

    /// Authoritative export to check against (CRM, CSV or TSV)
    pub reference: PathBuf,

    /// Config file (default: <config dir>/leadsync/leadsync.toml when present)
    #[arg(long, env = "LEADSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write the missing and combined CSV exports into this directory
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Output JSON to stdout instead of a lead listing
    #[arg(long)]
    pub json: bool,

    /// Write JSON output to file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Only list missing leads with a value containing TERM (case-insensitive)
    #[arg(long, value_name = "TERM")]
    pub search: Option<String>,

    /// Exit 1 when any source lead is missing from the reference
    #[arg(long)]
    pub strict: bool,

    /// Suppress the listing and summary
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

#[derive(Serialize)]
struct ReportMeta {
    version: &'static str,
    run_at: String,
    source: String,
    reference: String,
}

#[derive(Serialize)]
struct SearchReport<'a> {
    term: &'a str,
    matches: Vec<&'a Record>,
}

#[derive(Serialize)]
struct ExportReport {
    filename: String,
    mime: &'static str,
    bytes: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<PathBuf>,
}

#[derive(Serialize)]
struct CompareReport<'a> {
    meta: ReportMeta,
    #[serde(flatten)]
    result: &'a ReconciliationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<SearchReport<'a>>,
    exports: Vec<ExportReport>,
}

fn read_nonempty(path: &Path, role: &str) -> Result<Dataset, CliError> {
    let dataset = read_input(path)?;
    if dataset.is_empty() {
        return Err(CliError::usage(format!("{role} file {} has no leads", path.display()))
            .with_hint("both files need a header row and at least one data row"));
    }
    Ok(dataset)
}

pub fn cmd_compare(args: CompareArgs) -> Result<(), CliError> {
    let config = resolve_config(args.config.as_deref())?;
    let source = read_nonempty(&args.source, "source")?;
    let reference = read_nonempty(&args.reference, "reference")?;

    let mut session = ComparisonSession::new(config);
    let comparison = session
        .compare(&source, &reference)
        .map_err(CliError::session)?
        .ok_or_else(|| CliError::usage("nothing to compare"))?;
    let result = &comparison.result;

    info!(
        source_email = %result.fields.source.email,
        source_phone = %result.fields.source.phone,
        reference_email = %result.fields.reference.email,
        reference_phone = %result.fields.reference.phone,
        "matching on detected fields"
    );

    let mut exports = Vec::new();
    if let Some(set) = &comparison.exports {
        for handle in set.handles() {
            let path = match &args.out_dir {
                Some(dir) => Some(handle.persist_into(dir).map_err(CliError::io)?),
                None => None,
            };
            exports.push(export_report(handle, path));
        }
    }

    let search = args.search.as_deref().map(|term| SearchReport {
        term,
        matches: filter_records(&result.unmatched, term),
    });

    let report = CompareReport {
        meta: ReportMeta {
            version: env!("CARGO_PKG_VERSION"),
            run_at: Utc::now().to_rfc3339(),
            source: args.source.display().to_string(),
            reference: args.reference.display().to_string(),
        },
        result,
        search,
        exports,
    };

    if let Some(ref path) = args.output {
        write_pretty(&report, path).map_err(CliError::io)?;
        eprintln!("wrote {}", path.display());
    }

    if args.json {
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::new(EXIT_IO, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else if !args.quiet {
        print_listing(&report);
    }

    if !args.quiet {
        print_summary(result);
        for export in report.exports.iter().filter_map(|e| e.path.as_ref()) {
            eprintln!("wrote {}", export.display());
        }
        if args.out_dir.is_some() && report.exports.is_empty() {
            eprintln!("nothing to export");
        }
    }

    if args.strict && result.has_unmatched {
        return Err(CliError::new(
            EXIT_MISSING_LEADS,
            format!("{} lead(s) missing from the reference", result.unmatched.len()),
        ));
    }

    Ok(())
}

fn export_report(handle: &ExportHandle, path: Option<PathBuf>) -> ExportReport {
    ExportReport {
        filename: handle.filename().to_string(),
        mime: handle.mime(),
        bytes: handle.len(),
        path,
    }
}

fn print_listing(report: &CompareReport<'_>) {
    let unmatched = &report.result.unmatched;
    if unmatched.is_empty() {
        println!("All source leads are present in the reference.");
        return;
    }

    let (heading, rows): (String, Vec<&Record>) = match &report.search {
        Some(search) => (
            format!(
                "Missing leads matching '{}' ({} of {}):",
                search.term,
                search.matches.len(),
                unmatched.len()
            ),
            search.matches.clone(),
        ),
        None => (format!("Missing leads ({}):", unmatched.len()), unmatched.iter().collect()),
    };

    println!("{heading}");
    for (i, record) in rows.iter().enumerate() {
        println!("  {:>3}. {}", i + 1, format_row(Some(*record)));
    }
}

fn print_summary(result: &ReconciliationResult) {
    let s = &result.summary;
    eprintln!(
        "compared {} source lead(s) against {} reference lead(s): {} matched ({} by email, {} by phone), {} missing",
        s.source_records, s.reference_records, s.matched, s.matched_by_email, s.matched_by_phone, s.unmatched,
    );
    if s.unmatched_without_identity > 0 {
        eprintln!(
            "{} missing lead(s) have neither an email nor a phone number",
            s.unmatched_without_identity
        );
    }
    if result.has_unmatched {
        eprintln!("combined export: {} lead(s)", result.combined.len());
    }
}
