//! `leadsync diff`: positional row-by-row comparison of two files.

use std::path::PathBuf;

use leadsync_recon::diff::{diff_rows, format_row};
use leadsync_recon::Record;
use serde::Serialize;

use crate::exit_codes::{EXIT_IO, EXIT_ROWS_DIFFER};
use crate::{read_input, CliError};

#[derive(Serialize)]
struct DiffRow<'a> {
    index: usize,
    left: Option<&'a Record>,
    right: Option<&'a Record>,
}

#[derive(Serialize)]
struct DiffReport<'a> {
    left: String,
    right: String,
    total_rows: usize,
    identical: bool,
    rows: Vec<DiffRow<'a>>,
}

pub fn cmd_diff(left: PathBuf, right: PathBuf, json: bool, strict: bool) -> Result<(), CliError> {
    let left_rows = read_input(&left)?;
    let right_rows = read_input(&right)?;
    let diff = diff_rows(&left_rows, &right_rows);

    if json {
        let report = DiffReport {
            left: left.display().to_string(),
            right: right.display().to_string(),
            total_rows: diff.total_rows,
            identical: diff.is_identical(),
            rows: diff
                .differing
                .iter()
                .map(|&index| DiffRow {
                    index,
                    left: left_rows.get(index),
                    right: right_rows.get(index),
                })
                .collect(),
        };
        let json_str = serde_json::to_string_pretty(&report)
            .map_err(|e| CliError::new(EXIT_IO, format!("JSON serialization error: {e}")))?;
        println!("{json_str}");
    } else {
        for &index in &diff.differing {
            // 1-based like a spreadsheet row under the header
            println!("row {}:", index + 1);
            println!("  left:  {}", format_row(left_rows.get(index)));
            println!("  right: {}", format_row(right_rows.get(index)));
        }
        if diff.is_identical() {
            eprintln!("no differences ({} rows)", diff.total_rows);
        } else {
            eprintln!("{} of {} rows differ", diff.differing.len(), diff.total_rows);
        }
    }

    if strict && !diff.is_identical() {
        return Err(CliError::new(EXIT_ROWS_DIFFER, "rows differ"));
    }
    Ok(())
}
