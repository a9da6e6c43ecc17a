//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                                     |
//! |------|-------------------------------------------------------------|
//! | 0    | Success                                                     |
//! | 1    | Missing leads found (`compare --strict`) or rows differ (`diff --strict`) |
//! | 2    | CLI usage error (bad args, empty input)                     |
//! | 3    | I/O error (cannot read input, cannot write output)          |
//! | 4    | Parse error (malformed CSV)                                 |
//! | 5    | Invalid config                                              |
//! | 6    | Comparison failed                                           |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use leadsync_io::{IoError, SessionError};

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Source leads missing from the reference, and `--strict` was given.
/// Like `diff(1)`, exit 1 means "inputs differ."
pub const EXIT_MISSING_LEADS: u8 = 1;

/// Rows differ in `diff --strict`.
pub const EXIT_ROWS_DIFFER: u8 = 1;

/// Usage error - bad arguments, an input with no records.
pub const EXIT_USAGE: u8 = 2;

/// Cannot read an input or write an output.
pub const EXIT_IO: u8 = 3;

/// Input is not well-formed delimited text.
pub const EXIT_PARSE: u8 = 4;

/// Config file cannot be read, parsed or validated.
pub const EXIT_CONFIG: u8 = 5;

/// The engine failed on the given inputs.
pub const EXIT_COMPARISON_FAILED: u8 = 6;

/// Map an I/O crate error to its exit code.
pub fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::Csv(_) => EXIT_PARSE,
        IoError::Read { .. } | IoError::Write { .. } | IoError::Json(_) | IoError::Staging(_) => {
            EXIT_IO
        }
    }
}

pub fn session_exit_code(err: &SessionError) -> u8 {
    match err {
        SessionError::ComparisonFailed => EXIT_COMPARISON_FAILED,
        SessionError::Export(e) => io_exit_code(e),
    }
}
