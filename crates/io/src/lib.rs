// File I/O operations

pub mod csv;
pub mod error;
pub mod export;
pub mod json;
pub mod session;

pub use error::IoError;
pub use export::{ExportHandle, ExportSet};
pub use session::{Comparison, ComparisonSession, SessionError};
