//! `leadsync-recon`: lead reconciliation engine.
//!
//! Pure engine crate: receives pre-parsed datasets, returns the unmatched
//! subset and a combined dataset in the reference shape.
//! No CLI or IO dependencies.

pub mod config;
pub mod diff;
pub mod engine;
pub mod error;
pub mod model;
pub mod normalize;
pub mod project;
pub mod schema;
pub mod search;
pub mod summary;

pub use config::ReconConfig;
pub use engine::{reconcile, reconcile_with};
pub use error::ConfigError;
pub use model::{Dataset, ReconciliationResult, Record};
pub use normalize::{normalize_email, normalize_phone};
