// Positional row comparison for `leadsync diff`.
// Pure functions: two datasets in, differing row indices out.

use serde::Serialize;

use crate::model::{Dataset, Record};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowDiff {
    /// `max(left.len(), right.len())`.
    pub total_rows: usize,
    /// Indices whose rows are not identical (order of fields included).
    pub differing: Vec<usize>,
}

impl RowDiff {
    pub fn is_identical(&self) -> bool {
        self.differing.is_empty()
    }
}

/// Compare rows at the same position. A row present on one side only differs.
pub fn diff_rows(left: &Dataset, right: &Dataset) -> RowDiff {
    let total_rows = left.len().max(right.len());
    let differing = (0..total_rows)
        .filter(|&i| left.get(i) != right.get(i))
        .collect();
    RowDiff {
        total_rows,
        differing,
    }
}

/// `key: value` pairs joined by `, `; blank values render as `empty`.
pub fn format_row(record: Option<&Record>) -> String {
    let Some(record) = record else {
        return "No data".to_string();
    };
    record
        .iter()
        .map(|(k, v)| format!("{k}: {}", if v.is_empty() { "empty" } else { v }))
        .collect::<Vec<_>>()
        .join(", ")
}
