use std::collections::HashMap;

use tracing::debug;

use crate::config::ReconConfig;
use crate::model::{ComparedFields, Dataset, ReconciliationResult, Record};
use crate::normalize::{normalize_email, normalize_phone};
use crate::project::Projection;
use crate::schema::{DetectedFields, FieldConcept};
use crate::summary::{MatchOutcome, ReconSummary};

/// Reconcile with the default alias lists and labels.
pub fn reconcile(source: &Dataset, reference: &Dataset) -> ReconciliationResult {
    reconcile_with(&ReconConfig::default(), source, reference)
}

/// Find source records absent from `reference` and build the combined dataset.
///
/// One synchronous pass, no state kept between calls.
pub fn reconcile_with(
    config: &ReconConfig,
    source: &Dataset,
    reference: &Dataset,
) -> ReconciliationResult {
    let source_fields = DetectedFields::detect(source, &config.source);
    let reference_fields = DetectedFields::detect(reference, &config.reference);
    debug!(
        source_email = %source_fields.email,
        source_phone = %source_fields.phone,
        source_name = ?source_fields.name,
        reference_email = %reference_fields.email,
        reference_phone = %reference_fields.phone,
        "detected identity fields"
    );

    let index = IdentityIndex::build(reference, &reference_fields);
    debug!(keys = index.len(), records = reference.len(), "built reference index");

    let mut summary = ReconSummary {
        reference_records: reference.len(),
        index_keys: index.len(),
        ..ReconSummary::default()
    };
    let mut unmatched = Vec::new();
    for record in source {
        let outcome = index.classify(record, &source_fields);
        summary.record(outcome);
        if !outcome.is_matched() {
            unmatched.push(record.clone());
        }
    }
    debug!(
        matched = summary.matched,
        unmatched = summary.unmatched,
        "classified source records"
    );

    let projection = Projection::new(
        reference.schema(),
        &source_fields,
        &reference_fields,
        &config.projection,
        &config.origin_marker,
    );
    let mut combined = Vec::with_capacity(reference.len() + unmatched.len());
    combined.extend(reference.iter().cloned());
    combined.extend(unmatched.iter().map(|r| projection.project(r)));

    ReconciliationResult {
        has_unmatched: !unmatched.is_empty(),
        unmatched: Dataset::new(unmatched),
        combined: Dataset::new(combined),
        fields: ComparedFields {
            source: source_fields,
            reference: reference_fields,
        },
        summary,
    }
}

/// Normalized identity key -> reference record position.
///
/// Email and phone keys share one map. On collision the later record wins;
/// classification only asks whether a key is present.
#[derive(Debug, Default)]
pub struct IdentityIndex {
    keys: HashMap<String, usize>,
}

impl IdentityIndex {
    pub fn build(reference: &Dataset, fields: &DetectedFields) -> Self {
        let mut keys = HashMap::new();
        for (pos, record) in reference.iter().enumerate() {
            let email = normalize_email(fields.value(record, FieldConcept::Email));
            let phone = normalize_phone(fields.value(record, FieldConcept::Phone));
            if !email.is_empty() {
                keys.insert(email, pos);
            }
            if !phone.is_empty() {
                keys.insert(phone, pos);
            }
        }
        Self { keys }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// Position of the reference record last stored under `key`.
    pub fn get(&self, key: &str) -> Option<usize> {
        self.keys.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Look up a source record by email OR phone. Empty keys never match.
    pub fn classify(&self, record: &Record, fields: &DetectedFields) -> MatchOutcome {
        let email = normalize_email(fields.value(record, FieldConcept::Email));
        let phone = normalize_phone(fields.value(record, FieldConcept::Phone));
        MatchOutcome {
            has_email: !email.is_empty(),
            has_phone: !phone.is_empty(),
            by_email: !email.is_empty() && self.contains(&email),
            by_phone: !phone.is_empty() && self.contains(&phone),
        }
    }
}
