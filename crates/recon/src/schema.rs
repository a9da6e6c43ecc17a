//! Per-dataset field detection.
//!
//! Each dataset names its identity fields differently, so every concept is
//! resolved against an ordered alias list: the first alias present in the
//! dataset's first record wins, otherwise the first alias is used as-is.

use serde::Serialize;

use crate::model::{Dataset, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldConcept {
    Email,
    Phone,
    Name,
}

impl std::fmt::Display for FieldConcept {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Email => write!(f, "email"),
            Self::Phone => write!(f, "phone"),
            Self::Name => write!(f, "name"),
        }
    }
}

/// Ordered alias lists, one per concept. An empty list means the dataset
/// does not carry that concept.
pub trait FieldAliases {
    fn aliases(&self, concept: FieldConcept) -> &[String];
}

/// First candidate present as a key in `sample`, else the first candidate.
///
/// The returned name may not exist in the data; lookups through it then
/// yield nothing.
pub fn determine_field(sample: Option<&Record>, candidates: &[String]) -> String {
    let fallback = || candidates.first().cloned().unwrap_or_default();
    let Some(sample) = sample else {
        return fallback();
    };
    candidates
        .iter()
        .find(|name| sample.contains_field(name))
        .cloned()
        .unwrap_or_else(fallback)
}

/// Field names chosen for one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetectedFields {
    pub email: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl DetectedFields {
    pub fn detect<A: FieldAliases>(dataset: &Dataset, aliases: &A) -> Self {
        let sample = dataset.first();
        let pick = |concept| {
            let candidates = aliases.aliases(concept);
            (!candidates.is_empty()).then(|| determine_field(sample, candidates))
        };
        Self {
            email: pick(FieldConcept::Email).unwrap_or_default(),
            phone: pick(FieldConcept::Phone).unwrap_or_default(),
            name: pick(FieldConcept::Name),
        }
    }

    /// Raw value of `concept` in `record`, if the field is present.
    pub fn value<'r>(&self, record: &'r Record, concept: FieldConcept) -> Option<&'r str> {
        let field = match concept {
            FieldConcept::Email => self.email.as_str(),
            FieldConcept::Phone => self.phone.as_str(),
            FieldConcept::Name => self.name.as_deref()?,
        };
        record.get(field)
    }
}
