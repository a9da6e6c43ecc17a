use crate::config::ProjectionLabels;
use crate::model::Record;
use crate::schema::{DetectedFields, FieldConcept};

/// Reshapes unmatched source records into the reference schema.
pub struct Projection<'a> {
    template: Vec<String>,
    source: &'a DetectedFields,
    reference: &'a DetectedFields,
    labels: &'a ProjectionLabels,
    origin_marker: &'a str,
}

impl<'a> Projection<'a> {
    pub fn new(
        template: Vec<String>,
        source: &'a DetectedFields,
        reference: &'a DetectedFields,
        labels: &'a ProjectionLabels,
        origin_marker: &'a str,
    ) -> Self {
        Self {
            template,
            source,
            reference,
            labels,
            origin_marker,
        }
    }

    fn declares(&self, field: &str) -> bool {
        self.template.iter().any(|f| f == field)
    }

    /// Build a record with exactly the reference fields, blank except for
    /// email, phone and the optional name / tag enrichment.
    pub fn project(&self, record: &Record) -> Record {
        let mut out = Record::with_capacity(self.template.len());
        for field in &self.template {
            out.set(field.as_str(), "");
        }

        let email = self.source.value(record, FieldConcept::Email).unwrap_or("");
        let phone = self.source.value(record, FieldConcept::Phone).unwrap_or("");
        if self.declares(&self.reference.email) {
            out.set(self.reference.email.as_str(), email);
        }
        if self.declares(&self.reference.phone) {
            out.set(self.reference.phone.as_str(), phone);
        }

        self.fill_name(record, &mut out);

        if self.declares(&self.labels.tags) {
            out.set(self.labels.tags.as_str(), self.origin_marker);
        }

        out
    }

    fn fill_name(&self, record: &Record, out: &mut Record) {
        let Some(full) = self.source.value(record, FieldConcept::Name) else {
            return;
        };
        let Some((first, last)) = split_name(full) else {
            return;
        };
        if self.declares(&self.labels.first_name) {
            out.set(self.labels.first_name.as_str(), first);
        }
        if self.declares(&self.labels.last_name) {
            out.set(self.labels.last_name.as_str(), last);
        }
    }
}

/// Split on single spaces: first token, then the rest re-joined with spaces.
/// `None` for an empty name.
pub fn split_name(full: &str) -> Option<(String, String)> {
    if full.is_empty() {
        return None;
    }
    let mut parts = full.split(' ');
    let first = parts.next().unwrap_or("").to_string();
    let last = parts.collect::<Vec<_>>().join(" ");
    Some((first, last))
}
