use serde::Serialize;

/// How a single source record fared against the reference index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchOutcome {
    pub has_email: bool,
    pub has_phone: bool,
    pub by_email: bool,
    pub by_phone: bool,
}

impl MatchOutcome {
    pub fn is_matched(&self) -> bool {
        self.by_email || self.by_phone
    }

    pub fn has_identity(&self) -> bool {
        self.has_email || self.has_phone
    }
}

/// Counts reported alongside a reconciliation result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub source_records: usize,
    pub reference_records: usize,
    /// Distinct identity keys in the reference index.
    pub index_keys: usize,
    pub matched: usize,
    pub matched_by_email: usize,
    pub matched_by_phone: usize,
    pub unmatched: usize,
    /// Unmatched records carrying neither an email nor a phone.
    pub unmatched_without_identity: usize,
}

impl ReconSummary {
    pub fn record(&mut self, outcome: MatchOutcome) {
        self.source_records += 1;
        if outcome.by_email {
            self.matched_by_email += 1;
        }
        if outcome.by_phone {
            self.matched_by_phone += 1;
        }
        if outcome.is_matched() {
            self.matched += 1;
        } else {
            self.unmatched += 1;
            if !outcome.has_identity() {
                self.unmatched_without_identity += 1;
            }
        }
    }
}
