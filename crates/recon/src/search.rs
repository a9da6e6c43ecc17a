use crate::model::Record;

/// Records where any value contains `term`, ignoring case.
/// A blank term keeps everything.
pub fn filter_records<'a, I>(records: I, term: &str) -> Vec<&'a Record>
where
    I: IntoIterator<Item = &'a Record>,
{
    if term.trim().is_empty() {
        return records.into_iter().collect();
    }
    let needle = term.to_lowercase();
    records
        .into_iter()
        .filter(|r| r.values().any(|v| v.to_lowercase().contains(&needle)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Dataset;

    fn dataset() -> Dataset {
        Dataset::new(vec![
            [("email", "kim@y.com"), ("full_name", "Kim Lee")].into_iter().collect(),
            [("email", "jo@z.com"), ("full_name", "Jo March")].into_iter().collect(),
        ])
    }

    #[test]
    fn blank_term_keeps_all() {
        let ds = dataset();
        assert_eq!(filter_records(&ds, "   ").len(), 2);
        assert_eq!(filter_records(&ds, "").len(), 2);
    }

    #[test]
    fn case_insensitive_substring() {
        let ds = dataset();
        let hits = filter_records(&ds, "LEE");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].get("email"), Some("kim@y.com"));
        assert_eq!(filter_records(&ds, "@").len(), 2);
        assert!(filter_records(&ds, "nobody").is_empty());
    }

    #[test]
    fn term_is_not_trimmed_when_searching() {
        let ds = dataset();
        // "Kim " only matches where a space follows
        assert_eq!(filter_records(&ds, "Kim ").len(), 1);
        assert!(filter_records(&ds, " kim@").is_empty());
    }
}
