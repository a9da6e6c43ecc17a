//! Identity key normalization.
//!
//! Both functions are total: absent or empty input yields `""`, which the
//! engine treats as "no identity" and never looks up.

/// Trim and lower-case an email. No syntax validation.
pub fn normalize_email(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.trim().to_lowercase(),
        _ => String::new(),
    }
}

/// Keep ASCII digits only.
///
/// Country codes are not reconciled: `+1 555 123 4567` and `555 123 4567`
/// produce different keys.
pub fn normalize_phone(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.chars().filter(char::is_ascii_digit).collect(),
        _ => String::new(),
    }
}
