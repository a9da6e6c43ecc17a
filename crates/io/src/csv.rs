// CSV/TSV import/export for lead datasets

use std::path::Path;

use leadsync_recon::model::{Dataset, Record};
use tracing::debug;

use crate::error::IoError;

/// Read a lead export and parse it into a dataset.
pub fn read_dataset(path: &Path) -> Result<Dataset, IoError> {
    let bytes = std::fs::read(path).map_err(|source| IoError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let content = decode_bytes(&bytes);
    let dataset = parse_dataset(&content)?;
    debug!(path = %path.display(), records = dataset.len(), "loaded dataset");
    Ok(dataset)
}

/// Decode raw file bytes to text.
///
/// A byte-order mark selects UTF-8 or UTF-16 LE/BE. Without one, UTF-8 is
/// tried first and Windows-1252 is the fallback (Excel-exported CSVs).
pub fn decode_bytes(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = encoding_rs::Encoding::for_bom(bytes) {
        debug!(encoding = encoding.name(), "decoding by byte-order mark");
        let (decoded, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return decoded.into_owned();
    }

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            debug!("input is not UTF-8, falling back to windows-1252");
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Tab when the header line has a tab and no comma, otherwise comma.
pub fn detect_delimiter(content: &str) -> u8 {
    let first_line = content.lines().next().unwrap_or("");
    if first_line.contains('\t') && !first_line.contains(',') {
        b'\t'
    } else {
        b','
    }
}

/// Parse delimited text with a header row into records.
///
/// Blank lines are skipped; a row of empty values (`,,`) is kept as a
/// record. A short row only carries the fields it has;
/// values beyond the header width are dropped.
pub fn parse_dataset(content: &str) -> Result<Dataset, IoError> {
    let delimiter = detect_delimiter(content);
    debug!(delimiter = %(delimiter as char).escape_default(), "parsing delimited text");

    let mut reader = ::csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Ok(Dataset::default());
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        // One empty field is a blank line; `,,` is a record of blanks
        if row.len() == 1 && row.get(0) == Some("") {
            continue;
        }
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(h, v)| (h.as_str(), v))
            .collect();
        records.push(record);
    }

    Ok(Dataset::new(records))
}

/// Render a dataset as comma-delimited text.
///
/// The header comes from the first record; rows are joined by `\n` with no
/// trailing newline. Values with a comma, quote or line break are quoted and
/// inner quotes doubled. Fields a record lacks render empty.
pub fn serialize_to_delimited_text(dataset: &Dataset) -> Result<String, IoError> {
    let headers = dataset.schema();
    if headers.is_empty() {
        return Ok(String::new());
    }

    let mut writer = ::csv::WriterBuilder::new()
        .terminator(::csv::Terminator::Any(b'\n'))
        .quote_style(::csv::QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(&headers)?;
    for record in dataset {
        writer.write_record(headers.iter().map(|h| record.get(h).unwrap_or("")))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| IoError::Staging(e.into_error()))?;
    // Only UTF-8 input went in
    let mut text = String::from_utf8_lossy(&bytes).into_owned();
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Serialize and write a dataset to `path`.
pub fn write_dataset(dataset: &Dataset, path: &Path) -> Result<(), IoError> {
    let text = serialize_to_delimited_text(dataset)?;
    std::fs::write(path, text).map_err(|source| IoError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(pairs: &[(&str, &str)]) -> Record {
        pairs.iter().copied().collect()
    }

    #[test]
    fn detect_tab_delimiter() {
        assert_eq!(detect_delimiter("email\tphone\na\tb\n"), b'\t');
        assert_eq!(detect_delimiter("email,phone\n"), b',');
        // Tab and comma on the header line: comma wins
        assert_eq!(detect_delimiter("full name,notes\tx\n"), b',');
        assert_eq!(detect_delimiter(""), b',');
    }

    #[test]
    fn parse_with_headers() {
        let ds = parse_dataset("email,phone_number,full_name\na@x.com,555,Ann Lee\n\nb@x.com,,Bo\n").unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].get("full_name"), Some("Ann Lee"));
        assert_eq!(ds.records()[1].get("phone_number"), Some(""));
        assert_eq!(ds.schema(), vec!["email", "phone_number", "full_name"]);
    }

    #[test]
    fn parse_tab_separated() {
        let ds = parse_dataset("email\tphone\na@x.com\t(555) 123\n").unwrap();
        assert_eq!(ds.records()[0].get("phone"), Some("(555) 123"));
    }

    #[test]
    fn short_and_long_rows() {
        let ds = parse_dataset("a,b,c\n1\n1,2,3,4\n").unwrap();
        assert_eq!(ds.records()[0].len(), 1);
        assert_eq!(ds.records()[0].get("b"), None);
        assert_eq!(ds.records()[1].len(), 3);
    }

    #[test]
    fn parse_empty_input() {
        assert!(parse_dataset("").unwrap().is_empty());
        assert!(parse_dataset("email,phone\n").unwrap().is_empty());
    }

    #[test]
    fn decode_utf16_le_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "Email\tPhone\nä@x.com\t1\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let text = decode_bytes(&bytes);
        assert!(text.starts_with("Email\tPhone"));
        assert!(text.contains("ä@x.com"));
    }

    #[test]
    fn decode_utf16_be_bom() {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in "Email\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode_bytes(&bytes), "Email\n");
    }

    #[test]
    fn decode_strips_utf8_bom() {
        let bytes = b"\xEF\xBB\xBFemail,phone\n";
        assert_eq!(decode_bytes(bytes), "email,phone\n");
    }

    #[test]
    fn decode_windows_1252_fallback() {
        // "café" with 0xE9 for é
        let bytes = b"name\ncaf\xE9\n";
        assert_eq!(decode_bytes(bytes), "name\ncafé\n");
    }

    #[test]
    fn serialize_quotes_commas() {
        let ds = Dataset::new(vec![
            rec(&[("Name", "Lee, Kim"), ("Note", "said \"hi\""), ("Tags", "")]),
            rec(&[("Name", "Bo"), ("Note", "plain"), ("Tags", "x")]),
        ]);
        let text = serialize_to_delimited_text(&ds).unwrap();
        assert_eq!(
            text,
            "Name,Note,Tags\n\"Lee, Kim\",\"said \"\"hi\"\"\",\nBo,plain,x"
        );
    }

    #[test]
    fn serialize_uses_first_record_header() {
        let ds = Dataset::new(vec![
            rec(&[("a", "1"), ("b", "2")]),
            rec(&[("b", "3"), ("c", "4")]),
        ]);
        assert_eq!(serialize_to_delimited_text(&ds).unwrap(), "a,b\n1,2\n,3");
    }

    #[test]
    fn serialize_empty_dataset() {
        assert_eq!(serialize_to_delimited_text(&Dataset::default()).unwrap(), "");
    }

    #[test]
    fn serialize_then_parse_is_field_equal() {
        let ds = Dataset::new(vec![
            rec(&[("Email", "a@x.com"), ("Notes", "one, two"), ("Quote", "6\" tall")]),
            rec(&[("Email", "b@x.com"), ("Notes", ""), ("Quote", "multi\nline")]),
        ]);
        let text = serialize_to_delimited_text(&ds).unwrap();
        assert_eq!(parse_dataset(&text).unwrap(), ds);
    }

    #[test]
    fn write_then_read_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leads.csv");
        let ds = Dataset::new(vec![rec(&[("Email", "a@x.com"), ("Notes", "one, two")])]);
        write_dataset(&ds, &path).unwrap();
        assert_eq!(read_dataset(&path).unwrap(), ds);
    }

    #[test]
    fn read_missing_file() {
        let err = read_dataset(Path::new("/nonexistent/leads.csv")).unwrap_err();
        assert!(matches!(err, IoError::Read { .. }));
    }

    #[test]
    fn row_of_blanks_is_a_record() {
        let ds = parse_dataset("email,phone_number,full_name\n,,\n\nb@x.com,,Bo\n").unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0], rec(&[("email", ""), ("phone_number", ""), ("full_name", "")]));
        assert_eq!(ds.records()[1].get("full_name"), Some("Bo"));
    }

    #[test]
    fn blank_projection_survives_round_trip() {
        let reference = Dataset::new(vec![rec(&[("Email", "a@x.com"), ("Phone", "1")])]);
        let source = Dataset::new(vec![rec(&[("email", ""), ("phone_number", ""), ("full_name", "")])]);
        let result = leadsync_recon::reconcile(&source, &reference);

        let text = serialize_to_delimited_text(&result.combined).unwrap();
        assert_eq!(text, "Email,Phone\na@x.com,1\n,");
        let reparsed = parse_dataset(&text).unwrap();
        assert_eq!(reparsed.len(), 2);
        assert_eq!(reparsed, result.combined);

        let missing = serialize_to_delimited_text(&result.unmatched).unwrap();
        assert_eq!(parse_dataset(&missing).unwrap(), result.unmatched);
    }
}
