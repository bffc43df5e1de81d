//! Splitting one line into fields with the `csv` reader, so quoted fields
//! may contain the delimiter.

use crate::delimiter::Delimiter;
use csv::{ReaderBuilder, StringRecord, Trim};

/// Trimmed, non-empty fields of `line`. Runs of the delimiter count as one,
/// which is what whitespace-aligned instrument exports need.
pub fn split_fields(line: &str, delimiter: Delimiter) -> Vec<String> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(line.as_bytes());
    let mut record = StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => record
            .iter()
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect(),
        Ok(false) | Err(_) => Vec::new(),
    }
}
