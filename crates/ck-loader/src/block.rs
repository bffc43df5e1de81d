//! Data-block extraction: comments, blank lines and instrument block
//! markers are stripped before the table is read.

use crate::delimiter::Delimiter;
use crate::fields::split_fields;

/// A kept source line with its 1-based line number.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SourceLine<'a> {
    pub line: usize,
    pub text: &'a str,
}

fn is_comment(line: &str) -> bool {
    line.starts_with('!') || line.starts_with('#')
}

fn is_block_start(line: &str) -> bool {
    line.starts_with("BEGIN") || line.contains("_DATA")
}

/// A line that starts like a data row (its first field is numeric).
fn looks_like_data(line: &str, delimiter: Delimiter) -> bool {
    split_fields(line, delimiter)
        .first()
        .is_some_and(|f| f.parse::<f64>().is_ok())
}

/// Keep the first line (a header, usually) plus the data rows after it.
///
/// When the text carries a `BEGIN`/`*_DATA` marker only the first such block
/// is read, up to `END` or the next non-data line.
pub fn extract_data_block(text: &str, delimiter: Delimiter) -> Vec<SourceLine<'_>> {
    let has_block = text.lines().any(|l| is_block_start(l.trim()));
    let mut in_block = false;
    let mut kept: Vec<SourceLine<'_>> = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || is_comment(line) {
            continue;
        }
        if has_block {
            if !in_block {
                in_block = is_block_start(line);
                continue;
            }
            if line.starts_with("END") {
                break;
            }
        }
        let source = SourceLine {
            line: idx + 1,
            text: line,
        };
        if kept.is_empty() || looks_like_data(line, delimiter) {
            kept.push(source);
        } else if has_block {
            break;
        }
    }
    kept
}
