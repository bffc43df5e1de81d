//! Raw row matrix and the curves it yields.

use crate::block::{SourceLine, extract_data_block};
use crate::delimiter::Delimiter;
use crate::fields::split_fields;
use crate::error::{LoaderError, LoaderResult};
use tracing::{debug, warn};

/// With more columns than this, only the first Y column starts visible.
pub const MAX_VISIBLE_COLUMNS: usize = 6;

/// Numeric rows of a table file plus its optional header.
#[derive(Clone, Debug, PartialEq)]
pub struct RawTable {
    pub delimiter: Delimiter,
    pub headers: Option<Vec<String>>,
    pub rows: Vec<Vec<f64>>,
}

/// One curve read from a table column.
#[derive(Clone, Debug, PartialEq)]
pub struct TableCurve {
    pub label: String,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub visible: bool,
}

fn is_numeric_row(fields: &[String]) -> bool {
    !fields.is_empty() && fields.iter().all(|f| f.parse::<f64>().is_ok())
}

fn parse_row(source: &SourceLine<'_>, delimiter: Delimiter) -> LoaderResult<Vec<f64>> {
    split_fields(source.text, delimiter)
        .into_iter()
        .map(|token| {
            token.parse::<f64>().map_err(|_| LoaderError::Parse {
                line: source.line,
                token,
            })
        })
        .collect()
}

/// Parse delimited text into a [`RawTable`].
pub fn parse_table(text: &str) -> LoaderResult<RawTable> {
    let delimiter = Delimiter::detect(text.lines());
    let lines = extract_data_block(text, delimiter);

    let numeric: Vec<bool> = lines
        .iter()
        .map(|l| is_numeric_row(&split_fields(l.text, delimiter)))
        .collect();
    let (Some(first), Some(last)) = (
        numeric.iter().position(|n| *n),
        numeric.iter().rposition(|n| *n),
    ) else {
        return Err(LoaderError::NoData {
            reason: "no numeric rows",
        });
    };
    if first == last {
        return Err(LoaderError::NoData {
            reason: "need at least two data rows",
        });
    }
    if last + 1 < lines.len() {
        warn!(
            ignored = lines.len() - last - 1,
            "Ignoring trailing non-numeric lines"
        );
    }

    let headers = first
        .checked_sub(1)
        .map(|i| split_fields(lines[i].text, delimiter))
        .filter(|fields| !fields.is_empty() && fields.iter().all(|f| f.parse::<f64>().is_err()));

    let mut rows: Vec<Vec<f64>> = Vec::with_capacity(last - first + 1);
    for source in &lines[first..=last] {
        let row = parse_row(source, delimiter)?;
        if let Some(expected) = rows.first().map(Vec::len) {
            if row.len() != expected {
                return Err(LoaderError::Ragged {
                    line: source.line,
                    expected,
                    found: row.len(),
                });
            }
        }
        rows.push(row);
    }

    debug!(
        delimiter = ?delimiter,
        rows = rows.len(),
        columns = rows.first().map_or(0, Vec::len),
        header = headers.is_some(),
        "Parsed table"
    );
    Ok(RawTable {
        delimiter,
        headers,
        rows,
    })
}

impl RawTable {
    pub fn column_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn column(&self, index: usize) -> Vec<f64> {
        self.rows.iter().filter_map(|r| r.get(index).copied()).collect()
    }

    fn header(&self, index: usize) -> Option<&str> {
        self.headers
            .as_ref()
            .and_then(|h| h.get(index))
            .map(String::as_str)
            .filter(|h| !h.is_empty())
    }

    /// Suggested `(x, y)` axis labels from the first two header names.
    pub fn axis_labels(&self) -> Option<(String, String)> {
        match self.headers.as_deref() {
            Some([x, y, ..]) => Some((x.clone(), y.clone())),
            _ => None,
        }
    }

    /// Split the matrix into curves.
    ///
    /// A single column is plotted against its row index; otherwise column 0
    /// is X and every further column is one curve.
    pub fn curves(&self) -> Vec<TableCurve> {
        let columns = self.column_count();
        if columns == 1 {
            return vec![TableCurve {
                label: self.header(0).unwrap_or("Y").to_string(),
                xs: (0..self.rows.len()).map(|i| i as f64).collect(),
                ys: self.column(0),
                visible: true,
            }];
        }

        let xs = self.column(0);
        let limit_visibility = columns > MAX_VISIBLE_COLUMNS;
        (1..columns)
            .map(|col| TableCurve {
                label: self
                    .header(col)
                    .map_or_else(|| format!("Column {}", col + 1), str::to_string),
                xs: xs.clone(),
                ys: self.column(col),
                visible: !limit_visibility || col == 1,
            })
            .collect()
    }
}
