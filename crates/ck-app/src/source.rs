//! Reading a data file into curves, whatever its format.

use crate::error::{AppError, AppResult};
use ck_sparam::FileShape;
use ck_sparam::csv::FREQUENCY_HEADER;
use std::path::Path;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceKind {
    NetworkParameters(FileShape),
    Table,
}

/// One curve read from a file, before it joins a curve set.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedCurve {
    pub label: String,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
    pub visible: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ParsedSource {
    pub kind: SourceKind,
    pub curves: Vec<ParsedCurve>,
    /// Suggested `(x, y)` axis labels from a table header.
    pub axis_labels: Option<(String, String)>,
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase()
}

/// Format for `path`, given its contents. A `.csv` is a network-parameter
/// export only when it carries the `Freq(Hz)` header.
pub fn classify(path: &Path, text: &str) -> AppResult<SourceKind> {
    let ext = extension(path);
    match ext.as_str() {
        "csv" if text.contains(FREQUENCY_HEADER) => Ok(SourceKind::NetworkParameters(FileShape::Csv)),
        "csv" | "txt" => Ok(SourceKind::Table),
        "s3p" | "s2p" | "s4p" | "s" => ck_sparam::shape_for_path(path)
            .map(SourceKind::NetworkParameters)
            .map_err(|source| AppError::SParam {
                path: path.to_path_buf(),
                source,
            }),
        _ => Err(AppError::UnsupportedFile {
            path: path.to_path_buf(),
            ext,
        }),
    }
}

/// Parse `text` as the format `kind`. Only the first curve of a
/// network-parameter file starts visible.
pub fn parse_source(path: &Path, text: &str, kind: SourceKind) -> AppResult<ParsedSource> {
    match kind {
        SourceKind::NetworkParameters(shape) => {
            let dataset = ck_sparam::parse_str(text, shape).map_err(|source| AppError::SParam {
                path: path.to_path_buf(),
                source,
            })?;
            let curves = dataset
                .into_series()
                .into_iter()
                .enumerate()
                .map(|(i, (label, xs, ys))| ParsedCurve {
                    label,
                    xs,
                    ys,
                    visible: i == 0,
                })
                .collect();
            Ok(ParsedSource {
                kind,
                curves,
                axis_labels: None,
            })
        }
        SourceKind::Table => {
            let table = ck_loader::parse_table(text).map_err(|source| AppError::Table {
                path: path.to_path_buf(),
                source,
            })?;
            let curves = table
                .curves()
                .into_iter()
                .map(|c| ParsedCurve {
                    label: c.label,
                    xs: c.xs,
                    ys: c.ys,
                    visible: c.visible,
                })
                .collect();
            Ok(ParsedSource {
                kind,
                curves,
                axis_labels: table.axis_labels(),
            })
        }
    }
}

pub fn read_source(path: &Path) -> AppResult<ParsedSource> {
    let text = std::fs::read_to_string(path).map_err(|source| AppError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let kind = classify(path, &text)?;
    let parsed = parse_source(path, &text, kind)?;
    debug!(path = %path.display(), ?kind, curves = parsed.curves.len(), "Read source");
    Ok(parsed)
}
