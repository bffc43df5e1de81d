//! Analyser CSV exports.
//!
//! Data starts after the first line containing `Freq(Hz)`. Columns 1..3 are
//! already in dB and are copied through unchanged.

use crate::dataset::{FileShape, NetworkParameterDataset};
use crate::error::{SParamError, SParamResult};
use ck_core::hz_to_ghz;
use csv::{ReaderBuilder, Trim};

pub const FREQUENCY_HEADER: &str = "Freq(Hz)";

/// Column title → parameter name, in column order after the frequency.
pub const COLUMN_MAP: [(&str, &str); 3] = [
    ("S22 Log Mag(dB)", "S22"),
    ("Sdd11 Log Mag(dB)", "S11"),
    ("Ssd21 Log Mag(dB)", "Ssd21"),
];

fn number(line: usize, token: &str) -> SParamResult<f64> {
    token.parse::<f64>().map_err(|_| SParamError::Parse {
        line,
        token: token.to_string(),
    })
}

pub fn parse_csv(text: &str) -> SParamResult<NetworkParameterDataset> {
    let names: Vec<&str> = COLUMN_MAP.iter().map(|(_, name)| *name).collect();
    let mut ds = NetworkParameterDataset::with_parameters(FileShape::Csv, &names);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());
    let mut in_data = !text.contains(FREQUENCY_HEADER);

    for record in reader.records() {
        let record = record?;
        if !in_data {
            in_data = record.iter().any(|f| f.contains(FREQUENCY_HEADER));
            continue;
        }
        if record.len() < 4 {
            continue;
        }
        let line_no = record.position().map_or(0, |p| p.line() as usize);
        let freq = hz_to_ghz(number(line_no, &record[0])?);
        let values = [
            number(line_no, &record[1])?,
            number(line_no, &record[2])?,
            number(line_no, &record[3])?,
        ];
        ds.frequencies_ghz.push(freq);
        for (name, value) in names.iter().zip(values) {
            ds.push(name, value);
        }
    }

    Ok(ds)
}
