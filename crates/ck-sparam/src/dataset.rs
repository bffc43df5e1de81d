//! Parsed network-parameter data.

use std::collections::BTreeMap;

/// Layout of the file a dataset was parsed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileShape {
    /// Analyser export, values already in dB.
    Csv,
    /// 3-line groups, linear magnitude + angle.
    ThreePort,
    /// 4-line groups, dB + angle.
    FourPort,
}

impl FileShape {
    pub fn name(self) -> &'static str {
        match self {
            FileShape::Csv => "csv",
            FileShape::ThreePort => "3-port",
            FileShape::FourPort => "4-port",
        }
    }
}

/// Frequency axis plus one magnitude series (dB) per derived parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct NetworkParameterDataset {
    pub shape: FileShape,
    pub frequencies_ghz: Vec<f64>,
    /// Keyed by parameter name (`S11`, `Ssd21`, ...).
    pub magnitudes: BTreeMap<String, Vec<f64>>,
    /// Format token from the `#` option line, when present.
    pub format: Option<String>,
    /// Reference token from the `#` option line, when present.
    pub reference: Option<String>,
}

impl NetworkParameterDataset {
    pub(crate) fn with_parameters(shape: FileShape, names: &[&str]) -> Self {
        Self {
            shape,
            frequencies_ghz: Vec::new(),
            magnitudes: names
                .iter()
                .map(|n| (n.to_string(), Vec::new()))
                .collect(),
            format: None,
            reference: None,
        }
    }

    pub(crate) fn push(&mut self, parameter: &str, value: f64) {
        self.magnitudes
            .entry(parameter.to_string())
            .or_default()
            .push(value);
    }

    pub fn len(&self) -> usize {
        self.frequencies_ghz.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies_ghz.is_empty()
    }

    pub fn parameter(&self, name: &str) -> Option<&[f64]> {
        self.magnitudes.get(name).map(Vec::as_slice)
    }

    pub fn parameter_names(&self) -> impl Iterator<Item = &str> {
        self.magnitudes.keys().map(String::as_str)
    }

    /// Sample count per parameter.
    pub fn curve_lengths(&self) -> BTreeMap<String, usize> {
        self.magnitudes
            .iter()
            .map(|(k, v)| (k.clone(), v.len()))
            .collect()
    }

    /// `(parameter, frequencies_ghz, magnitudes)`, sorted by parameter name.
    pub fn into_series(self) -> Vec<(String, Vec<f64>, Vec<f64>)> {
        let freqs = self.frequencies_ghz;
        self.magnitudes
            .into_iter()
            .map(|(name, mags)| (name, freqs.clone(), mags))
            .collect()
    }
}
