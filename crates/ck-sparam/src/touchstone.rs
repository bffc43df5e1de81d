//! Touchstone-like plain-text files (3-port and 4-port group layouts).
//!
//! `!` starts a comment line, `#` carries the option line
//! (`# <unit> <parameter> <format> R <ref>`); everything else is data.
//! Each frequency point spans several physical lines; data lines are
//! consumed in fixed-size groups.

use crate::complex::{ComplexDb, from_db_angle, from_mag_angle};
use crate::dataset::{FileShape, NetworkParameterDataset};
use crate::error::{SParamError, SParamResult};
use ck_core::hz_to_ghz;
use num_complex::Complex64;
use tracing::warn;

pub const FOUR_PORT_PARAMETERS: [&str; 6] = ["S11", "S22", "S33", "S44", "Ssd21", "Sdd11"];
pub const THREE_PORT_PARAMETERS: [&str; 3] = ["Sdd11", "Ssd21", "Sss22"];

/// One whitespace-split data line with its 1-based source line number.
#[derive(Debug)]
struct DataLine<'a> {
    line: usize,
    tokens: Vec<&'a str>,
}

impl DataLine<'_> {
    fn require(&self, expected: usize) -> SParamResult<()> {
        if self.tokens.len() < expected {
            return Err(SParamError::ShortRow {
                line: self.line,
                expected,
                found: self.tokens.len(),
            });
        }
        Ok(())
    }

    fn number(&self, index: usize) -> SParamResult<f64> {
        let token = self.tokens.get(index).copied().unwrap_or("");
        token.parse::<f64>().map_err(|_| SParamError::Parse {
            line: self.line,
            token: token.to_string(),
        })
    }

    /// dB/angle pair at `index`, `index + 1`.
    fn db_angle(&self, index: usize) -> SParamResult<Complex64> {
        Ok(from_db_angle(self.number(index)?, self.number(index + 1)?))
    }

    /// Linear magnitude/angle pair at `index`, `index + 1`.
    fn mag_angle(&self, index: usize) -> SParamResult<Complex64> {
        Ok(from_mag_angle(self.number(index)?, self.number(index + 1)?))
    }
}

struct Scanned<'a> {
    option_line: Option<&'a str>,
    data: Vec<DataLine<'a>>,
}

fn scan(text: &str) -> Scanned<'_> {
    let mut option_line = None;
    let mut data = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('!') {
            continue;
        }
        if line.starts_with('#') {
            option_line = Some(line);
            continue;
        }
        data.push(DataLine {
            line: idx + 1,
            tokens: line.split_whitespace().collect(),
        });
    }
    Scanned { option_line, data }
}

fn warn_trailing(shape: FileShape, leftover: &[DataLine<'_>]) {
    if let Some(first) = leftover.first() {
        warn!(
            shape = shape.name(),
            line = first.line,
            lines = leftover.len(),
            "Ignoring incomplete trailing frequency group"
        );
    }
}

/// 4-line groups of dB/angle pairs.
///
/// Row 1 is `freq S11 S12 S13 S14`, rows 2..4 are `Sx1 Sx2 Sx3 Sx4`.
/// Besides the four reflections, the mixed-mode terms
/// `Ssd21 = 0.5·(S42 − S43)` and `Sdd11 = 0.5·(S22 − S23 − S32 + S33)`
/// are formed in the complex domain.
pub fn parse_four_port(text: &str) -> SParamResult<NetworkParameterDataset> {
    let scanned = scan(text);
    let mut ds = NetworkParameterDataset::with_parameters(FileShape::FourPort, &FOUR_PORT_PARAMETERS);

    if let Some(option) = scanned.option_line {
        let parts: Vec<&str> = option.split_whitespace().collect();
        if parts.len() >= 4 {
            ds.format = Some(parts[2].to_string());
            ds.reference = Some(parts[3].to_string());
        }
    }

    let mut groups = scanned.data.chunks_exact(4);
    for group in &mut groups {
        let [r1, r2, r3, r4] = group else {
            continue;
        };
        r1.require(9)?;
        r2.require(8)?;
        r3.require(8)?;
        r4.require(8)?;

        let freq = hz_to_ghz(r1.number(0)?);

        let s11 = r1.db_angle(1)?;
        let s22 = r2.db_angle(2)?;
        let s23 = r2.db_angle(4)?;
        let s32 = r3.db_angle(2)?;
        let s33 = r3.db_angle(4)?;
        let s42 = r4.db_angle(2)?;
        let s43 = r4.db_angle(4)?;
        let s44 = r4.db_angle(6)?;

        let ssd21 = 0.5 * (s42 - s43);
        let sdd11 = 0.5 * (s22 - s23 - s32 + s33);

        ds.frequencies_ghz.push(freq);
        ds.push("S11", s11.magnitude_db());
        ds.push("S22", s22.magnitude_db());
        ds.push("S33", s33.magnitude_db());
        ds.push("S44", s44.magnitude_db());
        ds.push("Ssd21", ssd21.magnitude_db());
        ds.push("Sdd11", sdd11.magnitude_db());
    }
    warn_trailing(FileShape::FourPort, groups.remainder());

    Ok(ds)
}

/// 3-line groups of linear magnitude/angle pairs.
///
/// `Sdd11` comes from row 1 (after the frequency), `Ssd21` and `Sss22`
/// from row 3 positions 0..1 and 4..5.
pub fn parse_three_port(text: &str) -> SParamResult<NetworkParameterDataset> {
    let scanned = scan(text);
    let mut ds =
        NetworkParameterDataset::with_parameters(FileShape::ThreePort, &THREE_PORT_PARAMETERS);

    let mut groups = scanned.data.chunks_exact(3);
    for group in &mut groups {
        let [r1, r2, r3] = group else {
            continue;
        };
        r1.require(3)?;
        r2.require(6)?;
        r3.require(6)?;

        let freq = hz_to_ghz(r1.number(0)?);
        let sdd11 = r1.mag_angle(1)?;
        let ssd21 = r3.mag_angle(0)?;
        let sss22 = r3.mag_angle(4)?;

        ds.frequencies_ghz.push(freq);
        ds.push("Sdd11", sdd11.magnitude_db());
        ds.push("Ssd21", ssd21.magnitude_db());
        ds.push("Sss22", sss22.magnitude_db());
    }
    warn_trailing(FileShape::ThreePort, groups.remainder());

    Ok(ds)
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOUR_PORT: &str = "\
! two frequency points
# GHz S DB R 50
1e9  -10 0   -30 0   -40 0   -50 0
     -31 0   -12 0   -41 0   -51 0
     -32 0   -42 0   -13 0   -52 0
     -33 0   -3 10   -3 190  -14 0
2e9  -11 0   -30 0   -40 0   -50 0
     -31 0   -12 0   -41 0   -51 0
     -32 0   -42 0   -13 0   -52 0
     -33 0   -3 10   -3 190  -15 0
";

    #[test]
    fn four_port_reflections_and_options() {
        let ds = parse_four_port(FOUR_PORT).unwrap();
        assert_eq!(ds.len(), 2);
        assert!((ds.frequencies_ghz[1] - 2.0).abs() < 1e-12);
        assert_eq!(ds.format.as_deref(), Some("DB"));
        assert_eq!(ds.reference.as_deref(), Some("R"));

        let s11 = ds.parameter("S11").unwrap();
        assert!((s11[0] + 10.0).abs() < 1e-9);
        assert!((s11[1] + 11.0).abs() < 1e-9);
        assert!((ds.parameter("S22").unwrap()[0] + 12.0).abs() < 1e-9);
        assert!((ds.parameter("S33").unwrap()[0] + 13.0).abs() < 1e-9);
        assert!((ds.parameter("S44").unwrap()[1] + 15.0).abs() < 1e-9);

        for name in FOUR_PORT_PARAMETERS {
            assert_eq!(ds.parameter(name).unwrap().len(), 2, "{name}");
        }
    }

    #[test]
    fn anti_phase_pair_adds_six_db() {
        let ds = parse_four_port(FOUR_PORT).unwrap();
        let ssd21 = ds.parameter("Ssd21").unwrap()[0];
        // 0.5 * |a - (-a)| = |a|
        assert!((ssd21 + 3.0).abs() < 1e-9);
    }

    #[test]
    fn trailing_partial_group_is_dropped() {
        let text = format!("{FOUR_PORT}3e9 -10 0 -30 0 -40 0 -50 0\n");
        let ds = parse_four_port(&text).unwrap();
        assert_eq!(ds.len(), 2);
    }

    #[test]
    fn short_row_reports_line() {
        let text = "\
1e9 -10 0 -30 0 -40 0 -50 0
-31 0 -12 0 -41 0
-32 0 -42 0 -13 0 -52 0
-33 0 -3 10 -3 190 -14 0
";
        match parse_four_port(text) {
            Err(SParamError::ShortRow {
                line,
                expected,
                found,
            }) => {
                assert_eq!(line, 2);
                assert_eq!(expected, 8);
                assert_eq!(found, 6);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bad_token_aborts() {
        let text = FOUR_PORT.replace("-13 0   -52 0\n     -33 0   -3 10   -3 190  -15", "-1x 0   -52 0\n     -33 0   -3 10   -3 190  -15");
        let err = parse_four_port(&text).unwrap_err();
        assert!(matches!(err, SParamError::Parse { ref token, .. } if token == "-1x"));
        assert_eq!(err.line(), Some(9));
    }

    #[test]
    fn three_port_linear_magnitudes() {
        let text = "\
# Hz S MA R 50
1e9 0.1 0 0.5 0 0.5 0
0.5 0 0.2 0 0.5 0
1.0 45 0.5 0 0.01 90
";
        let ds = parse_three_port(text).unwrap();
        assert_eq!(ds.len(), 1);
        assert!((ds.frequencies_ghz[0] - 1.0).abs() < 1e-12);
        assert!((ds.parameter("Sdd11").unwrap()[0] + 20.0).abs() < 1e-9);
        assert!(ds.parameter("Ssd21").unwrap()[0].abs() < 1e-9);
        assert!((ds.parameter("Sss22").unwrap()[0] + 40.0).abs() < 1e-9);
    }
}
