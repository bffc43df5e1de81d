//! Compact number formatting for probe labels and tick text.

/// `0` → `"0"`; `|v| < 0.01` or `|v| > 100` → scientific with 3 significant
/// digits (`1.23E+4`, `5E-3`); otherwise up to 3 decimals. Trailing zeros
/// are trimmed in both forms.
pub fn format_compact(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude < 0.01 || magnitude > 100.0 {
        scientific(value)
    } else {
        trim_fraction(format!("{value:.3}"))
    }
}

fn scientific(value: f64) -> String {
    let raw = format!("{value:.2e}");
    let Some((mantissa, exponent)) = raw.split_once('e') else {
        return raw;
    };
    let mantissa = trim_fraction(mantissa.to_string());
    match exponent.parse::<i32>() {
        Ok(e) if e < 0 => format!("{mantissa}E-{}", -e),
        Ok(e) => format!("{mantissa}E+{e}"),
        Err(_) => raw,
    }
}

fn trim_fraction(mut s: String) -> String {
    if s.contains('.') {
        let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
        s.truncate(trimmed);
    }
    if s == "-0" {
        s.remove(0);
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_range() {
        assert_eq!(format_compact(1.0), "1");
        assert_eq!(format_compact(12.3456), "12.346");
        assert_eq!(format_compact(0.5), "0.5");
        assert_eq!(format_compact(-3.25), "-3.25");
        assert_eq!(format_compact(100.0), "100");
        assert_eq!(format_compact(0.01), "0.01");
    }

    #[test]
    fn scientific_range() {
        assert_eq!(format_compact(12345.0), "1.23E+4");
        assert_eq!(format_compact(0.005), "5E-3");
        assert_eq!(format_compact(-0.000123), "-1.23E-4");
        assert_eq!(format_compact(1.0e9), "1E+9");
        assert_eq!(format_compact(99999.0), "1E+5");
        assert_eq!(format_compact(250.0), "2.5E+2");
    }

    #[test]
    fn zero_and_non_finite() {
        assert_eq!(format_compact(0.0), "0");
        assert_eq!(format_compact(-0.0), "0");
        assert_eq!(format_compact(f64::NAN), "NaN");
        assert_eq!(format_compact(f64::INFINITY), "inf");
    }
}
