//! Float helpers shared by the probe and the front ends.

/// Minimum and maximum of the finite values in `values`.
///
/// Returns `None` when there is no finite value at all.
pub fn finite_range(values: &[f64]) -> Option<(f64, f64)> {
    values
        .iter()
        .copied()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn finite_range_skips_nan() {
        assert_eq!(finite_range(&[3.0, f64::NAN, -1.0, 7.5]), Some((-1.0, 7.5)));
        assert_eq!(finite_range(&[f64::NAN, f64::INFINITY]), None);
        assert_eq!(finite_range(&[]), None);
    }

    proptest! {
        #[test]
        fn finite_range_brackets_every_value(values in prop::collection::vec(-1e6f64..1e6, 1..64)) {
            let (lo, hi) = finite_range(&values).unwrap();
            for v in &values {
                prop_assert!(lo <= *v && *v <= hi);
            }
        }
    }
}
