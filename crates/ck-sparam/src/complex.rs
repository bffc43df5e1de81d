//! Complex helpers for dB/angle data.
//!
//! Conversions spell out the arithmetic (`angle * PI / 180`,
//! `sqrt(re² + im²)`) instead of `to_radians`/`norm`, so results match the
//! reference formulas to the last bit.

use num_complex::Complex64;
use std::f64::consts::PI;

/// Complex value from a magnitude in dB and an angle in degrees.
pub fn from_db_angle(db: f64, angle_deg: f64) -> Complex64 {
    from_mag_angle(10f64.powf(db / 20.0), angle_deg)
}

/// Complex value from a linear magnitude and an angle in degrees.
pub fn from_mag_angle(mag: f64, angle_deg: f64) -> Complex64 {
    let rad = angle_deg * PI / 180.0;
    Complex64::new(mag * rad.cos(), mag * rad.sin())
}

/// Magnitude conversions for complex network parameters.
pub trait ComplexDb {
    /// `sqrt(re² + im²)`
    fn magnitude(&self) -> f64;

    /// `20 · log10(magnitude)`
    fn magnitude_db(&self) -> f64 {
        20.0 * self.magnitude().log10()
    }
}

impl ComplexDb for Complex64 {
    fn magnitude(&self) -> f64 {
        (self.re * self.re + self.im * self.im).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn zero_db_is_unit_magnitude() {
        let z = from_db_angle(0.0, 90.0);
        assert!((z.magnitude() - 1.0).abs() < 1e-15);
        assert!(z.re.abs() < 1e-15);
        assert!((z.im - 1.0).abs() < 1e-15);
    }

    #[test]
    fn minus_twenty_db_is_a_tenth() {
        let z = from_db_angle(-20.0, 0.0);
        assert!((z.re - 0.1).abs() < 1e-15);
        assert!((z.magnitude_db() + 20.0).abs() < 1e-12);
    }

    #[test]
    fn linear_magnitude_angle() {
        let z = from_mag_angle(2.0, 180.0);
        assert!((z.re + 2.0).abs() < 1e-12);
        assert!(z.im.abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn db_round_trip(db in -120.0f64..40.0, angle in -360.0f64..360.0) {
            let z = from_db_angle(db, angle);
            prop_assert!((z.magnitude_db() - db).abs() < 1e-9);
        }
    }
}
