// ck-core/src/units.rs

use uom::si::f64::Frequency as UomFrequency;

// Public canonical unit types (SI, f64)
pub type Frequency = UomFrequency;

#[inline]
pub fn hz(v: f64) -> Frequency {
    use uom::si::frequency::hertz;
    Frequency::new::<hertz>(v)
}

#[inline]
pub fn ghz(v: f64) -> Frequency {
    use uom::si::frequency::gigahertz;
    Frequency::new::<gigahertz>(v)
}

/// Value of `f` expressed in gigahertz.
#[inline]
pub fn in_ghz(f: Frequency) -> f64 {
    use uom::si::frequency::gigahertz;
    f.get::<gigahertz>()
}

/// Raw hertz reading converted straight to gigahertz.
#[inline]
pub fn hz_to_ghz(v: f64) -> f64 {
    in_ghz(hz(v))
}
