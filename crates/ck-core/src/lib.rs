//! ck-core: stable foundation for curvekit.
//!
//! Contains:
//! - units (uom frequency type + Hz/GHz helpers)
//! - numeric (float helpers)
//! - ids (compact handles for curves and probe labels)

pub mod ids;
pub mod numeric;
pub mod units;

pub use ids::*;
pub use numeric::*;
pub use units::*;
