//! ck-sparam: network-parameter (S-parameter) file parsing.
//!
//! Turns Touchstone-like text files and analyser CSV exports into
//! per-parameter magnitude series (dB) over a frequency axis in GHz.
//! Differential parameters are formed in the complex domain before the
//! conversion back to dB.

pub mod complex;
pub mod csv;
pub mod dataset;
pub mod error;
pub mod parser;
pub mod touchstone;

pub use complex::{ComplexDb, from_db_angle, from_mag_angle};
pub use dataset::{FileShape, NetworkParameterDataset};
pub use error::{SParamError, SParamResult};
pub use parser::{parse_file, parse_str, shape_for_path};
