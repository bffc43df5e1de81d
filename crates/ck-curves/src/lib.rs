//! ck-curves: curve records, content identity and the derived-series pipeline.
//!
//! [`CurveSet`] is the single owner of every loaded curve. Mutations go
//! through its setters, which report what became stale; [`CurveSet::recompute`]
//! then enforces the operation rules across the whole set and refreshes
//! derived caches in one pass.

pub mod error;
pub mod graph;
pub mod identity;
pub mod naming;
pub mod palette;
pub mod pipeline;
pub mod record;
pub mod set;
pub mod style;

pub use error::{CurvesError, CurvesResult};
pub use graph::GraphDiagnostic;
pub use identity::{CurveIdentity, content_identity, generate_identity};
pub use record::{CurveRecord, NewCurve, OperationKind};
pub use set::{CurveSet, Invalidation, RecomputeReport, StreamAppend};
pub use style::{CurveStyle, LineStyle, Rgba};
