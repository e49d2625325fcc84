//! tledrift-core: TLE sequencing and SGP4 prediction-drift analysis.
//!
//! The pure core behind the `tledrift` CLI: record ordering, epoch
//! conversion, SGP4 propagation, pair-wise drift measurement, and
//! trajectory sampling. No network and no filesystem; every result is a
//! function of the records passed in.

pub mod drift;
pub mod propagator;
pub mod sequence;
pub mod time;
pub mod track;
pub mod types;

// Re-export commonly used types at crate root
pub use drift::{compute_error, compute_errors, compute_errors_strict, DriftSample, PositionError};
pub use propagator::Propagator;
pub use sequence::{TlePair, TleSequence};
pub use time::JulianDate;
pub use track::{sample_track, TrackPoint, TrackWindow};
pub use types::*;
