//! Shared types and the error enum for tledrift-core.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// All errors produced by tledrift-core.
#[derive(Debug, Clone, Error)]
pub enum DriftError {
    /// SGP4 rejected the element lines at initialization (format,
    /// checksum, or internal-consistency failure).
    #[error("{role} element lines rejected: {reason}")]
    MalformedElements { role: RecordRole, reason: String },
    /// SGP4 returned an error status when evaluated at a requested epoch
    /// (decayed orbit, numerical divergence).
    #[error("propagation failed for {role} state: {reason}")]
    Propagation { role: RecordRole, reason: String },
    /// Trajectory sampling window is empty, inverted, or non-finite.
    #[error("invalid sampling window: {0}")]
    InvalidWindow(String),
}

pub type Result<T> = std::result::Result<T, DriftError>;

// ---------------------------------------------------------------------------
// Record roles
// ---------------------------------------------------------------------------

/// Which orbital state an error is attributed to.
///
/// Drift computation holds two states at once; a failure must name the one
/// that broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RecordRole {
    /// Earlier record of a pair, propagated forward across the gap.
    Predecessor,
    /// Later record of a pair, evaluated at its own epoch as ground truth.
    Successor,
    /// A record used on its own (trajectory sampling, ad-hoc checks).
    Standalone,
}

impl std::fmt::Display for RecordRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordRole::Predecessor => write!(f, "predecessor"),
            RecordRole::Successor => write!(f, "successor"),
            RecordRole::Standalone => write!(f, "standalone"),
        }
    }
}

// ---------------------------------------------------------------------------
// TLE record
// ---------------------------------------------------------------------------

/// One observed orbital state: a matched pair of element lines valid at a
/// single epoch.
///
/// `line1`/`line2` must encode the same object and epoch; mismatched or
/// corrupt pairs are rejected by SGP4 initialization, not here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TleRecord {
    /// Catalog number, the object identity key.
    pub norad_id: u32,
    /// Instant the element lines are valid for (UTC).
    pub epoch: DateTime<Utc>,
    pub line1: String,
    pub line2: String,
}

impl TleRecord {
    pub fn new(
        norad_id: u32,
        epoch: DateTime<Utc>,
        line1: impl Into<String>,
        line2: impl Into<String>,
    ) -> Self {
        TleRecord {
            norad_id,
            epoch,
            line1: line1.into(),
            line2: line2.into(),
        }
    }

    /// Build a record from bare element lines, taking the identity and
    /// epoch from the lines themselves.
    pub fn from_lines(line1: &str, line2: &str) -> Result<Self> {
        let elements = sgp4::Elements::from_tle(None, line1.as_bytes(), line2.as_bytes())
            .map_err(|err| DriftError::MalformedElements {
                role: RecordRole::Standalone,
                reason: err.to_string(),
            })?;
        Ok(TleRecord {
            norad_id: elements.norad_id as u32,
            epoch: elements.datetime.and_utc(),
            line1: line1.to_owned(),
            line2: line2.to_owned(),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    const LINE1: &str = "1 27386U 02009A   20001.54192287  .00000005  00000-0  15038-4 0  9994";
    const LINE2: &str = "2 27386  98.1404  17.3951 0001257  86.5901  84.8559 14.37967408934480";

    #[test]
    fn test_from_lines_identity() {
        let record = TleRecord::from_lines(LINE1, LINE2).unwrap();
        assert_eq!(record.norad_id, 27386);
        assert_eq!(record.epoch.year(), 2020);
        assert_eq!(record.epoch.ordinal(), 1);
        assert_eq!(record.line1, LINE1);
    }

    #[test]
    fn test_from_lines_rejects_truncated() {
        let err = TleRecord::from_lines(&LINE1[..40], LINE2).unwrap_err();
        match err {
            DriftError::MalformedElements { role, .. } => {
                assert_eq!(role, RecordRole::Standalone);
            }
            other => panic!("expected MalformedElements, got {other}"),
        }
    }

    #[test]
    fn test_role_display() {
        assert_eq!(RecordRole::Predecessor.to_string(), "predecessor");
        assert_eq!(RecordRole::Successor.to_string(), "successor");
        assert_eq!(RecordRole::Standalone.to_string(), "standalone");
    }
}
