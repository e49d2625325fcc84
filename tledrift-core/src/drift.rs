//! Prediction-drift engine: propagate each record to its successor's epoch
//! and measure the position error against the successor's own state.
//!
//! For a pair (P, S): initialize SGP4 from both element sets, evaluate both
//! at S's epoch, and report `r_S − r_P` in kilometers. S propagates zero
//! minutes from its own epoch and stands in for the observed state; P
//! crosses the full gap and carries the model drift.

use chrono::{DateTime, Utc};
use nalgebra::Vector3;
use serde::Serialize;

use crate::propagator::Propagator;
use crate::sequence::{TlePair, TleSequence};
use crate::types::{RecordRole, Result};

/// Position error of one consecutive pair, evaluated at the successor
/// epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PositionError {
    /// Ground truth minus prediction, TEME frame, kilometers.
    pub error_km: Vector3<f64>,
    /// Euclidean norm of `error_km`. Always ≥ 0.
    pub magnitude_km: f64,
}

/// One slot of a drift report: the successor's identity plus the outcome.
///
/// A failed pair keeps its slot; batch output never drops a pair silently.
#[derive(Debug, Clone)]
pub struct DriftSample {
    pub norad_id: u32,
    /// Epoch of the successor record, the key for downstream reporting.
    pub epoch: DateTime<Utc>,
    /// Gap the predecessor was propagated across, seconds.
    pub elapsed_seconds: f64,
    pub error: Result<PositionError>,
}

/// Propagation error for a single (predecessor, successor) pair.
///
/// Both states are initialized fresh per call; nothing is shared between
/// pairs and the wall clock is never consulted.
pub fn compute_error(pair: &TlePair<'_>) -> Result<PositionError> {
    let predecessor = Propagator::new(pair.predecessor, RecordRole::Predecessor)?;
    let successor = Propagator::new(pair.successor, RecordRole::Successor)?;

    // Both states are evaluated at the successor's own decoded epoch.
    let target = successor.epoch();
    let r_pred = predecessor.position_at(&target)?;
    let r_succ = successor.position_at(&target)?;

    let error_km = r_succ - r_pred;
    Ok(PositionError {
        error_km,
        magnitude_km: error_km.norm(),
    })
}

/// Drift for every consecutive pair of a sequence, in chronological order.
///
/// Failures stay in their slot and the batch keeps going; SGP4 failures
/// are deterministic, so there is nothing to retry. Sequences with fewer
/// than two records produce an empty report.
pub fn compute_errors(sequence: &TleSequence) -> Vec<DriftSample> {
    sequence
        .pairs()
        .map(|pair| DriftSample {
            norad_id: pair.successor.norad_id,
            epoch: pair.successor.epoch,
            elapsed_seconds: pair.elapsed_seconds,
            error: compute_error(&pair),
        })
        .collect()
}

/// Fail-fast variant of [`compute_errors`]: the first failing pair aborts
/// the batch.
pub fn compute_errors_strict(sequence: &TleSequence) -> Result<Vec<DriftSample>> {
    let mut samples = Vec::new();
    for pair in sequence.pairs() {
        let error = compute_error(&pair)?;
        samples.push(DriftSample {
            norad_id: pair.successor.norad_id,
            epoch: pair.successor.epoch,
            elapsed_seconds: pair.elapsed_seconds,
            error: Ok(error),
        });
    }
    Ok(samples)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
