//! Trajectory sampling: one element set evaluated across a time window.
//!
//! One SGP4 initialization serves every sample point, which is what makes
//! dense orbit traces cheap. The window is given either as whole orbital
//! periods from the element epoch or as explicit second offsets around it.

use chrono::{DateTime, Duration, Utc};
use nalgebra::Vector3;
use serde::Serialize;

use crate::propagator::Propagator;
use crate::types::{DriftError, RecordRole, Result, TleRecord};

/// Most points one track may hold; windows that resolve to more are
/// rejected as invalid.
pub const MAX_SAMPLES: usize = 5_000_000;

/// Sampling window relative to an element set's own epoch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackWindow {
    start_offset_s: f64,
    extent: Extent,
    step_s: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Extent {
    /// Window length as a multiple of the orbital period.
    Periods(f64),
    /// Explicit end offset in seconds from the epoch.
    Until(f64),
}

impl TrackWindow {
    /// Whole orbital periods from the epoch at `step_s`-second spacing.
    pub fn periods(count: f64, step_s: f64) -> Result<Self> {
        if !count.is_finite() || count <= 0.0 {
            return Err(DriftError::InvalidWindow(format!(
                "period count must be positive, got {count}"
            )));
        }
        Self::validate_step(step_s)?;
        Ok(TrackWindow {
            start_offset_s: 0.0,
            extent: Extent::Periods(count),
            step_s,
        })
    }

    /// Explicit [start, end] second offsets around the epoch.
    ///
    /// Offsets may be negative (sampling before the epoch); `end_s` must
    /// be strictly greater than `start_s`.
    pub fn offsets(start_s: f64, end_s: f64, step_s: f64) -> Result<Self> {
        if !start_s.is_finite() || !end_s.is_finite() || end_s <= start_s {
            return Err(DriftError::InvalidWindow(format!(
                "window [{start_s}, {end_s}] s is empty or inverted"
            )));
        }
        Self::validate_step(step_s)?;
        Ok(TrackWindow {
            start_offset_s: start_s,
            extent: Extent::Until(end_s),
            step_s,
        })
    }

    pub fn step_seconds(&self) -> f64 {
        self.step_s
    }

    fn validate_step(step_s: f64) -> Result<()> {
        if !step_s.is_finite() || step_s <= 0.0 {
            return Err(DriftError::InvalidWindow(format!(
                "step must be positive, got {step_s} s"
            )));
        }
        Ok(())
    }

    /// Concrete (start, end) offsets for a given state, seconds.
    fn bounds_for(&self, propagator: &Propagator) -> Result<(f64, f64)> {
        match self.extent {
            Extent::Until(end_s) => Ok((self.start_offset_s, end_s)),
            Extent::Periods(count) => {
                let period_s = propagator.period_seconds();
                if !period_s.is_finite() || period_s <= 0.0 {
                    return Err(DriftError::InvalidWindow(format!(
                        "unusable orbital period: {period_s} s"
                    )));
                }
                Ok((0.0, period_s * count))
            }
        }
    }
}

/// One sampled point of a trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrackPoint {
    pub epoch: DateTime<Utc>,
    /// Offset from the element epoch, minutes.
    pub minutes_from_epoch: f64,
    /// TEME position, kilometers.
    pub position_km: Vector3<f64>,
    /// TEME velocity, kilometers per second.
    pub velocity_km_s: Vector3<f64>,
}

/// Sample positions and velocities across the window.
///
/// The element set is initialized once and evaluated at every step, start
/// and end inclusive. A window that resolves to more than [`MAX_SAMPLES`]
/// points is rejected as [`DriftError::InvalidWindow`]. Any SGP4 error
/// aborts the whole sample; a trace with missing or garbage points is
/// worse than no trace.
pub fn sample_track(record: &TleRecord, window: &TrackWindow) -> Result<Vec<TrackPoint>> {
    let propagator = Propagator::new(record, RecordRole::Standalone)?;
    let (start_s, end_s) = window.bounds_for(&propagator)?;

    let epoch = propagator.epoch();
    let epoch_utc = propagator.epoch_utc();
    let steps_f = ((end_s - start_s) / window.step_s).floor();
    if steps_f >= MAX_SAMPLES as f64 {
        return Err(DriftError::InvalidWindow(format!(
            "window needs {steps_f:.0} steps of {} s, cap is {MAX_SAMPLES}",
            window.step_s
        )));
    }
    let steps = steps_f as usize;

    let mut points = Vec::with_capacity(steps + 1);
    for i in 0..=steps {
        let offset_s = start_s + i as f64 * window.step_s;
        let t = epoch.offset_seconds(offset_s);
        let (position_km, velocity_km_s) = propagator.state_at(&t)?;
        points.push(TrackPoint {
            epoch: epoch_utc + Duration::microseconds((offset_s * 1e6).round() as i64),
            minutes_from_epoch: offset_s / 60.0,
            position_km,
            velocity_km_s,
        });
    }
    Ok(points)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const LINE1: &str = "1 27386U 02009A   20001.54192287  .00000005  00000-0  15038-4 0  9994";
    const LINE2: &str = "2 27386  98.1404  17.3951 0001257  86.5901  84.8559 14.37967408934480";

    fn reference() -> TleRecord {
        TleRecord::from_lines(LINE1, LINE2).unwrap()
    }

    #[test]
    fn test_window_validation() {
        assert!(TrackWindow::periods(0.0, 1.0).is_err());
        assert!(TrackWindow::periods(-2.0, 1.0).is_err());
        assert!(TrackWindow::periods(1.0, 0.0).is_err());
        assert!(TrackWindow::periods(f64::NAN, 1.0).is_err());
        assert!(TrackWindow::offsets(60.0, 60.0, 1.0).is_err());
        assert!(TrackWindow::offsets(120.0, 60.0, 1.0).is_err());
        assert!(TrackWindow::offsets(0.0, 60.0, -1.0).is_err());
        assert!(TrackWindow::offsets(0.0, 60.0, 10.0).is_ok());
    }

    #[test]
    fn test_point_count_and_spacing() {
        let window = TrackWindow::offsets(0.0, 60.0, 10.0).unwrap();
        let points = sample_track(&reference(), &window).unwrap();
        assert_eq!(points.len(), 7); // 0, 10, ..., 60 s inclusive
        assert_eq!(points[0].minutes_from_epoch, 0.0);
        assert!((points[6].minutes_from_epoch - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_track_starts_at_epoch() {
        let window = TrackWindow::offsets(0.0, 120.0, 60.0).unwrap();
        let points = sample_track(&reference(), &window).unwrap();
        let prop = Propagator::new(&reference(), RecordRole::Standalone).unwrap();
        assert_eq!(points[0].epoch, prop.epoch_utc());
        assert_eq!(
            points[0].position_km,
            prop.position_at(&prop.epoch()).unwrap()
        );
    }

    #[test]
    fn test_one_period_stays_in_orbit_band() {
        let window = TrackWindow::periods(1.0, 60.0).unwrap();
        let points = sample_track(&reference(), &window).unwrap();
        // ~6009 s period at 60 s steps: 101 inclusive samples.
        assert!(
            (95..=105).contains(&points.len()),
            "expected ~101 points, got {}",
            points.len()
        );
        for p in &points {
            let radius = p.position_km.norm();
            assert!(
                (6_800.0..7_500.0).contains(&radius),
                "near-circular orbit left its radius band: {radius} km at {} min",
                p.minutes_from_epoch
            );
        }
    }

    #[test]
    fn test_window_before_epoch() {
        let window = TrackWindow::offsets(-120.0, 0.0, 60.0).unwrap();
        let points = sample_track(&reference(), &window).unwrap();
        assert_eq!(points.len(), 3);
        assert!(points[0].minutes_from_epoch < 0.0);
        assert!(points[0].epoch < points[2].epoch);
    }

    #[test]
    fn test_malformed_record_fails_standalone() {
        let bad = TleRecord::new(27386, reference().epoch, "1 junk", LINE2);
        let window = TrackWindow::periods(1.0, 60.0).unwrap();
        let err = sample_track(&bad, &window).unwrap_err();
        match err {
            DriftError::MalformedElements { role, .. } => {
                assert_eq!(role, RecordRole::Standalone);
            }
            other => panic!("expected MalformedElements, got {other}"),
        }
    }

    #[test]
    fn test_oversized_window_is_rejected() {
        // Must come back as an invalid window, not an allocation attempt.
        let window = TrackWindow::offsets(0.0, 1e18, 1.0).unwrap();
        let err = sample_track(&reference(), &window).unwrap_err();
        match err {
            DriftError::InvalidWindow(_) => {}
            other => panic!("expected InvalidWindow, got {other}"),
        }

        let window = TrackWindow::periods(1e15, 1.0).unwrap();
        let err = sample_track(&reference(), &window).unwrap_err();
        match err {
            DriftError::InvalidWindow(_) => {}
            other => panic!("expected InvalidWindow, got {other}"),
        }
    }
}
