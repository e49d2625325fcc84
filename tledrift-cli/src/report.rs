//! Drift and track reports: CSV output plus summary statistics.

use std::path::Path;

use chrono::{DateTime, Utc};

use tledrift_core::{DriftSample, TrackPoint};

use crate::error::Result;

/// Timestamps in report CSVs keep the microseconds the GP epochs carry.
const EPOCH_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

// ---------------------------------------------------------------------------
// CSV writers
// ---------------------------------------------------------------------------

/// One row per element pair. Failed pairs keep their row with the numeric
/// cells empty and the failure text in STATUS, so gaps stay visible.
pub fn write_drift_csv(path: &Path, samples: &[DriftSample]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "NORAD_CAT_ID",
        "EPOCH",
        "ELAPSED_S",
        "ERROR_X_KM",
        "ERROR_Y_KM",
        "ERROR_Z_KM",
        "MAGNITUDE_KM",
        "STATUS",
    ])?;

    for sample in samples {
        let epoch = sample.epoch.format(EPOCH_FORMAT).to_string();
        let row = match &sample.error {
            Ok(error) => [
                sample.norad_id.to_string(),
                epoch,
                format!("{:.3}", sample.elapsed_seconds),
                format!("{:.6}", error.error_km.x),
                format!("{:.6}", error.error_km.y),
                format!("{:.6}", error.error_km.z),
                format!("{:.6}", error.magnitude_km),
                "ok".to_string(),
            ],
            Err(err) => [
                sample.norad_id.to_string(),
                epoch,
                format!("{:.3}", sample.elapsed_seconds),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                err.to_string(),
            ],
        };
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

pub fn write_track_csv(path: &Path, points: &[TrackPoint]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "EPOCH", "MINUTES", "RX_KM", "RY_KM", "RZ_KM", "VX_KM_S", "VY_KM_S", "VZ_KM_S",
    ])?;

    for point in points {
        writer.write_record(&[
            point.epoch.format(EPOCH_FORMAT).to_string(),
            format!("{:.3}", point.minutes_from_epoch),
            format!("{:.6}", point.position_km.x),
            format!("{:.6}", point.position_km.y),
            format!("{:.6}", point.position_km.z),
            format!("{:.6}", point.velocity_km_s.x),
            format!("{:.6}", point.velocity_km_s.y),
            format!("{:.6}", point.velocity_km_s.z),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Summary statistics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct DriftStats {
    pub pairs: usize,
    pub failures: usize,
    pub mean_magnitude_km: Option<f64>,
    pub max_magnitude_km: Option<f64>,
    /// Epoch of the worst pair.
    pub max_epoch: Option<DateTime<Utc>>,
}

pub fn drift_stats(samples: &[DriftSample]) -> DriftStats {
    let mut failures = 0;
    let mut sum = 0.0;
    let mut count = 0usize;
    let mut max: Option<(f64, DateTime<Utc>)> = None;

    for sample in samples {
        match &sample.error {
            Ok(error) => {
                sum += error.magnitude_km;
                count += 1;
                if max.map_or(true, |(worst, _)| error.magnitude_km > worst) {
                    max = Some((error.magnitude_km, sample.epoch));
                }
            }
            Err(_) => failures += 1,
        }
    }

    DriftStats {
        pairs: samples.len(),
        failures,
        mean_magnitude_km: (count > 0).then(|| sum / count as f64),
        max_magnitude_km: max.map(|(worst, _)| worst),
        max_epoch: max.map(|(_, at)| at),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
