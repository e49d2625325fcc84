//! SGP4 propagator state for a single element set.
//!
//! Wraps `sgp4::Elements` + `sgp4::Constants` together with the epoch
//! decoded from the element lines. Initialization and evaluation failures
//! carry the role of the record they belong to, so a caller juggling two
//! states knows which one broke.

use chrono::{DateTime, Utc};
use nalgebra::Vector3;

use crate::time::{JulianDate, SECONDS_PER_DAY};
use crate::types::{DriftError, RecordRole, Result, TleRecord};

/// An initialized SGP4 state, ready to evaluate at arbitrary instants.
#[derive(Debug)]
pub struct Propagator {
    role: RecordRole,
    elements: sgp4::Elements,
    constants: sgp4::Constants,
    epoch: JulianDate,
}

impl Propagator {
    /// Initialize SGP4 from a record's element lines.
    ///
    /// The epoch is decoded from the lines themselves. A record whose
    /// `epoch` field disagrees with its lines is SGP4's to reject, not
    /// ours to patch up.
    pub fn new(record: &TleRecord, role: RecordRole) -> Result<Self> {
        let elements =
            sgp4::Elements::from_tle(None, record.line1.as_bytes(), record.line2.as_bytes())
                .map_err(|err| DriftError::MalformedElements {
                    role,
                    reason: err.to_string(),
                })?;
        let constants =
            sgp4::Constants::from_elements(&elements).map_err(|err| {
                DriftError::MalformedElements {
                    role,
                    reason: err.to_string(),
                }
            })?;
        let epoch = JulianDate::from_datetime(&elements.datetime);
        Ok(Propagator {
            role,
            elements,
            constants,
            epoch,
        })
    }

    /// Epoch decoded from the element lines, as a two-part Julian date.
    pub fn epoch(&self) -> JulianDate {
        self.epoch
    }

    /// Epoch decoded from the element lines, UTC.
    pub fn epoch_utc(&self) -> DateTime<Utc> {
        self.elements.datetime.and_utc()
    }

    /// Catalog number from the element lines.
    pub fn norad_id(&self) -> u32 {
        self.elements.norad_id as u32
    }

    /// Orbital period from the mean motion (rev/day), in seconds.
    pub fn period_seconds(&self) -> f64 {
        SECONDS_PER_DAY / self.elements.mean_motion
    }

    /// TEME position in kilometers at the given instant.
    pub fn position_at(&self, t: &JulianDate) -> Result<Vector3<f64>> {
        Ok(self.state_at(t)?.0)
    }

    /// TEME position and velocity (km, km/s) at the given instant.
    ///
    /// An SGP4 error status (decayed orbit, diverging solution) surfaces
    /// as [`DriftError::Propagation`], never as a zero or NaN vector.
    pub fn state_at(&self, t: &JulianDate) -> Result<(Vector3<f64>, Vector3<f64>)> {
        let minutes = self.epoch.minutes_until(t);
        let prediction = self
            .constants
            .propagate(sgp4::MinutesSinceEpoch(minutes))
            .map_err(|err| DriftError::Propagation {
                role: self.role,
                reason: err.to_string(),
            })?;
        let [x, y, z] = prediction.position;
        let [vx, vy, vz] = prediction.velocity;
        Ok((Vector3::new(x, y, z), Vector3::new(vx, vy, vz)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
