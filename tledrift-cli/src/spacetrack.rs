//! Space-Track.org client: session login and GP history queries.
//!
//! The `gp_history` class returns one OMM row per published element set.
//! Rows come back as CSV ordered by epoch; bookkeeping columns the drift
//! analysis never reads (CCSDS envelope fields, classification markers,
//! file ids) are simply not modeled, so they drop out when rows are
//! re-serialized into the cache.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use tledrift_core::TleRecord;

use crate::error::{CliError, Result};

pub const BASE_URL: &str = "https://www.space-track.org";

/// Epoch timestamps in GP rows, e.g. `2020-01-01T13:00:21.999936`.
const EPOCH_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

// ---------------------------------------------------------------------------
// GP rows
// ---------------------------------------------------------------------------

/// Inclusive epoch window for catalog queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EpochRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl EpochRange {
    /// Space-Track range predicate, e.g. `2020-01-01--2022-01-01`.
    fn query_value(&self) -> String {
        format!(
            "{}--{}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }

    /// Whether an epoch falls inside the window, with the same cut the
    /// server applies to `{start}--{end}`: both bounds are midnight
    /// instants, endpoints inclusive. Filtering a cached file through
    /// this yields the same rows a fresh fetch of the range would.
    pub fn contains(&self, epoch: DateTime<Utc>) -> bool {
        let start = self.start.and_time(NaiveTime::MIN).and_utc();
        let end = self.end.and_time(NaiveTime::MIN).and_utc();
        start <= epoch && epoch <= end
    }
}

/// One general-perturbations row from the `gp_history` class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct GpRecord {
    pub object_name: String,
    pub object_id: Option<String>,
    pub center_name: String,
    pub epoch: String,
    pub mean_motion: f64,
    pub eccentricity: f64,
    pub inclination: f64,
    pub ra_of_asc_node: f64,
    pub arg_of_pericenter: f64,
    pub mean_anomaly: f64,
    pub norad_cat_id: u32,
    pub element_set_no: u32,
    pub rev_at_epoch: u32,
    pub bstar: f64,
    pub mean_motion_dot: f64,
    pub mean_motion_ddot: f64,
    pub semimajor_axis: Option<f64>,
    pub period: Option<f64>,
    pub apoapsis: Option<f64>,
    pub periapsis: Option<f64>,
    pub object_type: Option<String>,
    pub rcs_size: Option<String>,
    pub country_code: Option<String>,
    pub launch_date: Option<String>,
    pub decay_date: Option<String>,
    pub tle_line0: String,
    pub tle_line1: String,
    pub tle_line2: String,
}

impl GpRecord {
    pub fn epoch_utc(&self) -> Result<DateTime<Utc>> {
        let naive = NaiveDateTime::parse_from_str(&self.epoch, EPOCH_FORMAT).map_err(|err| {
            CliError::SpaceTrack(format!("bad EPOCH {:?} in GP row: {err}", self.epoch))
        })?;
        Ok(naive.and_utc())
    }

    /// Convert a catalog row into the element-pair record the core works on.
    pub fn to_tle_record(&self) -> Result<TleRecord> {
        Ok(TleRecord::new(
            self.norad_cat_id,
            self.epoch_utc()?,
            self.tle_line1.as_str(),
            self.tle_line2.as_str(),
        ))
    }
}

pub fn tle_records(rows: &[GpRecord]) -> Result<Vec<TleRecord>> {
    rows.iter().map(GpRecord::to_tle_record).collect()
}

pub fn parse_gp_csv(text: &str) -> Result<Vec<GpRecord>> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Authenticated Space-Track session. Login stores a session cookie on the
/// underlying client; subsequent queries ride on it.
pub struct SpaceTrackClient {
    http: reqwest::Client,
    base_url: String,
}

impl SpaceTrackClient {
    pub fn new() -> Result<Self> {
        Self::with_base_url(BASE_URL)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder().cookie_store(true).build()?;
        Ok(SpaceTrackClient {
            http,
            base_url: base_url.into(),
        })
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<()> {
        let url = format!("{}/ajaxauth/login", self.base_url);
        let response = self
            .http
            .post(&url)
            .form(&[("identity", username), ("password", password)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(CliError::SpaceTrack(format!(
                "login rejected: HTTP {}",
                response.status()
            )));
        }
        log::info!("logged in to {}", self.base_url);
        Ok(())
    }

    /// GP history rows for one object over an epoch window, oldest first.
    pub async fn gp_history(
        &self,
        norad_id: u32,
        range: &EpochRange,
        limit: Option<u32>,
    ) -> Result<Vec<GpRecord>> {
        let mut url = format!(
            "{}/basicspacedata/query/class/gp_history/NORAD_CAT_ID/{norad_id}/EPOCH/{}",
            self.base_url,
            range.query_value()
        );
        if let Some(n) = limit {
            url.push_str(&format!("/limit/{n}"));
        }
        url.push_str("/orderby/EPOCH%20asc/format/csv");

        log::debug!("GET {url}");
        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(CliError::SpaceTrack(format!(
                "gp_history query for {norad_id} failed: HTTP {}",
                response.status()
            )));
        }

        let body = response.text().await?;
        // A bare newline or two is what an overloaded API returns instead
        // of an error status.
        if body.trim().len() <= 2 {
            return Err(CliError::SpaceTrack(format!(
                "empty gp_history response for {norad_id}, possible API overload"
            )));
        }

        let rows = parse_gp_csv(&body)?;
        log::info!("{} GP rows for {norad_id}", rows.len());
        Ok(rows)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    // Header as the API emits it, including envelope columns this client
    // does not model.
    const FIXTURE_CSV: &str = "\
CCSDS_OMM_VERS,COMMENT,OBJECT_NAME,OBJECT_ID,CENTER_NAME,EPOCH,MEAN_MOTION,ECCENTRICITY,INCLINATION,RA_OF_ASC_NODE,ARG_OF_PERICENTER,MEAN_ANOMALY,NORAD_CAT_ID,ELEMENT_SET_NO,REV_AT_EPOCH,BSTAR,MEAN_MOTION_DOT,MEAN_MOTION_DDOT,SEMIMAJOR_AXIS,PERIOD,APOAPSIS,PERIAPSIS,OBJECT_TYPE,RCS_SIZE,COUNTRY_CODE,LAUNCH_DATE,DECAY_DATE,TLE_LINE0,TLE_LINE1,TLE_LINE2
2.0,GENERATED VIA SPACE-TRACK.ORG API,ENVISAT,2002-009A,EARTH,2020-01-01T13:00:22.135968,14.37967408,0.0001257,98.1404,17.3951,86.5901,84.8559,27386,999,93448,0.000015038,0.00000005,0,7143.503,100.155,7144.401,7142.605,PAYLOAD,LARGE,ESA,2002-03-01,,0 ENVISAT,1 27386U 02009A   20001.54192287  .00000005  00000-0  15038-4 0  9994,2 27386  98.1404  17.3951 0001257  86.5901  84.8559 14.37967408934480
2.0,GENERATED VIA SPACE-TRACK.ORG API,ENVISAT,2002-009A,EARTH,2020-01-01T19:41:34.598976,14.37967399,0.0001254,98.1404,17.6591,86.7982,86.1169,27386,999,93452,0.000014345,0.00000003,0,7143.503,100.155,7144.399,7142.607,PAYLOAD,LARGE,ESA,2002-03-01,,0 ENVISAT,1 27386U 02009A   20001.82053934  .00000003  00000-0  14345-4 0  9998,2 27386  98.1404  17.6591 0001254  86.7982  86.1169 14.37967399934527
";

    #[test]
    fn test_parse_gp_csv_skips_unmodeled_columns() {
        let rows = parse_gp_csv(FIXTURE_CSV).unwrap();
        assert_eq!(rows.len(), 2);

        let first = &rows[0];
        assert_eq!(first.object_name, "ENVISAT");
        assert_eq!(first.object_id.as_deref(), Some("2002-009A"));
        assert_eq!(first.norad_cat_id, 27386);
        assert_eq!(first.rev_at_epoch, 93448);
        assert!((first.mean_motion - 14.37967408).abs() < 1e-9);
        assert_eq!(first.decay_date, None, "empty cell should read as None");
        assert!(first.tle_line1.starts_with("1 27386U"));
    }

    #[test]
    fn test_epoch_parses_with_microseconds() {
        let rows = parse_gp_csv(FIXTURE_CSV).unwrap();
        let epoch = rows[0].epoch_utc().unwrap();
        assert_eq!(epoch.year(), 2020);
        assert_eq!(epoch.ordinal(), 1);
        assert_eq!(epoch.hour(), 13);
        assert_eq!(epoch.second(), 22);
        assert_eq!(epoch.nanosecond(), 135_968_000);
    }

    #[test]
    fn test_to_tle_record() {
        let rows = parse_gp_csv(FIXTURE_CSV).unwrap();
        let record = rows[1].to_tle_record().unwrap();
        assert_eq!(record.norad_id, 27386);
        assert_eq!(record.epoch, rows[1].epoch_utc().unwrap());
        assert!(record.line2.starts_with("2 27386"));
    }

    #[test]
    fn test_bad_epoch_is_reported() {
        let mut rows = parse_gp_csv(FIXTURE_CSV).unwrap();
        rows[0].epoch = "not-a-date".to_string();
        let err = rows[0].epoch_utc().unwrap_err();
        assert!(matches!(err, CliError::SpaceTrack(_)));
        assert!(err.to_string().contains("not-a-date"));
    }

    #[test]
    fn test_range_query_value_and_contains() {
        let range = EpochRange {
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        };
        assert_eq!(range.query_value(), "2020-01-01--2022-01-01");

        let inside = parse_gp_csv(FIXTURE_CSV).unwrap()[0].epoch_utc().unwrap();
        assert!(range.contains(inside));
        assert!(!range.contains(inside + chrono::Duration::days(800)));
    }

    #[test]
    fn test_contains_matches_server_epoch_cut() {
        let range = EpochRange {
            start: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        };
        let start_midnight = range.start.and_time(NaiveTime::MIN).and_utc();
        let end_midnight = range.end.and_time(NaiveTime::MIN).and_utc();

        assert!(range.contains(start_midnight));
        assert!(range.contains(end_midnight));
        assert!(
            !range.contains(end_midnight + chrono::Duration::hours(12)),
            "rows later on the end date are outside the server window"
        );
        assert!(!range.contains(start_midnight - chrono::Duration::seconds(1)));
    }
}
