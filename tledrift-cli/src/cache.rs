//! On-disk catalog cache.
//!
//! Layout under the data dir:
//!   gp/{norad_id}.csv        GP history rows, one file per object
//!   discos/{launch_id}.json  DISCOS objects, one file per launch
//!
//! Files are written whole on fetch and reread on later runs, so repeat
//! analyses never touch the network unless asked to.

use std::fs;
use std::path::{Path, PathBuf};

use crate::discos::DiscosObject;
use crate::error::Result;
use crate::spacetrack::GpRecord;

#[derive(Debug, Clone)]
pub struct CatalogCache {
    root: PathBuf,
}

impl CatalogCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        CatalogCache { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn gp_path(&self, norad_id: u32) -> PathBuf {
        self.root.join("gp").join(format!("{norad_id}.csv"))
    }

    pub fn discos_path(&self, launch_id: &str) -> PathBuf {
        self.root.join("discos").join(format!("{launch_id}.json"))
    }

    pub fn has_gp(&self, norad_id: u32) -> bool {
        self.gp_path(norad_id).is_file()
    }

    pub fn has_discos(&self, launch_id: &str) -> bool {
        self.discos_path(launch_id).is_file()
    }

    pub fn load_gp(&self, norad_id: u32) -> Result<Vec<GpRecord>> {
        let mut reader = csv::Reader::from_path(self.gp_path(norad_id))?;
        let mut rows = Vec::new();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        Ok(rows)
    }

    pub fn store_gp(&self, norad_id: u32, rows: &[GpRecord]) -> Result<()> {
        let path = self.gp_path(norad_id);
        ensure_parent(&path)?;
        let mut writer = csv::Writer::from_path(&path)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn load_discos(&self, launch_id: &str) -> Result<Vec<DiscosObject>> {
        let text = fs::read_to_string(self.discos_path(launch_id))?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn store_discos(&self, launch_id: &str, objects: &[DiscosObject]) -> Result<()> {
        let path = self.discos_path(launch_id);
        ensure_parent(&path)?;
        fs::write(&path, serde_json::to_string_pretty(objects)?)?;
        Ok(())
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn gp_row(rev_at_epoch: u32, epoch: &str) -> GpRecord {
        GpRecord {
            object_name: "ENVISAT".to_string(),
            object_id: Some("2002-009A".to_string()),
            center_name: "EARTH".to_string(),
            epoch: epoch.to_string(),
            mean_motion: 14.37967408,
            eccentricity: 0.0001257,
            inclination: 98.1404,
            ra_of_asc_node: 17.3951,
            arg_of_pericenter: 86.5901,
            mean_anomaly: 84.8559,
            norad_cat_id: 27386,
            element_set_no: 999,
            rev_at_epoch,
            bstar: 1.5038e-5,
            mean_motion_dot: 5e-8,
            mean_motion_ddot: 0.0,
            semimajor_axis: Some(7143.503),
            period: Some(100.155),
            apoapsis: Some(7144.401),
            periapsis: Some(7142.605),
            object_type: Some("PAYLOAD".to_string()),
            rcs_size: Some("LARGE".to_string()),
            country_code: Some("ESA".to_string()),
            launch_date: Some("2002-03-01".to_string()),
            decay_date: None,
            tle_line0: "0 ENVISAT".to_string(),
            tle_line1: "1 27386U 02009A   20001.54192287  .00000005  00000-0  15038-4 0  9994"
                .to_string(),
            tle_line2: "2 27386  98.1404  17.3951 0001257  86.5901  84.8559 14.37967408934480"
                .to_string(),
        }
    }

    fn discos_object(satno: Option<u32>) -> DiscosObject {
        DiscosObject {
            cospar_id: Some("2013-066A".to_string()),
            satno,
            name: Some("SWARM A".to_string()),
            object_class: Some("Payload".to_string()),
            mass: Some(468.0),
            shape: Some("Box + 1 Boom".to_string()),
            width: Some(1.5),
            height: Some(0.85),
            depth: Some(9.1),
            diameter: None,
            span: Some(9.1),
            x_sect_min: Some(1.275),
            x_sect_max: Some(13.65),
            x_sect_avg: Some(5.583),
        }
    }

    #[test]
    fn test_cache_paths() {
        let cache = CatalogCache::new("/tmp/tledrift");
        assert!(cache.gp_path(27386).ends_with("gp/27386.csv"));
        assert!(cache
            .discos_path("2013-066")
            .ends_with("discos/2013-066.json"));
    }

    #[test]
    fn test_missing_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CatalogCache::new(dir.path());
        assert!(!cache.has_gp(27386));
        assert!(!cache.has_discos("2013-066"));
        assert!(cache.load_gp(27386).is_err());
        assert!(cache.load_discos("2013-066").is_err());
    }

    #[test]
    fn test_gp_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CatalogCache::new(dir.path());

        let rows = vec![
            gp_row(93448, "2020-01-01T13:00:22.135968"),
            gp_row(93452, "2020-01-01T19:41:34.598976"),
        ];
        cache.store_gp(27386, &rows).unwrap();
        assert!(cache.has_gp(27386));

        let loaded = cache.load_gp(27386).unwrap();
        assert_eq!(loaded, rows, "optional fields should survive the CSV trip");
    }

    #[test]
    fn test_discos_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CatalogCache::new(dir.path());

        let objects = vec![discos_object(Some(39418)), discos_object(None)];
        cache.store_discos("2013-066", &objects).unwrap();
        assert!(cache.has_discos("2013-066"));

        let loaded = cache.load_discos("2013-066").unwrap();
        assert_eq!(loaded, objects);
    }

    #[test]
    fn test_store_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CatalogCache::new(dir.path());

        cache
            .store_gp(27386, &[gp_row(1, "2020-01-01T13:00:22.135968")])
            .unwrap();
        cache
            .store_gp(27386, &[gp_row(2, "2020-01-02T13:00:22.135968")])
            .unwrap();

        let loaded = cache.load_gp(27386).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].rev_at_epoch, 2);
    }
}
