//! DISCOSweb client: object metadata lookups by COSPAR launch id.
//!
//! DISCOSweb speaks JSON:API v2; responses arrive as a `data` array of
//! resources whose `attributes` carry the physical-characteristics fields.
//! Collections are paginated through `links.next`.

use serde::{Deserialize, Serialize};

use crate::error::{CliError, Result};

pub const BASE_URL: &str = "https://discosweb.esoc.esa.int";

const API_VERSION_HEADER: &str = "DiscosWeb-Api-Version";
const API_VERSION: &str = "2";

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Physical and catalog attributes of one DISCOS object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscosObject {
    pub cospar_id: Option<String>,
    pub satno: Option<u32>,
    pub name: Option<String>,
    pub object_class: Option<String>,
    pub mass: Option<f64>,
    pub shape: Option<String>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub depth: Option<f64>,
    pub diameter: Option<f64>,
    pub span: Option<f64>,
    pub x_sect_min: Option<f64>,
    pub x_sect_max: Option<f64>,
    pub x_sect_avg: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Document {
    data: Vec<Resource>,
    links: Option<Links>,
}

#[derive(Debug, Deserialize)]
struct Resource {
    attributes: DiscosObject,
}

#[derive(Debug, Deserialize)]
struct Links {
    next: Option<String>,
}

/// NORAD numbers of the objects that have one, in response order.
pub fn satnos(objects: &[DiscosObject]) -> Vec<u32> {
    objects.iter().filter_map(|object| object.satno).collect()
}

fn absolute_url(base: &str, next: &str) -> String {
    if next.starts_with("http") {
        next.to_string()
    } else {
        format!("{base}{next}")
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Token-authenticated DISCOSweb client.
pub struct DiscosClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl DiscosClient {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(BASE_URL, token)
    }

    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder().build()?;
        Ok(DiscosClient {
            http,
            base_url: base_url.into(),
            token: token.into(),
        })
    }

    /// Every object DISCOS attributes to one launch, most recent reentry
    /// first, following pagination to the end.
    pub async fn objects_by_launch(&self, launch_id: &str) -> Result<Vec<DiscosObject>> {
        let mut url = format!("{}/api/objects", self.base_url);
        let mut first_page = true;
        let mut objects = Vec::new();

        loop {
            let mut request = self
                .http
                .get(&url)
                .bearer_auth(&self.token)
                .header(API_VERSION_HEADER, API_VERSION);
            if first_page {
                request = request.query(&[
                    (
                        "filter",
                        format!("eq(launch.cosparLaunchNo,'{launch_id}')"),
                    ),
                    ("sort", "-reentry.epoch".to_string()),
                ]);
            }

            log::debug!("GET {url}");
            let response = request.send().await?;
            if !response.status().is_success() {
                return Err(CliError::Discos(format!(
                    "object query for launch {launch_id} failed: HTTP {}",
                    response.status()
                )));
            }

            let document: Document = response.json().await?;
            objects.extend(document.data.into_iter().map(|resource| resource.attributes));

            // The next link carries the filter and page cursor already.
            match document.links.and_then(|links| links.next) {
                Some(next) => {
                    url = absolute_url(&self.base_url, &next);
                    first_page = false;
                }
                None => break,
            }
        }

        log::info!("{} DISCOS objects for launch {launch_id}", objects.len());
        Ok(objects)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
