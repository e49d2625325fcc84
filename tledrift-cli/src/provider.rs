//! Cache-or-fetch front ends over the catalog clients.
//!
//! Providers consult the on-disk cache first and only go to the network
//! (logging in lazily, at most once) when a file is missing or a refetch
//! is forced. Credential errors therefore surface only when a fetch is
//! actually needed.

use crate::cache::CatalogCache;
use crate::discos::{DiscosClient, DiscosObject};
use crate::error::{CliError, Result};
use crate::spacetrack::{EpochRange, GpRecord, SpaceTrackClient};

// ---------------------------------------------------------------------------
// GP history
// ---------------------------------------------------------------------------

pub struct GpProvider {
    client: SpaceTrackClient,
    cache: CatalogCache,
    credentials: Option<(String, String)>,
    logged_in: bool,
}

impl GpProvider {
    pub fn new(
        client: SpaceTrackClient,
        cache: CatalogCache,
        credentials: Option<(String, String)>,
    ) -> Self {
        GpProvider {
            client,
            cache,
            credentials,
            logged_in: false,
        }
    }

    async fn ensure_login(&mut self) -> Result<()> {
        if self.logged_in {
            return Ok(());
        }
        let (username, password) = self.credentials.as_ref().ok_or_else(|| {
            CliError::Config(
                "Space-Track credentials missing: add a spacetrack section with username \
                 and password to ~/.tledrift/config.yaml"
                    .to_string(),
            )
        })?;
        self.client.login(username, password).await?;
        self.logged_in = true;
        Ok(())
    }

    /// GP rows for one object, from cache when possible.
    pub async fn records(
        &mut self,
        norad_id: u32,
        range: &EpochRange,
        limit: Option<u32>,
        force: bool,
    ) -> Result<Vec<GpRecord>> {
        if !force && self.cache.has_gp(norad_id) {
            log::info!(
                "using cached GP rows for {norad_id} ({})",
                self.cache.gp_path(norad_id).display()
            );
            return self.cache.load_gp(norad_id);
        }

        self.ensure_login().await?;
        let rows = self.client.gp_history(norad_id, range, limit).await?;
        self.cache.store_gp(norad_id, &rows)?;
        Ok(rows)
    }
}

// ---------------------------------------------------------------------------
// DISCOS objects
// ---------------------------------------------------------------------------

pub struct DiscosProvider {
    client: Option<DiscosClient>,
    cache: CatalogCache,
}

impl DiscosProvider {
    /// `client` may be absent when no token is configured; cache hits
    /// still work then.
    pub fn new(client: Option<DiscosClient>, cache: CatalogCache) -> Self {
        DiscosProvider { client, cache }
    }

    pub async fn objects(&self, launch_id: &str, force: bool) -> Result<Vec<DiscosObject>> {
        if !force && self.cache.has_discos(launch_id) {
            log::info!(
                "using cached DISCOS objects for {launch_id} ({})",
                self.cache.discos_path(launch_id).display()
            );
            return self.cache.load_discos(launch_id);
        }

        let client = self.client.as_ref().ok_or_else(|| {
            CliError::Config(
                "DISCOS token missing: add a discos section with a token to \
                 ~/.tledrift/config.yaml"
                    .to_string(),
            )
        })?;
        let objects = client.objects_by_launch(launch_id).await?;
        self.cache.store_discos(launch_id, &objects)?;
        Ok(objects)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
