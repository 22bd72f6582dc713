use crate::config::SheetSources;
use crate::error::{Result, SheetError};
use crate::models::{Listing, SiteConfig, Sponsor};
use crate::sheets::classify::is_error_page;
use crate::sheets::csv::tokenize;
use crate::sheets::mappers::{map_config, map_listings, map_sponsors};
use crate::sheets::traits::SheetFetcher;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Append a `t=<millis>` parameter so caches between us and Google never
/// serve a stale export. Existing query parameters are preserved.
pub fn fresh_url(url: &str, now_millis: i64) -> String {
    let connector = if url.contains('?') { '&' } else { '?' };
    format!("{}{}t={}", url, connector, now_millis)
}

/// Everything one fetch cycle produced.
/// Only the listings source can fail; the other two degrade to empty.
#[derive(Debug)]
pub struct FetchOutcome {
    pub fetched_at: DateTime<Utc>,
    pub listings: Result<Vec<Listing>>,
    pub sponsors: Vec<Sponsor>,
    pub config: SiteConfig,
}

/// Pulls the three published sheets and maps them into domain records
pub struct SheetClient {
    fetcher: Arc<dyn SheetFetcher>,
    sources: SheetSources,
}

impl SheetClient {
    pub fn new(fetcher: Arc<dyn SheetFetcher>, sources: SheetSources) -> Self {
        Self { fetcher, sources }
    }

    /// Fetch, classify and tokenize one sheet.
    /// `None` means the source is not configured.
    async fn fetch_rows(&self, url: &str) -> Result<Option<Vec<Vec<String>>>> {
        if url.is_empty() {
            return Ok(None);
        }

        let url = fresh_url(url, Utc::now().timestamp_millis());
        let text = self.fetcher.fetch_text(&url).await?;

        if is_error_page(&text) {
            warn!("Sheet answered with an HTML/login page: {}", url);
            return Err(SheetError::NotPublic { url });
        }

        let rows = tokenize(&text);
        debug!("Tokenized {} rows from {}", rows.len(), url);
        Ok(Some(rows))
    }

    /// Listings are the product: failures propagate to the caller.
    pub async fn fetch_listings(&self) -> Result<Vec<Listing>> {
        let fetched_at = Utc::now();
        let Some(rows) = self.fetch_rows(&self.sources.properties_url).await? else {
            return Ok(Vec::new());
        };

        let listings = map_listings(&rows, fetched_at);
        info!("Mapped {} listings", listings.len());
        Ok(listings)
    }

    /// Sponsors are decorative: any failure yields an empty list.
    pub async fn fetch_sponsors(&self) -> Vec<Sponsor> {
        match self.fetch_rows(&self.sources.sponsors_url).await {
            Ok(rows) => rows.map(|rows| map_sponsors(&rows)).unwrap_or_default(),
            Err(e) => {
                warn!("Ignoring sponsors failure: {}", e);
                Vec::new()
            }
        }
    }

    /// Branding overrides: any failure yields an empty mapping.
    pub async fn fetch_config(&self) -> SiteConfig {
        match self.fetch_rows(&self.sources.config_url).await {
            Ok(rows) => rows.map(|rows| map_config(&rows)).unwrap_or_default(),
            Err(e) => {
                warn!("Ignoring config failure: {}", e);
                SiteConfig::new()
            }
        }
    }

    /// Fetch all three sources concurrently and wait for every one of them
    pub async fn fetch_all(&self) -> FetchOutcome {
        let fetched_at = Utc::now();
        let (listings, sponsors, config) = tokio::join!(
            self.fetch_listings(),
            self.fetch_sponsors(),
            self.fetch_config()
        );

        if let Err(e) = &listings {
            warn!("Listings fetch failed: {}", e);
        }

        FetchOutcome {
            fetched_at,
            listings,
            sponsors,
            config,
        }
    }
}
