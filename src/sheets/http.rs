use crate::error::{Result, SheetError};
use crate::sheets::traits::SheetFetcher;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_USER_AGENT: &str = concat!("sheets-storefront/", env!("CARGO_PKG_VERSION"));

/// `SheetFetcher` backed by a shared reqwest client
pub struct HttpSheetFetcher {
    client: Client,
}

impl HttpSheetFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SheetFetcher for HttpSheetFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SheetError::transport(url, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Sheet returned status: {}", status);
            return Err(SheetError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SheetError::transport(url, e))?;

        debug!("Downloaded {} bytes", body.len());
        Ok(body)
    }
}
