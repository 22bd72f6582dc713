use crate::error::Result;
use async_trait::async_trait;

/// Transport for published sheets.
/// Production uses HTTP; tests plug in canned responses.
#[async_trait]
pub trait SheetFetcher: Send + Sync {
    /// GET `url` and return the body as text. Non-success statuses are errors.
    async fn fetch_text(&self, url: &str) -> Result<String>;
}
