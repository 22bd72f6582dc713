//! Error types for sheet ingestion

use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SheetError>;

/// Failure while pulling one published sheet
#[derive(Error, Debug)]
pub enum SheetError {
    /// Google served an HTML or login page instead of CSV
    #[error("sheet is not published as CSV: {url}")]
    NotPublic { url: String },

    /// Server answered with a non-success status
    #[error("sheet request failed with status {status}: {url}")]
    Status { url: String, status: u16 },

    /// Connection, timeout or body decoding failure
    #[error("sheet request failed: {url}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// The two failure signals surfaced to the user for the Listings source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FailureCategory {
    SheetNotPublic,
    Connection,
}

impl SheetError {
    pub fn transport(
        url: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self::Transport {
            url: url.into(),
            source: source.into(),
        }
    }

    pub fn category(&self) -> FailureCategory {
        match self {
            Self::NotPublic { .. } => FailureCategory::SheetNotPublic,
            Self::Status { .. } | Self::Transport { .. } => FailureCategory::Connection,
        }
    }

    pub fn is_not_public(&self) -> bool {
        self.category() == FailureCategory::SheetNotPublic
    }
}

impl FailureCategory {
    /// What the user should do about it
    pub fn remedy(self) -> &'static str {
        match self {
            Self::SheetNotPublic => {
                "Publish the sheet to the web as comma-separated values (.csv) \
                 (File > Share > Publish to web), then reload."
            }
            Self::Connection => {
                "Could not load the listings. Check your connection and the configured \
                 sheet URLs, then try again."
            }
        }
    }
}
