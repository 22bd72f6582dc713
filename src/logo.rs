//! Locally uploaded fallback logo.
//!
//! The logo from the config sheet always wins. When the sheet has none, the
//! storefront shows an image the operator uploaded on this device, kept as a
//! `data:` URI in a small key-value store.

use crate::models::SiteConfig;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};

pub const LOGO_KEY: &str = "storefront_v1_logo";

/// 1.5 MiB
pub const MAX_LOGO_BYTES: usize = 1536 * 1024;

#[derive(Error, Debug)]
pub enum LogoError {
    #[error("The image is too large ({size} bytes). Choose an image up to 1.5MB.")]
    TooLarge { size: usize },

    #[error("Only image files can be used as a logo (got {0})")]
    NotAnImage(String),

    #[error("could not save logo: {0}")]
    Store(#[from] StoreError),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt store file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Device-local string storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Session-only store
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// Store persisted as one JSON object on disk
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl JsonFileStore {
    /// Open `path`, starting empty if it does not exist yet
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        let json = serde_json::to_string(&self.values)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Validate an uploaded image and store it as the local logo
pub fn upload_logo(
    store: &mut dyn KeyValueStore,
    mime: &str,
    bytes: &[u8],
) -> Result<String, LogoError> {
    if !mime.starts_with("image/") {
        return Err(LogoError::NotAnImage(mime.to_string()));
    }
    if bytes.len() > MAX_LOGO_BYTES {
        warn!("Rejected logo upload of {} bytes", bytes.len());
        return Err(LogoError::TooLarge { size: bytes.len() });
    }

    let uri = data_uri(mime, bytes);
    store.set(LOGO_KEY, uri.clone())?;
    info!("Saved local logo ({} bytes)", bytes.len());
    Ok(uri)
}

/// Logo to display: the sheet's, else the local upload
pub fn display_logo(config: &SiteConfig, store: &dyn KeyValueStore) -> Option<String> {
    config
        .logo()
        .map(str::to_string)
        .or_else(|| store.get(LOGO_KEY))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G'];

    #[test]
    fn upload_stores_data_uri() {
        let mut store = MemoryStore::new();
        let uri = upload_logo(&mut store, "image/png", PNG_HEADER).unwrap();

        assert_eq!(uri, "data:image/png;base64,iVBORw==");
        assert_eq!(store.get(LOGO_KEY), Some(uri));
    }

    #[test]
    fn oversized_upload_is_rejected() {
        let mut store = MemoryStore::new();
        let big = vec![0u8; MAX_LOGO_BYTES + 1];

        let err = upload_logo(&mut store, "image/jpeg", &big).unwrap_err();
        assert!(matches!(err, LogoError::TooLarge { .. }));
        assert!(err.to_string().contains("1.5MB"));
        assert!(store.get(LOGO_KEY).is_none());
    }

    #[test]
    fn limit_is_inclusive() {
        let mut store = MemoryStore::new();
        let exact = vec![0u8; MAX_LOGO_BYTES];
        assert!(upload_logo(&mut store, "image/jpeg", &exact).is_ok());
    }

    #[test]
    fn non_images_are_rejected() {
        let mut store = MemoryStore::new();
        let err = upload_logo(&mut store, "application/pdf", b"%PDF").unwrap_err();
        assert!(matches!(err, LogoError::NotAnImage(_)));
    }

    #[test]
    fn sheet_logo_takes_precedence() {
        let mut store = MemoryStore::new();
        upload_logo(&mut store, "image/png", PNG_HEADER).unwrap();

        let mut config = SiteConfig::new();
        assert!(display_logo(&config, &store).unwrap().starts_with("data:image/png"));

        config.insert("Logomarca", "https://x/logo.png");
        assert_eq!(
            display_logo(&config, &store).as_deref(),
            Some("https://x/logo.png")
        );
    }

    #[test]
    fn file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        assert!(store.get(LOGO_KEY).is_none());
        upload_logo(&mut store, "image/png", PNG_HEADER).unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get(LOGO_KEY).as_deref(),
            Some("data:image/png;base64,iVBORw==")
        );
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logo.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(JsonFileStore::open(&path), Err(StoreError::Json(_))));
    }
}
