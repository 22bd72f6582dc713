//! Storefront content pulled from Google Sheets "Publish to Web" CSV exports.
//!
//! Three sheets feed the site: properties, sponsors and site configuration.
//! [`poller::Poller`] refreshes them together and commits each cycle into a
//! [`catalog::Catalog`] that the page reads from.

pub mod catalog;
pub mod config;
pub mod error;
pub mod logo;
pub mod models;
pub mod poller;
pub mod sheets;
pub mod storefront;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use catalog::{Catalog, CatalogSnapshot, CatalogView};
pub use config::{AppConfig, SheetSources};
pub use error::{FailureCategory, SheetError};
pub use models::{Listing, SiteConfig, Sponsor};
pub use poller::{Poller, RetryHandle};
pub use sheets::{HttpSheetFetcher, SheetClient, SheetFetcher};
