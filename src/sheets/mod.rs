pub mod classify;
pub mod columns;
pub mod csv;
pub mod http;
pub mod mappers;
pub mod orchestrator;
pub mod traits;

pub use http::HttpSheetFetcher;
pub use orchestrator::{FetchOutcome, SheetClient};
pub use traits::SheetFetcher;
