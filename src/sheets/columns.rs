//! Positional column contracts for each published sheet.
//!
//! Mapping is by position only; header names are ignored. Reordering columns in
//! the spreadsheet silently changes what lands in each field, so any change to a
//! sheet layout must be mirrored here.

use crate::models::MAX_PHOTOS;

/// Properties sheet
pub mod listing {
    use super::MAX_PHOTOS;

    pub const TITLE: usize = 0;
    pub const DESCRIPTION: usize = 1;
    pub const PRICE: usize = 2;
    pub const NEIGHBORHOOD: usize = 3;
    pub const CONTACT_LINK: usize = 4;
    pub const FIRST_PHOTO: usize = 5;
    pub const PHOTOS: std::ops::Range<usize> = FIRST_PHOTO..FIRST_PHOTO + MAX_PHOTOS;
    pub const FEATURED: usize = 10;
    pub const KIND: usize = 11;

    pub const DEFAULT_DESCRIPTION: &str = "Sem descrição";
    pub const DEFAULT_PRICE: &str = "Sob consulta";
    pub const DEFAULT_NEIGHBORHOOD: &str = "Centro";
    pub const DEFAULT_CONTACT_LINK: &str = "#";
    pub const DEFAULT_KIND: &str = crate::models::KIND_SALE;
}

/// Sponsors sheet
pub mod sponsor {
    pub const NAME: usize = 0;
    pub const LOGO_URL: usize = 1;

    pub const DEFAULT_NAME: &str = "Patrocinador";
}

/// Config sheet
pub mod config {
    pub const KEY: usize = 0;
    pub const VALUE: usize = 1;
}

/// Every sheet starts with one header row
pub const HEADER_ROWS: usize = 1;

/// Cell at `index`, or "" when the row is short
pub fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

/// Cell at `index`, or `default` when missing or empty
pub fn cell_or<'a>(row: &'a [String], index: usize, default: &'a str) -> &'a str {
    match cell(row, index) {
        "" => default,
        value => value,
    }
}
