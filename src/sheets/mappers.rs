use crate::models::{Listing, SiteConfig, Sponsor};
use crate::sheets::columns::{self, cell, cell_or, HEADER_ROWS};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Values the sheet uses to mark a listing as featured
const FEATURED_VALUES: [&str; 2] = ["sim", "true"];

/// Photos and sponsor logos must look like web URLs
pub fn looks_like_url(value: &str) -> bool {
    value
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("http"))
}

pub fn parse_featured(value: &str) -> bool {
    let lowered = value.trim().to_lowercase();
    FEATURED_VALUES.contains(&lowered.as_str())
}

/// Map Properties sheet rows to listings, in sheet order.
///
/// Rows without a title are dropped. Every listing in the batch shares
/// `fetched_at`, which also seeds the identifiers.
pub fn map_listings(rows: &[Vec<String>], fetched_at: DateTime<Utc>) -> Vec<Listing> {
    use columns::listing::*;

    let batch = fetched_at.timestamp_millis();
    let mut listings = Vec::new();

    for (index, row) in rows.iter().skip(HEADER_ROWS).enumerate() {
        let title = cell(row, TITLE);
        if title.is_empty() {
            debug!("Skipping listing row {}: no title", index);
            continue;
        }

        let photos = PHOTOS
            .map(|col| cell(row, col))
            .filter(|photo| looks_like_url(photo))
            .map(str::to_string)
            .collect();

        listings.push(Listing {
            id: format!("prop-{}-{}", index, batch),
            title: title.to_string(),
            description: cell_or(row, DESCRIPTION, DEFAULT_DESCRIPTION).to_string(),
            price: cell_or(row, PRICE, DEFAULT_PRICE).to_string(),
            neighborhood: cell_or(row, NEIGHBORHOOD, DEFAULT_NEIGHBORHOOD).to_string(),
            contact_link: cell_or(row, CONTACT_LINK, DEFAULT_CONTACT_LINK).to_string(),
            photos,
            is_featured: parse_featured(cell(row, FEATURED)),
            kind: cell_or(row, KIND, DEFAULT_KIND).to_string(),
            created_at: fetched_at,
        });
    }

    listings
}

/// Map Sponsors sheet rows. A usable logo URL is mandatory.
pub fn map_sponsors(rows: &[Vec<String>]) -> Vec<Sponsor> {
    use columns::sponsor::*;

    rows.iter()
        .skip(HEADER_ROWS)
        .enumerate()
        .filter_map(|(index, row)| {
            let logo_url = cell(row, LOGO_URL);
            if !looks_like_url(logo_url) {
                debug!("Skipping sponsor row {}: no logo", index);
                return None;
            }
            Some(Sponsor {
                id: format!("sponsor-{}", index),
                name: cell_or(row, NAME, DEFAULT_NAME).to_string(),
                logo_url: logo_url.to_string(),
            })
        })
        .collect()
}

/// Map Config sheet rows. Only the key is required; duplicates overwrite.
pub fn map_config(rows: &[Vec<String>]) -> SiteConfig {
    use columns::config::*;

    let mut config = SiteConfig::new();
    for row in rows.iter().skip(HEADER_ROWS) {
        let key = cell(row, KEY);
        if key.is_empty() {
            continue;
        }
        config.insert(key, cell(row, VALUE));
    }
    config
}
