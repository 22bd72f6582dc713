//! Read-only queries the storefront page runs over a snapshot

use crate::models::{Listing, SiteConfig};
use serde::{Deserialize, Serialize};

/// Type toggle on the listing grid
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KindFilter {
    #[default]
    All,
    Sale,
    Rent,
}

impl KindFilter {
    fn matches(self, listing: &Listing) -> bool {
        match self {
            Self::All => true,
            Self::Sale => listing.is_sale(),
            Self::Rent => listing.is_rental(),
        }
    }
}

/// Search box, neighborhood dropdown and type toggle
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListingFilter {
    /// `None` means every neighborhood
    pub neighborhood: Option<String>,
    pub kind: KindFilter,
    /// Case-insensitive match against title or neighborhood
    pub search: String,
}

impl ListingFilter {
    pub fn matches(&self, listing: &Listing) -> bool {
        let neighborhood_ok = self
            .neighborhood
            .as_deref()
            .map_or(true, |n| listing.neighborhood == n);

        let search = self.search.trim().to_lowercase();
        let search_ok = search.is_empty()
            || listing.title.to_lowercase().contains(&search)
            || listing.neighborhood.to_lowercase().contains(&search);

        neighborhood_ok && self.kind.matches(listing) && search_ok
    }

    pub fn apply<'a>(&self, listings: &'a [Listing]) -> Vec<&'a Listing> {
        listings.iter().filter(|l| self.matches(l)).collect()
    }
}

pub fn featured(listings: &[Listing]) -> Vec<&Listing> {
    listings.iter().filter(|l| l.is_featured).collect()
}

/// wa.me link for a phone number, keeping digits only
pub fn whatsapp_url(number: &str) -> String {
    let digits: String = number.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("https://wa.me/{}", digits)
}

/// Where the "contact owner" button points.
///
/// A web link in the listing is used as is, a phone number becomes a wa.me
/// link, and anything else falls back to the site-wide number.
pub fn contact_url(listing: &Listing, config: &SiteConfig) -> String {
    let contact = listing.contact_link.trim();
    if contact.to_lowercase().starts_with("http") {
        return contact.to_string();
    }

    let digits = contact.chars().filter(|c| c.is_ascii_digit()).count();
    if digits >= 8 {
        whatsapp_url(contact)
    } else {
        whatsapp_url(config.whatsapp())
    }
}

/// "Advertise" link in the header
pub fn site_contact_url(config: &SiteConfig) -> String {
    whatsapp_url(config.whatsapp())
}
