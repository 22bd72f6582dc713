use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Neighborhoods the storefront offers in its filter.
/// Listings are not validated against this list.
pub const KNOWN_NEIGHBORHOODS: [&str; 34] = [
    "Aerolândia",
    "Altamira",
    "Bela Vista",
    "Boa Vista",
    "Bomba",
    "Canto da Várzea",
    "Catavento",
    "Centro",
    "Conduru",
    "DNER",
    "Ipueiras",
    "Itavó",
    "Jardim das Oliveiras",
    "Junco",
    "Luzia",
    "Malva",
    "Morada do Sol",
    "Morada Nova",
    "Morro da Macambira",
    "Morro da Onça",
    "Pantanal",
    "Paraibinha",
    "Parque de Exposição",
    "Passagem das Pedras",
    "Pedrinhas",
    "Piaui",
    "Salgadão",
    "Sambaíba",
    "São José",
    "São Vicente",
    "Tia Joana",
    "Turuçu",
    "Umari",
    "Valparaíso",
];

/// Maximum number of photo columns a listing row carries
pub const MAX_PHOTOS: usize = 5;

/// Conventional type tags used by the sheet
pub const KIND_SALE: &str = "Venda";
pub const KIND_RENT: &str = "Aluga";

/// One property-for-sale-or-rent row from the Properties sheet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Listing {
    /// Unique within one fetch batch only
    pub id: String,
    pub title: String,
    pub description: String,
    /// Free text, display only
    pub price: String,
    pub neighborhood: String,
    pub contact_link: String,
    pub photos: Vec<String>,
    pub is_featured: bool,
    /// Type tag, usually "Venda" or "Aluga" but not a closed set
    pub kind: String,
    /// Time of the fetch that produced this record
    pub created_at: DateTime<Utc>,
}

impl Listing {
    fn kind_contains(&self, tag: &str) -> bool {
        self.kind.to_lowercase().contains(&tag.to_lowercase())
    }

    /// Rental listings carry "aluga" somewhere in their type tag
    pub fn is_rental(&self) -> bool {
        self.kind_contains(KIND_RENT)
    }

    /// A tag like "Venda e Aluga" is both for sale and for rent
    pub fn is_sale(&self) -> bool {
        self.kind_contains(KIND_SALE)
    }

    pub fn has_known_neighborhood(&self) -> bool {
        KNOWN_NEIGHBORHOODS.contains(&self.neighborhood.as_str())
    }

    pub fn cover_photo(&self) -> Option<&str> {
        self.photos.first().map(String::as_str)
    }
}

/// Partner rendered as a logo in the promotional section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Sponsor {
    pub id: String,
    pub name: String,
    pub logo_url: String,
}

/// Contact number used when neither the config sheet nor a listing provides one
pub const DEFAULT_WHATSAPP: &str = "5589999999999";

/// Keys consulted, in order, for the site logo
pub const LOGO_KEYS: [&str; 3] = ["LogoSite", "Logomarca", "logo"];

pub const WHATSAPP_KEY: &str = "WhatsApp";

/// Free-form branding/contact overrides from the Config sheet
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SiteConfig {
    entries: HashMap<String, String>,
}

impl SiteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later inserts for the same key win
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Like `get`, but treats an empty value as absent
    fn non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Logo reference from the sheet, if any of the known keys is set
    pub fn logo(&self) -> Option<&str> {
        LOGO_KEYS.iter().find_map(|key| self.non_empty(key))
    }

    /// Global contact number, falling back to the built-in default
    pub fn whatsapp(&self) -> &str {
        self.non_empty(WHATSAPP_KEY).unwrap_or(DEFAULT_WHATSAPP)
    }
}
