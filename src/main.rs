use anyhow::Context;
use sheets_storefront::catalog::CatalogView;
use sheets_storefront::logo::{self, JsonFileStore, KeyValueStore, MemoryStore};
use sheets_storefront::storefront;
use sheets_storefront::{AppConfig, Catalog, HttpSheetFetcher, Poller, SheetClient};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🏠 Sheets Storefront");
    info!("===================");

    let config = AppConfig::load().context("Failed to load configuration")?;

    let store: Box<dyn KeyValueStore + Send> = match &config.logo_store_path {
        Some(path) => Box::new(
            JsonFileStore::open(path)
                .with_context(|| format!("Failed to open logo store {}", path.display()))?,
        ),
        None => Box::new(MemoryStore::new()),
    };

    let fetcher = HttpSheetFetcher::new(config.request_timeout(), &config.user_agent)?;
    let client = Arc::new(SheetClient::new(Arc::new(fetcher), config.sources.clone()));
    let catalog = Catalog::new();
    let poller = Poller::new(client, catalog.clone(), config.poll_interval());

    let mut updates = catalog.subscribe();
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let view = updates.borrow_and_update().clone();
            print_view(&view, store.as_ref());
        }
    });

    poller
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl-C: {}", e);
            }
        })
        .await;

    printer.abort();
    Ok(())
}

fn print_view(view: &CatalogView, store: &dyn KeyValueStore) {
    if let Some(failure) = &view.failure {
        error!("Listings unavailable: {}", failure.message);
        println!("🔒 {}", failure.remedy());
        return;
    }

    let Some(snapshot) = view.ready() else {
        return;
    };

    info!("\n✅ Loaded {} listings\n", snapshot.listings.len());

    if let Some(logo) = logo::display_logo(&snapshot.config, store) {
        println!("Logo: {}", logo);
    }
    println!("Contact: {}", storefront::site_contact_url(&snapshot.config));
    println!();

    if snapshot.is_empty() {
        println!("No listings found.");
    }

    for (i, listing) in snapshot.listings.iter().enumerate() {
        let star = if listing.is_featured { " ★" } else { "" };
        println!("{}. {} ({}){}", i + 1, listing.title, listing.price, star);
        println!("   {} · {}", listing.kind, listing.neighborhood);
        match listing.cover_photo() {
            Some(cover) => println!("   Photos: {} (cover {})", listing.photos.len(), cover),
            None => println!("   Photos: none"),
        }
        println!(
            "   Contact: {}",
            storefront::contact_url(listing, &snapshot.config)
        );
        println!();
    }

    if !snapshot.sponsors.is_empty() {
        let names: Vec<&str> = snapshot.sponsors.iter().map(|s| s.name.as_str()).collect();
        println!("Sponsors: {}", names.join(", "));
    }
}
