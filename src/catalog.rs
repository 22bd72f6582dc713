//! In-memory catalog state shared with consumers.
//!
//! Each fetch cycle takes a generation number when it starts. A cycle's result
//! is only committed if it is newer than the last committed one, so overlapping
//! polls and manual retries cannot roll the catalog back to older data, and
//! cycles slower than the poll interval still land.

use crate::error::FailureCategory;
use crate::models::{Listing, SiteConfig, Sponsor};
use crate::sheets::orchestrator::FetchOutcome;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// One successful fetch of all three sheets
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSnapshot {
    pub generation: u64,
    pub fetched_at: DateTime<Utc>,
    pub listings: Vec<Listing>,
    pub sponsors: Vec<Sponsor>,
    pub config: SiteConfig,
}

impl CatalogSnapshot {
    /// No listings is a normal, displayable state
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Look up a listing by id. Ids are only valid within this snapshot.
    pub fn listing(&self, id: &str) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id == id)
    }
}

/// Why the latest committed cycle could not load listings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadFailure {
    pub generation: u64,
    pub category: FailureCategory,
    pub message: String,
}

impl LoadFailure {
    pub fn remedy(&self) -> &'static str {
        self.category.remedy()
    }
}

/// What consumers see
#[derive(Debug, Clone, Default)]
pub struct CatalogView {
    /// Generation of the last committed cycle, 0 before the first
    pub generation: u64,
    /// Last good snapshot, kept while a failure is shown
    pub snapshot: Option<Arc<CatalogSnapshot>>,
    pub failure: Option<LoadFailure>,
}

impl CatalogView {
    pub fn is_loading(&self) -> bool {
        self.generation == 0
    }

    /// Listings are available and the latest cycle succeeded
    pub fn ready(&self) -> Option<&CatalogSnapshot> {
        match self.failure {
            Some(_) => None,
            None => self.snapshot.as_deref(),
        }
    }
}

struct Inner {
    started: AtomicU64,
    tx: watch::Sender<Arc<CatalogView>>,
}

/// Cheaply clonable handle to the shared catalog
#[derive(Clone)]
pub struct Catalog {
    inner: Arc<Inner>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Arc::new(CatalogView::default()));
        Self {
            inner: Arc::new(Inner {
                started: AtomicU64::new(0),
                tx,
            }),
        }
    }

    /// Reserve the generation number for a cycle about to start
    pub fn begin(&self) -> u64 {
        self.inner.started.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Newest generation handed out so far
    pub fn latest_started(&self) -> u64 {
        self.inner.started.load(Ordering::SeqCst)
    }

    pub fn current(&self) -> Arc<CatalogView> {
        self.inner.tx.borrow().clone()
    }

    /// Receiver notified on every committed cycle
    pub fn subscribe(&self) -> watch::Receiver<Arc<CatalogView>> {
        self.inner.tx.subscribe()
    }

    /// Commit the result of cycle `generation`.
    ///
    /// Returns false when the result was discarded because a newer cycle has
    /// already been committed. A listings failure keeps the previous snapshot for reference
    /// and drops the sponsors/config fetched alongside it.
    pub fn commit(&self, generation: u64, outcome: FetchOutcome) -> bool {
        self.inner.tx.send_if_modified(|view| {
            if generation <= view.generation {
                debug!(
                    "Discarding stale cycle {} (committed {})",
                    generation, view.generation
                );
                return false;
            }

            let next = match outcome.listings {
                Ok(listings) => {
                    info!(
                        "Committed cycle {}: {} listings, {} sponsors, {} config keys",
                        generation,
                        listings.len(),
                        outcome.sponsors.len(),
                        outcome.config.len()
                    );
                    CatalogView {
                        generation,
                        snapshot: Some(Arc::new(CatalogSnapshot {
                            generation,
                            fetched_at: outcome.fetched_at,
                            listings,
                            sponsors: outcome.sponsors,
                            config: outcome.config,
                        })),
                        failure: None,
                    }
                }
                Err(e) => {
                    warn!("Cycle {} failed: {}", generation, e);
                    CatalogView {
                        generation,
                        snapshot: view.snapshot.clone(),
                        failure: Some(LoadFailure {
                            generation,
                            category: e.category(),
                            message: e.to_string(),
                        }),
                    }
                }
            };

            *view = Arc::new(next);
            true
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SheetError;

    fn outcome(titles: &[&str]) -> FetchOutcome {
        let now = Utc::now();
        FetchOutcome {
            fetched_at: now,
            listings: Ok(titles
                .iter()
                .enumerate()
                .map(|(i, title)| Listing {
                    id: format!("prop-{}-{}", i, now.timestamp_millis()),
                    title: title.to_string(),
                    description: "Sem descrição".into(),
                    price: "Sob consulta".into(),
                    neighborhood: "Centro".into(),
                    contact_link: "#".into(),
                    photos: vec![],
                    is_featured: false,
                    kind: "Venda".into(),
                    created_at: now,
                })
                .collect()),
            sponsors: vec![],
            config: SiteConfig::new(),
        }
    }

    fn failed(error: SheetError) -> FetchOutcome {
        FetchOutcome {
            fetched_at: Utc::now(),
            listings: Err(error),
            sponsors: vec![],
            config: SiteConfig::new(),
        }
    }

    fn titles(view: &CatalogView) -> Vec<String> {
        view.snapshot
            .as_ref()
            .map(|s| s.listings.iter().map(|l| l.title.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn starts_loading() {
        let catalog = Catalog::new();
        let view = catalog.current();
        assert!(view.is_loading());
        assert!(view.ready().is_none());
    }

    #[test]
    fn commit_replaces_snapshot_wholesale() {
        let catalog = Catalog::new();

        let first = catalog.begin();
        assert!(catalog.commit(first, outcome(&["A", "B"])));
        let second = catalog.begin();
        assert!(catalog.commit(second, outcome(&["C"])));

        let view = catalog.current();
        assert_eq!(view.generation, 2);
        assert_eq!(titles(&view), vec!["C"]);
        assert_eq!(view.ready().map(|s| s.generation), Some(2));
    }

    #[test]
    fn older_cycle_is_discarded_once_newer_committed() {
        let catalog = Catalog::new();

        let slow = catalog.begin();
        let fast = catalog.begin();

        assert!(catalog.commit(fast, outcome(&["new"])));
        assert!(!catalog.commit(slow, outcome(&["old"])));
        assert_eq!(titles(&catalog.current()), vec!["new"]);
    }

    #[test]
    fn older_cycle_resolving_first_is_committed_then_superseded() {
        let catalog = Catalog::new();

        let slow = catalog.begin();
        let fast = catalog.begin();

        assert!(catalog.commit(slow, outcome(&["old"])));
        assert_eq!(titles(&catalog.current()), vec!["old"]);

        assert!(catalog.commit(fast, outcome(&["new"])));
        assert_eq!(titles(&catalog.current()), vec!["new"]);
    }

    #[test]
    fn cycles_outrun_by_newer_starts_still_commit() {
        let catalog = Catalog::new();

        let first = catalog.begin();
        for _ in 0..5 {
            catalog.begin();
        }

        assert!(catalog.commit(first, outcome(&["A"])));
        assert!(!catalog.current().is_loading());
    }

    #[test]
    fn listing_ids_do_not_survive_a_refetch() {
        let catalog = Catalog::new();

        let first = catalog.begin();
        catalog.commit(first, outcome(&["A"]));
        let old_id = catalog.current().ready().unwrap().listings[0].id.clone();
        assert_eq!(
            catalog.current().ready().unwrap().listing(&old_id).map(|l| l.title.as_str()),
            Some("A")
        );

        std::thread::sleep(std::time::Duration::from_millis(2));
        let second = catalog.begin();
        catalog.commit(second, outcome(&["A"]));

        let view = catalog.current();
        let snapshot = view.ready().unwrap();
        assert!(snapshot.listing(&old_id).is_none());
        assert!(snapshot.listing(&snapshot.listings[0].id).is_some());
    }

    #[test]
    fn failure_keeps_last_good_snapshot() {
        let catalog = Catalog::new();

        let ok = catalog.begin();
        catalog.commit(ok, outcome(&["A"]));
        let bad = catalog.begin();
        catalog.commit(bad, failed(SheetError::NotPublic { url: "u".into() }));

        let view = catalog.current();
        assert!(view.ready().is_none());
        assert_eq!(titles(&view), vec!["A"]);
        let failure = view.failure.as_ref().unwrap();
        assert_eq!(failure.category, FailureCategory::SheetNotPublic);
        assert_eq!(failure.generation, 2);
    }

    #[test]
    fn success_after_failure_clears_it() {
        let catalog = Catalog::new();

        let bad = catalog.begin();
        catalog.commit(
            bad,
            failed(SheetError::Status {
                url: "u".into(),
                status: 500,
            }),
        );
        let ok = catalog.begin();
        catalog.commit(ok, outcome(&[]));

        let view = catalog.current();
        assert!(view.failure.is_none());
        assert!(view.ready().unwrap().is_empty());
    }

    #[tokio::test]
    async fn subscribers_see_commits() {
        let catalog = Catalog::new();
        let mut rx = catalog.subscribe();

        let generation = catalog.begin();
        catalog.commit(generation, outcome(&["A"]));

        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().generation, 1);
    }
}
