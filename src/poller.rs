use crate::catalog::Catalog;
use crate::sheets::orchestrator::SheetClient;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Requests an immediate refresh from a running `Poller`
#[derive(Clone)]
pub struct RetryHandle {
    notify: Arc<Notify>,
}

impl RetryHandle {
    /// Retries requested while a trigger is pending collapse into one
    pub fn retry(&self) {
        self.notify.notify_one();
    }
}

/// Re-fetches all sheets on a fixed interval and on demand.
///
/// Cycles are not serialized: a timer tick and a manual retry may run at the
/// same time. The catalog's generation check decides which result survives.
pub struct Poller {
    client: Arc<SheetClient>,
    catalog: Catalog,
    interval: Duration,
    retry: Arc<Notify>,
}

impl Poller {
    pub fn new(client: Arc<SheetClient>, catalog: Catalog, interval: Duration) -> Self {
        Self {
            client,
            catalog,
            interval,
            retry: Arc::new(Notify::new()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn retry_handle(&self) -> RetryHandle {
        RetryHandle {
            notify: self.retry.clone(),
        }
    }

    /// Run one full cycle and commit it. Returns whether it was committed.
    pub async fn refresh(&self) -> bool {
        run_cycle(self.client.clone(), self.catalog.clone()).await
    }

    /// Poll until `shutdown` resolves. The first cycle starts immediately.
    pub async fn run<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!("Polling sheets every {:?}", self.interval);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut cycles = JoinSet::new();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Stopping poller");
                    break;
                }
                _ = ticker.tick() => {
                    debug!("Timer refresh");
                    cycles.spawn(run_cycle(self.client.clone(), self.catalog.clone()));
                }
                _ = self.retry.notified() => {
                    info!("Manual refresh requested");
                    cycles.spawn(run_cycle(self.client.clone(), self.catalog.clone()));
                }
                Some(joined) = cycles.join_next(), if !cycles.is_empty() => {
                    if let Err(e) = joined {
                        warn!("Fetch cycle panicked: {}", e);
                    }
                }
            }
        }
    }
}

async fn run_cycle(client: Arc<SheetClient>, catalog: Catalog) -> bool {
    let generation = catalog.begin();
    debug!("Starting cycle {}", generation);
    let outcome = client.fetch_all().await;
    catalog.commit(generation, outcome)
}
