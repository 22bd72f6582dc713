//! In-memory `SheetFetcher` for tests and offline runs

use crate::error::{Result, SheetError};
use crate::sheets::traits::SheetFetcher;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Debug, Clone)]
enum Reply {
    Body(String),
    Status(u16),
    Transport,
}

#[derive(Debug, Clone)]
struct Step {
    reply: Reply,
    gate: Option<Arc<Notify>>,
}

#[derive(Debug)]
struct Route {
    key: String,
    steps: Vec<Step>,
    calls: usize,
}

/// Canned replies keyed by a URL substring.
///
/// Each route plays its replies in order and repeats the last one. Unknown
/// URLs answer 404.
#[derive(Debug, Default)]
pub struct StubFetcher {
    routes: Mutex<Vec<Route>>,
    requested: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(self, key: &str, reply: Reply, gate: Option<Arc<Notify>>) -> Self {
        {
            let mut routes = self.routes.lock().unwrap_or_else(|e| e.into_inner());
            let step = Step { reply, gate };
            match routes.iter_mut().find(|r| r.key == key) {
                Some(route) => route.steps.push(step),
                None => routes.push(Route {
                    key: key.to_string(),
                    steps: vec![step],
                    calls: 0,
                }),
            }
        }
        self
    }

    pub fn with_body(self, key: &str, body: &str) -> Self {
        self.push(key, Reply::Body(body.to_string()), None)
    }

    /// Reply with `body` only once `gate` is notified
    pub fn with_gated_body(self, key: &str, body: &str, gate: Arc<Notify>) -> Self {
        self.push(key, Reply::Body(body.to_string()), Some(gate))
    }

    pub fn with_status(self, key: &str, status: u16) -> Self {
        self.push(key, Reply::Status(status), None)
    }

    pub fn with_transport_error(self, key: &str) -> Self {
        self.push(key, Reply::Transport, None)
    }

    /// Every URL requested so far, in call order
    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn next_step(&self, url: &str) -> Option<Step> {
        let mut routes = self.routes.lock().unwrap_or_else(|e| e.into_inner());
        let route = routes.iter_mut().find(|r| url.contains(&r.key))?;
        let index = route.calls.min(route.steps.len() - 1);
        route.calls += 1;
        Some(route.steps[index].clone())
    }
}

#[async_trait]
impl SheetFetcher for StubFetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        self.requested
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(url.to_string());

        let Some(step) = self.next_step(url) else {
            return Err(SheetError::Status {
                url: url.to_string(),
                status: 404,
            });
        };

        if let Some(gate) = step.gate {
            gate.notified().await;
        }

        match step.reply {
            Reply::Body(body) => Ok(body),
            Reply::Status(status) => Err(SheetError::Status {
                url: url.to_string(),
                status,
            }),
            Reply::Transport => Err(SheetError::transport(url, "connection refused")),
        }
    }
}
