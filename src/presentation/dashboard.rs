//! The single display surface.
//!
//! Lookups may overlap when a user submits again before the previous one
//! finished. Every submission takes a generation number and only the newest
//! generation may write to the surface; results of superseded lookups are
//! dropped.

use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::{ErrorView, LookupView, MapState};
use crate::config::MapConfig;
use crate::geocoding::Geocoder;
use crate::lookup::LookupOrchestrator;
use crate::weather::WeatherSource;

/// Content of the data panel
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Panel {
    Idle,
    Loading { query: String },
    Ready(LookupView),
    Error(ErrorView),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    /// Generation of the submission that last wrote the surface
    pub generation: u64,
    pub panel: Panel,
    pub map: MapState,
}

pub struct Dashboard {
    latest: AtomicU64,
    state: Mutex<DashboardSnapshot>,
}

impl Dashboard {
    #[must_use]
    pub fn new(map: &MapConfig) -> Self {
        Self {
            latest: AtomicU64::new(0),
            state: Mutex::new(DashboardSnapshot {
                generation: 0,
                panel: Panel::Idle,
                map: MapState::new(map),
            }),
        }
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        self.state.lock().await.clone()
    }

    /// Run a lookup and show its outcome unless a newer submission arrived meanwhile.
    ///
    /// The lookup runs on its own task, so its outcome still reaches the
    /// surface when the caller stops waiting for it.
    pub async fn submit<G, W>(
        self: &Arc<Self>,
        orchestrator: &Arc<LookupOrchestrator<G, W>>,
        input: &str,
    ) -> DashboardSnapshot
    where
        G: Geocoder + 'static,
        W: WeatherSource + 'static,
    {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let task = tokio::spawn(Arc::clone(self).run(
            generation,
            Arc::clone(orchestrator),
            input.to_string(),
        ));

        if let Err(e) = task.await {
            warn!("Lookup task {} did not complete: {}", generation, e);
        }

        self.snapshot().await
    }

    async fn run<G, W>(
        self: Arc<Self>,
        generation: u64,
        orchestrator: Arc<LookupOrchestrator<G, W>>,
        input: String,
    ) where
        G: Geocoder,
        W: WeatherSource,
    {
        self.apply(generation, |snapshot| {
            snapshot.panel = Panel::Loading {
                query: input.clone(),
            };
        })
        .await;

        match orchestrator.lookup(&input).await {
            Ok(result) => {
                self.apply(generation, |snapshot| {
                    snapshot
                        .map
                        .show(result.location.coordinates(), &result.location.display_name);
                    snapshot.panel = Panel::Ready(LookupView::from_result(&result));
                })
                .await;
            }
            Err(e) => {
                self.apply(generation, |snapshot| {
                    snapshot.panel = Panel::Error(ErrorView::from_error(&e));
                })
                .await;
            }
        }
    }

    async fn apply<F>(&self, generation: u64, update: F)
    where
        F: FnOnce(&mut DashboardSnapshot),
    {
        let mut snapshot = self.state.lock().await;
        if generation != self.latest.load(Ordering::SeqCst) {
            debug!(
                "Dropping output of superseded lookup {} (latest is {})",
                generation,
                self.latest.load(Ordering::SeqCst)
            );
            return;
        }
        update(&mut snapshot);
        snapshot.generation = generation;
    }
}
