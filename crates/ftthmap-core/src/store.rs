// ── Record store ──
//
// Holds the one dataset derived from the last successful load. Front-ends
// read a cheap `Arc` snapshot and may subscribe to replacements through a
// `watch` channel. Entities are never mutated after aggregation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::info;

use crate::aggregate::{Summary, aggregate};
use crate::index;
use crate::model::{AddressEntity, RawRecord};

/// Everything derived from one load.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub entities: Vec<AddressEntity>,
    pub summary: Summary,
    pub streets: Vec<String>,
    pub providers: Vec<String>,
    /// `None` for the empty pre-load dataset.
    pub loaded_at: Option<DateTime<Utc>>,
}

impl Dataset {
    /// Aggregate `records` and build the street and provider indexes.
    pub fn from_records(records: &[RawRecord]) -> Self {
        let aggregation = aggregate(records);
        let streets = index::streets(&aggregation.entities);
        let providers = index::providers(&aggregation.entities);
        Self {
            entities: aggregation.entities,
            summary: aggregation.summary,
            streets,
            providers,
            loaded_at: Some(Utc::now()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded_at.is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Reactive holder for the current [`Dataset`].
pub struct DataStore {
    current: watch::Sender<Arc<Dataset>>,
}

impl DataStore {
    /// A store holding the empty dataset: zero counts, no entities.
    pub fn new() -> Self {
        let (current, _) = watch::channel(Arc::new(Dataset::default()));
        Self { current }
    }

    /// Aggregate `records`, publish the result, and return it.
    pub fn load(&self, records: &[RawRecord]) -> Arc<Dataset> {
        let dataset = Arc::new(Dataset::from_records(records));
        info!(
            records = dataset.summary.records,
            entities = dataset.summary.total,
            streets = dataset.streets.len(),
            providers = dataset.providers.len(),
            "dataset loaded"
        );
        // `send_replace` updates even with zero receivers.
        self.current.send_replace(Arc::clone(&dataset));
        dataset
    }

    /// Current dataset (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Dataset> {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Dataset>> {
        self.current.subscribe()
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}
