//! Data bridge: connects the [`DataStore`] to TUI actions.
//!
//! Runs as a background task. It subscribes to the store, performs the one
//! startup load into it, and forwards every published dataset as an
//! [`Action`]. There is no retry; a failed load leaves the UI empty with
//! the error in the status bar.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use ftthmap_config::ResolvedDataset;
use ftthmap_core::{DataStore, load_records};

use crate::action::Action;

pub async fn spawn_data_bridge(
    resolved: ResolvedDataset,
    store: Arc<DataStore>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    let mut datasets = store.subscribe();
    let origin = resolved.source.to_string();
    info!(%origin, "loading address data");

    let load = load_records(&resolved.source, &resolved.options);
    tokio::pin!(load);
    let mut loading = true;

    loop {
        tokio::select! {
            biased;

            () = cancel.cancelled() => break,

            result = &mut load, if loading => {
                loading = false;
                match result {
                    Ok(records) => {
                        store.load(&records);
                    }
                    Err(e) => {
                        error!(%origin, error = %e, "failed to load address data");
                        let _ = action_tx.send(Action::LoadFailed(e.to_string()));
                        break;
                    }
                }
            }

            changed = datasets.changed() => {
                if changed.is_err() {
                    break;
                }
                let dataset = datasets.borrow_and_update().clone();
                debug!(entities = dataset.summary.total, "dispatching DatasetLoaded");
                let _ = action_tx.send(Action::DatasetLoaded(dataset));
            }
        }
    }

    debug!("data bridge shut down");
}
