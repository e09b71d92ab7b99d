//! Debounced draft autosave.
//!
//! DESIGN
//! ======
//! The editor core has no timers. The host owns one autosave task per open
//! sketch and feeds it a fresh `DraftBlob` after every scene change. The task
//! keeps only the newest snapshot and writes it once `delay` has passed
//! without another snapshot arriving; each arrival restarts the deadline.
//!
//! ERROR HANDLING
//! ==============
//! Draft writes are best effort. Each write runs on the blocking pool so a
//! slow disk never stalls the runtime, and the loop keeps taking snapshots
//! while it is in flight. At most one write runs at a time; a snapshot whose
//! deadline passes meanwhile is written once the previous write finishes.
//! A failed write is logged and the task keeps running; the next snapshot
//! gets a fresh attempt. Dropping every sender waits for the write in flight,
//! ends the task and discards any snapshot still waiting for its deadline.

#[cfg(test)]
#[path = "autosave_test.rs"]
mod autosave_test;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;
use tracing::{debug, error, warn};

use crate::storage::{DraftBlob, DraftStore};

/// Snapshots buffered between the editor and the writer.
const AUTOSAVE_QUEUE_CAPACITY: usize = 64;

/// Shared handle to the draft backend used by the autosave task.
pub type SharedDraftStore = Arc<dyn DraftStore + Send + Sync>;

/// Spawn the autosave task. Returns the snapshot sender and the task handle.
///
/// Hosts normally pass [`crate::consts::AUTOSAVE_DELAY`].
#[must_use]
pub fn spawn_draft_autosave(store: SharedDraftStore, delay: Duration) -> (mpsc::Sender<DraftBlob>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<DraftBlob>(AUTOSAVE_QUEUE_CAPACITY);
    debug!(delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX), "draft autosave configured");

    let handle = tokio::spawn(async move {
        let mut pending: Option<DraftBlob> = None;
        let mut in_flight: Option<JoinHandle<()>> = None;
        let deadline = tokio::time::sleep(delay);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                maybe_draft = rx.recv() => {
                    let Some(draft) = maybe_draft else {
                        if pending.is_some() {
                            debug!("autosave closed; pending draft discarded");
                        }
                        if let Some(write) = in_flight.take() {
                            log_join(write.await);
                        }
                        break;
                    };
                    pending = Some(draft);
                    deadline.as_mut().reset(Instant::now() + delay);
                }
                () = &mut deadline, if pending.is_some() && in_flight.is_none() => {
                    if let Some(draft) = pending.take() {
                        let store = Arc::clone(&store);
                        in_flight = Some(tokio::task::spawn_blocking(move || write_draft(store.as_ref(), &draft)));
                    }
                }
                joined = finish(&mut in_flight), if in_flight.is_some() => {
                    in_flight = None;
                    log_join(joined);
                }
            }
        }
    });

    (tx, handle)
}

/// Non-blocking enqueue of a draft snapshot.
///
/// Returns `false` if the snapshot was dropped because the queue is full or
/// the task has stopped.
pub fn enqueue_draft(tx: &mpsc::Sender<DraftBlob>, draft: DraftBlob) -> bool {
    match tx.try_send(draft) {
        Ok(()) => true,
        Err(mpsc::error::TrySendError::Full(_)) => {
            warn!("draft autosave queue full; dropping snapshot");
            false
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            warn!("draft autosave stopped; dropping snapshot");
            false
        }
    }
}

async fn finish(write: &mut Option<JoinHandle<()>>) -> Result<(), JoinError> {
    match write {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

fn log_join(joined: Result<(), JoinError>) {
    if let Err(e) = joined {
        error!(error = %e, "draft write task failed");
    }
}

fn write_draft(store: &(dyn DraftStore + Send + Sync), draft: &DraftBlob) {
    match store.save(draft) {
        Ok(()) => debug!(elements = draft.elements.len(), timestamp = draft.timestamp, "draft saved"),
        Err(e) => error!(error = %e, elements = draft.elements.len(), "draft save failed"),
    }
}
