//! Snapshot persistence.
//!
//! Every mutation hands the full snapshot to [`SyncService::push`], which
//! returns immediately. A single worker task sends the snapshots to the store
//! in the order they were pushed, so the store always ends up with the latest
//! state. Failures are logged and never retried; an unauthorized answer
//! expires the session.

use super::guard::SessionGuard;
use super::messages::AUTH_EXPIRED_ON_SAVE;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{mpsc, oneshot};
use tutor_core::chat::ChatSnapshot;
use tutor_core::error::TutorError;
use tutor_core::remote::ChatStore;

enum SyncCommand {
    Push(ChatSnapshot),
    Flush(oneshot::Sender<()>),
}

/// Fire-and-forget snapshot pusher.
///
/// Must be created inside a tokio runtime.
pub struct SyncService {
    tx: mpsc::UnboundedSender<SyncCommand>,
    attempts: Arc<AtomicUsize>,
}

impl SyncService {
    pub fn new(store: Arc<dyn ChatStore>, guard: Arc<SessionGuard>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let attempts = Arc::new(AtomicUsize::new(0));
        tokio::spawn(run_worker(rx, store, guard, attempts.clone()));
        Self { tx, attempts }
    }

    /// Queues `snapshot` for persistence.
    pub fn push(&self, snapshot: ChatSnapshot) {
        if self.tx.send(SyncCommand::Push(snapshot)).is_err() {
            tracing::warn!("[SyncService] Worker stopped, snapshot dropped");
        }
    }

    /// Waits until every snapshot pushed so far has been handled.
    pub async fn flush(&self) {
        let (done, rx) = oneshot::channel();
        if self.tx.send(SyncCommand::Flush(done)).is_ok() {
            let _ = rx.await;
        }
    }

    /// Number of pushes handed to the store so far.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

async fn run_worker(
    mut rx: mpsc::UnboundedReceiver<SyncCommand>,
    store: Arc<dyn ChatStore>,
    guard: Arc<SessionGuard>,
    attempts: Arc<AtomicUsize>,
) {
    while let Some(command) = rx.recv().await {
        match command {
            SyncCommand::Push(snapshot) => {
                if guard.is_expired() {
                    tracing::debug!("[SyncService] Session expired, skipping push");
                    continue;
                }
                attempts.fetch_add(1, Ordering::SeqCst);
                match store.save(&snapshot).await {
                    Ok(()) => tracing::debug!(
                        "[SyncService] Pushed snapshot ({} chats)",
                        snapshot.chat_count()
                    ),
                    Err(TutorError::AuthExpired) => guard.expire(AUTH_EXPIRED_ON_SAVE).await,
                    Err(err) => tracing::warn!("[SyncService] Push failed: {}", err),
                }
            }
            SyncCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    tracing::debug!("[SyncService] Worker finished");
}
