//! Dialog primitives.
//!
//! Each dialog is a single-shot request that suspends the caller until the
//! user answers or dismisses it. Dismissal is reported as a cancellation
//! (`false` / `None`) and callers treat it as a full no-op.

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

/// Awaitable single-shot UI requests.
#[async_trait]
pub trait DialogPrimitives: Send + Sync {
    /// Shows a message and waits until it is acknowledged.
    async fn notify(&self, message: &str, title: &str);

    /// Asks a yes/no question. Dismissal counts as "no".
    async fn confirm(&self, message: &str) -> bool;

    /// Asks for one line of text. `None` when cancelled.
    async fn prompt(&self, title: &str, placeholder: &str, default: &str) -> Option<String>;

    /// Lets the user edit `current`. `None` when cancelled.
    async fn edit_text(&self, current: &str) -> Option<String>;
}

/// The answering half of a pending dialog.
///
/// `resolve` consumes the resolver, so a dialog can be answered at most once.
/// Dropping an unanswered resolver cancels the dialog.
#[derive(Debug)]
pub struct DialogResolver<T> {
    tx: oneshot::Sender<T>,
}

impl<T> DialogResolver<T> {
    fn pair() -> (Self, oneshot::Receiver<T>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    /// Answers the dialog. A caller that stopped waiting is ignored.
    pub fn resolve(self, value: T) {
        let _ = self.tx.send(value);
    }

    /// Dismisses the dialog.
    pub fn cancel(self) {}
}

/// A dialog waiting to be shown by a front end.
#[derive(Debug)]
pub enum DialogRequest {
    Notify {
        title: String,
        message: String,
        done: DialogResolver<()>,
    },
    Confirm {
        message: String,
        answer: DialogResolver<bool>,
    },
    Prompt {
        title: String,
        placeholder: String,
        default: String,
        answer: DialogResolver<String>,
    },
    EditText {
        current: String,
        answer: DialogResolver<String>,
    },
}

/// Dialog primitives that forward every request over a channel.
///
/// The front end owns the receiver, shows each [`DialogRequest`] and answers
/// through its resolver. If the front end is gone, every dialog resolves as
/// cancelled.
#[derive(Debug, Clone)]
pub struct ChannelDialogs {
    tx: mpsc::UnboundedSender<DialogRequest>,
}

impl ChannelDialogs {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<DialogRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    async fn request<T>(&self, build: impl FnOnce(DialogResolver<T>) -> DialogRequest) -> Option<T> {
        let (resolver, rx) = DialogResolver::pair();
        if self.tx.send(build(resolver)).is_err() {
            tracing::debug!("[ChannelDialogs] No front end attached, dialog cancelled");
            return None;
        }
        rx.await.ok()
    }
}

#[async_trait]
impl DialogPrimitives for ChannelDialogs {
    async fn notify(&self, message: &str, title: &str) {
        self.request(|done| DialogRequest::Notify {
            title: title.to_string(),
            message: message.to_string(),
            done,
        })
        .await;
    }

    async fn confirm(&self, message: &str) -> bool {
        self.request(|answer| DialogRequest::Confirm {
            message: message.to_string(),
            answer,
        })
        .await
        .unwrap_or(false)
    }

    async fn prompt(&self, title: &str, placeholder: &str, default: &str) -> Option<String> {
        self.request(|answer| DialogRequest::Prompt {
            title: title.to_string(),
            placeholder: placeholder.to_string(),
            default: default.to_string(),
            answer,
        })
        .await
    }

    async fn edit_text(&self, current: &str) -> Option<String> {
        self.request(|answer| DialogRequest::EditText {
            current: current.to_string(),
            answer,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_confirm_resolves_once() {
        let (dialogs, mut rx) = ChannelDialogs::new();
        let ui = tokio::spawn(async move {
            match rx.recv().await {
                Some(DialogRequest::Confirm { message, answer }) => {
                    assert_eq!(message, "Delete?");
                    answer.resolve(true);
                }
                other => panic!("unexpected request: {:?}", other),
            }
        });
        assert!(dialogs.confirm("Delete?").await);
        ui.await.unwrap();
    }

    #[tokio::test]
    async fn test_dropped_resolver_cancels() {
        let (dialogs, mut rx) = ChannelDialogs::new();
        let ui = tokio::spawn(async move {
            if let Some(DialogRequest::Prompt { default, answer, .. }) = rx.recv().await {
                assert_eq!(default, "Chat 1");
                answer.cancel();
            }
        });
        assert_eq!(dialogs.prompt("Rename", "", "Chat 1").await, None);
        ui.await.unwrap();
    }

    #[tokio::test]
    async fn test_detached_front_end_cancels() {
        let (dialogs, rx) = ChannelDialogs::new();
        drop(rx);
        assert!(!dialogs.confirm("anything").await);
        assert_eq!(dialogs.edit_text("x").await, None);
        dialogs.notify("still returns", "Info").await;
    }
}
