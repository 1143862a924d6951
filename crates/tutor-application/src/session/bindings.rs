//! Collaborators a [`ChatSessionEngine`](super::ChatSessionEngine) is built from.

use std::sync::Arc;
use tutor_core::interaction::{DialogPrimitives, Navigator, RenderProjector};
use tutor_core::remote::{AiReplyFetcher, ChatGenerator, ChatStore, ReplyFetcher};

/// Remote side of the session.
#[derive(Clone)]
pub struct ChatBackends {
    pub store: Arc<dyn ChatStore>,
    pub compute: Arc<dyn ReplyFetcher>,
    pub ai: Arc<dyn AiReplyFetcher>,
    pub generator: Arc<dyn ChatGenerator>,
}

impl ChatBackends {
    /// Uses one backend for every remote concern.
    pub fn shared<B>(backend: Arc<B>) -> Self
    where
        B: ChatStore + ReplyFetcher + AiReplyFetcher + ChatGenerator + 'static,
    {
        Self {
            store: backend.clone(),
            compute: backend.clone(),
            ai: backend.clone(),
            generator: backend,
        }
    }
}

/// Front-end side of the session.
#[derive(Clone)]
pub struct UiBindings {
    pub dialogs: Arc<dyn DialogPrimitives>,
    pub renderer: Arc<dyn RenderProjector>,
    pub navigator: Arc<dyn Navigator>,
}
