//! Application layer of the tutor client.
//!
//! Binds the chat domain of `tutor-core` to its collaborators: the session
//! engine drives every mutation through validation, persistence and
//! rendering, and orchestrates the reply flows.

pub mod preferences_service;
pub mod session;

pub use preferences_service::PreferencesService;
pub use session::{
    ChatBackends, ChatSessionEngine, ReplyOutcome, SessionGuard, SyncService, UiBindings,
};
