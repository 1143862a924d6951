//! Chat session orchestration.
//!
//! # Module Structure
//!
//! - `bindings`: the remote and UI collaborators an engine is built from
//! - `engine`: `ChatSessionEngine` and its lifecycle operations
//! - `reply`: the send / reply / edit flows
//! - `flows`: dialog-mediated wrappers around the lifecycle operations
//! - `guard`: one-shot handling of session expiry
//! - `sync`: ordered, best-effort snapshot persistence
//! - `messages`: user-facing texts

mod bindings;
mod engine;
mod flows;
mod guard;
mod messages;
mod reply;
mod sync;


pub use bindings::{ChatBackends, UiBindings};
pub use engine::ChatSessionEngine;
pub use guard::SessionGuard;
pub use messages::GENERATING_LABEL;
pub use reply::ReplyOutcome;
pub use sync::SyncService;
