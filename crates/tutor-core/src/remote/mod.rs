//! Remote collaborators of the session engine.
//!
//! The engine only sees these traits; the HTTP implementation lives in
//! `tutor-infrastructure` and tests substitute in-memory fakes.
//!
//! # Module Structure
//!
//! - `store`: full-snapshot persistence (`ChatStore`)
//! - `reply`: deterministic and AI reply fetchers
//! - `generator`: server-side AI chat generation

mod generator;
mod reply;
mod store;

pub use generator::{ChatGenerator, GeneratedChat};
pub use reply::{AiReply, AiReplyFetcher, AlgebraAction, ComputeReply, ReplyFetcher};
pub use store::ChatStore;
