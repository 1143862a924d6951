//! Domain layer of the tutor client.
//!
//! Holds the chat model with its invariants, the snapshot and view
//! projections, and the traits through which the session engine reaches the
//! server and the user interface.

pub mod chat;
pub mod config;
pub mod error;
pub mod interaction;
pub mod preferences;
pub mod remote;

pub use error::{Result, TutorError};
