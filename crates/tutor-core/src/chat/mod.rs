//! Chat domain module.
//!
//! # Module Structure
//!
//! - `model`: turns, chats, metadata and the archived pair
//! - `naming`: generated and collision-free chat names
//! - `state`: `SessionState` and every invariant-preserving mutation
//! - `snapshot`: the full-state value pushed to and loaded from the remote store
//! - `transcript`: role-tagged history for AI replies
//! - `view`: render projection

mod model;
mod naming;
mod snapshot;
mod state;
mod transcript;
mod view;

pub use model::{
    ArchivedChat, Chat, ChatId, ChatList, ChatMetadata, EDITED_NEEDS_RESEND, NO_REPLY,
    PENDING_REPLY, Turn,
};
pub use naming::{disambiguate, next_numbered_name};
pub use snapshot::ChatSnapshot;
pub use state::{DEFAULT_CHAT_PREFIX, PendingReply, SessionState};
pub use transcript::{DEFAULT_SYSTEM_PROMPT, TranscriptEntry, TranscriptRole, build_transcript};
pub use view::{AI_LABEL_SUFFIX, ChatEntry, MessageView, SessionView};
