//! Wire formats of the chat server.
//!
//! Domain types never touch JSON directly; every request and response body
//! passes through a DTO here.

mod chat;
mod snapshot;

pub use chat::{
    AiMessageDto, AiReplyRequest, AiReplyResponse, ContentPartDto, NewAiChatRequest,
    NewAiChatResponse, ReplyRequest, TurnDto,
};
pub use snapshot::{ArchivedEntryDto, LEGACY_META_SUFFIX, MetaDto, SnapshotDto};
