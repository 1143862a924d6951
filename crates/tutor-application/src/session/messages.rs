//! User-facing texts shown in notifications and written into turns.

pub const AUTH_REQUIRED: &str =
    "Session expired or authentication required. Redirecting to login.";
pub const AUTH_EXPIRED_ON_SAVE: &str = "Session expired. Redirecting to login.";
pub const TITLE_AUTH: &str = "Authentication";

pub const TITLE_NETWORK_ERROR: &str = "Network Error";
pub const TITLE_AI_ERROR: &str = "AI Error";
pub const TITLE_ERROR: &str = "Error";
pub const TITLE_RENAME_ERROR: &str = "Rename Error";
pub const TITLE_UNARCHIVE: &str = "Unarchive";
pub const TITLE_ARCHIVE: &str = "Archive";
pub const TITLE_AI_CHAT_CREATED: &str = "AI Chat Created";

/// Label of the AI chat control while a chat is being generated.
pub const GENERATING_LABEL: &str = "⏳ Generating...";

pub const CONFIRM_DELETE_ALL: &str =
    "Are you sure you want to delete ALL active chats? Archived chats will remain.";

pub const TOPIC_PROMPT_TITLE: &str = "Optional topic";
pub const TOPIC_PROMPT_PLACEHOLDER: &str = "e.g. basic algebra, hcf examples";
pub const RENAME_PROMPT_TITLE: &str = "Rename chat";

pub fn load_failed(reason: &str) -> String {
    format!("Network error while loading chats: {}", reason)
}

pub fn server_failure(reason: &str) -> String {
    format!("Error communicating with the server: {}", reason)
}

pub fn server_failure_notice(reason: &str) -> String {
    format!("Error: {}", reason)
}

pub fn ai_error(error: &str) -> String {
    format!("AI error: {}", error)
}

pub fn ai_failure(reason: &str) -> String {
    format!("Error communicating with AI: {}", reason)
}

pub fn ai_chat_failure(reason: &str) -> String {
    format!("Error creating AI chat: {}", reason)
}

pub fn ai_chat_created(name: &str) -> String {
    format!("Created AI chat: \"{}\"", name)
}

pub fn confirm_delete(name: &str) -> String {
    format!("Delete \"{}\"? This cannot be undone.", name)
}
