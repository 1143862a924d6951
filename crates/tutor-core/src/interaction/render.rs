//! Render projector trait.

use crate::chat::SessionView;

/// Which parts of the UI changed after an operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderScope {
    pub chat_list: bool,
    pub archived_list: bool,
    pub messages: bool,
}

impl RenderScope {
    pub const MESSAGES: Self = Self {
        chat_list: false,
        archived_list: false,
        messages: true,
    };

    pub const ACTIVE: Self = Self {
        chat_list: true,
        archived_list: false,
        messages: true,
    };

    pub const ARCHIVED: Self = Self {
        chat_list: false,
        archived_list: true,
        messages: false,
    };

    pub const ALL: Self = Self {
        chat_list: true,
        archived_list: true,
        messages: true,
    };
}

/// Paints a projection of the session. Must not block.
pub trait RenderProjector: Send + Sync {
    fn render(&self, view: &SessionView, scope: RenderScope);

    /// Shows (`Some(label)`) or clears (`None`) the busy state of the AI chat
    /// control.
    fn busy(&self, _label: Option<&str>) {}
}
