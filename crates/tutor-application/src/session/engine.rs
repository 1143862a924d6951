//! Chat session engine.
//!
//! `ChatSessionEngine` owns the [`SessionState`] and is the only way to mutate
//! it. Every mutating operation follows the same shape:
//!
//! 1. take the write lock and apply one invariant-preserving mutation
//! 2. capture the snapshot and render projection, release the lock
//! 3. hand the snapshot to [`SyncService`] (fire-and-forget)
//! 4. render the parts of the UI that changed
//!
//! The lock is never held across an await on a network request or a dialog,
//! so each mutation is a single critical section while other operations stay
//! live.

use super::bindings::{ChatBackends, UiBindings};
use super::guard::SessionGuard;
use super::messages::{
    self, AUTH_REQUIRED, CONFIRM_DELETE_ALL, GENERATING_LABEL, TITLE_ARCHIVE, TITLE_ERROR,
    TITLE_RENAME_ERROR, TITLE_UNARCHIVE,
};
use super::sync::SyncService;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;
use tutor_core::chat::{ChatId, ChatList, ChatSnapshot, SessionState, SessionView};
use tutor_core::config::ClientConfig;
use tutor_core::error::{Result, TutorError};
use tutor_core::interaction::{Destination, RenderProjector, RenderScope};

pub struct ChatSessionEngine {
    pub(super) state: RwLock<SessionState>,
    pub(super) backends: ChatBackends,
    pub(super) ui: UiBindings,
    pub(super) guard: Arc<SessionGuard>,
    pub(super) sync: SyncService,
    pub(super) system_prompt: String,
    prefix: String,
    generating: AtomicBool,
}

impl ChatSessionEngine {
    /// Creates an engine holding the default state. Call [`load`](Self::load)
    /// before the first user action.
    ///
    /// Must be called inside a tokio runtime (the sync worker is spawned here).
    pub fn new(backends: ChatBackends, ui: UiBindings, config: &ClientConfig) -> Self {
        let guard = Arc::new(SessionGuard::new(ui.dialogs.clone(), ui.navigator.clone()));
        let sync = SyncService::new(backends.store.clone(), guard.clone());
        Self {
            state: RwLock::new(SessionState::new(config.default_chat_prefix.as_str())),
            backends,
            ui,
            guard,
            sync,
            system_prompt: config.system_prompt.clone(),
            prefix: config.default_chat_prefix.clone(),
            generating: AtomicBool::new(false),
        }
    }

    // ============================================================================
    // Read access
    // ============================================================================

    pub async fn view(&self) -> SessionView {
        SessionView::project(&*self.state.read().await)
    }

    pub async fn snapshot(&self) -> ChatSnapshot {
        self.state.read().await.snapshot()
    }

    pub async fn current_chat_id(&self) -> ChatId {
        self.state.read().await.current_chat_id().to_string()
    }

    pub fn sync(&self) -> &SyncService {
        &self.sync
    }

    pub fn guard(&self) -> &SessionGuard {
        &self.guard
    }

    /// Returns true while an AI chat is being generated.
    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::SeqCst)
    }

    // ============================================================================
    // Internal helpers
    // ============================================================================

    /// Applies `mutate`, then persists and renders. A failed mutation leaves
    /// the state untouched and triggers neither.
    pub(super) async fn commit<T, F>(&self, scope: RenderScope, mutate: F) -> Result<T>
    where
        F: FnOnce(&mut SessionState) -> Result<T>,
    {
        let (value, snapshot, view) = {
            let mut state = self.state.write().await;
            let value = mutate(&mut state)?;
            (value, state.snapshot(), SessionView::project(&state))
        };
        self.sync.push(snapshot);
        self.ui.renderer.render(&view, scope);
        Ok(value)
    }

    async fn render(&self, scope: RenderScope) {
        let view = self.view().await;
        self.ui.renderer.render(&view, scope);
    }

    /// Surfaces a rejected operation. Validation failures are shown to the
    /// user; anything else is only logged.
    pub(super) async fn report(&self, err: &TutorError, title: &str) {
        if err.is_validation() {
            self.ui.dialogs.notify(&err.reason(), title).await;
        } else {
            tracing::warn!("[ChatSessionEngine] {}: {}", title, err);
        }
    }

    // ============================================================================
    // Startup
    // ============================================================================

    /// Replaces the state with the stored snapshot and renders it.
    ///
    /// A missing snapshot or a transport failure starts the session from the
    /// default chat; the latter is also reported. Nothing is pushed.
    ///
    /// # Errors
    ///
    /// Only `AuthExpired`, after the user was notified and sent to login.
    pub async fn load(&self) -> Result<()> {
        tracing::info!("[ChatSessionEngine] Loading chats");
        match self.backends.store.load().await {
            Ok(snapshot) => {
                let state = SessionState::from_snapshot(snapshot, self.prefix.as_str());
                tracing::info!(
                    "[ChatSessionEngine] Loaded {} active and {} archived chats",
                    state.active().len(),
                    state.archived().len()
                );
                *self.state.write().await = state;
                self.render(RenderScope::ALL).await;
                Ok(())
            }
            Err(TutorError::AuthExpired) => {
                self.guard.expire(AUTH_REQUIRED).await;
                Err(TutorError::AuthExpired)
            }
            Err(err) => {
                tracing::warn!("[ChatSessionEngine] Failed to load chats: {}", err);
                *self.state.write().await = SessionState::new(self.prefix.as_str());
                self.render(RenderScope::ALL).await;
                self.ui
                    .dialogs
                    .notify(&messages::load_failed(&err.reason()), TITLE_ERROR)
                    .await;
                Ok(())
            }
        }
    }

    // ============================================================================
    // Lifecycle operations
    // ============================================================================

    /// Creates the lowest-numbered free `Chat <n>` and makes it current.
    pub async fn create_chat(&self) -> Result<ChatId> {
        let id = self
            .commit(RenderScope::ACTIVE, |state| Ok(state.create_chat()))
            .await?;
        tracing::info!("[ChatSessionEngine] Created chat '{}'", id);
        Ok(id)
    }

    /// Asks the server for a new AI chat and inserts it under a free name.
    ///
    /// Refuses to start while another generation is outstanding. Every
    /// failure is reported to the user and leaves the state untouched.
    pub async fn create_ai_chat(&self, topic: &str) -> Result<ChatId> {
        let _busy = BusyGuard::acquire(&self.generating, self.ui.renderer.as_ref())?;
        tracing::info!("[ChatSessionEngine] Generating AI chat (topic: '{}')", topic);

        match self.backends.generator.generate_chat(topic.trim()).await {
            Ok(generated) => {
                let id = self
                    .commit(RenderScope::ACTIVE, move |state| {
                        Ok(state.insert_ai_chat(&generated.name, generated.turns))
                    })
                    .await?;
                tracing::info!("[ChatSessionEngine] Created AI chat '{}'", id);
                Ok(id)
            }
            Err(err) => {
                match &err {
                    TutorError::AuthExpired => self.guard.expire(AUTH_REQUIRED).await,
                    TutorError::Application(message) => {
                        self.ui
                            .dialogs
                            .notify(&messages::ai_error(message), TITLE_ERROR)
                            .await
                    }
                    TutorError::MalformedResponse(message) => {
                        self.ui.dialogs.notify(message, TITLE_ERROR).await
                    }
                    other => {
                        self.ui
                            .dialogs
                            .notify(&messages::ai_chat_failure(&other.reason()), TITLE_ERROR)
                            .await
                    }
                }
                Err(err)
            }
        }
    }

    /// Renames a chat in whichever list holds it.
    pub async fn rename_chat(&self, old: &str, new: &str) -> Result<ChatList> {
        let result = self
            .commit(RenderScope::ALL, |state| state.rename_chat(old, new))
            .await;
        match &result {
            Ok(list) => tracing::info!(
                "[ChatSessionEngine] Renamed {} chat '{}' to '{}'",
                list,
                old,
                new.trim()
            ),
            Err(err) => self.report(err, TITLE_RENAME_ERROR).await,
        }
        result
    }

    pub async fn archive_chat(&self, id: &str) -> Result<()> {
        let result = self
            .commit(RenderScope::ALL, |state| state.archive_chat(id))
            .await;
        match &result {
            Ok(()) => tracing::info!("[ChatSessionEngine] Archived '{}'", id),
            Err(err) => self.report(err, TITLE_ARCHIVE).await,
        }
        result
    }

    pub async fn unarchive_chat(&self, id: &str) -> Result<()> {
        let result = self
            .commit(RenderScope::ALL, |state| state.unarchive_chat(id))
            .await;
        match &result {
            Ok(()) => tracing::info!("[ChatSessionEngine] Unarchived '{}'", id),
            Err(err) => self.report(err, TITLE_UNARCHIVE).await,
        }
        result
    }

    pub async fn delete_chat(&self, id: &str, list: ChatList) -> Result<()> {
        let scope = match list {
            ChatList::Active => RenderScope::ACTIVE,
            ChatList::Archived => RenderScope::ARCHIVED,
        };
        let result = self
            .commit(scope, |state| state.delete_chat(id, list))
            .await;
        match &result {
            Ok(()) => tracing::info!("[ChatSessionEngine] Deleted {} chat '{}'", list, id),
            Err(err) => self.report(err, TITLE_ERROR).await,
        }
        result
    }

    /// Replaces every active chat with one empty default chat once the user
    /// confirms. Returns false when the user declined.
    pub async fn delete_all_active(&self) -> Result<bool> {
        if !self.ui.dialogs.confirm(CONFIRM_DELETE_ALL).await {
            return Ok(false);
        }
        self.commit(RenderScope::ACTIVE, |state| {
            state.delete_all_active();
            Ok(())
        })
        .await?;
        tracing::info!("[ChatSessionEngine] Deleted all active chats");
        Ok(true)
    }

    /// Makes an active chat current. Only the view changes; nothing is pushed.
    pub async fn select_chat(&self, id: &str) -> Result<()> {
        let view = {
            let mut state = self.state.write().await;
            state.select_chat(id)?;
            SessionView::project(&state)
        };
        self.ui.renderer.render(&view, RenderScope::ACTIVE);
        Ok(())
    }

    /// Leaves the chat UI through the logout boundary.
    pub fn logout(&self) {
        tracing::info!("[ChatSessionEngine] Logging out");
        self.ui.navigator.navigate(Destination::Logout);
    }
}

/// Marks the AI chat control busy for as long as it lives.
struct BusyGuard<'a> {
    flag: &'a AtomicBool,
    renderer: &'a dyn RenderProjector,
}

impl<'a> BusyGuard<'a> {
    fn acquire(flag: &'a AtomicBool, renderer: &'a dyn RenderProjector) -> Result<Self> {
        if flag.swap(true, Ordering::SeqCst) {
            tracing::debug!("[ChatSessionEngine] AI chat generation already in progress");
            return Err(TutorError::validation(
                "An AI chat is already being generated.",
            ));
        }
        renderer.busy(Some(GENERATING_LABEL));
        Ok(Self { flag, renderer })
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
        self.renderer.busy(None);
    }
}
