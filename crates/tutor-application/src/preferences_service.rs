//! Sidebar and theme preferences.

use std::sync::Arc;
use tutor_core::error::Result;
use tutor_core::preferences::{
    PreferenceStore, SIDEBAR_STATE_KEY, SidebarState, THEME_KEY, Theme, UiPreferences,
};

/// Reads preferences at startup and writes them when toggled.
///
/// Unreadable values fall back to the defaults (sidebar open, light theme).
pub struct PreferencesService {
    store: Arc<dyn PreferenceStore>,
}

impl PreferencesService {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    pub fn load(&self) -> UiPreferences {
        UiPreferences {
            sidebar: self
                .read(SIDEBAR_STATE_KEY)
                .map(|v| SidebarState::parse(&v))
                .unwrap_or_default(),
            theme: self
                .read(THEME_KEY)
                .map(|v| Theme::parse(&v))
                .unwrap_or_default(),
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!("[PreferencesService] Failed to read '{}': {}", key, err);
                None
            }
        }
    }

    /// Flips the sidebar state and returns the new one.
    pub fn toggle_sidebar(&self) -> Result<SidebarState> {
        let next = self.load().sidebar.toggled();
        self.store.set(SIDEBAR_STATE_KEY, next.as_str())?;
        Ok(next)
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.store.set(THEME_KEY, theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use tutor_core::TutorError;

    #[derive(Default)]
    struct MemoryStore {
        values: Mutex<HashMap<String, String>>,
        fail_reads: bool,
    }

    impl PreferenceStore for MemoryStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            if self.fail_reads {
                return Err(TutorError::io("disk on fire"));
            }
            Ok(self.values.lock().unwrap().get(key).cloned())
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            self.values
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_defaults_when_unset() {
        let service = PreferencesService::new(Arc::new(MemoryStore::default()));
        assert_eq!(service.load(), UiPreferences::default());
    }

    #[test]
    fn test_toggle_and_theme_persist() {
        let store = Arc::new(MemoryStore::default());
        let service = PreferencesService::new(store.clone());

        assert_eq!(service.toggle_sidebar().unwrap(), SidebarState::Closed);
        service.set_theme(Theme::Dark).unwrap();

        let prefs = service.load();
        assert_eq!(prefs.sidebar, SidebarState::Closed);
        assert_eq!(prefs.theme, Theme::Dark);
        assert_eq!(
            store.values.lock().unwrap().get("sidebar_state").map(String::as_str),
            Some("closed")
        );
    }

    #[test]
    fn test_read_failure_falls_back() {
        let store = MemoryStore {
            fail_reads: true,
            ..Default::default()
        };
        let service = PreferencesService::new(Arc::new(store));
        assert_eq!(service.load().theme, Theme::Light);
    }
}
