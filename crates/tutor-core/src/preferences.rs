//! Client-only UI preferences.
//!
//! Each preference is a single string value stored under its own key, read at
//! startup and written when toggled.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Storage key of the sidebar state.
pub const SIDEBAR_STATE_KEY: &str = "sidebar_state";

/// Storage key of the colour theme.
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidebarState {
    #[default]
    Open,
    Closed,
}

impl SidebarState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SidebarState::Open => "open",
            SidebarState::Closed => "closed",
        }
    }

    /// Anything other than `"closed"` reads as open.
    pub fn parse(value: &str) -> Self {
        if value == "closed" {
            SidebarState::Closed
        } else {
            SidebarState::Open
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SidebarState::Open => SidebarState::Closed,
            SidebarState::Closed => SidebarState::Open,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Anything other than `"dark"` reads as light.
    pub fn parse(value: &str) -> Self {
        if value == "dark" { Theme::Dark } else { Theme::Light }
    }
}

/// Both preferences as read at startup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiPreferences {
    pub sidebar: SidebarState,
    pub theme: Theme,
}

/// Key/value storage for preferences.
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_lenient() {
        assert_eq!(SidebarState::parse("closed"), SidebarState::Closed);
        assert_eq!(SidebarState::parse("garbage"), SidebarState::Open);
        assert_eq!(Theme::parse("dark"), Theme::Dark);
        assert_eq!(Theme::parse(""), Theme::Light);
    }

    #[test]
    fn test_toggle() {
        assert_eq!(SidebarState::Open.toggled(), SidebarState::Closed);
        assert_eq!(SidebarState::Closed.toggled().as_str(), "open");
    }
}
