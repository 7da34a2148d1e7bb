//! Light/dark theme preference
//!
//! The preference is an explicit context value: read once when the page
//! starts, written through once per toggle. `js/devlog.js` follows the same
//! rules against `localStorage`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage key for the persisted preference
pub const STORAGE_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Parse a stored value; anything unrecognised is `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Site-wide fallback used when nothing is stored
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeDefault {
    /// Follow the system color scheme
    #[default]
    System,
    Light,
    Dark,
}

impl ThemeDefault {
    pub fn resolve(self, system_prefers_dark: bool) -> Theme {
        match self {
            ThemeDefault::System if system_prefers_dark => Theme::Dark,
            ThemeDefault::System => Theme::Light,
            ThemeDefault::Light => Theme::Light,
            ThemeDefault::Dark => Theme::Dark,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeDefault::System => "system",
            ThemeDefault::Light => "light",
            ThemeDefault::Dark => "dark",
        }
    }
}

/// Where the preference is persisted between visits
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&mut self, key: &str, value: &str);
}

/// In-memory store, one value per key
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: std::collections::HashMap<String, String>,
}

impl PreferenceStore for MemoryStore {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// The current theme, owned by whoever renders the page
#[derive(Debug)]
pub struct ThemeContext<S: PreferenceStore> {
    theme: Theme,
    store: S,
}

impl<S: PreferenceStore> ThemeContext<S> {
    /// Single initialization read: stored preference, else the fallback
    pub fn initialize(store: S, fallback: ThemeDefault, system_prefers_dark: bool) -> Self {
        let theme = store
            .load(STORAGE_KEY)
            .and_then(|stored| Theme::parse(&stored))
            .unwrap_or_else(|| fallback.resolve(system_prefers_dark));
        Self { theme, store }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Flip the theme and write it through to the store
    pub fn toggle(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.store.save(STORAGE_KEY, self.theme.as_str());
        self.theme
    }

    /// Label for the toggle button
    pub fn toggle_label(&self) -> String {
        format!("Switch to {} mode", self.theme.toggled())
    }

    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Counts reads so the single-read rule can be checked
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        loads: std::cell::Cell<usize>,
        saves: usize,
    }

    impl PreferenceStore for CountingStore {
        fn load(&self, key: &str) -> Option<String> {
            self.loads.set(self.loads.get() + 1);
            self.inner.load(key)
        }

        fn save(&mut self, key: &str, value: &str) {
            self.saves += 1;
            self.inner.save(key, value);
        }
    }

    #[test]
    fn test_stored_preference_wins() {
        let mut store = MemoryStore::default();
        store.save(STORAGE_KEY, "dark");
        let ctx = ThemeContext::initialize(store, ThemeDefault::System, false);
        assert_eq!(ctx.theme(), Theme::Dark);
    }

    #[test]
    fn test_falls_back_to_system() {
        let ctx = ThemeContext::initialize(MemoryStore::default(), ThemeDefault::System, true);
        assert_eq!(ctx.theme(), Theme::Dark);
        let ctx = ThemeContext::initialize(MemoryStore::default(), ThemeDefault::System, false);
        assert_eq!(ctx.theme(), Theme::Light);
    }

    #[test]
    fn test_configured_fallback_ignores_system() {
        let ctx = ThemeContext::initialize(MemoryStore::default(), ThemeDefault::Light, true);
        assert_eq!(ctx.theme(), Theme::Light);
    }

    #[test]
    fn test_garbage_stored_value_falls_back() {
        let mut store = MemoryStore::default();
        store.save(STORAGE_KEY, "sepia");
        let ctx = ThemeContext::initialize(store, ThemeDefault::Dark, false);
        assert_eq!(ctx.theme(), Theme::Dark);
    }

    #[test]
    fn test_toggle_writes_through() {
        let store = CountingStore::default();
        let mut ctx = ThemeContext::initialize(store, ThemeDefault::Light, false);
        assert_eq!(ctx.toggle_label(), "Switch to dark mode");

        assert_eq!(ctx.toggle(), Theme::Dark);
        assert_eq!(ctx.toggle(), Theme::Light);

        let store = ctx.into_store();
        assert_eq!(store.loads.get(), 1);
        assert_eq!(store.saves, 2);
        assert_eq!(store.inner.load(STORAGE_KEY).as_deref(), Some("light"));
    }

    #[test]
    fn test_theme_default_from_yaml() {
        let parsed: ThemeDefault = serde_yaml::from_str("dark").unwrap();
        assert_eq!(parsed, ThemeDefault::Dark);
        assert_eq!(ThemeDefault::System.as_str(), "system");
    }
}
