//! Display preferences kept in the local store.
//!
//! The theme is stored as the bare string `dark` or `light`, not JSON.

use std::fmt;

use tracing::{debug, warn};

use crate::storage::{SharedStore, StorageError, keys};

/// Color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// The other theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Read a stored value. Anything other than `dark` is light.
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        if value == Some("dark") {
            Self::Dark
        } else {
            Self::Light
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Theme preference bound to the `theme` key.
#[derive(Clone)]
pub struct ThemePreference {
    store: SharedStore,
    theme: Theme,
}

impl ThemePreference {
    /// Read the stored theme. Missing or unreadable values mean light.
    #[must_use]
    pub fn load(store: SharedStore) -> Self {
        let stored = store.get_item(keys::THEME).unwrap_or_else(|e| {
            warn!(error = %e, "Failed to read theme preference");
            None
        });
        let theme = Theme::from_stored(stored.as_deref());
        debug!(%theme, "Loaded theme preference");
        Self { store, theme }
    }

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.theme == Theme::Dark
    }

    /// Switch to the other theme and return it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write fails; the theme is switched in
    /// memory either way.
    pub fn toggle(&mut self) -> Result<Theme, StorageError> {
        let next = self.theme.toggled();
        self.set(next)?;
        Ok(next)
    }

    /// Set and store the theme.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the write fails; the theme is changed in
    /// memory either way.
    pub fn set(&mut self, theme: Theme) -> Result<(), StorageError> {
        self.theme = theme;
        self.store.set_item(keys::THEME, theme.as_str())
    }
}

impl fmt::Debug for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThemePreference")
            .field("theme", &self.theme)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};

    #[test]
    fn test_defaults_to_light() {
        let pref = ThemePreference::load(Arc::new(MemoryStore::new()));
        assert_eq!(pref.theme(), Theme::Light);
        assert!(!pref.is_dark());
    }

    #[test]
    fn test_unknown_value_reads_as_light() {
        let store = Arc::new(MemoryStore::with_items([(keys::THEME, "\"dark\"")]));
        assert_eq!(ThemePreference::load(store).theme(), Theme::Light);
    }

    #[test]
    fn test_toggle_stores_raw_string() {
        let store = Arc::new(MemoryStore::new());
        let mut pref = ThemePreference::load(store.clone());

        assert_eq!(pref.toggle().unwrap(), Theme::Dark);
        assert_eq!(store.get_item(keys::THEME).unwrap().as_deref(), Some("dark"));

        assert_eq!(pref.toggle().unwrap(), Theme::Light);
        assert_eq!(store.get_item(keys::THEME).unwrap().as_deref(), Some("light"));
    }

    #[test]
    fn test_reload_keeps_dark() {
        let store = Arc::new(MemoryStore::new());
        ThemePreference::load(store.clone()).set(Theme::Dark).unwrap();
        assert!(ThemePreference::load(store).is_dark());
    }
}
