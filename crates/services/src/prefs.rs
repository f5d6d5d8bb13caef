//! Injected user-preference collaborator.
//!
//! The practice core never reads ambient state; consumers hand it a store
//! and decide themselves how (or whether) to persist the choice.

use std::sync::{Arc, Mutex, PoisonError};

/// Visual theme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// The opposite theme, for toggle controls.
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

/// Store contract for the theme preference.
pub trait ThemeStore: Send + Sync {
    fn theme(&self) -> Theme;
    fn set_theme(&self, theme: Theme);
}

/// In-memory store; the preference lasts for the process lifetime.
#[derive(Clone, Default)]
pub struct InMemoryThemeStore {
    theme: Arc<Mutex<Theme>>,
}

impl InMemoryThemeStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ThemeStore for InMemoryThemeStore {
    fn theme(&self) -> Theme {
        *self.theme.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_theme(&self, theme: Theme) {
        *self.theme.lock().unwrap_or_else(PoisonError::into_inner) = theme;
    }
}
