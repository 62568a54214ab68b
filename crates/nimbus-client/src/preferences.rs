//! Search history and theme persisted in the client-local store.

use std::sync::Arc;

use nimbus_core::domain::{SearchHistory, Theme};
use nimbus_core::ports::{KeyValueStore, StoreError};

/// Store key holding the JSON array of recent searches.
pub const HISTORY_KEY: &str = "recentWeatherSearches";
/// Store key holding `"dark"` or `"light"`.
pub const THEME_KEY: &str = "weatherAppTheme";

#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn load_history(&self) -> Result<SearchHistory, StoreError> {
        match self.store.get(HISTORY_KEY).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(SearchHistory::new()),
        }
    }

    pub async fn save_history(&self, history: &SearchHistory) -> Result<(), StoreError> {
        let raw = serde_json::to_string(history)?;
        self.store.set(HISTORY_KEY, &raw).await
    }

    /// The saved theme, or the system preference when none was saved.
    pub async fn load_theme(&self, system_prefers_dark: bool) -> Result<Theme, StoreError> {
        Ok(match self.store.get(THEME_KEY).await? {
            Some(raw) => raw.parse().unwrap_or_default(),
            None if system_prefers_dark => Theme::Dark,
            None => Theme::Light,
        })
    }

    /// Flip `current`, persist and return the new theme.
    pub async fn toggle_theme(&self, current: Theme) -> Result<Theme, StoreError> {
        let next = current.toggled();
        self.store.set(THEME_KEY, next.as_str()).await?;
        Ok(next)
    }
}
