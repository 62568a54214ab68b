//! Fetch orchestration for the dashboard view.
//!
//! Every user action (city search, geolocation, map click) issues one
//! weather + forecast pair. Pairs are numbered as they start; a pair that
//! finishes after a newer one was issued is dropped, so a slow response
//! can never overwrite fresher data.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tokio::sync::Mutex;

use nimbus_core::domain::{AlertList, Location, NewsFeed, SearchHistory};
use nimbus_core::ports::{NewsError, NewsSource, StoreError};

use crate::gateway::WeatherFeed;
use crate::preferences::Preferences;

/// Everything rendered for one location.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditions {
    pub location: Location,
    pub weather: Value,
    pub forecast: Value,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewState {
    Idle,
    Loading { request_id: u64 },
    Loaded(Conditions),
    Failed(String),
}

impl ViewState {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading { .. })
    }
}

/// What happened to a fetch pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The result (success or error) is now on screen.
    Applied,
    /// A newer pair was issued first; the result was discarded.
    Stale,
    /// Nothing to search for.
    Ignored,
}

pub struct Dashboard {
    feed: Arc<dyn WeatherFeed>,
    news: Arc<dyn NewsSource>,
    preferences: Preferences,
    latest: AtomicU64,
    view: Mutex<ViewState>,
    history: Mutex<SearchHistory>,
}

impl Dashboard {
    /// Restore saved history and start idle.
    pub async fn load(
        feed: Arc<dyn WeatherFeed>,
        news: Arc<dyn NewsSource>,
        preferences: Preferences,
    ) -> Result<Self, StoreError> {
        let history = preferences.load_history().await?;

        Ok(Self {
            feed,
            news,
            preferences,
            latest: AtomicU64::new(0),
            view: Mutex::new(ViewState::Idle),
            history: Mutex::new(history),
        })
    }

    pub async fn view(&self) -> ViewState {
        self.view.lock().await.clone()
    }

    pub async fn history(&self) -> Vec<String> {
        self.history.lock().await.entries().to_vec()
    }

    /// Search by city name, remembering the search.
    pub async fn search_city(&self, city: &str) -> Result<Outcome, StoreError> {
        let city = city.trim();
        if city.is_empty() {
            return Ok(Outcome::Ignored);
        }

        {
            let mut history = self.history.lock().await;
            history.record(city);
            self.preferences.save_history(&history).await?;
        }

        Ok(self.fetch_pair(Location::city(city)).await)
    }

    /// Search by position (device location or a map click).
    pub async fn search_coords(&self, lat: f64, lon: f64) -> Outcome {
        self.fetch_pair(Location::Coords {
            lat: lat.to_string(),
            lon: lon.to_string(),
        })
        .await
    }

    async fn fetch_pair(&self, location: Location) -> Outcome {
        let request_id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        *self.view.lock().await = ViewState::Loading { request_id };

        let result = tokio::try_join!(
            self.feed.weather(&location),
            self.feed.forecast(&location)
        );

        let mut view = self.view.lock().await;
        if self.latest.load(Ordering::SeqCst) != request_id {
            tracing::debug!(request_id, %location, "Discarding stale weather result");
            return Outcome::Stale;
        }

        *view = match result {
            Ok((weather, forecast)) => ViewState::Loaded(Conditions {
                location,
                weather,
                forecast,
            }),
            Err(e) => {
                tracing::warn!(request_id, %location, error = %e, "Weather fetch failed");
                ViewState::Failed(e.user_message().to_string())
            }
        };

        Outcome::Applied
    }

    /// Headlines and alerts, fetched together.
    pub async fn bulletin(&self) -> Result<(NewsFeed, AlertList), NewsError> {
        tokio::try_join!(self.news.fetch_news(), self.news.fetch_alerts())
    }
}
