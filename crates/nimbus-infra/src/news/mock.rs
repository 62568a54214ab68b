//! Fixture-backed news source.
//!
//! Serves a fixed set of headlines and alerts after a simulated network
//! delay, standing in until a real provider is wired up.

use std::time::Duration;

use async_trait::async_trait;

use nimbus_core::domain::{AlertList, NewsArticle, NewsFeed, Severity, WeatherAlert};
use nimbus_core::ports::{NewsError, NewsSource};

pub struct MockNewsSource {
    delay: Duration,
}

impl MockNewsSource {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for MockNewsSource {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[async_trait]
impl NewsSource for MockNewsSource {
    async fn fetch_news(&self) -> Result<NewsFeed, NewsError> {
        tokio::time::sleep(self.delay).await;
        Ok(fixture_news())
    }

    async fn fetch_alerts(&self) -> Result<AlertList, NewsError> {
        tokio::time::sleep(self.delay).await;
        Ok(fixture_alerts())
    }
}

fn article(
    id: u32,
    title: &str,
    description: &str,
    image: &str,
    source: &str,
    date: &str,
) -> NewsArticle {
    NewsArticle {
        id,
        title: title.to_string(),
        description: description.to_string(),
        image_url: format!(
            "https://images.unsplash.com/{}?ixlib=rb-1.2.1&auto=format&fit=crop&w=1350&q=80",
            image
        ),
        source: source.to_string(),
        date: date.to_string(),
    }
}

fn alert(
    id: u32,
    title: &str,
    description: &str,
    area: &str,
    severity: Severity,
    time: &str,
) -> WeatherAlert {
    WeatherAlert {
        id,
        title: title.to_string(),
        description: description.to_string(),
        area: area.to_string(),
        severity,
        time: time.to_string(),
        date: "Today".to_string(),
    }
}

fn fixture_news() -> NewsFeed {
    vec![
        article(
            1,
            "Hurricane Season Expected to be More Active Than Normal",
            "Meteorologists predict an above-average hurricane season this year, with warmer ocean temperatures contributing to more frequent and intense storms.",
            "photo-1527482797697-8795b05a13fe",
            "Weather Channel",
            "August 5, 2025",
        ),
        article(
            2,
            "Record-Breaking Heat Wave Sweeps Across Europe",
            "Several European countries are experiencing unprecedented high temperatures, with health officials issuing warnings about heat-related illnesses.",
            "photo-1561647784-2f9c43b07a0b",
            "Climate News",
            "August 7, 2025",
        ),
        article(
            3,
            "New Climate Study Shows Accelerating Global Warming Trends",
            "Recent research indicates that global temperatures are rising faster than previously predicted, highlighting the urgent need for climate action.",
            "photo-1544069549-2f4cbf3bc362",
            "Science Daily",
            "July 28, 2025",
        ),
        article(
            4,
            "Innovative Weather Prediction Technology Unveiled",
            "A new AI-powered system promises to improve weather forecasting accuracy by up to 30%, potentially saving lives during extreme weather events.",
            "photo-1590055531615-690f6a2ee052",
            "Tech Innovations",
            "August 10, 2025",
        ),
    ]
}

fn fixture_alerts() -> AlertList {
    vec![
        alert(
            1,
            "Severe Thunderstorm Warning",
            "Thunderstorms capable of producing damaging winds and large hail expected in the area. Seek shelter immediately if outdoors.",
            "Central District",
            Severity::High,
            "Valid until 8:00 PM",
        ),
        alert(
            2,
            "Flash Flood Watch",
            "Heavy rainfall may lead to flash flooding in low-lying areas. Avoid driving through flooded roadways.",
            "Eastern Region",
            Severity::Medium,
            "Valid for next 12 hours",
        ),
        alert(
            3,
            "Air Quality Advisory",
            "Elevated levels of air pollution expected. Sensitive groups should limit outdoor activities.",
            "Metropolitan Area",
            Severity::Low,
            "Valid until tomorrow morning",
        ),
    ]
}
