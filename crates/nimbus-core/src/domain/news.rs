use serde::{Deserialize, Serialize};

/// A weather news headline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub source: String,
    pub date: String,
}

/// How urgent an alert is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// An active weather alert for an area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherAlert {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub area: String,
    pub severity: Severity,
    pub time: String,
    pub date: String,
}

pub type NewsFeed = Vec<NewsArticle>;
pub type AlertList = Vec<WeatherAlert>;
