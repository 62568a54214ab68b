//! News and alerts port.

use async_trait::async_trait;

use crate::domain::{AlertList, NewsFeed};

/// Where the dashboard's headlines and alerts come from.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_news(&self) -> Result<NewsFeed, NewsError>;

    async fn fetch_alerts(&self) -> Result<AlertList, NewsError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("News source unavailable: {0}")]
    Unavailable(String),
}
