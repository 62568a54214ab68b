//! Domain entities - the values that flow between client, gateway and upstream.

mod history;
mod location;
mod news;
mod theme;

pub use history::{MAX_HISTORY, SearchHistory};
pub use location::{COORDS_REQUIRED, Location};
pub use news::{AlertList, NewsArticle, NewsFeed, Severity, WeatherAlert};
pub use theme::Theme;
