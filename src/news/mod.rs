//! News desk
//!
//! Fetches RSS headlines from a fixed set of feeds and turns them into
//! spoken lines and an on-screen list.

mod briefing;
mod rss;

pub use briefing::{briefing, render_list};
pub use rss::{FeedItem, parse_items};

use async_trait::async_trait;
use futures::future::join_all;
use serde::Deserialize;
use thiserror::Error;

use crate::{Error, Result};

/// Source key meaning "every configured feed"
pub const ALL_SOURCES: &str = "all";

/// Items taken from each feed when reading all sources
const ITEMS_PER_FEED_ALL: usize = 2;

/// How headlines are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewsMode {
    /// Intro, every headline read out, sign-off
    Headlines,
    /// Headlines shown on screen, one spoken summary line
    Summary,
}

/// Parameters chosen by the router for a news fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsRequest {
    /// Feed key or [`ALL_SOURCES`]
    pub source: String,
    pub limit: usize,
    pub mode: NewsMode,
}

impl NewsRequest {
    /// Whether this request spans every feed
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.source == ALL_SOURCES
    }
}

/// A configured RSS feed
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewsFeed {
    pub key: String,
    pub name: String,
    pub url: String,
}

impl NewsFeed {
    fn new(key: &str, name: &str, url: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

/// Built-in feeds
#[must_use]
pub fn default_feeds() -> Vec<NewsFeed> {
    vec![
        NewsFeed::new("dawn", "Dawn", "https://www.dawn.com/feeds/home"),
        NewsFeed::new("express", "Express Tribune", "https://tribune.com.pk/feeds/home"),
        NewsFeed::new("geo", "Geo News", "https://www.geo.tv/rss/1/1"),
    ]
}

/// One headline ready for presentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub title: String,
    pub source: String,
    pub link: String,
}

/// Why a news request produced nothing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NewsError {
    /// The requested key is not a configured feed
    #[error("unknown news source: {0}")]
    UnknownSource(String),

    /// Every selected feed failed or was empty
    #[error("no headlines available")]
    NoHeadlines,
}

impl NewsError {
    /// Spoken message for this outcome
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::UnknownSource(_) => "Invalid news source",
            Self::NoHeadlines => "Could not fetch news",
        }
    }
}

/// Retrieves raw feed documents
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the feed body
    ///
    /// # Errors
    ///
    /// Returns error if the feed cannot be retrieved
    async fn fetch(&self, feed: &NewsFeed) -> Result<String>;
}

/// Fetches feeds over HTTP
pub struct HttpFeedSource {
    client: reqwest::Client,
}

impl HttpFeedSource {
    /// Create an HTTP feed source
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("jarvis/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, feed: &NewsFeed) -> Result<String> {
        let response = self.client.get(&feed.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::News(format!("{} returned {status}", feed.name)));
        }
        Ok(response.text().await?)
    }
}

/// Selects feeds, fetches them, and trims the result
pub struct NewsDesk {
    feeds: Vec<NewsFeed>,
    source: Box<dyn FeedSource>,
}

impl NewsDesk {
    /// Create a desk over the given feeds
    #[must_use]
    pub fn new(feeds: Vec<NewsFeed>, source: Box<dyn FeedSource>) -> Self {
        Self { feeds, source }
    }

    /// Collect headlines for a request
    ///
    /// Feeds that fail are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`NewsError`] for an unknown source or when nothing was fetched
    pub async fn gather(
        &self,
        request: &NewsRequest,
    ) -> std::result::Result<Vec<Headline>, NewsError> {
        let (selected, per_feed): (Vec<&NewsFeed>, usize) = if request.is_all() {
            (self.feeds.iter().collect(), ITEMS_PER_FEED_ALL)
        } else {
            let feed = self
                .feeds
                .iter()
                .find(|f| f.key == request.source)
                .ok_or_else(|| NewsError::UnknownSource(request.source.clone()))?;
            (vec![feed], request.limit)
        };

        let bodies = join_all(selected.iter().map(|feed| self.source.fetch(feed))).await;

        let mut headlines = Vec::new();
        for (feed, body) in selected.iter().zip(bodies) {
            match body {
                Ok(xml) => headlines.extend(parse_items(&xml).into_iter().take(per_feed).map(
                    |item| Headline {
                        title: item.title,
                        source: feed.name.clone(),
                        link: item.link,
                    },
                )),
                Err(e) => tracing::warn!(feed = %feed.name, error = %e, "failed to fetch feed"),
            }
        }

        if headlines.is_empty() {
            return Err(NewsError::NoHeadlines);
        }

        headlines.truncate(request.limit);
        tracing::debug!(count = headlines.len(), source = %request.source, "headlines gathered");
        Ok(headlines)
    }
}
