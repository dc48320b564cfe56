//! Remote song search (iTunes Search API shaped).

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::models::Song;

/// What a settled query box actually asks the provider for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EffectiveQuery {
    /// Empty input: the default "popular tracks" listing.
    Popular,
    Text(String),
}

impl EffectiveQuery {
    pub fn resolve(raw: &str) -> Self {
        let term = raw.trim();
        if term.is_empty() {
            Self::Popular
        } else {
            Self::Text(term.to_string())
        }
    }

    /// The `term` parameter sent for this query.
    pub fn term<'a>(&'a self, default_term: &'a str) -> &'a str {
        match self {
            Self::Popular => default_term,
            Self::Text(t) => t,
        }
    }
}

/// Anything that can turn an effective query into songs.
#[async_trait]
pub trait SongSource: Send + Sync {
    async fn search(&self, query: &EffectiveQuery) -> Result<Vec<Song>, SearchError>;
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

/// Decode a provider response body. A missing `results` field means zero
/// results; entries that are not songs (no `trackId`) are skipped.
pub fn parse_results(body: &str) -> Result<Vec<Song>, SearchError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    let total = response.results.len();
    let songs: Vec<Song> = response
        .results
        .into_iter()
        .filter_map(|v| serde_json::from_value::<Song>(v).ok())
        .collect();
    if songs.len() < total {
        debug!("[search] skipped {} non-song results", total - songs.len());
    }
    Ok(songs)
}

pub struct ItunesClient {
    client: reqwest::Client,
    endpoint: String,
    default_term: String,
    media: String,
    entity: String,
    limit: u32,
}

impl ItunesClient {
    pub fn new(config: &SearchConfig) -> Result<Self, SearchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("moodify/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(config.timeout().min(Duration::from_secs(3)))
            .timeout(config.timeout())
            .build()?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: reqwest::Client, config: &SearchConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            default_term: config.default_term.clone(),
            media: config.media.clone(),
            entity: config.entity.clone(),
            limit: config.limit,
        }
    }
}

#[async_trait]
impl SongSource for ItunesClient {
    async fn search(&self, query: &EffectiveQuery) -> Result<Vec<Song>, SearchError> {
        let term = query.term(&self.default_term);
        let limit = self.limit.to_string();
        info!("[search] GET {} term={:?}", self.endpoint, term);

        let response = self
            .client
            .get(&self.endpoint)
            .header("Accept", "application/json")
            .query(&[
                ("term", term),
                ("media", self.media.as_str()),
                ("entity", self.entity.as_str()),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SearchError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        parse_results(&body)
    }
}
