use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;

use crate::models::{MediaItem, MediaKind};

pub const TMDB_BASE: &str = "https://api.themoviedb.org/3";

/// A paginated upstream listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// `/trending/{segment}/week`; the segment is whatever the caller asked
    /// for (`movie`, `tv`, `all`, `person`, ...).
    Trending(String),
    Popular(MediaKind),
    TopRated(MediaKind),
    NowPlaying,
    Upcoming,
    AiringToday,
    Discover { kind: MediaKind, genre_id: i64 },
    Search { kind: MediaKind, query: String },
}

impl Source {
    pub fn trending(segment: impl Into<String>) -> Self {
        Source::Trending(segment.into())
    }

    /// Kind every item from this source gets tagged with. Trending lists of
    /// other types are left untagged.
    pub fn kind(&self) -> Option<MediaKind> {
        match self {
            Source::Trending(segment) => segment.parse().ok(),
            Source::Popular(kind)
            | Source::TopRated(kind)
            | Source::Discover { kind, .. }
            | Source::Search { kind, .. } => Some(*kind),
            Source::NowPlaying | Source::Upcoming => Some(MediaKind::Movie),
            Source::AiringToday => Some(MediaKind::Tv),
        }
    }

    /// Path below the API base plus any endpoint specific query parameters
    /// (already encoded, each starting with `&`).
    fn endpoint(&self) -> (String, String) {
        match self {
            Source::Trending(segment) => (
                format!("/trending/{}/week", urlencoding::encode(segment)),
                String::new(),
            ),
            Source::Popular(kind) => (format!("/{kind}/popular"), String::new()),
            Source::TopRated(kind) => (format!("/{kind}/top_rated"), String::new()),
            Source::NowPlaying => ("/movie/now_playing".to_string(), String::new()),
            Source::Upcoming => ("/movie/upcoming".to_string(), String::new()),
            Source::AiringToday => ("/tv/airing_today".to_string(), String::new()),
            Source::Discover { kind, genre_id } => (
                format!("/discover/{kind}"),
                format!("&with_genres={genre_id}&sort_by=popularity.desc"),
            ),
            Source::Search { kind, query } => (
                format!("/search/{kind}"),
                format!("&query={}", urlencoding::encode(query)),
            ),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (path, _) = self.endpoint();
        match self {
            Source::Discover { genre_id, .. } => write!(f, "{path} (genre {genre_id})"),
            Source::Search { query, .. } => write!(f, "{path} ('{query}')"),
            _ => f.write_str(&path),
        }
    }
}

#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn fetch_page(&self, source: &Source, page: u32) -> Result<Vec<MediaItem>>;
    async fn fetch_genres(&self) -> Result<Value>;
}

#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl TmdbClient {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let user_agent = format!("cinestream/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(20))
            .user_agent(user_agent)
            .build()
            .context("Failed to build TMDB HTTP client")?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    // Errors mention the path only, the query string carries the API key.
    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str, params: &str) -> Result<T> {
        let url = format!(
            "{}{path}?api_key={}{params}",
            self.base_url, self.api_key
        );
        let res = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("request to {} failed: {}", path, e.without_url()))?;
        let status = res.status();
        let text = res.text().await.context("reading body failed")?;
        if !status.is_success() {
            return Err(anyhow!("{} -> {}: {}", path, status, text));
        }
        let parsed: T = serde_json::from_str(&text)
            .with_context(|| format!("JSON parse failed for {}", path))?;
        Ok(parsed)
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn fetch_page(&self, source: &Source, page: u32) -> Result<Vec<MediaItem>> {
        #[derive(Deserialize)]
        struct PageResponse {
            #[serde(default)]
            results: Vec<Value>,
        }

        let (path, params) = source.endpoint();
        let params = format!("&page={page}{params}");
        let data: PageResponse = self.get_json(&path, &params).await?;
        Ok(read_items(data.results, source))
    }

    async fn fetch_genres(&self) -> Result<Value> {
        self.get_json("/genre/movie/list", "").await
    }
}

fn read_items(raw: Vec<Value>, source: &Source) -> Vec<MediaItem> {
    raw.into_iter()
        .filter_map(|v| match serde_json::from_value::<MediaItem>(v) {
            Ok(item) => Some(item),
            Err(e) => {
                debug!("Skipping unreadable item from {}: {}", source, e);
                None
            }
        })
        .collect()
}
