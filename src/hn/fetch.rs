use super::model::{RawStory, StoryId, User};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_API_BASE: &str = "https://hacker-news.firebaseio.com/v0";

/// Upper bound on a single response body (5 MiB).
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: StatusCode },

    #[error("{url} sent more than {limit} bytes")]
    TooLarge { url: String, limit: usize },

    #[error("failed to decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read access to the ranked story list and individual items.
#[async_trait]
pub trait StorySource: Send + Sync {
    /// Ids of the current top stories, best first.
    async fn fetch_top_ids(&self) -> Result<Vec<StoryId>, FetchError>;

    /// `Ok(None)` when upstream has no record for `id` (deleted or unknown).
    async fn fetch_story(&self, id: StoryId) -> Result<Option<RawStory>, FetchError>;
}

pub struct HnClient {
    client: Client,
    base_url: String,
    max_body_bytes: usize,
}

impl HnClient {
    pub fn new(base_url: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("newsboard/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(20))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_body_bytes: MAX_BODY_BYTES,
        })
    }

    pub fn with_body_limit(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    pub async fn fetch_user(&self, handle: &str) -> Result<Option<User>, FetchError> {
        self.get_json(&format!("user/{handle}.json")).await
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("GET {url}");
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.clone(),
                source,
            })?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status });
        }
        let body = self.read_capped(&url, resp).await?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { url, source })
    }

    /// Buffers the body, giving up once it passes `max_body_bytes`.
    async fn read_capped(&self, url: &str, resp: Response) -> Result<Vec<u8>, FetchError> {
        let limit = self.max_body_bytes;
        let too_large = || {
            warn!("response too large (>{limit} bytes): {url}");
            FetchError::TooLarge {
                url: url.to_string(),
                limit,
            }
        };
        if resp.content_length().is_some_and(|len| len > limit as u64) {
            return Err(too_large());
        }
        let mut stream = resp.bytes_stream();
        let mut buf: Vec<u8> = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;
            if buf.len() + chunk.len() > limit {
                return Err(too_large());
            }
            buf.extend_from_slice(&chunk);
        }
        Ok(buf)
    }
}

#[async_trait]
impl StorySource for HnClient {
    async fn fetch_top_ids(&self) -> Result<Vec<StoryId>, FetchError> {
        self.get_json("topstories.json").await
    }

    async fn fetch_story(&self, id: StoryId) -> Result<Option<RawStory>, FetchError> {
        self.get_json(&format!("item/{id}.json")).await
    }
}
