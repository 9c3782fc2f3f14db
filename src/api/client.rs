use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::HnApi;
use super::error::ApiError;
use super::types::{Story, StoryType};

pub const DEFAULT_API_BASE: &str = "https://hacker-news.firebaseio.com/v0";

/// HTTP client for the Firebase HN API. Holds no cache of its own.
#[derive(Clone)]
pub struct HnClient {
    http: reqwest::Client,
    base_url: String,
}

impl HnClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(%url, "GET");

        let response = self.http.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(path.to_string()));
        }
        let body = response.error_for_status()?.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl HnApi for HnClient {
    async fn list_ids(&self, story_type: StoryType) -> Result<Vec<u64>, ApiError> {
        let ids: Option<Vec<u64>> = self
            .get_json(&format!("{}.json", story_type.endpoint()))
            .await?;
        ids.ok_or_else(|| ApiError::NotFound(format!("{} story list", story_type.label())))
    }

    async fn get_story(&self, id: u64) -> Result<Story, ApiError> {
        let item: Option<Story> = self.get_json(&format!("item/{id}.json")).await?;
        item.ok_or_else(|| ApiError::NotFound(format!("item {id}")))
    }
}
