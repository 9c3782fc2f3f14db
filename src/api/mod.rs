mod client;
mod error;
mod types;

use async_trait::async_trait;

pub use client::{DEFAULT_API_BASE, HnClient};
pub use error::ApiError;
pub use types::{ItemKind, Story, StoryType};

/// Read-only access to the Hacker News item API.
#[async_trait]
pub trait HnApi: Send + Sync {
    /// Ranked story ids for a listing, best rank first.
    async fn list_ids(&self, story_type: StoryType) -> Result<Vec<u64>, ApiError>;

    async fn get_story(&self, id: u64) -> Result<Story, ApiError>;
}
