pub mod wordpress;

pub use wordpress::WordPressCms;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// One page of a post listing, passed through from the CMS untouched
#[derive(Debug, Clone)]
pub struct PostsPage {
    pub posts: Value,
    pub total_pages: u32,
}

/// A single post with navigation context resolved
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Value,
    pub category_name: String,
    pub prev_post: Option<Value>,
    pub next_post: Option<Value>,
}

/// Trait for headless CMS backends (WordPress, etc.)
#[async_trait]
pub trait CmsProvider: Send + Sync {
    /// List posts with optional category filter and search query
    async fn posts(
        &self,
        page: u32,
        category: Option<u64>,
        search: Option<&str>,
    ) -> Result<PostsPage>;

    /// Fetch one post plus its previous/next siblings in the same category
    async fn post(&self, id: u64) -> Result<PostDetail>;

    /// List all categories
    async fn categories(&self) -> Result<Value>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
