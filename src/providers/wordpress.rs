use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde_json::Value;
use tracing::warn;

use crate::error::{EngineError, Result};
use crate::providers::{CmsProvider, PostDetail, PostsPage};

/// Posts shown per listing page
const PER_PAGE: u32 = 8;

/// WordPress REST v2 passthrough
pub struct WordPressCms {
    client: Client,
    base_url: String,
}

impl WordPressCms {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(EngineError::HttpRequest)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Response> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| EngineError::Upstream {
                service: "wordpress".to_string(),
                message: format!("request to {path} failed: {e}"),
            })?;
        Ok(response)
    }

    async fn json_body(response: Response, path: &str) -> Result<Value> {
        if !response.status().is_success() {
            return Err(EngineError::Upstream {
                service: "wordpress".to_string(),
                message: format!("{path} returned HTTP {}", response.status()),
            });
        }
        response.json().await.map_err(|e| EngineError::Upstream {
            service: "wordpress".to_string(),
            message: format!("{path} returned invalid JSON: {e}"),
        })
    }

    /// One adjacent post in the same category, or `None` when there is
    /// none (or the lookup fails; navigation is best-effort).
    async fn adjacent_post(
        &self,
        category: u64,
        pivot_date: &str,
        direction: Direction,
    ) -> Option<Value> {
        let (boundary, order) = match direction {
            Direction::Before => ("before", "desc"),
            Direction::After => ("after", "asc"),
        };
        let query = [
            ("categories", category.to_string()),
            (boundary, pivot_date.to_string()),
            ("per_page", "1".to_string()),
            ("orderby", "date".to_string()),
            ("order", order.to_string()),
        ];

        let response = self.get("/posts", &query).await.ok()?;
        let body: Value = Self::json_body(response, "/posts").await.ok()?;
        body.as_array()?.first().cloned()
    }
}

enum Direction {
    Before,
    After,
}

#[async_trait]
impl CmsProvider for WordPressCms {
    async fn posts(
        &self,
        page: u32,
        category: Option<u64>,
        search: Option<&str>,
    ) -> Result<PostsPage> {
        let mut query = vec![
            ("page", page.max(1).to_string()),
            ("per_page", PER_PAGE.to_string()),
            ("_embed", "true".to_string()),
        ];
        if let Some(category) = category {
            query.push(("categories", category.to_string()));
        }
        if let Some(search) = search.filter(|s| !s.trim().is_empty()) {
            query.push(("search", search.to_string()));
        }

        let response = self.get("/posts", &query).await?;
        let total_pages = response
            .headers()
            .get("X-WP-TotalPages")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);
        let posts = Self::json_body(response, "/posts").await?;

        Ok(PostsPage { posts, total_pages })
    }

    async fn post(&self, id: u64) -> Result<PostDetail> {
        let path = format!("/posts/{id}");
        let query = [("_embed", "true".to_string())];
        let response = self.get(&path, &query).await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(EngineError::NotFound(format!("post {id} not found")));
        }
        let post = Self::json_body(response, &path).await?;

        // first embedded term is the primary category
        let category_name = post
            .pointer("/_embedded/wp:term/0/0/name")
            .and_then(Value::as_str)
            .unwrap_or("General")
            .to_string();

        let category = post
            .pointer("/categories/0")
            .and_then(Value::as_u64);
        let pivot_date = post.pointer("/date").and_then(Value::as_str);

        let (prev_post, next_post) = match (category, pivot_date) {
            (Some(category), Some(date)) => (
                self.adjacent_post(category, date, Direction::Before).await,
                self.adjacent_post(category, date, Direction::After).await,
            ),
            _ => {
                warn!("Post {id} has no category or date, skipping navigation");
                (None, None)
            }
        };

        Ok(PostDetail {
            post,
            category_name,
            prev_post,
            next_post,
        })
    }

    async fn categories(&self) -> Result<Value> {
        let response = self.get("/categories", &[]).await?;
        Self::json_body(response, "/categories").await
    }

    fn name(&self) -> &str {
        "wordpress"
    }
}
