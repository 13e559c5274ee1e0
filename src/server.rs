use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Local;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::config::Config;
use crate::core::GuessOutcome;
use crate::engine::GuessEngine;
use crate::error::EngineError;
use crate::leaderboard::{normalize_player_name, GameKind, LeaderboardStore};
use crate::limiter::RateLimiter;
use crate::providers::CmsProvider;

/// Shared per-process services, constructed once at startup and handed
/// to every request handler by reference.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<GuessEngine>,
    pub store: Arc<dyn LeaderboardStore>,
    pub cms: Arc<dyn CmsProvider>,
    pub limiter: Arc<RateLimiter>,
    pub config: Arc<Config>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/api/kkomantle/guess",
            post(guess_handler).fallback(method_not_allowed),
        )
        .route("/api/rank/:game", get(rank_get_handler).post(rank_post_handler))
        .route("/api/posts", get(posts_handler))
        .route("/api/posts/:id", get(post_detail_handler))
        .route("/api/categories", get(categories_handler))
        .route("/robots.txt", get(robots_txt))
        .route("/sitemap.xml", get(sitemap_xml))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Resolve the client identity for rate limiting: first entry of the
/// forwarded-for header, else the peer address, else a fixed marker.
pub fn client_identity(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(forwarded) = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
    {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

async fn health_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": crate::VERSION,
        "model_loaded": state.engine.has_index(),
    }))
}

#[derive(Debug, Deserialize)]
struct GuessRequest {
    #[serde(default)]
    word: String,
}

async fn guess_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    body: Result<Json<GuessRequest>, JsonRejection>,
) -> Result<Json<GuessOutcome>, AppError> {
    let identity = client_identity(&headers, peer.map(|p| p.0));
    if state.limiter.is_limited(
        "kkomantle",
        &identity,
        state.config.guess_rate_limit,
        Duration::from_secs(state.config.guess_rate_window),
    ) {
        return Err(AppError(EngineError::RateLimited {
            scope: "kkomantle".to_string(),
        }));
    }

    let Json(request) = body
        .map_err(|_| AppError(EngineError::Validation("잘못된 요청 형식입니다.".to_string())))?;

    let outcome = state.engine.guess_today(&request.word)?;
    Ok(Json(outcome))
}

/// The guess endpoint answers a generic error rather than 405 so the
/// game client's single error path can render it.
async fn method_not_allowed() -> AppError {
    AppError(EngineError::Validation("POST 요청만 지원합니다.".to_string()))
}

#[derive(Debug, Deserialize)]
struct RankSubmission {
    #[serde(default)]
    player_name: String,
    #[serde(default)]
    score: i64,
}

async fn rank_post_handler(
    State(state): State<AppState>,
    Path(game): Path<String>,
    headers: HeaderMap,
    peer: Option<ConnectInfo<SocketAddr>>,
    body: Result<Json<RankSubmission>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let game = GameKind::from_slug(&game)
        .ok_or_else(|| AppError(EngineError::NotFound(format!("unknown game: {game}"))))?;

    let identity = client_identity(&headers, peer.map(|p| p.0));
    let scope = format!("rank:{}", game.slug());
    if state.limiter.is_limited(
        &scope,
        &identity,
        state.config.rank_rate_limit,
        Duration::from_secs(state.config.rank_rate_window),
    ) {
        return Err(AppError(EngineError::RateLimited { scope }));
    }

    let Json(submission) = body
        .map_err(|_| AppError(EngineError::Validation("잘못된 요청 형식입니다.".to_string())))?;

    game.validate_score(submission.score)?;
    let player = normalize_player_name(&submission.player_name);

    state.store.submit(game, &player, submission.score).await?;
    info!(
        "Recorded {} score {} for {}",
        game.slug(),
        submission.score,
        player
    );

    Ok(Json(json!({ "status": "success" })))
}

async fn rank_get_handler(
    State(state): State<AppState>,
    Path(game): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let game = GameKind::from_slug(&game)
        .ok_or_else(|| AppError(EngineError::NotFound(format!("unknown game: {game}"))))?;

    let today = Local::now().date_naive();
    let ranking = state.store.top_today(game, today).await?;

    Ok(Json(json!({ "ranking": ranking })))
}

#[derive(Debug, Deserialize)]
struct PostsParams {
    page: Option<u32>,
    category: Option<u64>,
    search: Option<String>,
}

async fn posts_handler(
    State(state): State<AppState>,
    Query(params): Query<PostsParams>,
) -> Result<Json<serde_json::Value>, AppError> {
    let page = params.page.unwrap_or(1);
    let listing = state
        .cms
        .posts(page, params.category, params.search.as_deref())
        .await?;

    Ok(Json(json!({
        "posts": listing.posts,
        "total_pages": listing.total_pages,
        "current_page": page,
    })))
}

async fn post_detail_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let detail = state.cms.post(id).await?;

    Ok(Json(json!({
        "post": detail.post,
        "category_name": detail.category_name,
        "prev_post": detail.prev_post,
        "next_post": detail.next_post,
    })))
}

async fn categories_handler(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let categories = state.cms.categories().await?;
    Ok(Json(categories))
}

async fn robots_txt(State(state): State<AppState>) -> impl IntoResponse {
    let body = format!(
        "User-agent: *\nAllow: /\nSitemap: {}/sitemap.xml\n",
        state.config.base_url
    );
    ([(header::CONTENT_TYPE, "text/plain")], body)
}

/// Pages exposed to search engines; API routes are deliberately absent.
const SITEMAP_PAGES: [&str; 8] = [
    "/",
    "/blog/",
    "/games/",
    "/games/2048/",
    "/games/reaction/",
    "/games/wordle/",
    "/ladder/",
    "/roulette/",
];

async fn sitemap_xml(State(state): State<AppState>) -> impl IntoResponse {
    let mut body = String::with_capacity(1024);
    body.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    body.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    for page in SITEMAP_PAGES {
        body.push_str("<url><loc>");
        body.push_str(&xml_escape(&format!("{}{}", state.config.base_url, page)));
        body.push_str("</loc><changefreq>daily</changefreq><priority>0.8</priority></url>");
    }
    body.push_str("</urlset>");

    ([(header::CONTENT_TYPE, "application/xml")], body)
}

fn xml_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Maps engine errors onto HTTP statuses; the status reflects request
/// validity, not guess correctness.
pub struct AppError(pub EngineError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            EngineError::Validation(message) => (StatusCode::BAD_REQUEST, message.clone()),
            EngineError::RateLimited { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                "요청이 너무 많습니다. 잠시 후 다시 시도해주세요.".to_string(),
            ),
            EngineError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
            EngineError::Upstream { .. } => (
                StatusCode::BAD_GATEWAY,
                "업스트림 서비스에 연결할 수 없습니다.".to_string(),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "서버 내부 오류가 발생했습니다.".to_string(),
            ),
        };

        if status.is_server_error() {
            error!("Request failed: {}", self.0);
        }

        (status, Json(json!({ "result": "error", "message": message }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<EngineError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
