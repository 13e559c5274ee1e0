use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kkomantle_engine::embedding::{EmbeddingIndex, Word2VecIndex};
use kkomantle_engine::leaderboard::SqliteLeaderboard;
use kkomantle_engine::limiter::RateLimiter;
use kkomantle_engine::providers::WordPressCms;
use kkomantle_engine::server::{build_router, AppState};
use kkomantle_engine::{Config, GuessEngine};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kkomantle_server=debug,kkomantle_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load();

    tracing::info!("🚀 Starting Kkomantle backend");
    tracing::info!("📦 Database: {}", config.db_path);
    tracing::info!("🧠 Model: {}", config.model_path);
    tracing::info!("🔌 Port: {}", config.port);

    // The embedding space is optional: without it the guess endpoint
    // keeps serving in degraded mode.
    let index: Option<Arc<dyn EmbeddingIndex>> =
        match Word2VecIndex::load(&config.model_path, config.vocab_limit) {
            Ok(index) => {
                tracing::info!("✅ Embedding index loaded ({} words)", index.len());
                Some(Arc::new(index))
            }
            Err(e) => {
                tracing::warn!("⚠️ Embedding index unavailable, running degraded: {}", e);
                None
            }
        };

    let engine = GuessEngine::new(index, &config)?;
    let store = SqliteLeaderboard::new(&config.db_path).await?;
    let cms = WordPressCms::new(&config.wp_base_url)?;

    let state = AppState {
        engine: Arc::new(engine),
        store: Arc::new(store),
        cms: Arc::new(cms),
        limiter: Arc::new(RateLimiter::new()),
        config: Arc::new(config.clone()),
    };

    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("🎮 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
