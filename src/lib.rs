//! # Kkomantle Game Backend
//!
//! Web backend for a daily semantic word-guessing game ("Kkomantle"),
//! with:
//! - Deterministic daily secret-word selection
//! - Similarity scoring against a static word-embedding space
//! - Per-day cached nearest-neighbor ranking
//! - Fixed-window rate limiting on write endpoints
//! - Daily leaderboards for the other casual games (2048, reaction, Wordle)
//! - Headless CMS (WordPress REST) proxy for the blog
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use kkomantle_engine::embedding::{EmbeddingIndex, Word2VecIndex};
//! use kkomantle_engine::{Config, GuessEngine};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::load();
//!     let index: Arc<dyn EmbeddingIndex> =
//!         Arc::new(Word2VecIndex::load(&config.model_path, config.vocab_limit)?);
//!     let engine = GuessEngine::new(Some(index), &config)?;
//!
//!     let outcome = engine.guess_today("세포")?;
//!     println!("{:?} (score: {:?})", outcome.result, outcome.score);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod daily;
pub mod embedding;
pub mod engine;
pub mod error;
pub mod leaderboard;
pub mod limiter;
pub mod providers;
pub mod rank_cache;

#[cfg(feature = "server")]
pub mod server;

// Re-export primary types
pub use config::Config;
pub use core::{CandidateSet, Classification, GuessOutcome, Rank};
pub use engine::{GuessEngine, REVEAL_TOKEN};
pub use error::{EngineError, Result};
pub use limiter::RateLimiter;
pub use rank_cache::DailyRankCache;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
