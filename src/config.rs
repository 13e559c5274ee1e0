use std::env;
use std::fmt::Display;
use std::str::FromStr;

use tracing::{info, warn};

/// Runtime configuration, resolved once at startup.
///
/// Every tunable has a default and can be overridden through the
/// environment variable named in [`Config::load`].
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP listen port
    pub port: u16,
    /// SQLite database path for game records
    pub db_path: String,
    /// Path to the word2vec text-format embedding file
    pub model_path: String,
    /// Number of top-frequency vocabulary entries to load
    pub vocab_limit: usize,
    /// Number of top-frequency entries eligible as a daily secret
    pub candidate_pool: usize,
    /// Size of the per-day nearest-neighbor table
    pub neighbor_horizon: usize,
    /// Maximum accepted guess length in characters
    pub max_guess_len: usize,
    /// Character-set pattern a guess must match
    pub guess_pattern: String,
    /// Guess endpoint: accepted requests per window (0 disables)
    pub guess_rate_limit: u32,
    /// Guess endpoint: window length in seconds
    pub guess_rate_window: u64,
    /// Leaderboard POST: accepted requests per window (0 disables)
    pub rank_rate_limit: u32,
    /// Leaderboard POST: window length in seconds
    pub rank_rate_window: u64,
    /// Whether the developer reveal token discloses the secret
    pub reveal_enabled: bool,
    /// Headless CMS (WordPress REST v2) base URL
    pub wp_base_url: String,
    /// Public base URL, used by robots.txt and sitemap.xml
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8090,
            db_path: "kkomantle.db".to_string(),
            model_path: "models/cc.ko.300.vec".to_string(),
            vocab_limit: 300_000,
            candidate_pool: 3_000,
            neighbor_horizon: 3_000,
            max_guess_len: 30,
            guess_pattern: "^[가-힣A-Za-z0-9_]+$".to_string(),
            guess_rate_limit: 45,
            guess_rate_window: 60,
            rank_rate_limit: 10,
            rank_rate_window: 60,
            reveal_enabled: true,
            wp_base_url: "http://localhost:4080/wp-json/wp/v2".to_string(),
            base_url: "https://monosaccharide180.com".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from the environment, falling back to defaults.
    pub fn load() -> Self {
        let defaults = Self::default();
        Self {
            port: parse_var("PORT", defaults.port),
            db_path: string_var("DB_PATH", defaults.db_path),
            model_path: string_var("MODEL_PATH", defaults.model_path),
            vocab_limit: parse_var("VOCAB_LIMIT", defaults.vocab_limit),
            candidate_pool: parse_var("CANDIDATE_POOL", defaults.candidate_pool),
            neighbor_horizon: parse_var("NEIGHBOR_HORIZON", defaults.neighbor_horizon),
            max_guess_len: parse_var("MAX_GUESS_LEN", defaults.max_guess_len),
            guess_pattern: string_var("GUESS_PATTERN", defaults.guess_pattern),
            guess_rate_limit: parse_var("GUESS_RATE_LIMIT", defaults.guess_rate_limit),
            guess_rate_window: parse_var("GUESS_RATE_WINDOW", defaults.guess_rate_window),
            rank_rate_limit: parse_var("RANK_RATE_LIMIT", defaults.rank_rate_limit),
            rank_rate_window: parse_var("RANK_RATE_WINDOW", defaults.rank_rate_window),
            reveal_enabled: parse_var("REVEAL_ENABLED", defaults.reveal_enabled),
            wp_base_url: string_var("WP_BASE_URL", defaults.wp_base_url),
            base_url: string_var("BASE_URL", defaults.base_url),
        }
    }
}

fn string_var(key: &str, default: String) -> String {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => {
            info!("{key} not set, using default: {default}");
            default
        }
    }
}

fn parse_var<T>(key: &str, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(value) => value,
            Err(e) => {
                warn!("Invalid {key} value '{raw}': {e}, using default {default}");
                default
            }
        },
        Err(_) => default,
    }
}
