pub mod sqlite;

pub use sqlite::SqliteLeaderboard;

use std::ops::RangeInclusive;

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Name stored when a player submits a blank name
pub const ANONYMOUS: &str = "Anonymous";

/// Maximum stored player-name length in characters
pub const MAX_NAME_LEN: usize = 10;

/// Casual games with a daily leaderboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    /// 2048: higher score wins
    G2048,
    /// Reaction speed in milliseconds: lower wins
    Reaction,
    /// Wordle attempt count (1-6): lower wins
    Wordle,
}

/// Whether lower or higher scores rank first for a game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreOrder {
    Ascending,
    Descending,
}

impl GameKind {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "2048" => Some(Self::G2048),
            "reaction" => Some(Self::Reaction),
            "wordle" => Some(Self::Wordle),
            _ => None,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Self::G2048 => "2048",
            Self::Reaction => "reaction",
            Self::Wordle => "wordle",
        }
    }

    /// Accepted score range; anything outside is abuse or a bug.
    /// Reaction times at or under 50ms are beyond human limits.
    pub fn score_bounds(&self) -> RangeInclusive<i64> {
        match self {
            Self::G2048 => 1..=99_999_999,
            Self::Reaction => 51..=60_000,
            Self::Wordle => 1..=6,
        }
    }

    pub fn order(&self) -> ScoreOrder {
        match self {
            Self::G2048 => ScoreOrder::Descending,
            Self::Reaction | Self::Wordle => ScoreOrder::Ascending,
        }
    }

    pub fn validate_score(&self, score: i64) -> Result<()> {
        if self.score_bounds().contains(&score) {
            Ok(())
        } else {
            Err(EngineError::Validation(format!(
                "유효하지 않은 점수입니다: {score}"
            )))
        }
    }
}

/// One leaderboard row as served to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankEntry {
    pub name: String,
    pub score: i64,
}

/// Trim and cap a submitted player name; blank becomes [`ANONYMOUS`].
pub fn normalize_player_name(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        ANONYMOUS.to_string()
    } else {
        trimmed.chars().take(MAX_NAME_LEN).collect()
    }
}

/// Trait for leaderboard persistence implementations
#[async_trait]
pub trait LeaderboardStore: Send + Sync {
    /// Persist a validated record
    async fn submit(&self, game: GameKind, player: &str, score: i64) -> Result<()>;

    /// Top 10 records of the given calendar day, in the game's order
    async fn top_today(&self, game: GameKind, today: NaiveDate) -> Result<Vec<RankEntry>>;
}
