use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use rusqlite::{params, Connection};

use crate::error::Result;
use crate::leaderboard::{GameKind, LeaderboardStore, RankEntry, ScoreOrder};

/// SQLite-backed leaderboard store
///
/// ```sql
/// CREATE TABLE game_records (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     game_type TEXT NOT NULL,
///     player_name TEXT NOT NULL,
///     score INTEGER NOT NULL,
///     created_at TEXT NOT NULL
/// );
/// ```
pub struct SqliteLeaderboard {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteLeaderboard {
    /// Open (and initialize if needed) the records database
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS game_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                game_type TEXT NOT NULL,
                player_name TEXT NOT NULL,
                score INTEGER NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_game_day ON game_records(game_type, created_at)",
            [],
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

#[async_trait]
impl LeaderboardStore for SqliteLeaderboard {
    async fn submit(&self, game: GameKind, player: &str, score: i64) -> Result<()> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO game_records (game_type, player_name, score, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![game.slug(), player, score, Local::now().to_rfc3339()],
        )?;

        Ok(())
    }

    async fn top_today(&self, game: GameKind, today: NaiveDate) -> Result<Vec<RankEntry>> {
        let conn = self.conn.lock().unwrap();

        // created_at is RFC 3339, so the calendar day is a prefix match
        let day_prefix = format!("{}%", today.format("%Y-%m-%d"));
        let order = match game.order() {
            ScoreOrder::Descending => "score DESC, created_at DESC",
            ScoreOrder::Ascending => "score ASC, created_at DESC",
        };

        let sql = format!(
            "SELECT player_name, score FROM game_records
             WHERE game_type = ?1 AND created_at LIKE ?2
             ORDER BY {order}
             LIMIT 10"
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![game.slug(), day_prefix], |row| {
            Ok(RankEntry {
                name: row.get(0)?,
                score: row.get(1)?,
            })
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}
