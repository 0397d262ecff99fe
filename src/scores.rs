/// Persistent per-player, per-level best scores and the leaderboard built
/// from them.

use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension};

use crate::error::ScoreStoreError;

/// Rows shown on the leaderboard.
pub const LEADERBOARD_SIZE: usize = 10;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS scores (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    player_name TEXT NOT NULL,
    level_id INTEGER NOT NULL,
    score INTEGER NOT NULL,
    UNIQUE(player_name, level_id)
)";

/// One player's best score on every level, index = level id. Levels the
/// player never finished hold 0.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub name: String,
    pub scores_per_level: Vec<i32>,
}

impl LeaderboardEntry {
    pub fn total(&self) -> i32 {
        self.scores_per_level.iter().sum()
    }
}

pub struct ScoreStore {
    conn: Connection,
}

impl ScoreStore {
    pub fn open(path: &Path) -> Result<Self, ScoreStoreError> {
        let conn = Connection::open(path)?;
        tracing::info!(path = %path.display(), "score database opened");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, ScoreStoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, ScoreStoreError> {
        conn.execute(CREATE_TABLE, [])?;
        Ok(Self { conn })
    }

    /// Store `score`, keeping the higher of the new and any existing score
    /// for the same player and level.
    pub fn record_score(
        &self,
        player_name: &str,
        level_id: i32,
        score: i32,
    ) -> Result<(), ScoreStoreError> {
        if player_name.is_empty() {
            return Err(ScoreStoreError::EmptyPlayerName);
        }
        if level_id < 0 {
            return Err(ScoreStoreError::InvalidLevel(level_id));
        }
        self.conn.execute(
            "INSERT INTO scores (player_name, level_id, score) VALUES (?1, ?2, ?3)
             ON CONFLICT(player_name, level_id) DO UPDATE SET
             score = MAX(scores.score, excluded.score)",
            params![player_name, level_id, score],
        )?;
        Ok(())
    }

    pub fn best_score(&self, player_name: &str, level_id: i32) -> Result<Option<i32>, ScoreStoreError> {
        let score = self
            .conn
            .query_row(
                "SELECT score FROM scores WHERE player_name = ?1 AND level_id = ?2",
                params![player_name, level_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(score)
    }

    /// Top `limit` players by total score across levels, highest first.
    /// Players with equal totals keep the order they first scored in.
    pub fn leaderboard(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, ScoreStoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT player_name, level_id, score FROM scores ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i32>(1)?, row.get::<_, i32>(2)?))
        })?;

        let mut entries: Vec<LeaderboardEntry> = Vec::new();
        for row in rows {
            let (name, level_id, score) = row?;
            let Ok(level) = usize::try_from(level_id) else {
                tracing::warn!(player = %name, level_id, "skipping score with negative level id");
                continue;
            };
            let pos = match entries.iter().position(|e| e.name == name) {
                Some(pos) => pos,
                None => {
                    entries.push(LeaderboardEntry { name, scores_per_level: Vec::new() });
                    entries.len() - 1
                }
            };
            let scores = &mut entries[pos].scores_per_level;
            if scores.len() <= level {
                scores.resize(level + 1, 0);
            }
            scores[level] = score;
        }

        entries.sort_by(|a, b| b.total().cmp(&a.total()));
        entries.truncate(limit);
        Ok(entries)
    }
}
