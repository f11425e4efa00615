use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, FromRow, Clone)]
pub struct Player {
    pub player_id: i32,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow, Clone)]
pub struct GameSession {
    pub game_session_id: i32,
    pub player_id: i32,
    pub score: i32,
    pub max_level_reached: i32,
    pub played_at: DateTime<Utc>,
}

/// Aggregates over one player's sessions. `best_score` and `max_level`
/// stay NULL when the player has no sessions.
#[derive(Debug, FromRow, Clone)]
pub struct PlayerSessionStats {
    pub total_sessions: i64,
    pub best_score: Option<i32>,
    pub max_level: Option<i32>,
    pub average_score: f64,
}

#[derive(Debug, FromRow, Clone)]
pub struct TopPlayer {
    pub player_id: i32,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub best_score: i32,
    pub total_sessions: i64,
    pub max_level: i32,
}
