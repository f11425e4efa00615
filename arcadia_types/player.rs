use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::game_session::GameSession;

/// A registered player. Usernames are unique and at most 50 characters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub player_id: i32,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

/// A player about to be persisted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl NewPlayer {
    pub fn new(username: String) -> Self {
        Self {
            username,
            created_at: Utc::now(),
        }
    }
}

/// A player together with aggregates over their sessions and the most
/// recent ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerWithStats {
    pub player_id: i32,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub total_sessions: i64,
    pub best_score: Option<i32>,
    pub max_level: Option<i32>,
    pub average_score: f64,
    pub recent_sessions: Vec<GameSession>,
}

/// A leaderboard entry: a player ranked by their single best session score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPlayer {
    pub player_id: i32,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub best_score: i32,
    pub total_sessions: i64,
    pub max_level: i32,
}
