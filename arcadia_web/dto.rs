use arcadia_types::{
    game_session::GameSession,
    player::{Player, PlayerWithStats, TopPlayer},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePlayerRequest {
    /// Left blank, the backend picks a username on its own.
    #[serde(default)]
    pub username: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePlayerRequest {
    pub player_id: i32,
    pub username: String,
}

impl UpdatePlayerRequest {
    /// Only the id and username matter for an update; the store keeps the
    /// original creation timestamp.
    pub fn into_player(self) -> Player {
        Player {
            player_id: self.player_id,
            username: self.username,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameSessionRequest {
    pub player_id: i32,
    pub score: i32,
    pub max_level_reached: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGameSessionRequest {
    pub game_session_id: i32,
    pub player_id: i32,
    pub score: i32,
    pub max_level_reached: i32,
    pub played_at: DateTime<Utc>,
}

impl UpdateGameSessionRequest {
    pub fn into_game_session(self) -> GameSession {
        GameSession {
            game_session_id: self.game_session_id,
            player_id: self.player_id,
            score: self.score,
            max_level_reached: self.max_level_reached,
            played_at: self.played_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRangeQuery {
    pub min: i32,
    pub max: i32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeQuery {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    pub player_id: i32,
    pub username: String,
    pub created_at: DateTime<Utc>,
}

impl From<Player> for PlayerResponse {
    fn from(player: Player) -> Self {
        Self {
            player_id: player.player_id,
            username: player.username,
            created_at: player.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSessionResponse {
    pub game_session_id: i32,
    pub player_id: i32,
    pub score: i32,
    pub max_level_reached: i32,
    pub played_at: DateTime<Utc>,
}

impl From<GameSession> for GameSessionResponse {
    fn from(session: GameSession) -> Self {
        Self {
            game_session_id: session.game_session_id,
            player_id: session.player_id,
            score: session.score,
            max_level_reached: session.max_level_reached,
            played_at: session.played_at,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerWithStatsResponse {
    pub player_id: i32,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub total_sessions: i64,
    pub best_score: Option<i32>,
    pub max_level: Option<i32>,
    pub average_score: f64,
    pub recent_sessions: Vec<GameSessionResponse>,
}

impl From<PlayerWithStats> for PlayerWithStatsResponse {
    fn from(stats: PlayerWithStats) -> Self {
        Self {
            player_id: stats.player_id,
            username: stats.username,
            created_at: stats.created_at,
            total_sessions: stats.total_sessions,
            best_score: stats.best_score,
            max_level: stats.max_level,
            average_score: stats.average_score,
            recent_sessions: stats.recent_sessions.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPlayerResponse {
    pub player_id: i32,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub best_score: i32,
    pub total_sessions: i64,
    pub max_level: i32,
}

impl From<TopPlayer> for TopPlayerResponse {
    fn from(top: TopPlayer) -> Self {
        Self {
            player_id: top.player_id,
            username: top.username,
            created_at: top.created_at,
            best_score: top.best_score,
            total_sessions: top.total_sessions,
            max_level: top.max_level,
        }
    }
}

/// Per-player roll-up served next to the raw session list. A player with no
/// sessions reports a best score of zero.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatisticsResponse {
    pub player_id: i32,
    pub max_level_reached: i32,
    pub average_score: f64,
    pub total_game_sessions: i64,
    pub best_score: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAllScoresResponse {
    pub message: String,
    pub deleted_count: u64,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub database_status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<DatabaseStatistics>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStatistics {
    pub total_players: i64,
    pub total_game_sessions: i64,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
