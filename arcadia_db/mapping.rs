use arcadia_types::game_session::GameSession;
use arcadia_types::player::{Player, PlayerWithStats, TopPlayer};

use crate::models::{self as db_models};

/// Pieces assembled by the player statistics queries.
pub struct PlayerStatsAggregate {
    pub player: db_models::Player,
    pub stats: db_models::PlayerSessionStats,
    pub recent: Vec<db_models::GameSession>,
}

impl From<PlayerStatsAggregate> for PlayerWithStats {
    fn from(agg: PlayerStatsAggregate) -> Self {
        Self {
            player_id: agg.player.player_id,
            username: agg.player.username,
            created_at: agg.player.created_at,
            total_sessions: agg.stats.total_sessions,
            best_score: agg.stats.best_score,
            max_level: agg.stats.max_level,
            average_score: agg.stats.average_score,
            recent_sessions: agg.recent.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<db_models::Player> for Player {
    fn from(row: db_models::Player) -> Self {
        Self {
            player_id: row.player_id,
            username: row.username,
            created_at: row.created_at,
        }
    }
}

impl From<db_models::GameSession> for GameSession {
    fn from(row: db_models::GameSession) -> Self {
        Self {
            game_session_id: row.game_session_id,
            player_id: row.player_id,
            score: row.score,
            max_level_reached: row.max_level_reached,
            played_at: row.played_at,
        }
    }
}

impl From<db_models::TopPlayer> for TopPlayer {
    fn from(row: db_models::TopPlayer) -> Self {
        Self {
            player_id: row.player_id,
            username: row.username,
            created_at: row.created_at,
            best_score: row.best_score,
            total_sessions: row.total_sessions,
            max_level: row.max_level,
        }
    }
}
