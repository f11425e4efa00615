use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded play-through: score, deepest level reached and when it
/// was played. Owned by exactly one player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    pub game_session_id: i32,
    pub player_id: i32,
    pub score: i32,
    pub max_level_reached: i32,
    pub played_at: DateTime<Utc>,
}

/// A session about to be persisted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewGameSession {
    pub player_id: i32,
    pub score: i32,
    pub max_level_reached: i32,
    pub played_at: DateTime<Utc>,
}

impl NewGameSession {
    /// Defaults mirror the column defaults: zero score, level 1, played now.
    pub fn new(player_id: i32) -> Self {
        Self {
            player_id,
            score: 0,
            max_level_reached: 1,
            played_at: Utc::now(),
        }
    }

    pub fn with_result(player_id: i32, score: i32, max_level_reached: i32) -> Self {
        Self {
            score,
            max_level_reached,
            ..Self::new(player_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_session_defaults() {
        let session = NewGameSession::new(7);
        assert_eq!(session.player_id, 7);
        assert_eq!(session.score, 0);
        assert_eq!(session.max_level_reached, 1);

        let session = NewGameSession::with_result(7, 1200, 4);
        assert_eq!(session.score, 1200);
        assert_eq!(session.max_level_reached, 4);
    }
}
