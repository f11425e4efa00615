use chrono::{DateTime, Utc};

use arcadia_types::errors::ApplicationError;
use arcadia_types::game_session::{GameSession, NewGameSession};

#[async_trait::async_trait]
pub trait GameSessionRepository: Send + Sync {
    /// Inserts a new session and returns it with the assigned id.
    async fn create(&self, session: &NewGameSession) -> Result<GameSession, ApplicationError>;

    /// Returns a session by id, or `None`.
    async fn get_by_id(&self, game_session_id: i32)
    -> Result<Option<GameSession>, ApplicationError>;

    /// All sessions, most recent first.
    async fn list_all(&self) -> Result<Vec<GameSession>, ApplicationError>;

    /// One player's sessions, most recent first.
    async fn get_by_player(&self, player_id: i32) -> Result<Vec<GameSession>, ApplicationError>;

    /// Overwrites all non-key fields; `None` when the id does not exist.
    async fn update(&self, session: &GameSession)
    -> Result<Option<GameSession>, ApplicationError>;

    /// Removes a session; `false` when the id does not exist.
    async fn delete(&self, game_session_id: i32) -> Result<bool, ApplicationError>;

    /// Removes every session of one player, returning how many went away.
    async fn delete_by_player(&self, player_id: i32) -> Result<u64, ApplicationError>;

    /// Set-based wipe of the whole table, returning the removed count.
    async fn delete_all(&self) -> Result<u64, ApplicationError>;

    /// Leaderboard ordering: score desc, then max level desc, then
    /// played_at desc.
    async fn top_scores(&self, count: i64) -> Result<Vec<GameSession>, ApplicationError>;

    /// Same ordering as `top_scores`, restricted to one player.
    async fn top_scores_by_player(
        &self,
        player_id: i32,
        count: i64,
    ) -> Result<Vec<GameSession>, ApplicationError>;

    /// Most recently played sessions, regardless of score.
    async fn recent(&self, count: i64) -> Result<Vec<GameSession>, ApplicationError>;

    /// The player's top-ranked session per the leaderboard ordering.
    async fn best_score_by_player(
        &self,
        player_id: i32,
    ) -> Result<Option<GameSession>, ApplicationError>;

    /// Highest level the player ever reached; 1 when they have no sessions.
    async fn max_level_by_player(&self, player_id: i32) -> Result<i32, ApplicationError>;

    /// Mean score across the player's sessions; 0 when they have none.
    async fn average_score_by_player(&self, player_id: i32) -> Result<f64, ApplicationError>;

    async fn count(&self) -> Result<i64, ApplicationError>;

    async fn count_by_player(&self, player_id: i32) -> Result<i64, ApplicationError>;

    /// Sessions scoring within `[min_score, max_score]`, best first.
    async fn by_score_range(
        &self,
        min_score: i32,
        max_score: i32,
    ) -> Result<Vec<GameSession>, ApplicationError>;

    /// Sessions played within `[start, end]`, most recent first.
    async fn by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<GameSession>, ApplicationError>;
}
