use std::sync::Arc;

use chrono::{DateTime, Utc};

use arcadia_types::{
    Result,
    errors::{AppError, ValidationError},
    game_session::{GameSession, NewGameSession},
};

use super::rollback_on_error;
use crate::uow::UnitOfWorkProvider;

/// Session lifecycle plus every leaderboard and statistics query.
/// Writes run inside a Unit of Work; reads go straight to the pool
/// repositories.
pub struct GameSessionService {
    provider: Arc<dyn UnitOfWorkProvider>,
}

impl GameSessionService {
    pub fn new(provider: Arc<dyn UnitOfWorkProvider>) -> Self {
        Self { provider }
    }

    /// Records a finished play-through. Score and level are validated
    /// before any transaction opens; the player must exist.
    pub async fn create_game_session(
        &self,
        player_id: i32,
        score: i32,
        max_level_reached: i32,
    ) -> Result<GameSession> {
        if score < 0 {
            return Err(ValidationError::NegativeScore(score).into());
        }
        if max_level_reached < 1 {
            return Err(ValidationError::LevelBelowOne(max_level_reached).into());
        }
        if !self.can_create_game_session(player_id).await? {
            return Err(AppError::SessionPlayerMissing(player_id).into());
        }

        let uow = self.provider.begin().await?;
        let session = NewGameSession::with_result(player_id, score, max_level_reached);
        let result = uow.game_sessions().create(&session).await;

        match result {
            Ok(created) => {
                uow.commit().await?;
                tracing::info!(
                    game_session_id = created.game_session_id,
                    player_id,
                    score,
                    max_level = max_level_reached,
                    "game session recorded"
                );
                Ok(created)
            }
            Err(e) => {
                rollback_on_error(uow).await;
                Err(e)
            }
        }
    }

    /// The referenced player must exist before a session may be recorded.
    pub async fn can_create_game_session(&self, player_id: i32) -> Result<bool> {
        Ok(self.provider.players().get_by_id(player_id).await?.is_some())
    }

    pub async fn get_game_session_by_id(&self, game_session_id: i32) -> Result<Option<GameSession>> {
        self.provider.game_sessions().get_by_id(game_session_id).await
    }

    pub async fn get_game_sessions_by_player(&self, player_id: i32) -> Result<Vec<GameSession>> {
        self.provider.game_sessions().get_by_player(player_id).await
    }

    pub async fn get_all_game_sessions(&self) -> Result<Vec<GameSession>> {
        self.provider.game_sessions().list_all().await
    }

    /// Overwrites all non-key fields of an existing session.
    pub async fn update_game_session(&self, session: &GameSession) -> Result<GameSession> {
        let uow = self.provider.begin().await?;
        let result = uow.game_sessions().update(session).await;

        match result {
            Ok(Some(updated)) => {
                uow.commit().await?;
                tracing::info!(game_session_id = updated.game_session_id, "game session updated");
                Ok(updated)
            }
            Ok(None) => {
                uow.rollback().await?;
                Err(AppError::GameSessionNotFound(session.game_session_id).into())
            }
            Err(e) => {
                rollback_on_error(uow).await;
                Err(e)
            }
        }
    }

    /// Returns `false` when the session does not exist.
    pub async fn delete_game_session(&self, game_session_id: i32) -> Result<bool> {
        let uow = self.provider.begin().await?;

        let result = async {
            if uow.game_sessions().get_by_id(game_session_id).await?.is_none() {
                return Ok(false);
            }
            uow.game_sessions().delete(game_session_id).await?;
            Ok(true)
        }
        .await;

        match result {
            Ok(true) => {
                uow.commit().await?;
                tracing::info!(game_session_id, "game session deleted");
                Ok(true)
            }
            Ok(false) => {
                uow.rollback().await?;
                Ok(false)
            }
            Err(e) => {
                rollback_on_error(uow).await;
                Err(e)
            }
        }
    }

    /// Wipes every session in one set-based delete and returns how many
    /// rows went away. Used for leaderboard resets.
    pub async fn delete_all_game_sessions(&self) -> Result<u64> {
        let uow = self.provider.begin().await?;
        let result = uow.game_sessions().delete_all().await;

        match result {
            Ok(deleted) => {
                uow.commit().await?;
                tracing::info!(deleted, "all game sessions deleted");
                Ok(deleted)
            }
            Err(e) => {
                rollback_on_error(uow).await;
                Err(e)
            }
        }
    }

    pub async fn get_top_scores(&self, count: i64) -> Result<Vec<GameSession>> {
        self.provider.game_sessions().top_scores(count).await
    }

    pub async fn get_top_scores_by_player(
        &self,
        player_id: i32,
        count: i64,
    ) -> Result<Vec<GameSession>> {
        self.provider
            .game_sessions()
            .top_scores_by_player(player_id, count)
            .await
    }

    pub async fn get_recent_game_sessions(&self, count: i64) -> Result<Vec<GameSession>> {
        self.provider.game_sessions().recent(count).await
    }

    pub async fn get_best_score_by_player(&self, player_id: i32) -> Result<Option<GameSession>> {
        self.provider
            .game_sessions()
            .best_score_by_player(player_id)
            .await
    }

    pub async fn get_max_level_by_player(&self, player_id: i32) -> Result<i32> {
        self.provider
            .game_sessions()
            .max_level_by_player(player_id)
            .await
    }

    pub async fn get_average_score_by_player(&self, player_id: i32) -> Result<f64> {
        self.provider
            .game_sessions()
            .average_score_by_player(player_id)
            .await
    }

    pub async fn get_game_sessions_by_score_range(
        &self,
        min_score: i32,
        max_score: i32,
    ) -> Result<Vec<GameSession>> {
        if min_score > max_score {
            return Err(ValidationError::ScoreRangeInverted {
                min: min_score,
                max: max_score,
            }
            .into());
        }

        self.provider
            .game_sessions()
            .by_score_range(min_score, max_score)
            .await
    }

    pub async fn get_game_sessions_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<GameSession>> {
        if start > end {
            return Err(ValidationError::DateRangeInverted { start, end }.into());
        }

        self.provider.game_sessions().by_date_range(start, end).await
    }

    pub async fn get_total_game_sessions_count(&self) -> Result<i64> {
        self.provider.game_sessions().count().await
    }

    pub async fn get_game_sessions_count_by_player(&self, player_id: i32) -> Result<i64> {
        self.provider.game_sessions().count_by_player(player_id).await
    }
}
