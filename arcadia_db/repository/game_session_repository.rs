use chrono::{DateTime, Utc};
use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;

use arcadia_app::repository::GameSessionRepository;
use arcadia_types::{
    Result,
    errors::{AppError, ApplicationError, DbError},
    game_session::{GameSession, NewGameSession},
};

use crate::connection::{DbPool, PgConn};
use crate::models::{self as db_models};

const SESSION_COLUMNS: &str = "game_session_id, player_id, score, max_level_reached, played_at";

/// Implements GameSessionRepository over either a pool checkout or the
/// shared transaction of a Unit of Work.
#[derive(Clone)]
pub struct PostgresGameSessionRepository<'a> {
    conn: PgConn<'a>,
}

impl<'a> PostgresGameSessionRepository<'a> {
    pub fn new(tx: Arc<Mutex<Transaction<'a, Postgres>>>) -> Self {
        Self {
            conn: PgConn::Tx(tx),
        }
    }

    pub fn from_pool(pool: DbPool) -> Self {
        Self {
            conn: PgConn::Pool(pool),
        }
    }
}

#[async_trait::async_trait]
impl<'a> GameSessionRepository for PostgresGameSessionRepository<'a> {
    async fn create(&self, session: &NewGameSession) -> Result<GameSession, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let row = sqlx::query_as::<_, db_models::GameSession>(
            r#"
            INSERT INTO game_sessions (player_id, score, max_level_reached, played_at)
            VALUES ($1, $2, $3, $4)
            RETURNING game_session_id, player_id, score, max_level_reached, played_at
            "#,
        )
        .bind(session.player_id)
        .bind(session.score)
        .bind(session.max_level_reached)
        .bind(session.played_at)
        .fetch_one(conn.as_conn())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                ApplicationError::App(AppError::SessionPlayerMissing(session.player_id))
            }
            e => ApplicationError::Db(DbError::Database(e)),
        })?;

        Ok(row.into())
    }

    async fn get_by_id(
        &self,
        game_session_id: i32,
    ) -> Result<Option<GameSession>, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let row = sqlx::query_as::<_, db_models::GameSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM game_sessions WHERE game_session_id = $1"
        ))
        .bind(game_session_id)
        .fetch_optional(conn.as_conn())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(row.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<GameSession>, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let rows = sqlx::query_as::<_, db_models::GameSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM game_sessions ORDER BY played_at DESC"
        ))
        .fetch_all(conn.as_conn())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_by_player(&self, player_id: i32) -> Result<Vec<GameSession>, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let rows = sqlx::query_as::<_, db_models::GameSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM game_sessions WHERE player_id = $1 ORDER BY played_at DESC"
        ))
        .bind(player_id)
        .fetch_all(conn.as_conn())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, session: &GameSession) -> Result<Option<GameSession>, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let row = sqlx::query_as::<_, db_models::GameSession>(
            r#"
            UPDATE game_sessions
            SET player_id = $2, score = $3, max_level_reached = $4, played_at = $5
            WHERE game_session_id = $1
            RETURNING game_session_id, player_id, score, max_level_reached, played_at
            "#,
        )
        .bind(session.game_session_id)
        .bind(session.player_id)
        .bind(session.score)
        .bind(session.max_level_reached)
        .bind(session.played_at)
        .fetch_optional(conn.as_conn())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                ApplicationError::App(AppError::SessionPlayerMissing(session.player_id))
            }
            e => ApplicationError::Db(DbError::Database(e)),
        })?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, game_session_id: i32) -> Result<bool, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let result = sqlx::query("DELETE FROM game_sessions WHERE game_session_id = $1")
            .bind(game_session_id)
            .execute(conn.as_conn())
            .await
            .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_by_player(&self, player_id: i32) -> Result<u64, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let result = sqlx::query("DELETE FROM game_sessions WHERE player_id = $1")
            .bind(player_id)
            .execute(conn.as_conn())
            .await
            .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(result.rows_affected())
    }

    async fn delete_all(&self) -> Result<u64, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let result = sqlx::query("DELETE FROM game_sessions")
            .execute(conn.as_conn())
            .await
            .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(result.rows_affected())
    }

    async fn top_scores(&self, count: i64) -> Result<Vec<GameSession>, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let rows = sqlx::query_as::<_, db_models::GameSession>(&format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM game_sessions
            ORDER BY score DESC, max_level_reached DESC, played_at DESC
            LIMIT $1
            "#
        ))
        .bind(count)
        .fetch_all(conn.as_conn())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn top_scores_by_player(
        &self,
        player_id: i32,
        count: i64,
    ) -> Result<Vec<GameSession>, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let rows = sqlx::query_as::<_, db_models::GameSession>(&format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM game_sessions
            WHERE player_id = $1
            ORDER BY score DESC, max_level_reached DESC, played_at DESC
            LIMIT $2
            "#
        ))
        .bind(player_id)
        .bind(count)
        .fetch_all(conn.as_conn())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn recent(&self, count: i64) -> Result<Vec<GameSession>, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let rows = sqlx::query_as::<_, db_models::GameSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM game_sessions ORDER BY played_at DESC LIMIT $1"
        ))
        .bind(count)
        .fetch_all(conn.as_conn())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn best_score_by_player(
        &self,
        player_id: i32,
    ) -> Result<Option<GameSession>, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let row = sqlx::query_as::<_, db_models::GameSession>(&format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM game_sessions
            WHERE player_id = $1
            ORDER BY score DESC, max_level_reached DESC, played_at DESC
            LIMIT 1
            "#
        ))
        .bind(player_id)
        .fetch_optional(conn.as_conn())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(row.map(Into::into))
    }

    async fn max_level_by_player(&self, player_id: i32) -> Result<i32, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let level = sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(max_level_reached), 1) FROM game_sessions WHERE player_id = $1",
        )
        .bind(player_id)
        .fetch_one(conn.as_conn())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(level)
    }

    async fn average_score_by_player(&self, player_id: i32) -> Result<f64, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let average = sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(AVG(score)::DOUBLE PRECISION, 0) FROM game_sessions WHERE player_id = $1",
        )
        .bind(player_id)
        .fetch_one(conn.as_conn())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(average)
    }

    async fn count(&self) -> Result<i64, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM game_sessions")
            .fetch_one(conn.as_conn())
            .await
            .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(count)
    }

    async fn count_by_player(&self, player_id: i32) -> Result<i64, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM game_sessions WHERE player_id = $1",
        )
        .bind(player_id)
        .fetch_one(conn.as_conn())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(count)
    }

    async fn by_score_range(
        &self,
        min_score: i32,
        max_score: i32,
    ) -> Result<Vec<GameSession>, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let rows = sqlx::query_as::<_, db_models::GameSession>(&format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM game_sessions
            WHERE score >= $1 AND score <= $2
            ORDER BY score DESC
            "#
        ))
        .bind(min_score)
        .bind(max_score)
        .fetch_all(conn.as_conn())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<GameSession>, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let rows = sqlx::query_as::<_, db_models::GameSession>(&format!(
            r#"
            SELECT {SESSION_COLUMNS}
            FROM game_sessions
            WHERE played_at >= $1 AND played_at <= $2
            ORDER BY played_at DESC
            "#
        ))
        .bind(start)
        .bind(end)
        .fetch_all(conn.as_conn())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
