use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tokio::sync::Mutex;

use arcadia_app::repository::PlayerRepository;
use arcadia_types::{
    Result,
    errors::{AppError, ApplicationError, DbError},
    player::{NewPlayer, Player, PlayerWithStats, TopPlayer},
};

use crate::connection::{DbPool, PgConn};
use crate::mapping::PlayerStatsAggregate;
use crate::models::{self as db_models};

/// Implements PlayerRepository over either a pool checkout or the shared
/// transaction of a Unit of Work.
#[derive(Clone)]
pub struct PostgresPlayerRepository<'a> {
    conn: PgConn<'a>,
}

impl<'a> PostgresPlayerRepository<'a> {
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
impl<'a> PlayerRepository for PostgresPlayerRepository<'a> {
    async fn create(&self, player: &NewPlayer) -> Result<Player, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let row = sqlx::query_as::<_, db_models::Player>(
            r#"
            INSERT INTO players (username, created_at)
            VALUES ($1, $2)
            RETURNING player_id, username, created_at
            "#,
        )
        .bind(&player.username)
        .bind(player.created_at)
        .fetch_one(conn.as_conn())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ApplicationError::App(AppError::UsernameTaken(player.username.clone()))
            }
            e => ApplicationError::Db(DbError::Database(e)),
        })?;

        Ok(row.into())
    }

    async fn get_by_id(&self, player_id: i32) -> Result<Option<Player>, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let row = sqlx::query_as::<_, db_models::Player>(
            "SELECT player_id, username, created_at FROM players WHERE player_id = $1",
        )
        .bind(player_id)
        .fetch_optional(conn.as_conn())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(row.map(Into::into))
    }

    async fn get_by_username(&self, username: &str) -> Result<Option<Player>, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let row = sqlx::query_as::<_, db_models::Player>(
            "SELECT player_id, username, created_at FROM players WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(conn.as_conn())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(row.map(Into::into))
    }

    async fn list_all(&self) -> Result<Vec<Player>, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let rows = sqlx::query_as::<_, db_models::Player>(
            "SELECT player_id, username, created_at FROM players ORDER BY username ASC",
        )
        .fetch_all(conn.as_conn())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update(&self, player: &Player) -> Result<Option<Player>, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let row = sqlx::query_as::<_, db_models::Player>(
            r#"
            UPDATE players
            SET username = $2
            WHERE player_id = $1
            RETURNING player_id, username, created_at
            "#,
        )
        .bind(player.player_id)
        .bind(&player.username)
        .fetch_optional(conn.as_conn())
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ApplicationError::App(AppError::UsernameTaken(player.username.clone()))
            }
            e => ApplicationError::Db(DbError::Database(e)),
        })?;

        Ok(row.map(Into::into))
    }

    async fn delete(&self, player_id: i32) -> Result<bool, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let result = sqlx::query("DELETE FROM players WHERE player_id = $1")
            .bind(player_id)
            .execute(conn.as_conn())
            .await
            .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn exists_by_username(&self, username: &str) -> Result<bool, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM players WHERE username = $1)",
        )
        .bind(username)
        .fetch_one(conn.as_conn())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(exists)
    }

    async fn count(&self) -> Result<i64, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM players")
            .fetch_one(conn.as_conn())
            .await
            .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(count)
    }

    async fn get_with_statistics(
        &self,
        player_id: i32,
    ) -> Result<Option<PlayerWithStats>, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let player = sqlx::query_as::<_, db_models::Player>(
            "SELECT player_id, username, created_at FROM players WHERE player_id = $1",
        )
        .bind(player_id)
        .fetch_optional(conn.as_conn())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        let Some(player) = player else {
            return Ok(None);
        };

        let stats = sqlx::query_as::<_, db_models::PlayerSessionStats>(
            r#"
            SELECT
                COUNT(*) AS total_sessions,
                MAX(score) AS best_score,
                MAX(max_level_reached) AS max_level,
                COALESCE(AVG(score)::DOUBLE PRECISION, 0) AS average_score
            FROM game_sessions
            WHERE player_id = $1
            "#,
        )
        .bind(player_id)
        .fetch_one(conn.as_conn())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        let recent = sqlx::query_as::<_, db_models::GameSession>(
            r#"
            SELECT game_session_id, player_id, score, max_level_reached, played_at
            FROM game_sessions
            WHERE player_id = $1
            ORDER BY played_at DESC
            LIMIT 5
            "#,
        )
        .bind(player_id)
        .fetch_all(conn.as_conn())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(Some(
            PlayerStatsAggregate {
                player,
                stats,
                recent,
            }
            .into(),
        ))
    }

    async fn top_players(&self, count: i64) -> Result<Vec<TopPlayer>, ApplicationError> {
        let mut conn = self.conn.acquire().await?;

        let rows = sqlx::query_as::<_, db_models::TopPlayer>(
            r#"
            SELECT
                p.player_id,
                p.username,
                p.created_at,
                MAX(gs.score) AS best_score,
                COUNT(gs.game_session_id) AS total_sessions,
                MAX(gs.max_level_reached) AS max_level
            FROM players p
            JOIN game_sessions gs ON gs.player_id = p.player_id
            GROUP BY p.player_id, p.username, p.created_at
            ORDER BY best_score DESC
            LIMIT $1
            "#,
        )
        .bind(count)
        .fetch_all(conn.as_conn())
        .await
        .map_err(|e| ApplicationError::Db(DbError::Database(e)))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
