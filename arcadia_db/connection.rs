use std::env;
use std::sync::Arc;

use sqlx::pool::PoolConnection;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{PgConnection, Postgres, Transaction};
use tokio::sync::{Mutex, MutexGuard};

use arcadia_types::errors::DbError;

pub type DbPool = PgPool;

pub async fn establish_connection_pool() -> Result<DbPool, DbError> {
    Ok(init_connection_pool("DATABASE_URL").await?)
}

pub async fn establish_test_connection_pool() -> Result<DbPool, DbError> {
    Ok(init_connection_pool("TEST_DATABASE_URL").await?)
}

async fn init_connection_pool(database_env: &'static str) -> Result<DbPool, DbError> {
    dotenvy::dotenv().ok();

    let database_url =
        env::var(database_env).unwrap_or_else(|_| panic!("{} must be set", database_env));

    Ok(PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?)
}

/// Where a repository sends its queries: a fresh pool checkout for
/// stand-alone reads, or the shared transaction of a Unit of Work.
#[derive(Clone)]
pub(crate) enum PgConn<'a> {
    Pool(DbPool),
    Tx(Arc<Mutex<Transaction<'a, Postgres>>>),
}

impl<'a> PgConn<'a> {
    pub(crate) async fn acquire(&self) -> Result<PgConnHandle<'a, '_>, DbError> {
        match self {
            PgConn::Pool(pool) => Ok(PgConnHandle::Pooled(pool.acquire().await?)),
            PgConn::Tx(tx) => Ok(PgConnHandle::Tx(tx.lock().await)),
        }
    }
}

/// Holds either a checked-out connection or the transaction lock for as
/// long as a repository method runs.
pub(crate) enum PgConnHandle<'a, 'g> {
    Pooled(PoolConnection<Postgres>),
    Tx(MutexGuard<'g, Transaction<'a, Postgres>>),
}

impl PgConnHandle<'_, '_> {
    pub(crate) fn as_conn(&mut self) -> &mut PgConnection {
        match self {
            PgConnHandle::Pooled(conn) => &mut **conn,
            PgConnHandle::Tx(guard) => guard.as_mut(),
        }
    }
}
