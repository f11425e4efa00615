use std::sync::Arc;

use arcadia_app::config::Config;
use arcadia_db::{establish_connection_pool, uow::PostgresUnitOfWorkProvider};
use arcadia_types::{ApplicationError, Result};
use arcadia_web::{AppState, WebRouter};

mod logs;
use logs::setup_logging;

#[tokio::main]
#[cfg(not(tarpaulin_include))]
async fn main() -> Result<(), ApplicationError> {
    setup_logging();
    let (config, state) = setup_app().await?;

    WebRouter::serve(state, config.http_port).await
}

async fn setup_app() -> Result<(Config, AppState), ApplicationError> {
    let config = Config::from_env();
    let db_pool = establish_connection_pool().await?;

    sqlx::migrate!("../migrations")
        .run(&db_pool)
        .await
        .map_err(|e| ApplicationError::Unknown(e.to_string()))?;

    let uow_provider = Arc::new(PostgresUnitOfWorkProvider::new(db_pool));
    let state = AppState::new(uow_provider);

    Ok((config, state))
}
