use axum::{Json, extract::State, http::StatusCode};
use chrono::Utc;

use arcadia_types::Result;

use crate::{
    dto::{DatabaseStatistics, HealthResponse},
    http::AppState,
};

/// Liveness probe. Degrades to 503 when the store cannot be reached.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let statistics: Result<DatabaseStatistics> = async {
        Ok(DatabaseStatistics {
            total_players: state.players.count_players().await?,
            total_game_sessions: state.game_sessions.get_total_game_sessions_count().await?,
        })
    }
    .await;

    match statistics {
        Ok(statistics) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "Healthy".to_string(),
                database_status: "Connected".to_string(),
                timestamp: Utc::now(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                statistics: Some(statistics),
                error: None,
            }),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "Unhealthy".to_string(),
                    database_status: "Error".to_string(),
                    timestamp: Utc::now(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    statistics: None,
                    error: Some(e.to_string()),
                }),
            )
        }
    }
}
