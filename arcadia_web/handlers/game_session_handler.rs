use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::Utc;

use arcadia_types::errors::AppError;

use crate::{
    dto::{
        CreateGameSessionRequest, DateRangeQuery, DeleteAllScoresResponse, GameSessionResponse,
        ScoreRangeQuery, SessionStatisticsResponse, UpdateGameSessionRequest,
    },
    error::WebError,
    http::AppState,
};

pub async fn list_game_sessions(
    State(state): State<AppState>,
) -> Result<Json<Vec<GameSessionResponse>>, WebError> {
    let sessions = state.game_sessions.get_all_game_sessions().await?;
    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

pub async fn game_session(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<GameSessionResponse>, WebError> {
    let session = state
        .game_sessions
        .get_game_session_by_id(id)
        .await?
        .ok_or(AppError::GameSessionNotFound(id))?;
    Ok(Json(session.into()))
}

pub async fn game_sessions_by_player(
    State(state): State<AppState>,
    Path(player_id): Path<i32>,
) -> Result<Json<Vec<GameSessionResponse>>, WebError> {
    let sessions = state
        .game_sessions
        .get_game_sessions_by_player(player_id)
        .await?;
    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

pub async fn create_game_session(
    State(state): State<AppState>,
    Json(request): Json<CreateGameSessionRequest>,
) -> Result<(StatusCode, Json<GameSessionResponse>), WebError> {
    let session = state
        .game_sessions
        .create_game_session(request.player_id, request.score, request.max_level_reached)
        .await?;
    Ok((StatusCode::CREATED, Json(session.into())))
}

pub async fn update_game_session(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdateGameSessionRequest>,
) -> Result<Json<GameSessionResponse>, WebError> {
    if request.game_session_id != id {
        return Err(WebError::BadRequest(
            "Path id does not match the game session id in the body".to_string(),
        ));
    }

    let session = state
        .game_sessions
        .update_game_session(&request.into_game_session())
        .await?;
    Ok(Json(session.into()))
}

pub async fn delete_game_session(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, WebError> {
    if state.game_sessions.delete_game_session(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::GameSessionNotFound(id).into())
    }
}

/// Wipes the whole leaderboard. Always answers with a report body, even on
/// failure, so the caller can log what happened.
pub async fn delete_all_game_sessions(
    State(state): State<AppState>,
) -> (StatusCode, Json<DeleteAllScoresResponse>) {
    match state.game_sessions.delete_all_game_sessions().await {
        Ok(deleted_count) => (
            StatusCode::OK,
            Json(DeleteAllScoresResponse {
                message: format!("Deleted {deleted_count} game sessions"),
                deleted_count,
                success: true,
                error: None,
                timestamp: Utc::now(),
            }),
        ),
        Err(e) => {
            tracing::error!("Failed to delete all game sessions: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(DeleteAllScoresResponse {
                    message: "Failed to delete game sessions".to_string(),
                    deleted_count: 0,
                    success: false,
                    error: Some(e.to_string()),
                    timestamp: Utc::now(),
                }),
            )
        }
    }
}

pub async fn top_scores(
    State(state): State<AppState>,
    Path(count): Path<i64>,
) -> Result<Json<Vec<GameSessionResponse>>, WebError> {
    let sessions = state.game_sessions.get_top_scores(count).await?;
    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

pub async fn top_scores_by_player(
    State(state): State<AppState>,
    Path((player_id, count)): Path<(i32, i64)>,
) -> Result<Json<Vec<GameSessionResponse>>, WebError> {
    let sessions = state
        .game_sessions
        .get_top_scores_by_player(player_id, count)
        .await?;
    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

pub async fn recent_game_sessions(
    State(state): State<AppState>,
    Path(count): Path<i64>,
) -> Result<Json<Vec<GameSessionResponse>>, WebError> {
    let sessions = state.game_sessions.get_recent_game_sessions(count).await?;
    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

pub async fn best_score_by_player(
    State(state): State<AppState>,
    Path(player_id): Path<i32>,
) -> Result<Json<GameSessionResponse>, WebError> {
    let session = state
        .game_sessions
        .get_best_score_by_player(player_id)
        .await?
        .ok_or_else(|| {
            WebError::NotFound(format!("No game sessions found for player {player_id}"))
        })?;
    Ok(Json(session.into()))
}

pub async fn session_statistics(
    State(state): State<AppState>,
    Path(player_id): Path<i32>,
) -> Result<Json<SessionStatisticsResponse>, WebError> {
    let sessions = &state.game_sessions;
    let max_level_reached = sessions.get_max_level_by_player(player_id).await?;
    let average_score = sessions.get_average_score_by_player(player_id).await?;
    let total_game_sessions = sessions.get_game_sessions_count_by_player(player_id).await?;
    let best_score = sessions
        .get_best_score_by_player(player_id)
        .await?
        .map(|s| s.score)
        .unwrap_or(0);

    Ok(Json(SessionStatisticsResponse {
        player_id,
        max_level_reached,
        average_score,
        total_game_sessions,
        best_score,
    }))
}

pub async fn game_sessions_by_score_range(
    State(state): State<AppState>,
    Query(range): Query<ScoreRangeQuery>,
) -> Result<Json<Vec<GameSessionResponse>>, WebError> {
    let sessions = state
        .game_sessions
        .get_game_sessions_by_score_range(range.min, range.max)
        .await?;
    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

pub async fn game_sessions_by_date_range(
    State(state): State<AppState>,
    Query(range): Query<DateRangeQuery>,
) -> Result<Json<Vec<GameSessionResponse>>, WebError> {
    let sessions = state
        .game_sessions
        .get_game_sessions_by_date_range(range.start, range.end)
        .await?;
    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}
