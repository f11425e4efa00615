use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use arcadia_types::errors::AppError;

use crate::{
    dto::{
        CreatePlayerRequest, PlayerResponse, PlayerWithStatsResponse, TopPlayerResponse,
        UpdatePlayerRequest,
    },
    error::WebError,
    http::AppState,
};

pub async fn list_players(
    State(state): State<AppState>,
) -> Result<Json<Vec<PlayerResponse>>, WebError> {
    let players = state.players.get_all_players().await?;
    Ok(Json(players.into_iter().map(Into::into).collect()))
}

pub async fn player(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PlayerResponse>, WebError> {
    let player = state
        .players
        .get_player_by_id(id)
        .await?
        .ok_or(AppError::PlayerNotFound(id))?;
    Ok(Json(player.into()))
}

pub async fn player_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<PlayerResponse>, WebError> {
    let player = state
        .players
        .get_player_by_username(&username)
        .await?
        .ok_or_else(|| WebError::NotFound(format!("Player '{username}' not found")))?;
    Ok(Json(player.into()))
}

pub async fn create_player(
    State(state): State<AppState>,
    Json(request): Json<CreatePlayerRequest>,
) -> Result<(StatusCode, Json<PlayerResponse>), WebError> {
    let player = state.players.create_player(&request.username).await?;
    Ok((StatusCode::CREATED, Json(player.into())))
}

pub async fn update_player(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(request): Json<UpdatePlayerRequest>,
) -> Result<Json<PlayerResponse>, WebError> {
    if request.player_id != id {
        return Err(WebError::BadRequest(
            "Path id does not match the player id in the body".to_string(),
        ));
    }

    let player = state.players.update_player(&request.into_player()).await?;
    Ok(Json(player.into()))
}

pub async fn delete_player(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, WebError> {
    if state.players.delete_player(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::PlayerNotFound(id).into())
    }
}

pub async fn player_statistics(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<PlayerWithStatsResponse>, WebError> {
    let stats = state
        .players
        .get_player_with_statistics(id)
        .await?
        .ok_or(AppError::PlayerNotFound(id))?;
    Ok(Json(stats.into()))
}

pub async fn top_players(
    State(state): State<AppState>,
    Path(count): Path<i64>,
) -> Result<Json<Vec<TopPlayerResponse>>, WebError> {
    let players = state.players.get_top_players(count).await?;
    Ok(Json(players.into_iter().map(Into::into).collect()))
}
