use axum::{
    Router,
    routing::{delete, get},
};
use std::{io::Error, net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use arcadia_app::{
    services::{GameSessionService, PlayerService},
    uow::UnitOfWorkProvider,
};
use arcadia_types::{ApplicationError, Result};

use crate::handlers::{
    best_score_by_player, create_game_session, create_player, delete_all_game_sessions,
    delete_game_session, delete_player, game_session, game_sessions_by_date_range,
    game_sessions_by_player, game_sessions_by_score_range, health, list_game_sessions,
    list_players, player, player_by_username, player_statistics, recent_game_sessions,
    session_statistics, top_players, top_scores, top_scores_by_player, update_game_session,
    update_player,
};

#[derive(Clone)]
pub struct AppState {
    pub players: Arc<PlayerService>,
    pub game_sessions: Arc<GameSessionService>,
}

impl AppState {
    pub fn new(provider: Arc<dyn UnitOfWorkProvider>) -> AppState {
        AppState {
            players: Arc::new(PlayerService::new(provider.clone())),
            game_sessions: Arc::new(GameSessionService::new(provider)),
        }
    }
}

pub struct WebRouter {}

impl WebRouter {
    pub fn build(state: AppState) -> Router {
        Router::new()
            .route("/api/health", get(health))
            .route("/api/players", get(list_players).post(create_player))
            .route("/api/players/top/{count}", get(top_players))
            .route("/api/players/by-username/{username}", get(player_by_username))
            .route(
                "/api/players/{id}",
                get(player).put(update_player).delete(delete_player),
            )
            .route("/api/players/{id}/statistics", get(player_statistics))
            .route(
                "/api/game-sessions",
                get(list_game_sessions).post(create_game_session),
            )
            .route("/api/game-sessions/all", delete(delete_all_game_sessions))
            .route("/api/game-sessions/top-scores/{count}", get(top_scores))
            .route("/api/game-sessions/recent/{count}", get(recent_game_sessions))
            .route(
                "/api/game-sessions/by-score-range",
                get(game_sessions_by_score_range),
            )
            .route(
                "/api/game-sessions/by-date-range",
                get(game_sessions_by_date_range),
            )
            .route(
                "/api/game-sessions/player/{player_id}",
                get(game_sessions_by_player),
            )
            .route(
                "/api/game-sessions/player/{player_id}/top-scores/{count}",
                get(top_scores_by_player),
            )
            .route(
                "/api/game-sessions/player/{player_id}/best-score",
                get(best_score_by_player),
            )
            .route(
                "/api/game-sessions/player/{player_id}/statistics",
                get(session_statistics),
            )
            .route(
                "/api/game-sessions/{id}",
                get(game_session)
                    .put(update_game_session)
                    .delete(delete_game_session),
            )
            .with_state(state)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
    }

    pub async fn serve(state: AppState, port: u16) -> Result<(), ApplicationError> {
        let router = Self::build(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], port));
        let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
            let err = format!("{:#?}", e);
            ApplicationError::Infrastructure(err)
        })?;

        tracing::info!(
            "HTTP Server started, listening on http://{}",
            addr.to_string()
        );
        axum::serve(listener, router).await.map_err(infra_error)?;

        Ok(())
    }
}

fn infra_error(e: Error) -> ApplicationError {
    let err = format!("{:#?}", e);
    ApplicationError::Infrastructure(err)
}

#[cfg(test)]
mod tests {
    use arcadia_app::test_utils::tests::MockUnitOfWorkProvider;
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    fn test_app() -> (Router, Arc<MockUnitOfWorkProvider>) {
        let provider = Arc::new(MockUnitOfWorkProvider::new());
        let app = WebRouter::build(AppState::new(provider.clone()));
        (app, provider)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn seed_player(provider: &Arc<MockUnitOfWorkProvider>, username: &str) -> i32 {
        use arcadia_app::uow::UnitOfWorkProvider;
        use arcadia_types::player::NewPlayer;

        let player = provider
            .players()
            .create(&NewPlayer::new(username.to_string()))
            .await
            .unwrap();
        player.player_id
    }

    async fn seed_session(
        provider: &Arc<MockUnitOfWorkProvider>,
        player_id: i32,
        score: i32,
        max_level: i32,
    ) -> i32 {
        use arcadia_app::uow::UnitOfWorkProvider;
        use arcadia_types::game_session::NewGameSession;

        let session = provider
            .game_sessions()
            .create(&NewGameSession::with_result(player_id, score, max_level))
            .await
            .unwrap();
        session.game_session_id
    }

    #[tokio::test]
    async fn test_create_player_returns_created() {
        let (app, _provider) = test_app();

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/players",
                json!({"username": "Blinky"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["username"], "Blinky");
        assert_eq!(body["playerId"], 1);
    }

    #[tokio::test]
    async fn test_create_player_duplicate_username_is_rejected() {
        let (app, provider) = test_app();
        seed_player(&provider, "Blinky").await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/players",
                json!({"username": "Blinky"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Username 'Blinky' already exists");
    }

    #[tokio::test]
    async fn test_create_player_without_username_generates_one() {
        let (app, _provider) = test_app();

        let response = app
            .oneshot(json_request("POST", "/api/players", json!({})))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        let username = body["username"].as_str().unwrap();
        assert!(username.starts_with("Player"));
        assert_eq!(username.len(), "Player".len() + 5);
    }

    #[tokio::test]
    async fn test_get_player_not_found() {
        let (app, _provider) = test_app();

        let response = app.oneshot(get_request("/api/players/42")).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Player with ID 42 not found");
    }

    #[tokio::test]
    async fn test_get_player_by_username() {
        let (app, provider) = test_app();
        let player_id = seed_player(&provider, "Clyde").await;

        let response = app
            .oneshot(get_request("/api/players/by-username/Clyde"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["playerId"], player_id);
    }

    #[tokio::test]
    async fn test_update_player_rejects_mismatched_id() {
        let (app, provider) = test_app();
        let player_id = seed_player(&provider, "Clyde").await;

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/players/999",
                json!({"playerId": player_id, "username": "Sue"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_player_renames() {
        let (app, provider) = test_app();
        let player_id = seed_player(&provider, "Clyde").await;

        let response = app
            .oneshot(json_request(
                "PUT",
                &format!("/api/players/{player_id}"),
                json!({"playerId": player_id, "username": "Sue"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["username"], "Sue");
    }

    #[tokio::test]
    async fn test_delete_player_no_content_then_not_found() {
        let (app, provider) = test_app();
        let player_id = seed_player(&provider, "Clyde").await;

        let uri = format!("/api/players/{player_id}");
        let request = Request::builder()
            .method("DELETE")
            .uri(uri.as_str())
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let request = Request::builder()
            .method("DELETE")
            .uri(uri.as_str())
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_player_statistics_shape() {
        let (app, provider) = test_app();
        let player_id = seed_player(&provider, "Pinky").await;
        seed_session(&provider, player_id, 100, 2).await;
        seed_session(&provider, player_id, 300, 4).await;

        let response = app
            .oneshot(get_request(&format!("/api/players/{player_id}/statistics")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["totalSessions"], 2);
        assert_eq!(body["bestScore"], 300);
        assert_eq!(body["maxLevel"], 4);
        assert_eq!(body["averageScore"], 200.0);
        assert_eq!(body["recentSessions"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_top_players_ranked_by_best_score() {
        let (app, provider) = test_app();
        let first = seed_player(&provider, "Pinky").await;
        let second = seed_player(&provider, "Inky").await;
        seed_player(&provider, "NoSessions").await;
        seed_session(&provider, first, 100, 2).await;
        seed_session(&provider, second, 900, 5).await;

        let response = app.oneshot(get_request("/api/players/top/10")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let entries = body.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0]["username"], "Inky");
        assert_eq!(entries[0]["bestScore"], 900);
        assert_eq!(entries[1]["username"], "Pinky");
    }

    #[tokio::test]
    async fn test_create_game_session_returns_created() {
        let (app, provider) = test_app();
        let player_id = seed_player(&provider, "Pinky").await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/game-sessions",
                json!({"playerId": player_id, "score": 1200, "maxLevelReached": 4}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["score"], 1200);
        assert_eq!(body["maxLevelReached"], 4);
        assert_eq!(body["playerId"], player_id);
    }

    #[tokio::test]
    async fn test_create_game_session_validation_maps_to_bad_request() {
        let (app, provider) = test_app();
        let player_id = seed_player(&provider, "Pinky").await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/game-sessions",
                json!({"playerId": player_id, "score": -1, "maxLevelReached": 4}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/game-sessions",
                json!({"playerId": 999, "score": 10, "maxLevelReached": 1}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(
            body["error"],
            "Cannot create game session for player with ID 999"
        );
    }

    #[tokio::test]
    async fn test_top_scores_and_recent() {
        let (app, provider) = test_app();
        let player_id = seed_player(&provider, "Pinky").await;
        seed_session(&provider, player_id, 100, 2).await;
        seed_session(&provider, player_id, 900, 5).await;
        seed_session(&provider, player_id, 500, 3).await;

        let response = app
            .clone()
            .oneshot(get_request("/api/game-sessions/top-scores/2"))
            .await
            .unwrap();
        let body = body_json(response).await;
        let scores: Vec<i64> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["score"].as_i64().unwrap())
            .collect();
        assert_eq!(scores, vec![900, 500]);

        let response = app
            .oneshot(get_request("/api/game-sessions/recent/1"))
            .await
            .unwrap();
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_best_score_not_found_without_sessions() {
        let (app, provider) = test_app();
        let player_id = seed_player(&provider, "Pinky").await;

        let response = app
            .oneshot(get_request(&format!(
                "/api/game-sessions/player/{player_id}/best-score"
            )))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_session_statistics_defaults_for_fresh_player() {
        let (app, provider) = test_app();
        let player_id = seed_player(&provider, "Pinky").await;

        let response = app
            .oneshot(get_request(&format!(
                "/api/game-sessions/player/{player_id}/statistics"
            )))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["playerId"], player_id);
        assert_eq!(body["bestScore"], 0);
        assert_eq!(body["maxLevelReached"], 1);
        assert_eq!(body["averageScore"], 0.0);
        assert_eq!(body["totalGameSessions"], 0);
    }

    #[tokio::test]
    async fn test_score_range_query_parameters() {
        let (app, provider) = test_app();
        let player_id = seed_player(&provider, "Pinky").await;
        seed_session(&provider, player_id, 100, 2).await;
        seed_session(&provider, player_id, 900, 5).await;

        let response = app
            .clone()
            .oneshot(get_request("/api/game-sessions/by-score-range?min=50&max=200"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["score"], 100);

        let response = app
            .oneshot(get_request("/api/game-sessions/by-score-range?min=200&max=50"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_delete_all_game_sessions_reports_count() {
        let (app, provider) = test_app();
        let player_id = seed_player(&provider, "Pinky").await;
        seed_session(&provider, player_id, 100, 2).await;
        seed_session(&provider, player_id, 900, 5).await;

        let request = Request::builder()
            .method("DELETE")
            .uri("/api/game-sessions/all")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["deletedCount"], 2);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn test_update_and_delete_game_session() {
        let (app, provider) = test_app();
        let player_id = seed_player(&provider, "Pinky").await;
        let session_id = seed_session(&provider, player_id, 100, 2).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/game-sessions/{session_id}"),
                json!({
                    "gameSessionId": session_id,
                    "playerId": player_id,
                    "score": 450,
                    "maxLevelReached": 7,
                    "playedAt": "2026-01-10T12:00:00Z"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["score"], 450);

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/api/game-sessions/{session_id}"))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_health_reports_connected_database() {
        let (app, provider) = test_app();
        let player_id = seed_player(&provider, "Pinky").await;
        seed_session(&provider, player_id, 100, 2).await;

        let response = app.oneshot(get_request("/api/health")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "Healthy");
        assert_eq!(body["databaseStatus"], "Connected");
        assert_eq!(body["statistics"]["totalPlayers"], 1);
        assert_eq!(body["statistics"]["totalGameSessions"], 1);
    }
}
