mod game_session_handler;
mod health_handler;
mod player_handler;

pub use game_session_handler::{
    best_score_by_player, create_game_session, delete_all_game_sessions, delete_game_session,
    game_session, game_sessions_by_date_range, game_sessions_by_player,
    game_sessions_by_score_range, list_game_sessions, recent_game_sessions, session_statistics,
    top_scores, top_scores_by_player, update_game_session,
};
pub use health_handler::health;
pub use player_handler::{
    create_player, delete_player, list_players, player, player_by_username, player_statistics,
    top_players, update_player,
};
