mod game_session_repository;
mod player_repository;

pub use game_session_repository::PostgresGameSessionRepository;
pub use player_repository::PostgresPlayerRepository;
