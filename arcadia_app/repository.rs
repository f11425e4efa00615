mod game_session_repository;
mod player_repository;

pub use game_session_repository::GameSessionRepository;
pub use player_repository::PlayerRepository;
