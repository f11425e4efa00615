use thiserror::Error;

/// Errors for app logic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    #[error("Username '{0}' already exists")]
    UsernameTaken(String),

    #[error("Cannot create game session for player with ID {0}")]
    SessionPlayerMissing(i32),

    #[error("Player with ID {0} not found")]
    PlayerNotFound(i32),

    #[error("GameSession with ID {0} not found")]
    GameSessionNotFound(i32),
}
