pub mod errors;
pub mod game_session;
pub mod player;

pub use errors::{ApplicationError, Result};
