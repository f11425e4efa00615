use chrono::{DateTime, Utc};
use thiserror::Error;

/// Rejected caller input. Raised before any transaction is opened.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Score cannot be negative, got {0}")]
    NegativeScore(i32),

    #[error("Max level reached cannot be less than 1, got {0}")]
    LevelBelowOne(i32),

    #[error("Minimum score {min} cannot be greater than maximum score {max}")]
    ScoreRangeInverted { min: i32, max: i32 },

    #[error("Start date {start} cannot be after end date {end}")]
    DateRangeInverted {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}
