use arcadia_types::errors::{AppError, ApplicationError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::dto::ErrorResponse;

/// Error surface of the HTTP handlers. Anything that converts into an
/// `ApplicationError` can be bubbled up with `?`.
#[derive(Debug)]
pub enum WebError {
    App(ApplicationError),
    BadRequest(String),
    NotFound(String),
}

impl<E> From<E> for WebError
where
    E: Into<ApplicationError>,
{
    fn from(err: E) -> Self {
        Self::App(err.into())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            Self::NotFound(message) => (StatusCode::NOT_FOUND, message),
            Self::App(ApplicationError::Validation(err)) => {
                (StatusCode::BAD_REQUEST, err.to_string())
            }
            Self::App(ApplicationError::App(
                err @ (AppError::UsernameTaken(_) | AppError::SessionPlayerMissing(_)),
            )) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::App(ApplicationError::App(err)) => (StatusCode::NOT_FOUND, err.to_string()),
            Self::App(err) => {
                tracing::error!("Unhandled application error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error.".to_string(),
                )
            }
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use arcadia_types::errors::{DbError, ValidationError};

    use super::*;

    #[test]
    fn test_status_codes_per_error_kind() {
        let cases = [
            (
                WebError::from(ValidationError::NegativeScore(-5)),
                StatusCode::BAD_REQUEST,
            ),
            (
                WebError::from(AppError::UsernameTaken("ghost".to_string())),
                StatusCode::BAD_REQUEST,
            ),
            (
                WebError::from(AppError::SessionPlayerMissing(9)),
                StatusCode::BAD_REQUEST,
            ),
            (
                WebError::from(AppError::PlayerNotFound(9)),
                StatusCode::NOT_FOUND,
            ),
            (
                WebError::from(AppError::GameSessionNotFound(9)),
                StatusCode::NOT_FOUND,
            ),
            (
                WebError::from(DbError::Transaction("boom".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                WebError::NotFound("nope".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                WebError::BadRequest("bad".to_string()),
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
