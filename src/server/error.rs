use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

pub type AppResult<T> = Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    BadRequest(String),

    #[error("authentication is required to access this resource")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("unexpected error has occurred")]
    InternalServerError,

    #[error("{0}")]
    InternalServerErrorWithContext(String),

    #[error(transparent)]
    AnyhowError(#[from] anyhow::Error),

    #[error(transparent)]
    SqlxError(#[from] sqlx::Error),
}

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InternalServerError
            | Self::InternalServerErrorWithContext(_)
            | Self::AnyhowError(_)
            | Self::SqlxError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // store errors can carry queries and paths, log them but hand the client something bland
        let message = match &self {
            Self::AnyhowError(e) => {
                error!("unhandled error: {:?}", e);
                Self::InternalServerError.to_string()
            }
            Self::SqlxError(e) => {
                error!("database error: {}", e);
                Self::InternalServerError.to_string()
            }
            Self::InternalServerErrorWithContext(context) => {
                error!("internal error: {}", context);
                self.to_string()
            }
            _ => self.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
