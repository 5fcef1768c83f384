// region:    --- Imports
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

// endregion: --- Imports

// region:    --- App Error
/// Failure taxonomy shared by every command and query.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("{0}")]
    Validation(String),

    /// Lost an optimistic concurrency race too many times, or the row changed underneath us.
    #[error("{0}")]
    Conflict(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("message broker error: {0}")]
    Broker(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::InvalidState(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Broker(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand back to a client.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Database(_) => "Erro interno ao acessar o banco de dados.".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{:<12} --> {}", "Error", self);
        }
        (
            status,
            Json(serde_json::json!({
                "success": false,
                "error": self.public_message(),
            })),
        )
            .into_response()
    }
}

// endregion: --- App Error
