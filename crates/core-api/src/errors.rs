use axum::{http::StatusCode, response::IntoResponse};
use jodidar_database::DatabaseError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not found")]
    NotFound,
    #[error("internal server error")]
    InternalServerError,
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Conflict(String),
    #[error("forbidden")]
    Forbidden,
    #[error("missing or invalid caller identity")]
    Unauthorized,
    #[error("{0}")]
    BadGateway(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::BadGateway(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), self.to_string()).into_response()
    }
}

impl From<ApiError> for axum::response::Response {
    fn from(value: ApiError) -> Self {
        value.into_response()
    }
}

impl From<DatabaseError> for ApiError {
    fn from(value: DatabaseError) -> Self {
        match value {
            DatabaseError::NotFound => Self::NotFound,
            DatabaseError::Validation(reason) => Self::BadRequest(reason),
            DatabaseError::Capacity(reason) => Self::Conflict(reason),
            DatabaseError::Forbidden => Self::Forbidden,
            DatabaseError::Dependency(reason) => {
                tracing::error!(%reason, "storage dependency failed");
                Self::BadGateway("image storage unavailable".into())
            }
            other => {
                tracing::error!(error = %other, "database error");
                Self::InternalServerError
            }
        }
    }
}
