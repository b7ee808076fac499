use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("database error")]
    DatabaseError(sea_orm::DbErr),
    #[error("not found")]
    NotFound,
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("limit reached: {0}")]
    Capacity(String),
    #[error("record does not belong to the caller")]
    Forbidden,
    #[error("storage dependency failed: {0}")]
    Dependency(String),
    #[error("could not connect to database")]
    ConnectionError,
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;

impl DatabaseError {
    pub fn validation(reason: impl Into<String>) -> Self {
        Self::Validation(reason.into())
    }

    pub fn capacity(reason: impl Into<String>) -> Self {
        Self::Capacity(reason.into())
    }
}

impl From<sea_orm::DbErr> for DatabaseError {
    fn from(value: sea_orm::DbErr) -> Self {
        Self::DatabaseError(value)
    }
}
