pub type DeskResult<T> = Result<T, DeskError>;

#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("Connection error: {0}")]
    Connection(String),
}

impl From<diesel::r2d2::PoolError> for DeskError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        Self::Connection(err.to_string())
    }
}
