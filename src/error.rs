use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upstream data access failed: {0}")]
    Upstream(#[source] anyhow::Error),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        // Surface database failures under their own variant when the
        // repository layer wrapped one in anyhow.
        if error.is::<sqlx::Error>() {
            match error.downcast::<sqlx::Error>() {
                Ok(db_error) => return AppError::Database(db_error),
                Err(original) => return AppError::Upstream(original),
            }
        }
        AppError::Upstream(error)
    }
}
