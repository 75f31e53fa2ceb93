use domain::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("conflicting write")]
    Conflict,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("malformed row: {0}")]
    Malformed(String),
    #[error("storage failure: {0}")]
    Storage(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        use sqlx::error::ErrorKind;

        let kind = match &err {
            sqlx::Error::Database(db_err) => db_err.kind(),
            _ => return StoreError::Storage(err),
        };
        match kind {
            ErrorKind::UniqueViolation => StoreError::Conflict,
            ErrorKind::ForeignKeyViolation => StoreError::NotFound("referenced row"),
            ErrorKind::NotNullViolation | ErrorKind::CheckViolation => {
                StoreError::Malformed(err.to_string())
            }
            _ => StoreError::Storage(err),
        }
    }
}
