//! Pricing Service Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PricingServiceError {
    #[error("Price already exists")]
    AlreadyExists,

    #[error("Invalid reference")]
    InvalidReference,

    #[error("Missing required data")]
    MissingRequiredData,

    #[error("Invalid data")]
    InvalidData,

    #[error("Record not found")]
    NotFound,

    #[error("No price row covers the requested rental")]
    MissingPrice,

    #[error("The rental interval must end after it starts")]
    InvalidRange,

    #[error("The rental interval exceeds the maximum rental length")]
    TooLong,

    #[error(transparent)]
    Sql(sqlx::Error),
}

impl From<sqlx::Error> for PricingServiceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db_err) => match db_err.kind() {
                sqlx::error::ErrorKind::UniqueViolation => Self::AlreadyExists,
                sqlx::error::ErrorKind::ForeignKeyViolation => Self::InvalidReference,
                sqlx::error::ErrorKind::NotNullViolation => Self::MissingRequiredData,
                sqlx::error::ErrorKind::CheckViolation => Self::InvalidData,
                _ => Self::Sql(sqlx::Error::Database(db_err)),
            },
            _ => Self::Sql(err),
        }
    }
}
