//! Availability Service Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AvailabilityServiceError {
    #[error("Record not found")]
    NotFound,

    #[error("The interval must end after it starts")]
    InvalidRange,

    #[error("The calendar window exceeds the maximum length")]
    WindowTooLong,

    #[error(transparent)]
    Sql(sqlx::Error),
}

impl From<sqlx::Error> for AvailabilityServiceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            _ => Self::Sql(err),
        }
    }
}
