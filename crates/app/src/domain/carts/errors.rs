//! Carts Service Errors

use thiserror::Error;

use crate::domain::pricing::PricingServiceError;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("Cart already exists")]
    AlreadyExists,

    #[error("Invalid reference")]
    InvalidReference,

    #[error("Missing required data")]
    MissingRequiredData,

    #[error("Invalid data")]
    InvalidData,

    #[error("Record not found")]
    NotFound,

    #[error("The booking is no longer a cart")]
    NotACart,

    #[error("Only {free} of the requested {requested} units are available")]
    Unavailable { requested: u32, free: u64 },

    #[error("No price row covers the requested rental")]
    MissingPrice,

    #[error("The rental interval must end after it starts")]
    InvalidRange,

    #[error("The rental interval exceeds the maximum rental length")]
    TooLong,

    #[error(transparent)]
    Sql(sqlx::Error),
}

impl From<sqlx::Error> for CartsServiceError {
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

impl From<PricingServiceError> for CartsServiceError {
    fn from(err: PricingServiceError) -> Self {
        match err {
            PricingServiceError::AlreadyExists => Self::AlreadyExists,
            PricingServiceError::InvalidReference => Self::InvalidReference,
            PricingServiceError::MissingRequiredData => Self::MissingRequiredData,
            PricingServiceError::InvalidData => Self::InvalidData,
            PricingServiceError::NotFound => Self::NotFound,
            PricingServiceError::MissingPrice => Self::MissingPrice,
            PricingServiceError::InvalidRange => Self::InvalidRange,
            PricingServiceError::TooLong => Self::TooLong,
            PricingServiceError::Sql(e) => Self::Sql(e),
        }
    }
}
