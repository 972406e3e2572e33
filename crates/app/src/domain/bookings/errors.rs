//! Bookings Service Errors

use thiserror::Error;

use crate::domain::{catalog::records::VariantUuid, pricing::PricingServiceError};

#[derive(Debug, Error)]
pub enum BookingsServiceError {
    #[error("Booking already exists")]
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

    #[error("The cart has no items to check out")]
    EmptyCart,

    #[error("Variant {variant} is short {missing} units for the requested interval")]
    Unavailable { variant: VariantUuid, missing: u64 },

    #[error("Only cart or confirmed bookings can be cancelled")]
    NotCancellable,

    #[error("The booking can no longer be cancelled, a unit has been picked up")]
    PickupStarted,

    #[error("The detail is not in a state that allows this transition")]
    InvalidFulfillmentState,

    #[error("The unit is already booked over an overlapping interval")]
    UnitConflict,

    #[error("No price row covers the requested rental")]
    MissingPrice,

    #[error("The rental interval must end after it starts")]
    InvalidRange,

    #[error("The rental interval exceeds the maximum rental length")]
    TooLong,

    #[error(transparent)]
    Sql(sqlx::Error),
}

impl From<sqlx::Error> for BookingsServiceError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(db_err) => {
                // 23P01: the no-overlap exclusion constraint on assigned
                // units fired. The checkout locking protocol should make
                // this unreachable.
                if db_err.code().as_deref() == Some("23P01") {
                    return Self::UnitConflict;
                }

                match db_err.kind() {
                    sqlx::error::ErrorKind::UniqueViolation => Self::AlreadyExists,
                    sqlx::error::ErrorKind::ForeignKeyViolation => Self::InvalidReference,
                    sqlx::error::ErrorKind::NotNullViolation => Self::MissingRequiredData,
                    sqlx::error::ErrorKind::CheckViolation => Self::InvalidData,
                    _ => Self::Sql(sqlx::Error::Database(db_err)),
                }
            }
            _ => Self::Sql(err),
        }
    }
}

impl From<PricingServiceError> for BookingsServiceError {
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
