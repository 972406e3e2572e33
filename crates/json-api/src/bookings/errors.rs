//! Booking Errors

use salvo::http::StatusError;
use tracing::error;

use noleggio_app::domain::bookings::BookingsServiceError;

pub(crate) fn into_status_error(error: BookingsServiceError) -> StatusError {
    match error {
        BookingsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Booking already exists")
        }
        BookingsServiceError::NotACart => {
            StatusError::conflict().brief("The booking is no longer a cart")
        }
        BookingsServiceError::EmptyCart => {
            StatusError::conflict().brief("The cart has no items to check out")
        }
        BookingsServiceError::Unavailable { variant, missing } => StatusError::conflict().brief(
            format!("Variant {variant} is short {missing} units for the requested interval"),
        ),
        BookingsServiceError::NotCancellable => {
            StatusError::conflict().brief("Only cart or confirmed bookings can be cancelled")
        }
        BookingsServiceError::PickupStarted => StatusError::conflict()
            .brief("The booking can no longer be cancelled, a unit has been picked up"),
        BookingsServiceError::InvalidFulfillmentState => StatusError::conflict()
            .brief("The detail is not in a state that allows this transition"),
        BookingsServiceError::UnitConflict => StatusError::conflict()
            .brief("The unit is already booked over an overlapping interval"),
        BookingsServiceError::MissingPrice => {
            StatusError::conflict().brief("No price row covers the requested rental")
        }
        BookingsServiceError::InvalidRange => {
            StatusError::bad_request().brief("The rental interval must end after it starts")
        }
        BookingsServiceError::TooLong => {
            StatusError::bad_request().brief("The rental interval exceeds the maximum length")
        }
        BookingsServiceError::InvalidReference
        | BookingsServiceError::MissingRequiredData
        | BookingsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid booking payload")
        }
        BookingsServiceError::NotFound => StatusError::not_found(),
        BookingsServiceError::Sql(source) => {
            error!("bookings storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
