//! Cart Errors

use salvo::http::StatusError;
use tracing::error;

use noleggio_app::domain::carts::CartsServiceError;

pub(crate) fn into_status_error(error: CartsServiceError) -> StatusError {
    match error {
        CartsServiceError::AlreadyExists => StatusError::conflict().brief("Cart already exists"),
        CartsServiceError::NotACart => {
            StatusError::conflict().brief("The booking is no longer a cart")
        }
        CartsServiceError::Unavailable { requested, free } => StatusError::conflict().brief(
            format!("Only {free} of the requested {requested} units are available"),
        ),
        CartsServiceError::MissingPrice => {
            StatusError::conflict().brief("No price row covers the requested rental")
        }
        CartsServiceError::InvalidRange => {
            StatusError::bad_request().brief("The rental interval must end after it starts")
        }
        CartsServiceError::TooLong => {
            StatusError::bad_request().brief("The rental interval exceeds the maximum length")
        }
        CartsServiceError::InvalidReference
        | CartsServiceError::MissingRequiredData
        | CartsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid cart payload")
        }
        CartsServiceError::NotFound => StatusError::not_found(),
        CartsServiceError::Sql(source) => {
            error!("carts storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
