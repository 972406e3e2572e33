//! Variant Errors

use salvo::http::StatusError;
use tracing::error;

use noleggio_app::domain::{
    availability::AvailabilityServiceError, pricing::PricingServiceError,
};

pub(crate) fn pricing_into_status_error(error: PricingServiceError) -> StatusError {
    match error {
        PricingServiceError::AlreadyExists => {
            StatusError::conflict().brief("Price already exists")
        }
        PricingServiceError::MissingPrice => {
            StatusError::conflict().brief("No price row covers the requested rental")
        }
        PricingServiceError::InvalidRange => {
            StatusError::bad_request().brief("The rental interval must end after it starts")
        }
        PricingServiceError::TooLong => {
            StatusError::bad_request().brief("The rental interval exceeds the maximum length")
        }
        PricingServiceError::InvalidReference
        | PricingServiceError::MissingRequiredData
        | PricingServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid pricing payload")
        }
        PricingServiceError::NotFound => StatusError::not_found(),
        PricingServiceError::Sql(source) => {
            error!("pricing storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

pub(crate) fn availability_into_status_error(error: AvailabilityServiceError) -> StatusError {
    match error {
        AvailabilityServiceError::NotFound => StatusError::not_found(),
        AvailabilityServiceError::InvalidRange => {
            StatusError::bad_request().brief("The interval must end after it starts")
        }
        AvailabilityServiceError::WindowTooLong => {
            StatusError::bad_request().brief("The calendar window exceeds the maximum length")
        }
        AvailabilityServiceError::Sql(source) => {
            error!("availability storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
