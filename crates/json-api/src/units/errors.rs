//! Unit Errors

use salvo::http::StatusError;
use tracing::error;

use noleggio_app::domain::units::UnitsServiceError;

pub(crate) fn into_status_error(error: UnitsServiceError) -> StatusError {
    match error {
        UnitsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Unit code already in use")
        }
        UnitsServiceError::InvalidReference
        | UnitsServiceError::MissingRequiredData
        | UnitsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid unit payload")
        }
        UnitsServiceError::NotFound => StatusError::not_found(),
        UnitsServiceError::Sql(source) => {
            error!("units storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
