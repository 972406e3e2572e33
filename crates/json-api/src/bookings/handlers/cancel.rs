//! Cancel Booking Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    bookings::errors::into_status_error, bookings::get::BookingResponse, extensions::*,
    state::State,
};

/// Cancel Booking Handler
///
/// Cancels a cart or confirmed booking. Refused once any unit has been
/// picked up.
#[endpoint(
    tags("bookings"),
    summary = "Cancel Booking",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Booking cancelled"),
        (status_code = StatusCode::NOT_FOUND, description = "Booking not found"),
        (status_code = StatusCode::CONFLICT, description = "The booking can no longer be cancelled"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    booking: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<BookingResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let booking = state
        .app
        .bookings
        .cancel_booking(tenant, booking.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(booking.into()))
}
