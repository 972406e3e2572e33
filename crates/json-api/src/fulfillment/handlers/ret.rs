//! Mark Returned Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{
    bookings::errors::into_status_error, bookings::get::BookingDetailResponse, extensions::*,
    state::State,
};

/// Mark Returned Handler
///
/// Takes a unit back. Returning the last open detail completes the
/// booking.
#[endpoint(
    tags("fulfillment"),
    summary = "Mark Detail Returned",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Detail marked returned"),
        (status_code = StatusCode::NOT_FOUND, description = "Detail not found"),
        (status_code = StatusCode::CONFLICT, description = "The detail is not out with a customer"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    detail: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<BookingDetailResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let detail = state
        .app
        .bookings
        .mark_returned(tenant, detail.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(detail.into()))
}
