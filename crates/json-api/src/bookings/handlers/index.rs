//! Bookings Index Handler

use std::{str::FromStr, sync::Arc};

use salvo::{oapi::extract::QueryParam, prelude::*};

use noleggio_app::domain::bookings::records::BookingStatus;

use crate::{
    bookings::errors::into_status_error, bookings::get::BookingResponse, extensions::*,
    state::State,
};

/// Bookings Index Handler
///
/// Lists bookings. Without a `status` filter, in-progress carts are
/// left out.
#[endpoint(
    tags("bookings"),
    summary = "List Bookings",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<Vec<BookingResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let point_in_time = at.into_point_in_time()?;

    let status = status
        .into_inner()
        .map(|value| BookingStatus::from_str(&value))
        .transpose()
        .or_400("could not parse \"status\" query parameter")?;

    let bookings = state
        .app
        .bookings
        .list_bookings(tenant, status, point_in_time)
        .await
        .map_err(into_status_error)?;

    Ok(Json(bookings.into_iter().map(Into::into).collect()))
}
