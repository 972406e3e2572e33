//! Due Returns Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    bookings::errors::into_status_error, extensions::*,
    fulfillment::pickups::AgendaItemResponse, state::State,
};

/// Due Returns Handler
///
/// Details out with customers and due back on or before the given UTC
/// date, today by default. Overdue returns stay listed until they come
/// back.
#[endpoint(
    tags("fulfillment"),
    summary = "List Due Returns",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    date: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<Vec<AgendaItemResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let date = date.into_civil_date("date")?;

    let items = state
        .app
        .bookings
        .due_returns(tenant, date)
        .await
        .map_err(into_status_error)?;

    Ok(Json(items.into_iter().map(Into::into).collect()))
}
