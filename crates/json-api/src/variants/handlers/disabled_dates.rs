//! Disabled Dates Handler
//!
//! The calendar-disabling query behind the booking date picker: which
//! days of a window cannot supply the requested quantity.

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    extensions::*, state::State, variants::errors::availability_into_status_error,
};

/// Disabled Dates Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct DisabledDatesResponse {
    /// The `YYYY-MM-DD` dates with fewer free units than requested
    pub dates: Vec<String>,
}

/// Disabled Dates Handler
///
/// Returns the dates within `[start, end]` on which fewer than
/// `quantity` units are free for the whole day.
#[endpoint(
    tags("variants"),
    summary = "Disabled Dates",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Dates computed"),
        (status_code = StatusCode::NOT_FOUND, description = "Variant not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    variant: PathParam<Uuid>,
    start: QueryParam<String, true>,
    end: QueryParam<String, true>,
    quantity: QueryParam<u64, false>,
    depot: &mut Depot,
) -> Result<Json<DisabledDatesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let start = start.into_civil_date("start")?;
    let end = end.into_civil_date("end")?;
    let quantity = quantity.into_inner().unwrap_or(1);

    if quantity == 0 {
        return Err(StatusError::bad_request().brief("quantity must be at least 1"));
    }

    let dates = state
        .app
        .availability
        .disabled_dates(tenant, variant.into_inner().into(), start, end, quantity)
        .await
        .map_err(availability_into_status_error)?;

    Ok(Json(DisabledDatesResponse {
        dates: dates.iter().map(ToString::to_string).collect(),
    }))
}
