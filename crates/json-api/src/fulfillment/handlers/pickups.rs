//! Due Pickups Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use noleggio_app::domain::bookings::records::AgendaItemRecord;

use crate::{bookings::errors::into_status_error, extensions::*, state::State};

/// Agenda Item Response
///
/// One fulfillment work item, denormalised for display.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AgendaItemResponse {
    /// The booking detail to act on
    pub detail_uuid: Uuid,

    /// The booking the detail belongs to
    pub booking_uuid: Uuid,

    /// The product name
    pub product_name: String,

    /// The variant name
    pub variant_name: String,

    /// The code of the reserved unit
    pub unit_code: String,

    /// The customer's name
    pub customer_name: Option<String>,

    /// The start of the rental interval
    pub starts_at: String,

    /// The end of the rental interval (exclusive)
    pub ends_at: String,

    /// One of `to_pickup`, `picked_up` or `returned`
    pub fulfillment: String,
}

impl From<AgendaItemRecord> for AgendaItemResponse {
    fn from(item: AgendaItemRecord) -> Self {
        Self {
            detail_uuid: item.detail_uuid.into(),
            booking_uuid: item.booking_uuid.into(),
            product_name: item.product_name,
            variant_name: item.variant_name,
            unit_code: item.unit_code,
            customer_name: item.customer_name,
            starts_at: item.starts_at.to_string(),
            ends_at: item.ends_at.to_string(),
            fulfillment: item.fulfillment.as_str().to_string(),
        }
    }
}

/// Due Pickups Handler
///
/// Confirmed details to hand over on the given UTC date, today by
/// default.
#[endpoint(
    tags("fulfillment"),
    summary = "List Due Pickups",
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
        .due_pickups(tenant, date)
        .await
        .map_err(into_status_error)?;

    Ok(Json(items.into_iter().map(Into::into).collect()))
}
