//! Get Booking Handler

use std::{string::ToString, sync::Arc};

use salvo::{
    oapi::{
        ToSchema,
        extract::{PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use noleggio_app::domain::bookings::records::{BookingDetailRecord, BookingRecord};

use crate::{bookings::errors::into_status_error, extensions::*, state::State};

/// Booking Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookingResponse {
    /// The unique identifier of the booking
    pub uuid: Uuid,

    /// One of `cart`, `confirmed`, `cancelled` or `completed`
    pub status: String,

    /// The customer's name, captured at checkout
    pub customer_name: Option<String>,

    /// The customer's email, captured at checkout
    pub customer_email: Option<String>,

    /// The sum of the detail prices, in cents
    pub total: u64,

    /// The booking details, one per rented unit
    pub details: Vec<BookingDetailResponse>,

    /// The date and time the booking was created
    pub created_at: String,

    /// The date and time the booking was last updated
    pub updated_at: String,

    /// The date and time the booking was deleted
    pub deleted_at: Option<String>,
}

impl From<BookingRecord> for BookingResponse {
    fn from(booking: BookingRecord) -> Self {
        BookingResponse {
            uuid: booking.uuid.into(),
            status: booking.status.as_str().to_string(),
            customer_name: booking.customer_name,
            customer_email: booking.customer_email,
            total: booking.total,
            details: booking
                .details
                .into_iter()
                .map(BookingDetailResponse::from)
                .collect(),
            created_at: booking.created_at.to_string(),
            updated_at: booking.updated_at.to_string(),
            deleted_at: booking.deleted_at.as_ref().map(ToString::to_string),
        }
    }
}

/// Booking Detail Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookingDetailResponse {
    /// The unique identifier of the detail
    pub uuid: Uuid,

    /// The booking the detail belongs to
    pub booking_uuid: Uuid,

    /// The variant the detail rents
    pub variant_uuid: Uuid,

    /// The concrete unit reserved at checkout, if any
    pub unit_uuid: Option<Uuid>,

    /// The start of the rental interval
    pub starts_at: String,

    /// The end of the rental interval (exclusive)
    pub ends_at: String,

    /// The price of the detail, in cents
    pub price: u64,

    /// One of `to_pickup`, `picked_up` or `returned`
    pub fulfillment: String,
}

impl From<BookingDetailRecord> for BookingDetailResponse {
    fn from(detail: BookingDetailRecord) -> Self {
        Self {
            uuid: detail.uuid.into(),
            booking_uuid: detail.booking_uuid.into(),
            variant_uuid: detail.variant_uuid.into(),
            unit_uuid: detail.unit_uuid.map(Into::into),
            starts_at: detail.starts_at.to_string(),
            ends_at: detail.ends_at.to_string(),
            price: detail.price,
            fulfillment: detail.fulfillment.as_str().to_string(),
        }
    }
}

/// Get Booking Handler
///
/// Returns a booking with its details.
#[endpoint(
    tags("bookings"),
    summary = "Get Booking",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    booking: PathParam<Uuid>,
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<BookingResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let point_in_time = at.into_point_in_time()?;

    let booking = state
        .app
        .bookings
        .get_booking(tenant, booking.into_inner().into(), point_in_time)
        .await
        .map_err(into_status_error)?;

    Ok(Json(booking.into()))
}
