//! Variant Quote Handler
//!
//! The single server-side quote path: price breakdown and free-unit
//! arithmetic for a rental interval, in one response.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{
        ToSchema,
        extract::{PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use noleggio_app::domain::{
    availability::records::Availability,
    pricing::quote::{RateLine, RateQuote},
};

use crate::{
    extensions::*,
    state::State,
    variants::errors::{availability_into_status_error, pricing_into_status_error},
};

/// One line of the quote breakdown
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RateLineResponse {
    /// The charged price period (hourly, daily, weekly, monthly)
    pub period: String,

    /// How many of the period are charged
    pub count: u32,

    /// The per-period amount in cents
    pub unit_amount: u64,

    /// The line amount in cents
    pub amount: u64,
}

impl From<RateLine> for RateLineResponse {
    fn from(line: RateLine) -> Self {
        Self {
            period: line.period.as_str().to_string(),
            count: line.count,
            unit_amount: line.unit_amount,
            amount: line.amount,
        }
    }
}

/// Free-unit arithmetic for the requested interval
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AvailabilityResponse {
    /// Rentable units of the variant
    pub pool: u64,

    /// Units held by an overlapping active booking
    pub booked: u64,

    /// Units free for the whole interval
    pub free: u64,
}

impl From<Availability> for AvailabilityResponse {
    fn from(availability: Availability) -> Self {
        Self {
            pool: availability.pool,
            booked: availability.booked,
            free: availability.free,
        }
    }
}

/// Quote Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct QuoteResponse {
    /// The per-unit price breakdown
    pub lines: Vec<RateLineResponse>,

    /// The per-unit total in cents
    pub total: u64,

    /// The requested quantity
    pub quantity: u64,

    /// `total * quantity`, in cents
    pub total_for_quantity: u64,

    /// Free-unit arithmetic for the interval
    pub availability: AvailabilityResponse,

    /// Whether `quantity` units are free for the whole interval
    pub available: bool,
}

impl QuoteResponse {
    fn build(quote: RateQuote, availability: Availability, quantity: u64) -> Self {
        Self {
            total: quote.total,
            quantity,
            total_for_quantity: quote.total.saturating_mul(quantity),
            available: availability.free >= quantity,
            availability: availability.into(),
            lines: quote.lines.into_iter().map(Into::into).collect(),
        }
    }
}

/// Variant Quote Handler
///
/// Prices the half-open interval `[from, until)` and reports how many
/// units are free for it.
#[endpoint(
    tags("variants"),
    summary = "Quote Rental",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Quote computed"),
        (status_code = StatusCode::NOT_FOUND, description = "Variant not found"),
        (status_code = StatusCode::CONFLICT, description = "No price list covers the rental"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    variant: PathParam<Uuid>,
    from: QueryParam<String, true>,
    until: QueryParam<String, true>,
    quantity: QueryParam<u64, false>,
    depot: &mut Depot,
) -> Result<Json<QuoteResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let variant = variant.into_inner().into();

    let from = from
        .into_inner()
        .parse::<Timestamp>()
        .or_400("could not parse \"from\" query parameter")?;

    let until = until
        .into_inner()
        .parse::<Timestamp>()
        .or_400("could not parse \"until\" query parameter")?;

    let quantity = quantity.into_inner().unwrap_or(1);

    if quantity == 0 {
        return Err(StatusError::bad_request().brief("quantity must be at least 1"));
    }

    let quote = state
        .app
        .pricing
        .quote(tenant, variant, from, until)
        .await
        .map_err(pricing_into_status_error)?;

    let availability = state
        .app
        .availability
        .check_availability(tenant, variant, from, until)
        .await
        .map_err(availability_into_status_error)?;

    Ok(Json(QuoteResponse::build(quote, availability, quantity)))
}
