//! Checkout Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use noleggio_app::domain::bookings::data::CheckoutCustomer;

use crate::{
    bookings::errors::into_status_error, bookings::get::BookingResponse, extensions::*,
    state::State,
};

/// Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutRequest {
    /// The customer's name
    pub customer_name: String,

    /// The customer's email
    pub customer_email: String,
}

/// Checkout Handler
///
/// Confirms a cart, reserving one concrete unit per item. The booking
/// keeps the cart's UUID.
#[endpoint(
    tags("bookings"),
    summary = "Checkout Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Booking confirmed"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart not found"),
        (status_code = StatusCode::CONFLICT, description = "Empty cart, checked-out cart, missing price or not enough free units"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    json: JsonBody<CheckoutRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<BookingResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let request = json.into_inner();

    if request.customer_name.trim().is_empty() {
        return Err(StatusError::bad_request().brief("customer_name must not be empty"));
    }

    if request.customer_email.trim().is_empty() {
        return Err(StatusError::bad_request().brief("customer_email must not be empty"));
    }

    let booking = state
        .app
        .bookings
        .checkout(
            tenant,
            cart.into_inner().into(),
            CheckoutCustomer {
                name: request.customer_name,
                email: request.customer_email,
            },
        )
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/bookings/{}", booking.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(booking.into()))
}
