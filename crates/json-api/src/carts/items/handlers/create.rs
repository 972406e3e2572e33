//! Create Cart Item Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use noleggio_app::domain::carts::data::NewCartItem;

use crate::{
    carts::errors::into_status_error, carts::get::CartItemResponse, extensions::*, state::State,
};

/// Create Cart Item Request
///
/// Adds `quantity` units of demand for a variant over `[starts_at,
/// ends_at)`. The server quotes the price and checks the pool; item
/// UUIDs are minted server-side because one request can expand into
/// several rows.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateCartItemRequest {
    pub variant_uuid: Uuid,
    pub starts_at: String,
    pub ends_at: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Cart Items Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemsCreatedResponse {
    /// The created items, one per unit of demand
    pub items: Vec<CartItemResponse>,
}

/// Create Cart Item Handler
#[endpoint(
    tags("carts"),
    summary = "Add Cart Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Items added"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart or variant not found"),
        (status_code = StatusCode::CONFLICT, description = "Not enough free units or no price list"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    json: JsonBody<CreateCartItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartItemsCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let request = json.into_inner();

    let starts_at = request
        .starts_at
        .parse::<Timestamp>()
        .or_400("could not parse \"starts_at\"")?;

    let ends_at = request
        .ends_at
        .parse::<Timestamp>()
        .or_400("could not parse \"ends_at\"")?;

    if request.quantity == 0 {
        return Err(StatusError::bad_request().brief("quantity must be at least 1"));
    }

    let items = state
        .app
        .carts
        .add_item(
            tenant,
            cart.into_inner().into(),
            NewCartItem {
                variant_uuid: request.variant_uuid.into(),
                starts_at,
                ends_at,
                quantity: request.quantity,
            },
        )
        .await
        .map_err(into_status_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(CartItemsCreatedResponse {
        items: items.into_iter().map(Into::into).collect(),
    }))
}
