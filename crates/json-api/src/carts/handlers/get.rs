//! Get Cart Handler

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

use noleggio_app::domain::carts::records::{CartItemRecord, CartRecord};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub uuid: Uuid,

    /// The sum of the item prices, in cents
    pub total: u64,

    /// The items in the cart
    pub items: Vec<CartItemResponse>,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart was last updated
    pub updated_at: String,

    /// The date and time the cart was deleted
    pub deleted_at: Option<String>,
}

impl From<CartRecord> for CartResponse {
    fn from(cart: CartRecord) -> Self {
        CartResponse {
            uuid: cart.uuid.into(),
            total: cart.total,
            items: cart.items.into_iter().map(CartItemResponse::from).collect(),
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
            deleted_at: cart.deleted_at.as_ref().map(ToString::to_string),
        }
    }
}

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart item
    pub uuid: Uuid,

    /// The variant the item rents
    pub variant_uuid: Uuid,

    /// The start of the rental interval
    pub starts_at: String,

    /// The end of the rental interval (exclusive)
    pub ends_at: String,

    /// The price quoted when the item was added, in cents
    pub price: u64,
}

impl From<CartItemRecord> for CartItemResponse {
    fn from(item: CartItemRecord) -> Self {
        Self {
            uuid: item.uuid.into(),
            variant_uuid: item.variant_uuid.into(),
            starts_at: item.starts_at.to_string(),
            ends_at: item.ends_at.to_string(),
            price: item.price,
        }
    }
}

/// Get Cart Handler
///
/// Returns a cart with its items and total.
#[endpoint(
    tags("carts"),
    summary = "Get Cart",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    cart: PathParam<Uuid>,
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let point_in_time = at.into_point_in_time()?;

    let cart = state
        .app
        .carts
        .get_cart(tenant, cart.into_inner().into(), point_in_time)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}
