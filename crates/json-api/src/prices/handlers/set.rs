//! Set Price Handler

use std::{str::FromStr, sync::Arc};

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use noleggio_app::domain::pricing::records::PricePeriod;

use crate::{
    extensions::*, prices::index::PriceResponse, state::State,
    variants::errors::pricing_into_status_error,
};

/// Set Price Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SetPriceRequest {
    /// The per-period amount in cents
    pub amount: u64,
}

/// Set Price Handler
///
/// Upserts the price row for (variant, period).
#[endpoint(
    tags("prices"),
    summary = "Set Price",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Price set"),
        (status_code = StatusCode::NOT_FOUND, description = "Variant not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    variant: PathParam<Uuid>,
    period: PathParam<String>,
    json: JsonBody<SetPriceRequest>,
    depot: &mut Depot,
) -> Result<Json<PriceResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let period =
        PricePeriod::from_str(&period.into_inner()).or_400("unrecognised price period")?;

    let price = state
        .app
        .pricing
        .set_price(
            tenant,
            variant.into_inner().into(),
            period,
            json.into_inner().amount,
        )
        .await
        .map_err(pricing_into_status_error)?;

    Ok(Json(price.into()))
}
