//! Price Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use noleggio_app::domain::pricing::records::PriceRecord;

use crate::{
    extensions::*, state::State, variants::errors::pricing_into_status_error,
};

/// Price Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PriceResponse {
    /// The unique identifier of the price row
    pub uuid: Uuid,

    /// The variant the price belongs to
    pub variant_uuid: Uuid,

    /// The price period (hourly, daily, weekly, monthly)
    pub period: String,

    /// The per-period amount in cents
    pub amount: u64,

    /// The date and time the price was created
    pub created_at: String,

    /// The date and time the price was last updated
    pub updated_at: String,
}

impl From<PriceRecord> for PriceResponse {
    fn from(price: PriceRecord) -> Self {
        Self {
            uuid: price.uuid.into(),
            variant_uuid: price.variant_uuid.into(),
            period: price.period.as_str().to_string(),
            amount: price.amount,
            created_at: price.created_at.to_string(),
            updated_at: price.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PricesResponse {
    /// The price rows of the variant
    pub prices: Vec<PriceResponse>,
}

/// Price Index Handler
///
/// Returns the price list of a variant.
#[endpoint(
    tags("prices"),
    summary = "List Prices",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    variant: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<PricesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let prices = state
        .app
        .pricing
        .list_prices(tenant, variant.into_inner().into())
        .await
        .map_err(pricing_into_status_error)?;

    Ok(Json(PricesResponse {
        prices: prices.into_iter().map(Into::into).collect(),
    }))
}
