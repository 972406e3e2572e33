//! Delete Price Handler

use std::{str::FromStr, sync::Arc};

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use noleggio_app::domain::pricing::records::PricePeriod;

use crate::{extensions::*, state::State, variants::errors::pricing_into_status_error};

/// Delete Price Handler
///
/// Removes the price row for (variant, period).
#[endpoint(
    tags("prices"),
    summary = "Delete Price",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Price deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Price not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    variant: PathParam<Uuid>,
    period: PathParam<String>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let period =
        PricePeriod::from_str(&period.into_inner()).or_400("unrecognised price period")?;

    state
        .app
        .pricing
        .delete_price(tenant, variant.into_inner().into(), period)
        .await
        .map_err(pricing_into_status_error)?;

    Ok(StatusCode::OK)
}
