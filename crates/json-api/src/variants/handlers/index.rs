//! Variant Index Handler

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
    extensions::*, products::errors::into_status_error, state::State,
    variants::get::VariantResponse,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VariantsResponse {
    /// The list of variants
    pub variants: Vec<VariantResponse>,
}

/// Variant Index Handler
///
/// Returns the variants of a product.
#[endpoint(
    tags("variants"),
    summary = "List Variants",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<VariantsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let point_in_time = at.into_point_in_time()?;

    let variants = state
        .app
        .catalog
        .list_variants(tenant, product.into_inner().into(), point_in_time)
        .await
        .map_err(into_status_error)?;

    Ok(Json(VariantsResponse {
        variants: variants.into_iter().map(Into::into).collect(),
    }))
}
