//! Update Variant Handler

use std::{collections::HashMap, sync::Arc};

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use noleggio_app::domain::catalog::data::VariantUpdate;

use crate::{
    extensions::*, products::errors::into_status_error, state::State,
    variants::get::VariantResponse,
};

/// Update Variant Request
///
/// Full replacement of the mutable variant fields.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateVariantRequest {
    pub name: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl From<UpdateVariantRequest> for VariantUpdate {
    fn from(request: UpdateVariantRequest) -> Self {
        VariantUpdate {
            name: request.name,
            attributes: request.attributes.into_iter().collect(),
        }
    }
}

/// Variant Update Handler
#[endpoint(
    tags("variants"),
    summary = "Update Variant",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Variant updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Variant not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    variant: PathParam<Uuid>,
    json: JsonBody<UpdateVariantRequest>,
    depot: &mut Depot,
) -> Result<Json<VariantResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let updated = state
        .app
        .catalog
        .update_variant(tenant, variant.into_inner().into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}
