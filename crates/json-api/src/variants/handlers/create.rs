//! Create Variant Handler

use std::{collections::HashMap, sync::Arc};

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

use noleggio_app::domain::catalog::data::NewVariant;

use crate::{extensions::*, products::errors::into_status_error, state::State};

/// Create Variant Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateVariantRequest {
    pub uuid: Uuid,
    pub name: String,
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl From<CreateVariantRequest> for NewVariant {
    fn from(request: CreateVariantRequest) -> Self {
        NewVariant {
            uuid: request.uuid.into(),
            name: request.name,
            attributes: request.attributes.into_iter().collect(),
        }
    }
}

/// Variant Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VariantCreatedResponse {
    /// Created variant UUID
    pub uuid: Uuid,
}

/// Create Variant Handler
#[endpoint(
    tags("variants"),
    summary = "Create Variant",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Variant created"),
        (status_code = StatusCode::CONFLICT, description = "Variant already exists"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<CreateVariantRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<VariantCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let uuid = state
        .app
        .catalog
        .create_variant(
            tenant,
            product.into_inner().into(),
            json.into_inner().into(),
        )
        .await
        .map_err(into_status_error)?
        .uuid;

    res.add_header(LOCATION, format!("/variants/{uuid}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(VariantCreatedResponse { uuid: uuid.into() }))
}
