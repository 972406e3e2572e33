//! Get Variant Handler

use std::{collections::HashMap, string::ToString, sync::Arc};

use salvo::{
    oapi::{
        ToSchema,
        extract::{PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use noleggio_app::domain::catalog::records::VariantRecord;

use crate::{extensions::*, products::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VariantResponse {
    /// The unique identifier of the variant
    pub uuid: Uuid,

    /// The product the variant belongs to
    pub product_uuid: Uuid,

    /// The display name of the variant
    pub name: String,

    /// The distinguishing attributes of the variant (size, colour, ...)
    pub attributes: HashMap<String, String>,

    /// The date and time the variant was created
    pub created_at: String,

    /// The date and time the variant was last updated
    pub updated_at: String,

    /// The date and time the variant was deleted
    pub deleted_at: Option<String>,
}

impl From<VariantRecord> for VariantResponse {
    fn from(variant: VariantRecord) -> Self {
        VariantResponse {
            uuid: variant.uuid.into(),
            product_uuid: variant.product_uuid.into(),
            name: variant.name,
            attributes: variant.attributes.into_iter().collect(),
            created_at: variant.created_at.to_string(),
            updated_at: variant.updated_at.to_string(),
            deleted_at: variant.deleted_at.as_ref().map(ToString::to_string),
        }
    }
}

/// Get Variant Handler
///
/// Returns a variant.
#[endpoint(
    tags("variants"),
    summary = "Get Variant",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    variant: PathParam<Uuid>,
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<VariantResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let point_in_time = at.into_point_in_time()?;

    let variant = state
        .app
        .catalog
        .get_variant(tenant, variant.into_inner().into(), point_in_time)
        .await
        .map_err(into_status_error)?;

    Ok(Json(variant.into()))
}
