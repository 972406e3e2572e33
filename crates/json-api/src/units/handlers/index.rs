//! Unit Index Handler

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

use noleggio_app::domain::units::records::UnitRecord;

use crate::{extensions::*, state::State, units::errors::into_status_error};

/// Unit Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UnitResponse {
    /// The unique identifier of the unit
    pub uuid: Uuid,

    /// The variant the unit belongs to
    pub variant_uuid: Uuid,

    /// The human-readable asset tag of the unit
    pub code: String,

    /// The pool status (rentable, maintenance, retired)
    pub status: String,

    /// The date and time the unit was created
    pub created_at: String,

    /// The date and time the unit was last updated
    pub updated_at: String,

    /// The date and time the unit was deleted
    pub deleted_at: Option<String>,
}

impl From<UnitRecord> for UnitResponse {
    fn from(unit: UnitRecord) -> Self {
        Self {
            uuid: unit.uuid.into(),
            variant_uuid: unit.variant_uuid.into(),
            code: unit.code,
            status: unit.status.as_str().to_string(),
            created_at: unit.created_at.to_string(),
            updated_at: unit.updated_at.to_string(),
            deleted_at: unit.deleted_at.as_ref().map(ToString::to_string),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UnitsResponse {
    /// The list of units
    pub units: Vec<UnitResponse>,
}

/// Unit Index Handler
///
/// Returns the physical units of a variant.
#[endpoint(
    tags("units"),
    summary = "List Units",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    variant: PathParam<Uuid>,
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<UnitsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let point_in_time = at.into_point_in_time()?;

    let units = state
        .app
        .units
        .list_units(tenant, variant.into_inner().into(), point_in_time)
        .await
        .map_err(into_status_error)?;

    Ok(Json(UnitsResponse {
        units: units.into_iter().map(Into::into).collect(),
    }))
}
