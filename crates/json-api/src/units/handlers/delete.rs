//! Delete Unit Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, state::State, units::errors::into_status_error};

/// Delete Unit Handler
#[endpoint(
    tags("units"),
    summary = "Delete Unit",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Unit deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Unit not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    unit: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    state
        .app
        .units
        .delete_unit(tenant, unit.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::OK)
}
