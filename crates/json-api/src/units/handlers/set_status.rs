//! Set Unit Status Handler

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

use noleggio_app::domain::units::records::UnitStatus;

use crate::{
    extensions::*, state::State, units::errors::into_status_error,
    units::index::UnitResponse,
};

/// Set Unit Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SetUnitStatusRequest {
    /// The new pool status (rentable, maintenance, retired)
    pub status: String,
}

/// Set Unit Status Handler
///
/// Moves a unit between the rentable pool, maintenance and retirement.
#[endpoint(
    tags("units"),
    summary = "Set Unit Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Status updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Unit not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    unit: PathParam<Uuid>,
    json: JsonBody<SetUnitStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<UnitResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let status = UnitStatus::from_str(&json.into_inner().status)
        .or_400("unrecognised unit status")?;

    let unit = state
        .app
        .units
        .set_unit_status(tenant, unit.into_inner().into(), status)
        .await
        .map_err(into_status_error)?;

    Ok(Json(unit.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use noleggio_app::domain::{
        catalog::records::VariantUuid,
        units::{MockUnitsService, UnitsServiceError, records::UnitUuid},
    };

    use crate::test_helpers::{TEST_TENANT_UUID, make_unit, units_service};

    use super::*;

    fn make_service(repo: MockUnitsService) -> Service {
        units_service(repo, Router::with_path("units/{unit}/status").put(handler))
    }

    #[tokio::test]
    async fn test_set_status_success() -> TestResult {
        let uuid = UnitUuid::new();

        let mut updated = make_unit(uuid, VariantUuid::new());
        updated.status = UnitStatus::Maintenance;

        let mut repo = MockUnitsService::new();

        repo.expect_set_unit_status()
            .once()
            .withf(move |tenant, u, status| {
                *tenant == TEST_TENANT_UUID && *u == uuid && *status == UnitStatus::Maintenance
            })
            .return_once(move |_, _, _| Ok(updated));

        let response: UnitResponse =
            TestClient::put(format!("http://example.com/units/{uuid}/status"))
                .json(&json!({ "status": "maintenance" }))
                .send(&make_service(repo))
                .await
                .take_json()
                .await?;

        assert_eq!(response.status, "maintenance");

        Ok(())
    }

    #[tokio::test]
    async fn test_set_status_unrecognised_status_returns_400() -> TestResult {
        let uuid = UnitUuid::new();

        let res = TestClient::put(format!("http://example.com/units/{uuid}/status"))
            .json(&json!({ "status": "broken" }))
            .send(&make_service(MockUnitsService::new()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_set_status_missing_unit_returns_404() -> TestResult {
        let uuid = UnitUuid::new();

        let mut repo = MockUnitsService::new();

        repo.expect_set_unit_status()
            .once()
            .withf(move |tenant, u, _| *tenant == TEST_TENANT_UUID && *u == uuid)
            .return_once(|_, _, _| Err(UnitsServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/units/{uuid}/status"))
            .json(&json!({ "status": "retired" }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
