//! Create Unit Handler

use std::sync::Arc;

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

use noleggio_app::domain::units::data::NewUnit;

use crate::{extensions::*, state::State, units::errors::into_status_error};

/// Create Unit Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateUnitRequest {
    pub uuid: Uuid,

    /// The human-readable asset tag, unique per tenant
    pub code: String,
}

impl From<CreateUnitRequest> for NewUnit {
    fn from(request: CreateUnitRequest) -> Self {
        NewUnit {
            uuid: request.uuid.into(),
            code: request.code,
        }
    }
}

/// Unit Created Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UnitCreatedResponse {
    /// Created unit UUID
    pub uuid: Uuid,
}

/// Create Unit Handler
#[endpoint(
    tags("units"),
    summary = "Create Unit",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Unit created"),
        (status_code = StatusCode::CONFLICT, description = "Unit code already in use"),
        (status_code = StatusCode::NOT_FOUND, description = "Variant not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    variant: PathParam<Uuid>,
    json: JsonBody<CreateUnitRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<UnitCreatedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let uuid = state
        .app
        .units
        .create_unit(tenant, variant.into_inner().into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?
        .uuid;

    res.add_header(LOCATION, format!("/units/{uuid}"), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(UnitCreatedResponse { uuid: uuid.into() }))
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
        units_service(
            repo,
            Router::with_path("variants/{variant}/units").post(handler),
        )
    }

    #[tokio::test]
    async fn test_create_unit_success() -> TestResult {
        let variant_uuid = VariantUuid::new();
        let uuid = UnitUuid::new();
        let unit = make_unit(uuid, variant_uuid);

        let mut repo = MockUnitsService::new();

        repo.expect_create_unit()
            .once()
            .withf(move |tenant, v, new| {
                *tenant == TEST_TENANT_UUID
                    && *v == variant_uuid
                    && new.uuid == uuid
                    && new.code == "PB-001"
            })
            .return_once(move |_, _, _| Ok(unit));

        let mut res = TestClient::post(format!(
            "http://example.com/variants/{variant_uuid}/units"
        ))
        .json(&json!({ "uuid": uuid.into_uuid(), "code": "PB-001" }))
        .send(&make_service(repo))
        .await;

        let body: UnitCreatedResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.uuid, uuid.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_create_unit_duplicate_code_returns_409() -> TestResult {
        let variant_uuid = VariantUuid::new();
        let uuid = UnitUuid::new();

        let mut repo = MockUnitsService::new();

        repo.expect_create_unit()
            .once()
            .withf(move |tenant, v, _| *tenant == TEST_TENANT_UUID && *v == variant_uuid)
            .return_once(|_, _, _| Err(UnitsServiceError::AlreadyExists));

        let res = TestClient::post(format!(
            "http://example.com/variants/{variant_uuid}/units"
        ))
        .json(&json!({ "uuid": uuid.into_uuid(), "code": "PB-001" }))
        .send(&make_service(repo))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }
}
