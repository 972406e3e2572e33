//! Update Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use noleggio_app::domain::catalog::data::ProductUpdate;

use crate::{
    extensions::*, products::errors::into_status_error, products::get::ProductResponse,
    state::State,
};

/// Update Product Request
///
/// Full replacement of the mutable product fields.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateProductRequest {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl From<UpdateProductRequest> for ProductUpdate {
    fn from(request: UpdateProductRequest) -> Self {
        ProductUpdate {
            name: request.name,
            category: request.category,
            description: request.description,
        }
    }
}

/// Product Update Handler
#[endpoint(
    tags("products"),
    summary = "Update Product",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    product: PathParam<Uuid>,
    json: JsonBody<UpdateProductRequest>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;

    let updated = state
        .app
        .catalog
        .update_product(tenant, product.into_inner().into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(updated.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use noleggio_app::domain::catalog::{
        CatalogServiceError, MockCatalogService, records::ProductUuid,
    };

    use crate::test_helpers::{TEST_TENANT_UUID, catalog_service, make_product};

    use super::*;

    fn make_service(repo: MockCatalogService) -> Service {
        catalog_service(repo, Router::with_path("products/{product}").put(handler))
    }

    #[tokio::test]
    async fn test_update_product_success() -> TestResult {
        let uuid = ProductUuid::new();

        let mut updated = make_product(uuid);
        updated.name = "Marquee".to_string();

        let mut repo = MockCatalogService::new();

        repo.expect_update_product()
            .once()
            .withf(move |tenant, u, update| {
                *tenant == TEST_TENANT_UUID && *u == uuid && update.name == "Marquee"
            })
            .return_once(move |_, _, _| Ok(updated));

        let response: ProductResponse =
            TestClient::put(format!("http://example.com/products/{uuid}"))
                .json(&json!({ "name": "Marquee" }))
                .send(&make_service(repo))
                .await
                .take_json()
                .await?;

        assert_eq!(response.name, "Marquee");

        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_product_returns_404() -> TestResult {
        let uuid = ProductUuid::new();

        let mut repo = MockCatalogService::new();

        repo.expect_update_product()
            .once()
            .withf(move |tenant, u, _| *tenant == TEST_TENANT_UUID && *u == uuid)
            .return_once(|_, _, _| Err(CatalogServiceError::NotFound));

        let res = TestClient::put(format!("http://example.com/products/{uuid}"))
            .json(&json!({ "name": "Marquee" }))
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
