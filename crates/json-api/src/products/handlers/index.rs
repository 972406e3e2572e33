//! Product Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    extensions::*, products::errors::into_status_error, products::get::ProductResponse,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// The list of products
    pub products: Vec<ProductResponse>,
}

/// Product Index Handler
///
/// Returns a list of products.
#[endpoint(
    tags("products"),
    summary = "List Products",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    at: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<ProductsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let tenant = depot.tenant_uuid_or_401()?;
    let point_in_time = at.into_point_in_time()?;

    let products = state
        .app
        .catalog
        .list_products(tenant, point_in_time)
        .await
        .map_err(into_status_error)?;

    Ok(Json(ProductsResponse {
        products: products.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use noleggio_app::domain::catalog::{
        CatalogServiceError, MockCatalogService, records::ProductUuid,
    };

    use crate::test_helpers::{TEST_TENANT_UUID, catalog_service, make_product};

    use super::*;

    fn make_service(repo: MockCatalogService) -> Service {
        catalog_service(repo, Router::with_path("products").get(handler))
    }

    #[tokio::test]
    async fn test_index_returns_products() -> TestResult {
        let uuid_a = ProductUuid::new();
        let uuid_b = ProductUuid::new();

        let mut repo = MockCatalogService::new();

        repo.expect_list_products()
            .once()
            .withf(|tenant, _| *tenant == TEST_TENANT_UUID)
            .return_once(move |_, _| Ok(vec![make_product(uuid_a), make_product(uuid_b)]));

        let response: ProductsResponse = TestClient::get("http://example.com/products")
            .send(&make_service(repo))
            .await
            .take_json()
            .await?;

        assert_eq!(response.products.len(), 2, "expected two products");
        assert_eq!(response.products[0].uuid, uuid_a.into_uuid());
        assert_eq!(response.products[1].uuid, uuid_b.into_uuid());

        Ok(())
    }

    #[tokio::test]
    async fn test_index_returns_empty_list() -> TestResult {
        let mut repo = MockCatalogService::new();

        repo.expect_list_products()
            .once()
            .withf(|tenant, _| *tenant == TEST_TENANT_UUID)
            .return_once(|_, _| Ok(vec![]));

        let response: ProductsResponse = TestClient::get("http://example.com/products")
            .send(&make_service(repo))
            .await
            .take_json()
            .await?;

        assert!(response.products.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_index_service_error_returns_400() -> TestResult {
        let mut repo = MockCatalogService::new();

        repo.expect_list_products()
            .once()
            .withf(|tenant, _| *tenant == TEST_TENANT_UUID)
            .return_once(|_, _| Err(CatalogServiceError::InvalidData));

        let res = TestClient::get("http://example.com/products")
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
