//! Catalog service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        catalog::{
            data::{NewProduct, NewVariant, ProductUpdate, VariantUpdate},
            errors::CatalogServiceError,
            records::{ProductRecord, ProductUuid, VariantRecord, VariantUuid},
            repositories::{PgProductsRepository, PgVariantsRepository},
        },
        tenants::records::TenantUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    products_repository: PgProductsRepository,
    variants_repository: PgVariantsRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            products_repository: PgProductsRepository::new(),
            variants_repository: PgVariantsRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn list_products(
        &self,
        tenant: TenantUuid,
        point_in_time: Timestamp,
    ) -> Result<Vec<ProductRecord>, CatalogServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let products = self
            .products_repository
            .list_products(&mut tx, point_in_time)
            .await?;

        tx.commit().await?;

        Ok(products)
    }

    async fn get_product(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
        point_in_time: Timestamp,
    ) -> Result<ProductRecord, CatalogServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let product = self
            .products_repository
            .get_product(&mut tx, product, point_in_time)
            .await?;

        tx.commit().await?;

        Ok(product)
    }

    async fn create_product(
        &self,
        tenant: TenantUuid,
        product: NewProduct,
    ) -> Result<ProductRecord, CatalogServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let created = self
            .products_repository
            .create_product(&mut tx, &product)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_product(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, CatalogServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let updated = self
            .products_repository
            .update_product(&mut tx, product, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_product(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
    ) -> Result<(), CatalogServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let rows_affected = self
            .products_repository
            .delete_product(&mut tx, product)
            .await?;

        if rows_affected == 0 {
            return Err(CatalogServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn list_variants(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
        point_in_time: Timestamp,
    ) -> Result<Vec<VariantRecord>, CatalogServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        // Resolves visibility of the parent product first, so that variants
        // of deleted or foreign products read as NotFound rather than empty.
        self.products_repository
            .get_product(&mut tx, product, point_in_time)
            .await?;

        let variants = self
            .variants_repository
            .list_variants(&mut tx, product, point_in_time)
            .await?;

        tx.commit().await?;

        Ok(variants)
    }

    async fn get_variant(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
        point_in_time: Timestamp,
    ) -> Result<VariantRecord, CatalogServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let variant = self
            .variants_repository
            .get_variant(&mut tx, variant, point_in_time)
            .await?;

        tx.commit().await?;

        Ok(variant)
    }

    async fn create_variant(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
        variant: NewVariant,
    ) -> Result<VariantRecord, CatalogServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        // Foreign keys are checked outside row-level security, so the
        // parent product must be resolved inside the tenant transaction.
        self.products_repository
            .get_product(&mut tx, product, Timestamp::now())
            .await?;

        let created = self
            .variants_repository
            .create_variant(&mut tx, product, &variant)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_variant(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
        update: VariantUpdate,
    ) -> Result<VariantRecord, CatalogServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let updated = self
            .variants_repository
            .update_variant(&mut tx, variant, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_variant(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
    ) -> Result<(), CatalogServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let rows_affected = self
            .variants_repository
            .delete_variant(&mut tx, variant)
            .await?;

        if rows_affected == 0 {
            return Err(CatalogServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// List the products visible at the given point in time.
    async fn list_products(
        &self,
        tenant: TenantUuid,
        point_in_time: Timestamp,
    ) -> Result<Vec<ProductRecord>, CatalogServiceError>;

    /// Retrieve a single product.
    async fn get_product(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
        point_in_time: Timestamp,
    ) -> Result<ProductRecord, CatalogServiceError>;

    /// Creates a new product with the given details.
    async fn create_product(
        &self,
        tenant: TenantUuid,
        product: NewProduct,
    ) -> Result<ProductRecord, CatalogServiceError>;

    /// Replaces the mutable fields of a product.
    async fn update_product(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<ProductRecord, CatalogServiceError>;

    /// Soft-deletes a product.
    async fn delete_product(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
    ) -> Result<(), CatalogServiceError>;

    /// List the variants of a product.
    async fn list_variants(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
        point_in_time: Timestamp,
    ) -> Result<Vec<VariantRecord>, CatalogServiceError>;

    /// Retrieve a single variant.
    async fn get_variant(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
        point_in_time: Timestamp,
    ) -> Result<VariantRecord, CatalogServiceError>;

    /// Creates a new variant under the given product.
    async fn create_variant(
        &self,
        tenant: TenantUuid,
        product: ProductUuid,
        variant: NewVariant,
    ) -> Result<VariantRecord, CatalogServiceError>;

    /// Replaces the mutable fields of a variant.
    async fn update_variant(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
        update: VariantUpdate,
    ) -> Result<VariantRecord, CatalogServiceError>;

    /// Soft-deletes a variant.
    async fn delete_variant(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
    ) -> Result<(), CatalogServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::{Timestamp, ToSpan};
    use rustc_hash::FxHashMap;
    use testresult::TestResult;

    use crate::test::TestContext;

    use super::*;

    fn new_product(name: &str) -> NewProduct {
        NewProduct {
            uuid: ProductUuid::new(),
            name: name.to_string(),
            category: Some("Boats".to_string()),
            description: None,
        }
    }

    fn new_variant(name: &str) -> NewVariant {
        NewVariant {
            uuid: VariantUuid::new(),
            name: name.to_string(),
            attributes: [("capacity".to_string(), "4".to_string())]
                .into_iter()
                .collect::<FxHashMap<_, _>>(),
        }
    }

    #[tokio::test]
    async fn create_product_returns_correct_fields() {
        let ctx = TestContext::new().await;
        let data = new_product("Pedal boat");

        let product = ctx
            .catalog
            .create_product(ctx.tenant_uuid, data.clone())
            .await
            .expect("create_product should succeed");

        assert_eq!(product.uuid, data.uuid);
        assert_eq!(product.name, "Pedal boat");
        assert_eq!(product.category.as_deref(), Some("Boats"));
        assert!(product.deleted_at.is_none());
    }

    #[tokio::test]
    async fn get_product_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .catalog
            .get_product(ctx.tenant_uuid, ProductUuid::new(), Timestamp::now())
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn update_product_replaces_fields() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(ctx.tenant_uuid, new_product("Pedal boat"))
            .await?;

        let updated = ctx
            .catalog
            .update_product(
                ctx.tenant_uuid,
                product.uuid,
                ProductUpdate {
                    name: "Rowing boat".to_string(),
                    category: None,
                    description: Some("Two oars included".to_string()),
                },
            )
            .await?;

        assert_eq!(updated.uuid, product.uuid);
        assert_eq!(updated.name, "Rowing boat");
        assert_eq!(updated.category, None);
        assert_eq!(updated.description.as_deref(), Some("Two oars included"));

        Ok(())
    }

    #[tokio::test]
    async fn delete_product_makes_it_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(ctx.tenant_uuid, new_product("Pedal boat"))
            .await?;

        ctx.catalog
            .delete_product(ctx.tenant_uuid, product.uuid)
            .await?;

        let result = ctx
            .catalog
            .get_product(ctx.tenant_uuid, product.uuid, Timestamp::now())
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound after deletion, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn deleted_product_visible_before_deletion_time() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(ctx.tenant_uuid, new_product("Pedal boat"))
            .await?;

        let before_deletion = Timestamp::now();

        ctx.catalog
            .delete_product(ctx.tenant_uuid, product.uuid)
            .await?;

        let seen = ctx
            .catalog
            .get_product(ctx.tenant_uuid, product.uuid, before_deletion)
            .await?;

        assert_eq!(seen.uuid, product.uuid);

        let listed = ctx
            .catalog
            .list_products(ctx.tenant_uuid, Timestamp::now().checked_add(1.hour())?)
            .await?;

        assert!(
            listed.iter().all(|p| p.uuid != product.uuid),
            "deleted product should not resurface later"
        );

        Ok(())
    }

    #[tokio::test]
    async fn product_not_visible_to_other_tenant() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(ctx.tenant_uuid, new_product("Pedal boat"))
            .await?;

        let tenant_b = ctx.create_tenant("Tenant B").await;

        let result = ctx
            .catalog
            .get_product(tenant_b, product.uuid, Timestamp::now())
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound for cross-tenant access, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_variant_stores_attributes() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(ctx.tenant_uuid, new_product("Pedal boat"))
            .await?;

        let data = new_variant("4-seater");

        let variant = ctx
            .catalog
            .create_variant(ctx.tenant_uuid, product.uuid, data.clone())
            .await?;

        assert_eq!(variant.uuid, data.uuid);
        assert_eq!(variant.product_uuid, product.uuid);
        assert_eq!(variant.attributes.get("capacity").map(String::as_str), Some("4"));

        Ok(())
    }

    #[tokio::test]
    async fn create_variant_unknown_product_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .catalog
            .create_variant(ctx.tenant_uuid, ProductUuid::new(), new_variant("4-seater"))
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound for unknown product, got {result:?}"
        );
    }

    #[tokio::test]
    async fn variant_not_created_under_other_tenants_product() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(ctx.tenant_uuid, new_product("Pedal boat"))
            .await?;

        let tenant_b = ctx.create_tenant("Tenant B").await;

        let result = ctx
            .catalog
            .create_variant(tenant_b, product.uuid, new_variant("4-seater"))
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound for cross-tenant insert, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_variants_of_deleted_product_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(ctx.tenant_uuid, new_product("Pedal boat"))
            .await?;

        ctx.catalog
            .create_variant(ctx.tenant_uuid, product.uuid, new_variant("4-seater"))
            .await?;

        ctx.catalog
            .delete_product(ctx.tenant_uuid, product.uuid)
            .await?;

        let result = ctx
            .catalog
            .list_variants(ctx.tenant_uuid, product.uuid, Timestamp::now())
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound for deleted product, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn get_variant_of_deleted_product_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(ctx.tenant_uuid, new_product("Pedal boat"))
            .await?;

        let variant = ctx
            .catalog
            .create_variant(ctx.tenant_uuid, product.uuid, new_variant("4-seater"))
            .await?;

        ctx.catalog
            .delete_product(ctx.tenant_uuid, product.uuid)
            .await?;

        let result = ctx
            .catalog
            .get_variant(ctx.tenant_uuid, variant.uuid, Timestamp::now())
            .await;

        assert!(
            matches!(result, Err(CatalogServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_variant_replaces_attribute_map() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(ctx.tenant_uuid, new_product("Pedal boat"))
            .await?;

        let variant = ctx
            .catalog
            .create_variant(ctx.tenant_uuid, product.uuid, new_variant("4-seater"))
            .await?;

        let updated = ctx
            .catalog
            .update_variant(
                ctx.tenant_uuid,
                variant.uuid,
                VariantUpdate {
                    name: "6-seater".to_string(),
                    attributes: [("capacity".to_string(), "6".to_string())]
                        .into_iter()
                        .collect(),
                },
            )
            .await?;

        assert_eq!(updated.name, "6-seater");
        assert_eq!(updated.attributes.get("capacity").map(String::as_str), Some("6"));

        Ok(())
    }

    #[tokio::test]
    async fn delete_variant_leaves_siblings_listed() -> TestResult {
        let ctx = TestContext::new().await;

        let product = ctx
            .catalog
            .create_product(ctx.tenant_uuid, new_product("Pedal boat"))
            .await?;

        let keep = ctx
            .catalog
            .create_variant(ctx.tenant_uuid, product.uuid, new_variant("4-seater"))
            .await?;

        let gone = ctx
            .catalog
            .create_variant(ctx.tenant_uuid, product.uuid, new_variant("6-seater"))
            .await?;

        ctx.catalog
            .delete_variant(ctx.tenant_uuid, gone.uuid)
            .await?;

        let variants = ctx
            .catalog
            .list_variants(ctx.tenant_uuid, product.uuid, Timestamp::now())
            .await?;

        assert_eq!(variants.len(), 1);
        assert_eq!(variants.first().map(|v| v.uuid), Some(keep.uuid));

        Ok(())
    }
}
