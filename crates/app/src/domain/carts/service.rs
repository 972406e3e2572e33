//! Carts service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::{
        bookings::records::BookingStatus,
        carts::{
            data::{NewCart, NewCartItem},
            errors::CartsServiceError,
            records::{CartItemRecord, CartItemUuid, CartRecord, CartUuid},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        tenants::records::TenantUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
        }
    }

    /// Guard shared by cart reads: the booking must exist and still be
    /// in `cart` status.
    async fn ensure_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        point_in_time: Timestamp,
    ) -> Result<(), CartsServiceError> {
        let status = self
            .carts_repository
            .find_cart(tx, cart, point_in_time)
            .await?;

        if status != BookingStatus::Cart {
            return Err(CartsServiceError::NotACart);
        }

        Ok(())
    }

    /// Guard shared by cart mutations. Locks the booking row, so an
    /// in-flight checkout of the same cart settles first and the edit
    /// then fails with `NotACart` instead of racing it.
    async fn ensure_cart_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
    ) -> Result<(), CartsServiceError> {
        let status = self.carts_repository.find_cart_for_update(tx, cart).await?;

        if status != BookingStatus::Cart {
            return Err(CartsServiceError::NotACart);
        }

        Ok(())
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn create_cart(
        &self,
        tenant: TenantUuid,
        cart: NewCart,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let created = self
            .carts_repository
            .create_cart(&mut tx, cart.uuid)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn get_cart(
        &self,
        tenant: TenantUuid,
        cart: CartUuid,
        point_in_time: Timestamp,
    ) -> Result<CartRecord, CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        self.ensure_cart(&mut tx, cart, point_in_time).await?;

        let mut record = self
            .carts_repository
            .get_cart(&mut tx, cart, point_in_time)
            .await?;

        let items = self
            .items_repository
            .get_cart_items(&mut tx, cart, point_in_time)
            .await?;

        tx.commit().await?;

        record.items.extend(items);

        Ok(record)
    }

    async fn delete_cart(
        &self,
        tenant: TenantUuid,
        cart: CartUuid,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        self.ensure_cart_for_update(&mut tx, cart).await?;

        let rows_affected = self.carts_repository.delete_cart(&mut tx, cart).await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, item),
        fields(
            tenant_uuid = %tenant,
            cart_uuid = %cart,
            variant_uuid = %item.variant_uuid,
            quantity = item.quantity,
            free = tracing::field::Empty,
            unit_price = tracing::field::Empty
        ),
        err
    )]
    async fn add_item(
        &self,
        tenant: TenantUuid,
        cart: CartUuid,
        item: NewCartItem,
    ) -> Result<Vec<CartItemRecord>, CartsServiceError> {
        if item.quantity == 0 {
            return Err(CartsServiceError::InvalidData);
        }

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        self.ensure_cart_for_update(&mut tx, cart).await?;

        self.items_repository
            .find_variant(&mut tx, item.variant_uuid)
            .await?;

        let table = self
            .items_repository
            .load_rate_table(&mut tx, item.variant_uuid)
            .await?;

        let quote = table.quote(item.starts_at, item.ends_at)?;

        let pool = self
            .items_repository
            .count_pool(&mut tx, item.variant_uuid)
            .await?;

        let booked = self
            .items_repository
            .count_booked(&mut tx, item.variant_uuid, item.starts_at, item.ends_at)
            .await?;

        let free = pool.saturating_sub(booked);

        let span = Span::current();

        span.record("free", free);
        span.record("unit_price", quote.total);

        if free < u64::from(item.quantity) {
            return Err(CartsServiceError::Unavailable {
                requested: item.quantity,
                free,
            });
        }

        let mut items = Vec::with_capacity(item.quantity as usize);

        for _ in 0..item.quantity {
            let created = self
                .items_repository
                .create_cart_item(&mut tx, cart, CartItemUuid::new(), &item, quote.total)
                .await?;

            items.push(created);
        }

        tx.commit().await?;

        info!(count = items.len(), "added cart items");

        Ok(items)
    }

    async fn remove_item(
        &self,
        tenant: TenantUuid,
        cart: CartUuid,
        item: CartItemUuid,
    ) -> Result<(), CartsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        self.ensure_cart_for_update(&mut tx, cart).await?;

        let rows_affected = self
            .items_repository
            .delete_cart_item(&mut tx, cart, item)
            .await?;

        if rows_affected == 0 {
            return Err(CartsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Creates a new, empty cart.
    async fn create_cart(
        &self,
        tenant: TenantUuid,
        cart: NewCart,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Retrieve a cart with its items and total.
    async fn get_cart(
        &self,
        tenant: TenantUuid,
        cart: CartUuid,
        point_in_time: Timestamp,
    ) -> Result<CartRecord, CartsServiceError>;

    /// Soft-deletes a cart, releasing the demand its items held.
    async fn delete_cart(
        &self,
        tenant: TenantUuid,
        cart: CartUuid,
    ) -> Result<(), CartsServiceError>;

    /// Adds `quantity` items for a variant and interval, one unit of
    /// demand each, priced server-side at today's rates.
    async fn add_item(
        &self,
        tenant: TenantUuid,
        cart: CartUuid,
        item: NewCartItem,
    ) -> Result<Vec<CartItemRecord>, CartsServiceError>;

    /// Removes a single item from a cart.
    async fn remove_item(
        &self,
        tenant: TenantUuid,
        cart: CartUuid,
        item: CartItemUuid,
    ) -> Result<(), CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            availability::AvailabilityService,
            catalog::records::VariantUuid,
            pricing::{PricingService, records::PricePeriod},
        },
        test::{TestContext, helpers},
    };

    use super::*;

    fn ts(s: &str) -> Timestamp {
        s.parse().expect("timestamp literal")
    }

    async fn cart_with_priced_variant(
        ctx: &TestContext,
        units: usize,
        daily: u64,
    ) -> TestResult<(CartUuid, VariantUuid)> {
        let variant = helpers::create_variant(ctx, ctx.tenant_uuid).await?;

        helpers::create_units(ctx, variant, units).await?;

        ctx.pricing
            .set_price(ctx.tenant_uuid, variant, PricePeriod::Daily, daily)
            .await?;

        let cart = ctx
            .carts
            .create_cart(
                ctx.tenant_uuid,
                NewCart {
                    uuid: CartUuid::new(),
                },
            )
            .await?;

        Ok((cart.uuid, variant))
    }

    #[tokio::test]
    async fn create_and_get_an_empty_cart() -> TestResult {
        let ctx = TestContext::new().await;

        let cart = ctx
            .carts
            .create_cart(
                ctx.tenant_uuid,
                NewCart {
                    uuid: CartUuid::new(),
                },
            )
            .await?;

        let fetched = ctx
            .carts
            .get_cart(ctx.tenant_uuid, cart.uuid, Timestamp::now())
            .await?;

        assert_eq!(fetched.uuid, cart.uuid);
        assert_eq!(fetched.total, 0);
        assert!(fetched.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn add_item_prices_each_unit_from_the_price_list() -> TestResult {
        let ctx = TestContext::new().await;
        let (cart, variant) = cart_with_priced_variant(&ctx, 2, 10_00).await?;

        let items = ctx
            .carts
            .add_item(
                ctx.tenant_uuid,
                cart,
                NewCartItem {
                    variant_uuid: variant,
                    starts_at: ts("2025-06-01T09:00:00Z"),
                    ends_at: ts("2025-06-04T09:00:00Z"),
                    quantity: 2,
                },
            )
            .await?;

        assert_eq!(items.len(), 2);

        for item in &items {
            assert_eq!(item.variant_uuid, variant);
            assert_eq!(item.price, 30_00);
        }

        let fetched = ctx
            .carts
            .get_cart(ctx.tenant_uuid, cart, Timestamp::now())
            .await?;

        assert_eq!(fetched.items.len(), 2);
        assert_eq!(fetched.total, 60_00);

        Ok(())
    }

    #[tokio::test]
    async fn add_item_rejects_zero_quantity() -> TestResult {
        let ctx = TestContext::new().await;
        let (cart, variant) = cart_with_priced_variant(&ctx, 1, 10_00).await?;

        let result = ctx
            .carts
            .add_item(
                ctx.tenant_uuid,
                cart,
                NewCartItem {
                    variant_uuid: variant,
                    starts_at: ts("2025-06-01T09:00:00Z"),
                    ends_at: ts("2025-06-02T09:00:00Z"),
                    quantity: 0,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidData)),
            "expected InvalidData for zero quantity, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_rejects_an_unknown_variant() -> TestResult {
        let ctx = TestContext::new().await;
        let (cart, _variant) = cart_with_priced_variant(&ctx, 1, 10_00).await?;

        let result = ctx
            .carts
            .add_item(
                ctx.tenant_uuid,
                cart,
                NewCartItem {
                    variant_uuid: VariantUuid::new(),
                    starts_at: ts("2025-06-01T09:00:00Z"),
                    ends_at: ts("2025-06-02T09:00:00Z"),
                    quantity: 1,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound for unknown variant, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_without_price_rows_returns_missing_price() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = helpers::create_variant(&ctx, ctx.tenant_uuid).await?;

        helpers::create_units(&ctx, variant, 1).await?;

        let cart = ctx
            .carts
            .create_cart(
                ctx.tenant_uuid,
                NewCart {
                    uuid: CartUuid::new(),
                },
            )
            .await?;

        let result = ctx
            .carts
            .add_item(
                ctx.tenant_uuid,
                cart.uuid,
                NewCartItem {
                    variant_uuid: variant,
                    starts_at: ts("2025-06-01T09:00:00Z"),
                    ends_at: ts("2025-06-02T09:00:00Z"),
                    quantity: 1,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::MissingPrice)),
            "expected MissingPrice, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_rejects_a_backwards_range() -> TestResult {
        let ctx = TestContext::new().await;
        let (cart, variant) = cart_with_priced_variant(&ctx, 1, 10_00).await?;

        let result = ctx
            .carts
            .add_item(
                ctx.tenant_uuid,
                cart,
                NewCartItem {
                    variant_uuid: variant,
                    starts_at: ts("2025-06-04T09:00:00Z"),
                    ends_at: ts("2025-06-01T09:00:00Z"),
                    quantity: 1,
                },
            )
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::InvalidRange)),
            "expected InvalidRange, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn add_item_stops_at_the_free_unit_count() -> TestResult {
        let ctx = TestContext::new().await;
        let (cart, variant) = cart_with_priced_variant(&ctx, 1, 10_00).await?;

        let result = ctx
            .carts
            .add_item(
                ctx.tenant_uuid,
                cart,
                NewCartItem {
                    variant_uuid: variant,
                    starts_at: ts("2025-06-01T09:00:00Z"),
                    ends_at: ts("2025-06-02T09:00:00Z"),
                    quantity: 2,
                },
            )
            .await;

        assert!(
            matches!(
                result,
                Err(CartsServiceError::Unavailable {
                    requested: 2,
                    free: 1
                })
            ),
            "expected Unavailable, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn cart_demand_counts_against_availability() -> TestResult {
        let ctx = TestContext::new().await;
        let (cart, variant) = cart_with_priced_variant(&ctx, 3, 10_00).await?;

        ctx.carts
            .add_item(
                ctx.tenant_uuid,
                cart,
                NewCartItem {
                    variant_uuid: variant,
                    starts_at: ts("2025-06-01T09:00:00Z"),
                    ends_at: ts("2025-06-03T09:00:00Z"),
                    quantity: 2,
                },
            )
            .await?;

        let availability = ctx
            .availability
            .check_availability(
                ctx.tenant_uuid,
                variant,
                ts("2025-06-02T09:00:00Z"),
                ts("2025-06-04T09:00:00Z"),
            )
            .await?;

        assert_eq!(availability.pool, 3);
        assert_eq!(availability.booked, 2);
        assert_eq!(availability.free, 1);

        Ok(())
    }

    #[tokio::test]
    async fn deleting_a_cart_releases_its_demand() -> TestResult {
        let ctx = TestContext::new().await;
        let (cart, variant) = cart_with_priced_variant(&ctx, 2, 10_00).await?;

        ctx.carts
            .add_item(
                ctx.tenant_uuid,
                cart,
                NewCartItem {
                    variant_uuid: variant,
                    starts_at: ts("2025-06-01T09:00:00Z"),
                    ends_at: ts("2025-06-03T09:00:00Z"),
                    quantity: 2,
                },
            )
            .await?;

        ctx.carts.delete_cart(ctx.tenant_uuid, cart).await?;

        let availability = ctx
            .availability
            .check_availability(
                ctx.tenant_uuid,
                variant,
                ts("2025-06-01T09:00:00Z"),
                ts("2025-06-03T09:00:00Z"),
            )
            .await?;

        assert_eq!(availability.free, 2);

        Ok(())
    }

    #[tokio::test]
    async fn removing_an_item_releases_its_demand() -> TestResult {
        let ctx = TestContext::new().await;
        let (cart, variant) = cart_with_priced_variant(&ctx, 2, 10_00).await?;

        let items = ctx
            .carts
            .add_item(
                ctx.tenant_uuid,
                cart,
                NewCartItem {
                    variant_uuid: variant,
                    starts_at: ts("2025-06-01T09:00:00Z"),
                    ends_at: ts("2025-06-03T09:00:00Z"),
                    quantity: 2,
                },
            )
            .await?;

        ctx.carts
            .remove_item(ctx.tenant_uuid, cart, items[0].uuid)
            .await?;

        let fetched = ctx
            .carts
            .get_cart(ctx.tenant_uuid, cart, Timestamp::now())
            .await?;

        assert_eq!(fetched.items.len(), 1);
        assert_eq!(fetched.total, 20_00);

        let availability = ctx
            .availability
            .check_availability(
                ctx.tenant_uuid,
                variant,
                ts("2025-06-01T09:00:00Z"),
                ts("2025-06-03T09:00:00Z"),
            )
            .await?;

        assert_eq!(availability.free, 1);

        Ok(())
    }

    #[tokio::test]
    async fn carts_are_invisible_to_other_tenants() -> TestResult {
        let ctx = TestContext::new().await;
        let (cart, _variant) = cart_with_priced_variant(&ctx, 1, 10_00).await?;

        let other_tenant = ctx.create_tenant("Tenant B").await;

        let result = ctx
            .carts
            .get_cart(other_tenant, cart, Timestamp::now())
            .await;

        assert!(
            matches!(result, Err(CartsServiceError::NotFound)),
            "expected NotFound across tenants, got {result:?}"
        );

        Ok(())
    }
}
