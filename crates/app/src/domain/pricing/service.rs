//! Pricing service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::{
        catalog::records::VariantUuid,
        pricing::{
            errors::PricingServiceError,
            quote::{RateQuote, RateTable},
            records::{PricePeriod, PriceRecord},
            repository::PgPricesRepository,
        },
        tenants::records::TenantUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgPricingService {
    db: Db,
    repository: PgPricesRepository,
}

impl PgPricingService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPricesRepository::new(),
        }
    }
}

#[async_trait]
impl PricingService for PgPricingService {
    async fn set_price(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
        period: PricePeriod,
        amount: u64,
    ) -> Result<PriceRecord, PricingServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let price = self
            .repository
            .set_price(&mut tx, variant, period, amount)
            .await?;

        tx.commit().await?;

        Ok(price)
    }

    async fn list_prices(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
    ) -> Result<Vec<PriceRecord>, PricingServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        self.repository.find_variant(&mut tx, variant).await?;

        let prices = self.repository.list_prices(&mut tx, variant).await?;

        tx.commit().await?;

        Ok(prices)
    }

    async fn delete_price(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
        period: PricePeriod,
    ) -> Result<(), PricingServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let rows_affected = self
            .repository
            .delete_price(&mut tx, variant, period)
            .await?;

        if rows_affected == 0 {
            return Err(PricingServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(
        name = "pricing.service.quote",
        skip(self),
        fields(tenant_uuid = %tenant, variant_uuid = %variant),
        err
    )]
    async fn quote(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<RateQuote, PricingServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        self.repository.find_variant(&mut tx, variant).await?;

        let prices = self.repository.list_prices(&mut tx, variant).await?;

        tx.commit().await?;

        let table: RateTable = prices
            .iter()
            .map(|price| (price.period, price.amount))
            .collect();

        let quote = table.quote(from, until)?;

        info!(total = quote.total, "quoted rental");

        Ok(quote)
    }
}

#[automock]
#[async_trait]
pub trait PricingService: Send + Sync {
    /// Upserts the price row for (variant, period).
    async fn set_price(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
        period: PricePeriod,
        amount: u64,
    ) -> Result<PriceRecord, PricingServiceError>;

    /// List the price rows of a variant.
    async fn list_prices(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
    ) -> Result<Vec<PriceRecord>, PricingServiceError>;

    /// Deletes the price row for (variant, period).
    async fn delete_price(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
        period: PricePeriod,
    ) -> Result<(), PricingServiceError>;

    /// Price the half-open rental interval `[from, until)`.
    async fn quote(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<RateQuote, PricingServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::test::{TestContext, helpers};

    use super::*;

    fn ts(s: &str) -> Timestamp {
        s.parse().expect("timestamp literal")
    }

    #[tokio::test]
    async fn set_price_creates_then_updates_the_row() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = helpers::create_variant(&ctx, ctx.tenant_uuid).await?;

        let created = ctx
            .pricing
            .set_price(ctx.tenant_uuid, variant, PricePeriod::Daily, 10_00)
            .await?;

        assert_eq!(created.period, PricePeriod::Daily);
        assert_eq!(created.amount, 10_00);

        let updated = ctx
            .pricing
            .set_price(ctx.tenant_uuid, variant, PricePeriod::Daily, 12_00)
            .await?;

        assert_eq!(updated.uuid, created.uuid);
        assert_eq!(updated.amount, 12_00);

        let prices = ctx.pricing.list_prices(ctx.tenant_uuid, variant).await?;

        assert_eq!(prices.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn set_price_unknown_variant_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .pricing
            .set_price(ctx.tenant_uuid, VariantUuid::new(), PricePeriod::Daily, 10_00)
            .await;

        assert!(
            matches!(result, Err(PricingServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn prices_listed_in_period_order() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = helpers::create_variant(&ctx, ctx.tenant_uuid).await?;

        for (period, amount) in [
            (PricePeriod::Monthly, 200_00),
            (PricePeriod::Hourly, 5_00),
            (PricePeriod::Weekly, 50_00),
            (PricePeriod::Daily, 10_00),
        ] {
            ctx.pricing
                .set_price(ctx.tenant_uuid, variant, period, amount)
                .await?;
        }

        let prices = ctx.pricing.list_prices(ctx.tenant_uuid, variant).await?;

        let periods: Vec<_> = prices.iter().map(|p| p.period).collect();

        assert_eq!(
            periods,
            [
                PricePeriod::Hourly,
                PricePeriod::Daily,
                PricePeriod::Weekly,
                PricePeriod::Monthly,
            ]
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_price_removes_the_row() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = helpers::create_variant(&ctx, ctx.tenant_uuid).await?;

        ctx.pricing
            .set_price(ctx.tenant_uuid, variant, PricePeriod::Daily, 10_00)
            .await?;

        ctx.pricing
            .delete_price(ctx.tenant_uuid, variant, PricePeriod::Daily)
            .await?;

        let prices = ctx.pricing.list_prices(ctx.tenant_uuid, variant).await?;

        assert!(prices.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn delete_missing_price_returns_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = helpers::create_variant(&ctx, ctx.tenant_uuid).await?;

        let result = ctx
            .pricing
            .delete_price(ctx.tenant_uuid, variant, PricePeriod::Hourly)
            .await;

        assert!(
            matches!(result, Err(PricingServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn quote_prices_a_multi_day_rental_from_stored_rows() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = helpers::create_variant(&ctx, ctx.tenant_uuid).await?;

        ctx.pricing
            .set_price(ctx.tenant_uuid, variant, PricePeriod::Daily, 10_00)
            .await?;

        ctx.pricing
            .set_price(ctx.tenant_uuid, variant, PricePeriod::Weekly, 50_00)
            .await?;

        let quote = ctx
            .pricing
            .quote(
                ctx.tenant_uuid,
                variant,
                ts("2025-06-01T10:00:00Z"),
                ts("2025-06-11T10:00:00Z"),
            )
            .await?;

        assert_eq!(quote.total, 80_00);
        assert_eq!(quote.lines.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn quote_without_price_rows_returns_missing_price() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = helpers::create_variant(&ctx, ctx.tenant_uuid).await?;

        let result = ctx
            .pricing
            .quote(
                ctx.tenant_uuid,
                variant,
                ts("2025-06-01T10:00:00Z"),
                ts("2025-06-03T10:00:00Z"),
            )
            .await;

        assert!(
            matches!(result, Err(PricingServiceError::MissingPrice)),
            "expected MissingPrice, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn quote_unknown_variant_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .pricing
            .quote(
                ctx.tenant_uuid,
                VariantUuid::new(),
                ts("2025-06-01T10:00:00Z"),
                ts("2025-06-03T10:00:00Z"),
            )
            .await;

        assert!(
            matches!(result, Err(PricingServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn prices_not_visible_to_other_tenant() -> TestResult {
        let ctx = TestContext::new().await;
        let variant = helpers::create_variant(&ctx, ctx.tenant_uuid).await?;

        ctx.pricing
            .set_price(ctx.tenant_uuid, variant, PricePeriod::Daily, 10_00)
            .await?;

        let tenant_b = ctx.create_tenant("Tenant B").await;

        let result = ctx.pricing.list_prices(tenant_b, variant).await;

        assert!(
            matches!(result, Err(PricingServiceError::NotFound)),
            "expected NotFound for cross-tenant read, got {result:?}"
        );

        Ok(())
    }
}
