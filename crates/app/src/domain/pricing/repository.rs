//! Prices Repository

use std::str::FromStr;

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    catalog::records::VariantUuid,
    pricing::records::{PricePeriod, PriceRecord, PriceUuid},
};

const FIND_VARIANT_SQL: &str = include_str!("sql/find_variant.sql");
const LIST_PRICES_SQL: &str = include_str!("sql/list_prices.sql");
const SET_PRICE_SQL: &str = include_str!("sql/set_price.sql");
const DELETE_PRICE_SQL: &str = include_str!("sql/delete_price.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPricesRepository;

impl PgPricesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
    ) -> Result<VariantUuid, sqlx::Error> {
        let uuid: Uuid = query_scalar(FIND_VARIANT_SQL)
            .bind(variant.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(VariantUuid::from_uuid(uuid))
    }

    pub(crate) async fn list_prices(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
    ) -> Result<Vec<PriceRecord>, sqlx::Error> {
        query_as::<Postgres, PriceRecord>(LIST_PRICES_SQL)
            .bind(variant.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Upsert the (variant, period) price row.
    pub(crate) async fn set_price(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        period: PricePeriod,
        amount: u64,
    ) -> Result<PriceRecord, sqlx::Error> {
        let amount_i64 = i64::try_from(amount).map_err(|e| sqlx::Error::ColumnDecode {
            index: "amount".to_string(),
            source: Box::new(e),
        })?;

        query_as::<Postgres, PriceRecord>(SET_PRICE_SQL)
            .bind(PriceUuid::new().into_uuid())
            .bind(variant.into_uuid())
            .bind(period.as_str())
            .bind(amount_i64)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_price(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        period: PricePeriod,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_PRICE_SQL)
            .bind(variant.into_uuid())
            .bind(period.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for PriceRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let amount_i64: i64 = row.try_get("amount")?;

        let amount = u64::try_from(amount_i64).map_err(|e| sqlx::Error::ColumnDecode {
            index: "amount".to_string(),
            source: Box::new(e),
        })?;

        let period: String = row.try_get("period")?;

        let period = PricePeriod::from_str(&period).map_err(|e| sqlx::Error::ColumnDecode {
            index: "period".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: PriceUuid::from_uuid(row.try_get("uuid")?),
            variant_uuid: VariantUuid::from_uuid(row.try_get("variant_uuid")?),
            period,
            amount,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
