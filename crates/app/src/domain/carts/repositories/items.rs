//! Cart Items Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    carts::{
        data::NewCartItem,
        records::{CartItemRecord, CartItemUuid, CartUuid},
    },
    catalog::records::VariantUuid,
    pricing::{quote::RateTable, records::PricePeriod},
};

use super::carts::try_get_amount;

const GET_CART_ITEMS_SQL: &str = include_str!("../sql/get_cart_items.sql");
const CREATE_CART_ITEM_SQL: &str = include_str!("../sql/create_cart_item.sql");
const DELETE_CART_ITEM_SQL: &str = include_str!("../sql/delete_cart_item.sql");
const FIND_VARIANT_SQL: &str = include_str!("../sql/find_variant.sql");
const LIST_PRICE_ROWS_SQL: &str = include_str!("../sql/list_price_rows.sql");
const COUNT_POOL_SQL: &str = include_str!("../sql/count_pool.sql");
const COUNT_BOOKED_SQL: &str = include_str!("../sql/count_booked.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartItemsRepository;

impl PgCartItemsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_cart_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        point_in_time: Timestamp,
    ) -> Result<Vec<CartItemRecord>, sqlx::Error> {
        query_as::<Postgres, CartItemRecord>(GET_CART_ITEMS_SQL)
            .bind(cart.into_uuid())
            .bind(SqlxTimestamp::from(point_in_time))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        uuid: CartItemUuid,
        item: &NewCartItem,
        price: u64,
    ) -> Result<CartItemRecord, sqlx::Error> {
        let price = i64::try_from(price).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query_as::<Postgres, CartItemRecord>(CREATE_CART_ITEM_SQL)
            .bind(uuid.into_uuid())
            .bind(cart.into_uuid())
            .bind(item.variant_uuid.into_uuid())
            .bind(SqlxTimestamp::from(item.starts_at))
            .bind(SqlxTimestamp::from(item.ends_at))
            .bind(price)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_cart_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        cart: CartUuid,
        item: CartItemUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_CART_ITEM_SQL)
            .bind(item.into_uuid())
            .bind(cart.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
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

    /// Price rows of the variant, ready for quoting.
    pub(crate) async fn load_rate_table(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
    ) -> Result<RateTable, sqlx::Error> {
        let rows = query(LIST_PRICE_ROWS_SQL)
            .bind(variant.into_uuid())
            .fetch_all(&mut **tx)
            .await?;

        let mut table = RateTable::default();

        for row in &rows {
            let period = row
                .try_get::<String, _>("period")?
                .parse::<PricePeriod>()
                .map_err(|e| sqlx::Error::ColumnDecode {
                    index: "period".to_string(),
                    source: Box::new(e),
                })?;

            table.insert(period, try_get_amount(row, "amount")?);
        }

        Ok(table)
    }

    /// Rentable, non-deleted units of the variant.
    pub(crate) async fn count_pool(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_POOL_SQL)
            .bind(variant.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(count.max(0) as u64)
    }

    /// Units held over `[from, until)` by active booking details.
    pub(crate) async fn count_booked(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_BOOKED_SQL)
            .bind(variant.into_uuid())
            .bind(SqlxTimestamp::from(from))
            .bind(SqlxTimestamp::from(until))
            .fetch_one(&mut **tx)
            .await?;

        Ok(count.max(0) as u64)
    }
}

impl<'r> FromRow<'r, PgRow> for CartItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: CartItemUuid::from_uuid(row.try_get("uuid")?),
            variant_uuid: VariantUuid::from_uuid(row.try_get("variant_uuid")?),
            starts_at: row.try_get::<SqlxTimestamp, _>("starts_at")?.to_jiff(),
            ends_at: row.try_get::<SqlxTimestamp, _>("ends_at")?.to_jiff(),
            price: try_get_amount(row, "price")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
