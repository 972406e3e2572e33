//! Availability Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{availability::records::BookedRange, catalog::records::VariantUuid};

const FIND_VARIANT_SQL: &str = include_str!("sql/find_variant.sql");
const COUNT_POOL_SQL: &str = include_str!("sql/count_pool.sql");
const COUNT_BOOKED_SQL: &str = include_str!("sql/count_booked.sql");
const LIST_BOOKED_RANGES_SQL: &str = include_str!("sql/list_booked_ranges.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAvailabilityRepository;

impl PgAvailabilityRepository {
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

    /// Units held over `[from, until)` by active booking details: distinct
    /// assigned units plus one per unassigned cart detail.
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

    /// Active booked intervals of the variant overlapping `[from, until)`.
    pub(crate) async fn list_booked_ranges(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<Vec<BookedRange>, sqlx::Error> {
        query_as::<Postgres, BookedRange>(LIST_BOOKED_RANGES_SQL)
            .bind(variant.into_uuid())
            .bind(SqlxTimestamp::from(from))
            .bind(SqlxTimestamp::from(until))
            .fetch_all(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for BookedRange {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            unit_uuid: row.try_get("unit_uuid")?,
            starts_at: row.try_get::<SqlxTimestamp, _>("starts_at")?.to_jiff(),
            ends_at: row.try_get::<SqlxTimestamp, _>("ends_at")?.to_jiff(),
        })
    }
}
