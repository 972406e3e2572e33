//! Booking Details Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    bookings::records::{
        BookingDetailRecord, BookingDetailUuid, BookingUuid, FulfillmentStatus,
    },
    catalog::records::VariantUuid,
    pricing::{quote::RateTable, records::PricePeriod},
    units::records::UnitUuid,
};

use super::bookings::try_get_amount;

const LIST_DETAILS_SQL: &str = include_str!("../sql/list_details.sql");
const LOCK_VARIANT_SQL: &str = include_str!("../sql/lock_variant.sql");
const CANDIDATE_UNITS_SQL: &str = include_str!("../sql/candidate_units.sql");
const ASSIGN_UNIT_SQL: &str = include_str!("../sql/assign_unit.sql");
const LIST_PRICE_ROWS_SQL: &str = include_str!("../sql/list_price_rows.sql");
const HAS_STARTED_FULFILLMENT_SQL: &str = include_str!("../sql/has_started_fulfillment.sql");
const RELEASE_UNITS_SQL: &str = include_str!("../sql/release_units.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgBookingDetailsRepository;

impl PgBookingDetailsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_details(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
        point_in_time: Timestamp,
    ) -> Result<Vec<BookingDetailRecord>, sqlx::Error> {
        query_as::<Postgres, BookingDetailRecord>(LIST_DETAILS_SQL)
            .bind(booking.into_uuid())
            .bind(SqlxTimestamp::from(point_in_time))
            .fetch_all(&mut **tx)
            .await
    }

    /// Serializes unit reservation per variant for the rest of the
    /// transaction. Callers must take locks in sorted variant order.
    pub(crate) async fn lock_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
    ) -> Result<(), sqlx::Error> {
        query(LOCK_VARIANT_SQL)
            .bind(variant.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Rentable units of the variant free over `[from, until)`, in code
    /// order, locked against concurrent writes.
    pub(crate) async fn candidate_units(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<Vec<UnitUuid>, sqlx::Error> {
        let uuids: Vec<Uuid> = query_scalar(CANDIDATE_UNITS_SQL)
            .bind(variant.into_uuid())
            .bind(SqlxTimestamp::from(from))
            .bind(SqlxTimestamp::from(until))
            .fetch_all(&mut **tx)
            .await?;

        Ok(uuids.into_iter().map(UnitUuid::from_uuid).collect())
    }

    pub(crate) async fn assign_unit(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        detail: BookingDetailUuid,
        unit: UnitUuid,
        price: u64,
    ) -> Result<u64, sqlx::Error> {
        let price = i64::try_from(price).map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        let rows_affected = query(ASSIGN_UNIT_SQL)
            .bind(detail.into_uuid())
            .bind(unit.into_uuid())
            .bind(price)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    /// Price rows of the variant, ready for re-quoting at checkout.
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

    pub(crate) async fn has_started_fulfillment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar(HAS_STARTED_FULFILLMENT_SQL)
            .bind(booking.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Detaches every unit of the booking, taking the rows out of the
    /// no-overlap constraint's scope.
    pub(crate) async fn release_units(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(RELEASE_UNITS_SQL)
            .bind(booking.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for BookingDetailRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let fulfillment = row
            .try_get::<String, _>("fulfillment")?
            .parse::<FulfillmentStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "fulfillment".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            uuid: BookingDetailUuid::from_uuid(row.try_get("uuid")?),
            booking_uuid: BookingUuid::from_uuid(row.try_get("booking_uuid")?),
            variant_uuid: VariantUuid::from_uuid(row.try_get("variant_uuid")?),
            unit_uuid: row
                .try_get::<Option<Uuid>, _>("unit_uuid")?
                .map(UnitUuid::from_uuid),
            starts_at: row.try_get::<SqlxTimestamp, _>("starts_at")?.to_jiff(),
            ends_at: row.try_get::<SqlxTimestamp, _>("ends_at")?.to_jiff(),
            price: try_get_amount(row, "price")?,
            fulfillment,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
