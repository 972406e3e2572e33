//! Fulfillment Repository
//!
//! The agenda queries and per-detail handover transitions behind the
//! daily pickups and returns back office.

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};

use crate::domain::bookings::records::{
    AgendaItemRecord, BookingDetailRecord, BookingDetailUuid, BookingStatus, BookingUuid,
    FulfillmentStatus,
};

const DUE_PICKUPS_SQL: &str = include_str!("../sql/due_pickups.sql");
const DUE_RETURNS_SQL: &str = include_str!("../sql/due_returns.sql");
const FIND_DETAIL_FOR_UPDATE_SQL: &str = include_str!("../sql/find_detail_for_update.sql");
const SET_DETAIL_FULFILLMENT_SQL: &str = include_str!("../sql/set_detail_fulfillment.sql");
const COUNT_UNRETURNED_SQL: &str = include_str!("../sql/count_unreturned.sql");

/// A detail and its booking as they stand, read under row locks.
#[derive(Debug, Clone)]
pub(crate) struct DetailState {
    pub(crate) booking_uuid: BookingUuid,
    pub(crate) fulfillment: FulfillmentStatus,
    pub(crate) booking_status: BookingStatus,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgFulfillmentRepository;

impl PgFulfillmentRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Details to hand over within the UTC day `[day_start, day_end)`.
    pub(crate) async fn due_pickups(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        day_start: Timestamp,
        day_end: Timestamp,
    ) -> Result<Vec<AgendaItemRecord>, sqlx::Error> {
        query_as::<Postgres, AgendaItemRecord>(DUE_PICKUPS_SQL)
            .bind(SqlxTimestamp::from(day_start))
            .bind(SqlxTimestamp::from(day_end))
            .fetch_all(&mut **tx)
            .await
    }

    /// Details out with customers and due back before `day_end`,
    /// overdue ones included.
    pub(crate) async fn due_returns(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        day_end: Timestamp,
    ) -> Result<Vec<AgendaItemRecord>, sqlx::Error> {
        query_as::<Postgres, AgendaItemRecord>(DUE_RETURNS_SQL)
            .bind(SqlxTimestamp::from(day_end))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn find_detail_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        detail: BookingDetailUuid,
    ) -> Result<DetailState, sqlx::Error> {
        query_as::<Postgres, DetailState>(FIND_DETAIL_FOR_UPDATE_SQL)
            .bind(detail.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_detail_fulfillment(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        detail: BookingDetailUuid,
        fulfillment: FulfillmentStatus,
    ) -> Result<BookingDetailRecord, sqlx::Error> {
        query_as::<Postgres, BookingDetailRecord>(SET_DETAIL_FULFILLMENT_SQL)
            .bind(detail.into_uuid())
            .bind(fulfillment.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn count_unreturned(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
    ) -> Result<u64, sqlx::Error> {
        let count: i64 = query_scalar(COUNT_UNRETURNED_SQL)
            .bind(booking.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(count.max(0) as u64)
    }
}

impl<'r> FromRow<'r, PgRow> for DetailState {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let fulfillment = row
            .try_get::<String, _>("fulfillment")?
            .parse::<FulfillmentStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "fulfillment".to_string(),
                source: Box::new(e),
            })?;

        let booking_status = row
            .try_get::<String, _>("status")?
            .parse::<BookingStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            booking_uuid: BookingUuid::from_uuid(row.try_get("booking_uuid")?),
            fulfillment,
            booking_status,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for AgendaItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let fulfillment = row
            .try_get::<String, _>("fulfillment")?
            .parse::<FulfillmentStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "fulfillment".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            detail_uuid: BookingDetailUuid::from_uuid(row.try_get("detail_uuid")?),
            booking_uuid: BookingUuid::from_uuid(row.try_get("booking_uuid")?),
            product_name: row.try_get("product_name")?,
            variant_name: row.try_get("variant_name")?,
            unit_code: row.try_get("unit_code")?,
            customer_name: row.try_get("customer_name")?,
            starts_at: row.try_get::<SqlxTimestamp, _>("starts_at")?.to_jiff(),
            ends_at: row.try_get::<SqlxTimestamp, _>("ends_at")?.to_jiff(),
            fulfillment,
        })
    }
}
