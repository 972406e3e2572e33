//! Bookings Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::bookings::{
    data::CheckoutCustomer,
    records::{BookingRecord, BookingStatus, BookingUuid},
};

const FIND_BOOKING_FOR_UPDATE_SQL: &str = include_str!("../sql/find_booking_for_update.sql");
const GET_BOOKING_SQL: &str = include_str!("../sql/get_booking.sql");
const LIST_BOOKINGS_SQL: &str = include_str!("../sql/list_bookings.sql");
const CONFIRM_BOOKING_SQL: &str = include_str!("../sql/confirm_booking.sql");
const CANCEL_BOOKING_SQL: &str = include_str!("../sql/cancel_booking.sql");
const COMPLETE_BOOKING_SQL: &str = include_str!("../sql/complete_booking.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgBookingsRepository;

impl PgBookingsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Current status of the booking, locking its row for the rest of
    /// the transaction. Status transitions all start here.
    pub(crate) async fn find_booking_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
    ) -> Result<BookingStatus, sqlx::Error> {
        let status: String = query_scalar(FIND_BOOKING_FOR_UPDATE_SQL)
            .bind(booking.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        status
            .parse::<BookingStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })
    }

    pub(crate) async fn get_booking(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
        point_in_time: Timestamp,
    ) -> Result<BookingRecord, sqlx::Error> {
        query_as::<Postgres, BookingRecord>(GET_BOOKING_SQL)
            .bind(booking.into_uuid())
            .bind(SqlxTimestamp::from(point_in_time))
            .fetch_one(&mut **tx)
            .await
    }

    /// Bookings of the tenant, newest first. With no status filter the
    /// in-progress carts are left out.
    pub(crate) async fn list_bookings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: Option<BookingStatus>,
        point_in_time: Timestamp,
    ) -> Result<Vec<BookingRecord>, sqlx::Error> {
        query_as::<Postgres, BookingRecord>(LIST_BOOKINGS_SQL)
            .bind(SqlxTimestamp::from(point_in_time))
            .bind(status.map(BookingStatus::as_str))
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn confirm_booking(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
        customer: &CheckoutCustomer,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CONFIRM_BOOKING_SQL)
            .bind(booking.into_uuid())
            .bind(&customer.name)
            .bind(&customer.email)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn cancel_booking(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CANCEL_BOOKING_SQL)
            .bind(booking.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn complete_booking(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(COMPLETE_BOOKING_SQL)
            .bind(booking.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for BookingRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status = row
            .try_get::<String, _>("status")?
            .parse::<BookingStatus>()
            .map_err(|e| sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            })?;

        let total = try_get_amount(row, "total")?;

        let detail_count: i64 = row.try_get("detail_count")?;

        Ok(Self {
            uuid: BookingUuid::from_uuid(row.try_get("uuid")?),
            status,
            customer_name: row.try_get("customer_name")?,
            customer_email: row.try_get("customer_email")?,
            total,
            details: Vec::with_capacity(detail_count.max(0) as usize),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

pub(super) fn try_get_amount(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let amount_i64: i64 = row.try_get(col)?;

    u64::try_from(amount_i64).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}
