//! Bookings service.
//!
//! Checkout is the only place units are assigned to bookings. It runs
//! under per-variant advisory locks with a deterministic candidate
//! order, so two checkouts contending for the last unit serialize and
//! exactly one of them succeeds.

use async_trait::async_trait;
use jiff::{Timestamp, civil::Date, tz::TimeZone};
use mockall::automock;
use rustc_hash::FxHashMap;
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::{
        bookings::{
            data::CheckoutCustomer,
            errors::BookingsServiceError,
            records::{
                AgendaItemRecord, BookingDetailRecord, BookingDetailUuid, BookingRecord,
                BookingStatus, BookingUuid, FulfillmentStatus,
            },
            repositories::{
                PgBookingDetailsRepository, PgBookingsRepository, PgFulfillmentRepository,
            },
        },
        carts::records::CartUuid,
        catalog::records::VariantUuid,
        pricing::quote::RateTable,
        tenants::records::TenantUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgBookingsService {
    db: Db,
    bookings_repository: PgBookingsRepository,
    details_repository: PgBookingDetailsRepository,
    fulfillment_repository: PgFulfillmentRepository,
}

impl PgBookingsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            bookings_repository: PgBookingsRepository::new(),
            details_repository: PgBookingDetailsRepository::new(),
            fulfillment_repository: PgFulfillmentRepository::new(),
        }
    }
}

#[async_trait]
impl BookingsService for PgBookingsService {
    #[tracing::instrument(
        name = "bookings.service.checkout",
        skip(self, customer),
        fields(
            tenant_uuid = %tenant,
            cart_uuid = %cart,
            detail_count = tracing::field::Empty,
            total = tracing::field::Empty
        ),
        err
    )]
    async fn checkout(
        &self,
        tenant: TenantUuid,
        cart: CartUuid,
        customer: CheckoutCustomer,
    ) -> Result<BookingRecord, BookingsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let booking = BookingUuid::from_uuid(cart.into_uuid());

        let status = self
            .bookings_repository
            .find_booking_for_update(&mut tx, booking)
            .await?;

        if status != BookingStatus::Cart {
            return Err(BookingsServiceError::NotACart);
        }

        let details = self
            .details_repository
            .list_details(&mut tx, booking, Timestamp::now())
            .await?;

        if details.is_empty() {
            return Err(BookingsServiceError::EmptyCart);
        }

        let span = Span::current();

        span.record("detail_count", tracing::field::display(details.len()));

        // One reservation group per (variant, interval); each group
        // draws from its candidate pool once.
        let mut grouped: FxHashMap<(VariantUuid, Timestamp, Timestamp), Vec<BookingDetailUuid>> =
            FxHashMap::default();

        for detail in &details {
            grouped
                .entry((detail.variant_uuid, detail.starts_at, detail.ends_at))
                .or_default()
                .push(detail.uuid);
        }

        let mut groups: Vec<_> = grouped.into_iter().collect();

        groups.sort_by_key(|((variant, starts_at, ends_at), _)| {
            (*variant, *starts_at, *ends_at)
        });

        // Advisory locks in sorted variant order, so concurrent
        // checkouts queue up instead of deadlocking.
        let mut variants: Vec<VariantUuid> =
            groups.iter().map(|((variant, _, _), _)| *variant).collect();

        variants.dedup();

        for variant in &variants {
            self.details_repository.lock_variant(&mut tx, *variant).await?;
        }

        let mut rate_tables: FxHashMap<VariantUuid, RateTable> = FxHashMap::default();

        for ((variant, starts_at, ends_at), detail_uuids) in groups {
            let candidates = self
                .details_repository
                .candidate_units(&mut tx, variant, starts_at, ends_at)
                .await?;

            if candidates.len() < detail_uuids.len() {
                return Err(BookingsServiceError::Unavailable {
                    variant,
                    missing: (detail_uuids.len() - candidates.len()) as u64,
                });
            }

            let table = match rate_tables.get(&variant) {
                Some(table) => *table,
                None => {
                    let table = self
                        .details_repository
                        .load_rate_table(&mut tx, variant)
                        .await?;

                    rate_tables.insert(variant, table);

                    table
                }
            };

            let quote = table.quote(starts_at, ends_at)?;

            for (detail_uuid, unit) in detail_uuids.into_iter().zip(candidates) {
                self.details_repository
                    .assign_unit(&mut tx, detail_uuid, unit, quote.total)
                    .await?;
            }
        }

        let rows_affected = self
            .bookings_repository
            .confirm_booking(&mut tx, booking, &customer)
            .await?;

        if rows_affected == 0 {
            return Err(BookingsServiceError::NotACart);
        }

        let mut record = self
            .bookings_repository
            .get_booking(&mut tx, booking, Timestamp::now())
            .await?;

        let details = self
            .details_repository
            .list_details(&mut tx, booking, Timestamp::now())
            .await?;

        tx.commit().await?;

        record.details.extend(details);

        span.record("total", record.total);

        info!(booking_uuid = %record.uuid, "confirmed booking");

        Ok(record)
    }

    async fn get_booking(
        &self,
        tenant: TenantUuid,
        booking: BookingUuid,
        point_in_time: Timestamp,
    ) -> Result<BookingRecord, BookingsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let mut record = self
            .bookings_repository
            .get_booking(&mut tx, booking, point_in_time)
            .await?;

        let details = self
            .details_repository
            .list_details(&mut tx, booking, point_in_time)
            .await?;

        tx.commit().await?;

        record.details.extend(details);

        Ok(record)
    }

    async fn list_bookings(
        &self,
        tenant: TenantUuid,
        status: Option<BookingStatus>,
        point_in_time: Timestamp,
    ) -> Result<Vec<BookingRecord>, BookingsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let bookings = self
            .bookings_repository
            .list_bookings(&mut tx, status, point_in_time)
            .await?;

        tx.commit().await?;

        Ok(bookings)
    }

    async fn cancel_booking(
        &self,
        tenant: TenantUuid,
        booking: BookingUuid,
    ) -> Result<BookingRecord, BookingsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let status = self
            .bookings_repository
            .find_booking_for_update(&mut tx, booking)
            .await?;

        if !matches!(status, BookingStatus::Cart | BookingStatus::Confirmed) {
            return Err(BookingsServiceError::NotCancellable);
        }

        if self
            .details_repository
            .has_started_fulfillment(&mut tx, booking)
            .await?
        {
            return Err(BookingsServiceError::PickupStarted);
        }

        self.details_repository
            .release_units(&mut tx, booking)
            .await?;

        let rows_affected = self
            .bookings_repository
            .cancel_booking(&mut tx, booking)
            .await?;

        if rows_affected == 0 {
            return Err(BookingsServiceError::NotCancellable);
        }

        let mut record = self
            .bookings_repository
            .get_booking(&mut tx, booking, Timestamp::now())
            .await?;

        let details = self
            .details_repository
            .list_details(&mut tx, booking, Timestamp::now())
            .await?;

        tx.commit().await?;

        record.details.extend(details);

        info!(booking_uuid = %record.uuid, "cancelled booking");

        Ok(record)
    }

    async fn due_pickups(
        &self,
        tenant: TenantUuid,
        date: Date,
    ) -> Result<Vec<AgendaItemRecord>, BookingsServiceError> {
        let (day_start, day_end) = day_bounds(date)?;

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let items = self
            .fulfillment_repository
            .due_pickups(&mut tx, day_start, day_end)
            .await?;

        tx.commit().await?;

        Ok(items)
    }

    async fn due_returns(
        &self,
        tenant: TenantUuid,
        date: Date,
    ) -> Result<Vec<AgendaItemRecord>, BookingsServiceError> {
        let (_, day_end) = day_bounds(date)?;

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let items = self
            .fulfillment_repository
            .due_returns(&mut tx, day_end)
            .await?;

        tx.commit().await?;

        Ok(items)
    }

    async fn mark_picked_up(
        &self,
        tenant: TenantUuid,
        detail: BookingDetailUuid,
    ) -> Result<BookingDetailRecord, BookingsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let state = self
            .fulfillment_repository
            .find_detail_for_update(&mut tx, detail)
            .await?;

        if state.booking_status != BookingStatus::Confirmed
            || state.fulfillment != FulfillmentStatus::ToPickup
        {
            return Err(BookingsServiceError::InvalidFulfillmentState);
        }

        let updated = self
            .fulfillment_repository
            .set_detail_fulfillment(&mut tx, detail, FulfillmentStatus::PickedUp)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn mark_returned(
        &self,
        tenant: TenantUuid,
        detail: BookingDetailUuid,
    ) -> Result<BookingDetailRecord, BookingsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let state = self
            .fulfillment_repository
            .find_detail_for_update(&mut tx, detail)
            .await?;

        if state.booking_status != BookingStatus::Confirmed
            || state.fulfillment != FulfillmentStatus::PickedUp
        {
            return Err(BookingsServiceError::InvalidFulfillmentState);
        }

        let updated = self
            .fulfillment_repository
            .set_detail_fulfillment(&mut tx, detail, FulfillmentStatus::Returned)
            .await?;

        let unreturned = self
            .fulfillment_repository
            .count_unreturned(&mut tx, state.booking_uuid)
            .await?;

        if unreturned == 0 {
            self.bookings_repository
                .complete_booking(&mut tx, state.booking_uuid)
                .await?;
        }

        tx.commit().await?;

        Ok(updated)
    }
}

/// UTC day bounds `[start, end)` of an agenda date.
fn day_bounds(date: Date) -> Result<(Timestamp, Timestamp), BookingsServiceError> {
    let start = date
        .to_zoned(TimeZone::UTC)
        .map_err(|_| BookingsServiceError::InvalidData)?
        .timestamp();

    let end = date
        .tomorrow()
        .and_then(|next| next.to_zoned(TimeZone::UTC))
        .map_err(|_| BookingsServiceError::InvalidData)?
        .timestamp();

    Ok((start, end))
}

#[automock]
#[async_trait]
pub trait BookingsService: Send + Sync {
    /// Checks a cart out into a confirmed booking.
    ///
    /// Reserves one concrete unit per cart item under per-variant
    /// locks, re-quotes every item at current prices and records the
    /// customer. Rolls back with `Unavailable` when any item group has
    /// fewer free units than items.
    async fn checkout(
        &self,
        tenant: TenantUuid,
        cart: CartUuid,
        customer: CheckoutCustomer,
    ) -> Result<BookingRecord, BookingsServiceError>;

    /// Retrieve a booking with its details.
    async fn get_booking(
        &self,
        tenant: TenantUuid,
        booking: BookingUuid,
        point_in_time: Timestamp,
    ) -> Result<BookingRecord, BookingsServiceError>;

    /// List bookings, optionally narrowed to one status. Without a
    /// filter, in-progress carts are left out.
    async fn list_bookings(
        &self,
        tenant: TenantUuid,
        status: Option<BookingStatus>,
        point_in_time: Timestamp,
    ) -> Result<Vec<BookingRecord>, BookingsServiceError>;

    /// Cancels a cart or confirmed booking before any pickup. The
    /// status change alone frees the units for other bookings.
    async fn cancel_booking(
        &self,
        tenant: TenantUuid,
        booking: BookingUuid,
    ) -> Result<BookingRecord, BookingsServiceError>;

    /// Confirmed details to hand over on the given UTC date.
    async fn due_pickups(
        &self,
        tenant: TenantUuid,
        date: Date,
    ) -> Result<Vec<AgendaItemRecord>, BookingsServiceError>;

    /// Details out with customers and due back on or before the given
    /// UTC date. Overdue returns stay listed until they come back.
    async fn due_returns(
        &self,
        tenant: TenantUuid,
        date: Date,
    ) -> Result<Vec<AgendaItemRecord>, BookingsServiceError>;

    /// Hands a unit over to the customer.
    async fn mark_picked_up(
        &self,
        tenant: TenantUuid,
        detail: BookingDetailUuid,
    ) -> Result<BookingDetailRecord, BookingsServiceError>;

    /// Takes a unit back. Returning the last open detail completes the
    /// booking.
    async fn mark_returned(
        &self,
        tenant: TenantUuid,
        detail: BookingDetailUuid,
    ) -> Result<BookingDetailRecord, BookingsServiceError>;
}
