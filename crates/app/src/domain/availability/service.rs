//! Availability service.

use async_trait::async_trait;
use jiff::{Timestamp, civil::Date};
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        availability::{
            errors::AvailabilityServiceError,
            overlap::{disabled_dates_in_window, midnight_utc},
            records::Availability,
            repository::PgAvailabilityRepository,
        },
        catalog::records::VariantUuid,
        tenants::records::TenantUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgAvailabilityService {
    db: Db,
    repository: PgAvailabilityRepository,
}

impl PgAvailabilityService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAvailabilityRepository::new(),
        }
    }
}

#[async_trait]
impl AvailabilityService for PgAvailabilityService {
    async fn check_availability(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<Availability, AvailabilityServiceError> {
        if until <= from {
            return Err(AvailabilityServiceError::InvalidRange);
        }

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        self.repository.find_variant(&mut tx, variant).await?;

        let pool = self.repository.count_pool(&mut tx, variant).await?;

        let booked = self
            .repository
            .count_booked(&mut tx, variant, from, until)
            .await?;

        tx.commit().await?;

        Ok(Availability {
            pool,
            booked,
            free: pool.saturating_sub(booked),
        })
    }

    async fn disabled_dates(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
        start: Date,
        end: Date,
        quantity: u64,
    ) -> Result<Vec<Date>, AvailabilityServiceError> {
        if end < start {
            return Err(AvailabilityServiceError::InvalidRange);
        }

        let window_start = midnight_utc(start)?;

        let window_end = midnight_utc(
            end.tomorrow()
                .map_err(|_| AvailabilityServiceError::InvalidRange)?,
        )?;

        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        self.repository.find_variant(&mut tx, variant).await?;

        let pool = self.repository.count_pool(&mut tx, variant).await?;

        let booked = self
            .repository
            .list_booked_ranges(&mut tx, variant, window_start, window_end)
            .await?;

        tx.commit().await?;

        disabled_dates_in_window(start, end, pool, quantity, &booked)
    }
}

#[automock]
#[async_trait]
pub trait AvailabilityService: Send + Sync {
    /// Count the variant's pool, booked and free units over `[from, until)`.
    async fn check_availability(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
        from: Timestamp,
        until: Timestamp,
    ) -> Result<Availability, AvailabilityServiceError>;

    /// The dates within `[start, end]` on which fewer than `quantity` units
    /// are free for the whole day.
    async fn disabled_dates(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
        start: Date,
        end: Date,
        quantity: u64,
    ) -> Result<Vec<Date>, AvailabilityServiceError>;
}
