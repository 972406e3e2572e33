//! Units service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        catalog::records::VariantUuid,
        tenants::records::TenantUuid,
        units::{
            data::NewUnit,
            errors::UnitsServiceError,
            records::{UnitRecord, UnitStatus, UnitUuid},
            repository::PgUnitsRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct PgUnitsService {
    db: Db,
    repository: PgUnitsRepository,
}

impl PgUnitsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgUnitsRepository::new(),
        }
    }
}

#[async_trait]
impl UnitsService for PgUnitsService {
    async fn create_unit(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
        unit: NewUnit,
    ) -> Result<UnitRecord, UnitsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let created = self.repository.create_unit(&mut tx, variant, &unit).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn list_units(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
        point_in_time: Timestamp,
    ) -> Result<Vec<UnitRecord>, UnitsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        self.repository
            .find_variant(&mut tx, variant, point_in_time)
            .await?;

        let units = self
            .repository
            .list_units(&mut tx, variant, point_in_time)
            .await?;

        tx.commit().await?;

        Ok(units)
    }

    async fn set_unit_status(
        &self,
        tenant: TenantUuid,
        unit: UnitUuid,
        status: UnitStatus,
    ) -> Result<UnitRecord, UnitsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let updated = self.repository.set_unit_status(&mut tx, unit, status).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_unit(
        &self,
        tenant: TenantUuid,
        unit: UnitUuid,
    ) -> Result<(), UnitsServiceError> {
        let mut tx = self.db.begin_tenant_transaction(tenant).await?;

        let rows_affected = self.repository.delete_unit(&mut tx, unit).await?;

        if rows_affected == 0 {
            return Err(UnitsServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait UnitsService: Send + Sync {
    /// Registers a new physical unit under a variant.
    async fn create_unit(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
        unit: NewUnit,
    ) -> Result<UnitRecord, UnitsServiceError>;

    /// List the units of a variant.
    async fn list_units(
        &self,
        tenant: TenantUuid,
        variant: VariantUuid,
        point_in_time: Timestamp,
    ) -> Result<Vec<UnitRecord>, UnitsServiceError>;

    /// Moves a unit between `rentable`, `maintenance` and `retired`.
    async fn set_unit_status(
        &self,
        tenant: TenantUuid,
        unit: UnitUuid,
        status: UnitStatus,
    ) -> Result<UnitRecord, UnitsServiceError>;

    /// Soft-deletes a unit.
    async fn delete_unit(
        &self,
        tenant: TenantUuid,
        unit: UnitUuid,
    ) -> Result<(), UnitsServiceError>;
}
