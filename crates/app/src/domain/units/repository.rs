//! Units Repository

use std::str::FromStr;

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::domain::{
    catalog::records::VariantUuid,
    units::{
        data::NewUnit,
        records::{UnitRecord, UnitStatus, UnitUuid},
    },
};

const FIND_VARIANT_SQL: &str = include_str!("sql/find_variant.sql");
const LIST_UNITS_SQL: &str = include_str!("sql/list_units.sql");
const CREATE_UNIT_SQL: &str = include_str!("sql/create_unit.sql");
const SET_UNIT_STATUS_SQL: &str = include_str!("sql/set_unit_status.sql");
const DELETE_UNIT_SQL: &str = include_str!("sql/delete_unit.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgUnitsRepository;

impl PgUnitsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Resolve a variant through row-level security, erroring with
    /// `RowNotFound` when it is deleted or belongs to another tenant.
    pub(crate) async fn find_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        point_in_time: Timestamp,
    ) -> Result<VariantUuid, sqlx::Error> {
        let uuid: Uuid = query_scalar(FIND_VARIANT_SQL)
            .bind(variant.into_uuid())
            .bind(SqlxTimestamp::from(point_in_time))
            .fetch_one(&mut **tx)
            .await?;

        Ok(VariantUuid::from_uuid(uuid))
    }

    pub(crate) async fn list_units(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        point_in_time: Timestamp,
    ) -> Result<Vec<UnitRecord>, sqlx::Error> {
        query_as::<Postgres, UnitRecord>(LIST_UNITS_SQL)
            .bind(variant.into_uuid())
            .bind(SqlxTimestamp::from(point_in_time))
            .fetch_all(&mut **tx)
            .await
    }

    /// Insert a unit, selecting the variant row so that unknown or foreign
    /// variants surface as `RowNotFound` instead of a foreign key error.
    pub(crate) async fn create_unit(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        unit: &NewUnit,
    ) -> Result<UnitRecord, sqlx::Error> {
        query_as::<Postgres, UnitRecord>(CREATE_UNIT_SQL)
            .bind(unit.uuid.into_uuid())
            .bind(variant.into_uuid())
            .bind(&unit.code)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_unit_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        unit: UnitUuid,
        status: UnitStatus,
    ) -> Result<UnitRecord, sqlx::Error> {
        query_as::<Postgres, UnitRecord>(SET_UNIT_STATUS_SQL)
            .bind(unit.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_unit(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        unit: UnitUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_UNIT_SQL)
            .bind(unit.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for UnitRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status: String = row.try_get("status")?;

        let status = UnitStatus::from_str(&status).map_err(|e| sqlx::Error::ColumnDecode {
            index: "status".to_string(),
            source: Box::new(e),
        })?;

        Ok(Self {
            uuid: UnitUuid::from_uuid(row.try_get("uuid")?),
            variant_uuid: VariantUuid::from_uuid(row.try_get("variant_uuid")?),
            code: row.try_get("code")?,
            status,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
