//! Variants Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use rustc_hash::FxHashMap;
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, types::Json,
};

use crate::domain::catalog::{
    data::{NewVariant, VariantUpdate},
    records::{ProductUuid, VariantRecord, VariantUuid},
};

const LIST_VARIANTS_SQL: &str = include_str!("../sql/list_variants.sql");
const GET_VARIANT_SQL: &str = include_str!("../sql/get_variant.sql");
const CREATE_VARIANT_SQL: &str = include_str!("../sql/create_variant.sql");
const UPDATE_VARIANT_SQL: &str = include_str!("../sql/update_variant.sql");
const DELETE_VARIANT_SQL: &str = include_str!("../sql/delete_variant.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgVariantsRepository;

impl PgVariantsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_variants(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        point_in_time: Timestamp,
    ) -> Result<Vec<VariantRecord>, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(LIST_VARIANTS_SQL)
            .bind(product.into_uuid())
            .bind(SqlxTimestamp::from(point_in_time))
            .fetch_all(&mut **tx)
            .await
    }

    /// Fetch a variant, joined against its product so that variants of
    /// deleted products stay hidden.
    pub(crate) async fn get_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        point_in_time: Timestamp,
    ) -> Result<VariantRecord, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(GET_VARIANT_SQL)
            .bind(variant.into_uuid())
            .bind(SqlxTimestamp::from(point_in_time))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        product: ProductUuid,
        variant: &NewVariant,
    ) -> Result<VariantRecord, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(CREATE_VARIANT_SQL)
            .bind(variant.uuid.into_uuid())
            .bind(product.into_uuid())
            .bind(&variant.name)
            .bind(Json(&variant.attributes))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
        update: &VariantUpdate,
    ) -> Result<VariantRecord, sqlx::Error> {
        query_as::<Postgres, VariantRecord>(UPDATE_VARIANT_SQL)
            .bind(variant.into_uuid())
            .bind(&update.name)
            .bind(Json(&update.attributes))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_variant(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        variant: VariantUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_VARIANT_SQL)
            .bind(variant.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for VariantRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let attributes: Json<FxHashMap<String, String>> = row.try_get("attributes")?;

        Ok(Self {
            uuid: VariantUuid::from_uuid(row.try_get("uuid")?),
            product_uuid: ProductUuid::from_uuid(row.try_get("product_uuid")?),
            name: row.try_get("name")?,
            attributes: attributes.0,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
