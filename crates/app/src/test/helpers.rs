//! Test helpers for building up catalog fixtures.

use std::sync::atomic::{AtomicU32, Ordering};

use rustc_hash::FxHashMap;

use crate::{
    domain::{
        catalog::{
            CatalogService, CatalogServiceError,
            data::{NewProduct, NewVariant},
            records::{ProductUuid, VariantUuid},
        },
        tenants::records::TenantUuid,
        units::{UnitsService, UnitsServiceError, data::NewUnit, records::UnitUuid},
    },
    test::TestContext,
};

/// Unit codes are unique per tenant, so every helper-minted code draws
/// from one process-wide sequence.
static UNIT_CODE_SEQ: AtomicU32 = AtomicU32::new(1);

/// A product with a single variant, ready to hang units and prices off.
pub(crate) async fn create_variant(
    ctx: &TestContext,
    tenant: TenantUuid,
) -> Result<VariantUuid, CatalogServiceError> {
    let product = ctx
        .catalog
        .create_product(
            tenant,
            NewProduct {
                uuid: ProductUuid::new(),
                name: "Party tent".to_string(),
                category: Some("Tents".to_string()),
                description: None,
            },
        )
        .await?;

    let variant = ctx
        .catalog
        .create_variant(
            tenant,
            product.uuid,
            NewVariant {
                uuid: VariantUuid::new(),
                name: "Party tent 6x3".to_string(),
                attributes: FxHashMap::default(),
            },
        )
        .await?;

    Ok(variant.uuid)
}

/// `count` rentable units under the variant, coded `PB-<sequence>`.
pub(crate) async fn create_units(
    ctx: &TestContext,
    variant: VariantUuid,
    count: usize,
) -> Result<Vec<UnitUuid>, UnitsServiceError> {
    let mut units = Vec::with_capacity(count);

    for _ in 0..count {
        let code = format!("PB-{:03}", UNIT_CODE_SEQ.fetch_add(1, Ordering::Relaxed));

        let unit = ctx
            .units
            .create_unit(
                ctx.tenant_uuid,
                variant,
                NewUnit {
                    uuid: UnitUuid::new(),
                    code,
                },
            )
            .await?;

        units.push(unit.uuid);
    }

    Ok(units)
}
