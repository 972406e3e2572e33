//! Cart Records

use jiff::Timestamp;

use crate::{domain::catalog::records::VariantUuid, uuids::TypedUuid};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
///
/// A booking that has not been checked out yet. `total` is the sum of
/// the item prices still in the cart.
#[derive(Debug, Clone)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub total: u64,
    pub items: Vec<CartItemRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRecord>;

/// Cart Item Record
///
/// One unit's worth of demand for a variant over a half-open interval,
/// priced when it was added. Adding quantity N creates N items.
#[derive(Debug, Clone)]
pub struct CartItemRecord {
    pub uuid: CartItemUuid,
    pub variant_uuid: VariantUuid,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub price: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}
