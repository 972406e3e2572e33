//! Cart Data

use jiff::Timestamp;

use crate::domain::{carts::records::CartUuid, catalog::records::VariantUuid};

/// New Cart Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCart {
    pub uuid: CartUuid,
}

/// New Cart Item Data
///
/// Item UUIDs are generated server-side because a single request can
/// expand into `quantity` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub variant_uuid: VariantUuid,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub quantity: u32,
}
