//! Catalog Records

use jiff::Timestamp;
use rustc_hash::FxHashMap;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Variant UUID
pub type VariantUuid = TypedUuid<VariantRecord>;

/// Variant Record
///
/// A concrete, orderable configuration of a product. The attribute map
/// carries the distinguishing characteristics (size, colour, capacity).
#[derive(Debug, Clone)]
pub struct VariantRecord {
    pub uuid: VariantUuid,
    pub product_uuid: ProductUuid,
    pub name: String,
    pub attributes: FxHashMap<String, String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}
