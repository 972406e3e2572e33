//! Catalog Data

use rustc_hash::FxHashMap;

use crate::domain::catalog::records::{ProductUuid, VariantUuid};

/// New Product Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub uuid: ProductUuid,
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// Product Update Data
///
/// Full replacement of the mutable product fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductUpdate {
    pub name: String,
    pub category: Option<String>,
    pub description: Option<String>,
}

/// New Variant Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewVariant {
    pub uuid: VariantUuid,
    pub name: String,
    pub attributes: FxHashMap<String, String>,
}

/// Variant Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct VariantUpdate {
    pub name: String,
    pub attributes: FxHashMap<String, String>,
}
