//! Product catalog

pub mod data;
pub mod errors;
pub mod records;
mod repositories;
pub mod service;

pub use errors::CatalogServiceError;
pub use service::*;
