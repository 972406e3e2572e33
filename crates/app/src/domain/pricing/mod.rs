//! Price lists and quotes

pub mod errors;
pub mod quote;
pub mod records;
mod repository;
pub mod service;

pub use errors::PricingServiceError;
pub use service::*;
