//! Availability

pub mod errors;
pub mod overlap;
pub mod records;
mod repository;
pub mod service;

pub use errors::AvailabilityServiceError;
pub use service::*;
