//! Noleggio Domain Concerns

pub mod availability;
pub mod bookings;
pub mod carts;
pub mod catalog;
pub mod pricing;
pub mod tenants;
pub mod units;
