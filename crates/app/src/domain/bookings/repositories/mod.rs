//! Booking Repositories

mod bookings;
mod details;
mod fulfillment;

pub(crate) use bookings::PgBookingsRepository;
pub(crate) use details::PgBookingDetailsRepository;
pub(crate) use fulfillment::PgFulfillmentRepository;
