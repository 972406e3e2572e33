//! Availability Records

use jiff::Timestamp;
use uuid::Uuid;

/// Free-unit arithmetic for one variant over one interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Availability {
    /// Rentable units of the variant.
    pub pool: u64,
    /// Units held by an overlapping active booking detail.
    pub booked: u64,
    /// `pool - booked`, floored at zero.
    pub free: u64,
}

/// One unit of booked demand over a half-open interval.
///
/// `unit_uuid` is `None` for cart details that have not been assigned a
/// physical unit yet; each such row still holds one unit of demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedRange {
    pub unit_uuid: Option<Uuid>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
}
