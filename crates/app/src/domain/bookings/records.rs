//! Booking Records

use std::str::FromStr;

use jiff::Timestamp;
use thiserror::Error;

use crate::{
    domain::{catalog::records::VariantUuid, units::records::UnitUuid},
    uuids::TypedUuid,
};

/// Booking UUID
pub type BookingUuid = TypedUuid<BookingRecord>;

/// Booking Record
#[derive(Debug, Clone)]
pub struct BookingRecord {
    pub uuid: BookingUuid,
    pub status: BookingStatus,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub total: u64,
    pub details: Vec<BookingDetailRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Booking Detail UUID
pub type BookingDetailUuid = TypedUuid<BookingDetailRecord>;

/// Booking Detail Record
///
/// One rentable unit's worth of demand over a half-open interval.
/// `unit_uuid` stays empty until checkout assigns a concrete unit.
#[derive(Debug, Clone)]
pub struct BookingDetailRecord {
    pub uuid: BookingDetailUuid,
    pub booking_uuid: BookingUuid,
    pub variant_uuid: VariantUuid,
    pub unit_uuid: Option<UnitUuid>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub price: u64,
    pub fulfillment: FulfillmentStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Booking Status
///
/// `Cart` bookings are still being assembled and may be edited;
/// checkout moves them to `Confirmed`. `Cancelled` is reachable from
/// `Cart` and `Confirmed` until the first pickup, `Completed` only by
/// returning every detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingStatus {
    Cart,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cart => "cart",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }
}

/// Error raised when parsing an unrecognised booking status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unrecognised booking status")]
pub struct ParseBookingStatusError;

impl FromStr for BookingStatus {
    type Err = ParseBookingStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cart" => Ok(Self::Cart),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseBookingStatusError),
        }
    }
}

/// Fulfillment Status
///
/// Per-detail handover state: `ToPickup` until the customer collects the
/// unit, `PickedUp` while it is out, `Returned` once it is back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FulfillmentStatus {
    ToPickup,
    PickedUp,
    Returned,
}

impl FulfillmentStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ToPickup => "to_pickup",
            Self::PickedUp => "picked_up",
            Self::Returned => "returned",
        }
    }
}

/// Error raised when parsing an unrecognised fulfillment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unrecognised fulfillment status")]
pub struct ParseFulfillmentStatusError;

impl FromStr for FulfillmentStatus {
    type Err = ParseFulfillmentStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "to_pickup" => Ok(Self::ToPickup),
            "picked_up" => Ok(Self::PickedUp),
            "returned" => Ok(Self::Returned),
            _ => Err(ParseFulfillmentStatusError),
        }
    }
}

/// Agenda Item Record
///
/// A fulfillment work item for the admin agenda, denormalised for
/// display: what to hand over or take back, to whom, and when.
#[derive(Debug, Clone)]
pub struct AgendaItemRecord {
    pub detail_uuid: BookingDetailUuid,
    pub booking_uuid: BookingUuid,
    pub product_name: String,
    pub variant_name: String,
    pub unit_code: String,
    pub customer_name: Option<String>,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub fulfillment: FulfillmentStatus,
}
