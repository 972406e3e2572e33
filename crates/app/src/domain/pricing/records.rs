//! Price Records

use std::str::FromStr;

use jiff::Timestamp;
use thiserror::Error;

use crate::{domain::catalog::records::VariantUuid, uuids::TypedUuid};

/// Price UUID
pub type PriceUuid = TypedUuid<PriceRecord>;

/// Price Record
///
/// One row per (variant, period); amounts are integer cents.
#[derive(Debug, Clone)]
pub struct PriceRecord {
    pub uuid: PriceUuid,
    pub variant_uuid: VariantUuid,
    pub period: PricePeriod,
    pub amount: u64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Price Period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PricePeriod {
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl PricePeriod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// Error raised when parsing an unrecognised price period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unrecognised price period")]
pub struct ParsePricePeriodError;

impl FromStr for PricePeriod {
    type Err = ParsePricePeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hourly" => Ok(Self::Hourly),
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(ParsePricePeriodError),
        }
    }
}
