//! Unit Records

use std::str::FromStr;

use jiff::Timestamp;
use thiserror::Error;

use crate::{domain::catalog::records::VariantUuid, uuids::TypedUuid};

/// Unit UUID
pub type UnitUuid = TypedUuid<UnitRecord>;

/// Unit Record
///
/// One physical asset behind a variant, identified to staff by its code.
#[derive(Debug, Clone)]
pub struct UnitRecord {
    pub uuid: UnitUuid,
    pub variant_uuid: VariantUuid,
    pub code: String,
    pub status: UnitStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

/// Unit Status
///
/// Only `Rentable` units are counted or reserved; `Maintenance` and
/// `Retired` units are withdrawn from the pool without deleting their
/// booking history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitStatus {
    Rentable,
    Maintenance,
    Retired,
}

impl UnitStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rentable => "rentable",
            Self::Maintenance => "maintenance",
            Self::Retired => "retired",
        }
    }
}

/// Error raised when parsing an unrecognised unit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unrecognised unit status")]
pub struct ParseUnitStatusError;

impl FromStr for UnitStatus {
    type Err = ParseUnitStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rentable" => Ok(Self::Rentable),
            "maintenance" => Ok(Self::Maintenance),
            "retired" => Ok(Self::Retired),
            _ => Err(ParseUnitStatusError),
        }
    }
}
