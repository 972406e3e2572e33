//! Unit Data

use crate::domain::units::records::UnitUuid;

/// New Unit Data
///
/// New units start out `rentable`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUnit {
    pub uuid: UnitUuid,
    pub code: String,
}
