//! Civil date query parsing helpers.

use jiff::{Timestamp, civil::Date, tz::TimeZone};
use salvo::{oapi::extract::QueryParam, prelude::StatusError};

use crate::extensions::*;

/// Parse a `YYYY-MM-DD` query parameter.
///
/// Optional parameters default to today's UTC date, matching the admin
/// agenda's "what is due today" screens.
pub(crate) trait DateParamExt {
    fn into_civil_date(self, name: &str) -> Result<Date, StatusError>;
}

impl DateParamExt for QueryParam<String, true> {
    fn into_civil_date(self, name: &str) -> Result<Date, StatusError> {
        self.into_inner()
            .parse::<Date>()
            .or_400(&format!("could not parse \"{name}\" query parameter"))
    }
}

impl DateParamExt for QueryParam<String, false> {
    fn into_civil_date(self, name: &str) -> Result<Date, StatusError> {
        self.into_inner()
            .map(|value| value.parse::<Date>())
            .transpose()
            .or_400(&format!("could not parse \"{name}\" query parameter"))
            .map(|date| date.unwrap_or_else(|| Timestamp::now().to_zoned(TimeZone::UTC).date()))
    }
}
