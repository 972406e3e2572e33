//! Rate tables and quote arithmetic.
//!
//! A variant's price list rarely carries a row for every period, so the
//! missing rates are derived before charging: a daily rate from the weekly
//! or monthly row, a weekly rate from seven daily, a monthly rate from four
//! weekly. A multi-day rental is then charged the cheapest combination of
//! periods that covers its billable days, where overshooting is allowed
//! (a six-day rental may be charged a full week when that is cheaper).

use jiff::{Timestamp, tz::TimeZone};
use smallvec::{SmallVec, smallvec};

use crate::domain::pricing::{errors::PricingServiceError, records::PricePeriod};

const SECONDS_PER_HOUR: u64 = 3_600;
const SECONDS_PER_DAY: u64 = 86_400;

/// Longest rental that will be quoted, in billable days.
pub const MAX_BILLABLE_DAYS: u32 = 366;

const DAYS_PER_WEEK: u64 = 7;
const DAYS_PER_MONTH: u64 = 30;
const WEEKS_PER_MONTH: u64 = 4;

/// The configured per-period amounts of one variant, in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RateTable {
    pub hourly: Option<u64>,
    pub daily: Option<u64>,
    pub weekly: Option<u64>,
    pub monthly: Option<u64>,
}

/// One line of a quote breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLine {
    pub period: PricePeriod,
    pub count: u32,
    pub unit_amount: u64,
    pub amount: u64,
}

/// A priced rental interval.
///
/// The total always equals the sum of the line amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateQuote {
    pub lines: SmallVec<[RateLine; 4]>,
    pub total: u64,
}

impl RateQuote {
    fn from_line(period: PricePeriod, count: u32, unit_amount: u64) -> Self {
        let amount = u64::from(count).saturating_mul(unit_amount);

        Self {
            lines: smallvec![RateLine {
                period,
                count,
                unit_amount,
                amount,
            }],
            total: amount,
        }
    }
}

impl RateTable {
    pub fn insert(&mut self, period: PricePeriod, amount: u64) {
        match period {
            PricePeriod::Hourly => self.hourly = Some(amount),
            PricePeriod::Daily => self.daily = Some(amount),
            PricePeriod::Weekly => self.weekly = Some(amount),
            PricePeriod::Monthly => self.monthly = Some(amount),
        }
    }

    /// Price the half-open interval `[from, until)`.
    ///
    /// Rentals that start and end on the same UTC calendar date are charged
    /// by started hour when an hourly row exists, capped at the one-day
    /// charge. Everything else is charged by billable day, rounding the
    /// duration up to whole days.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` when `until` is not after `from`, `TooLong`
    /// past [`MAX_BILLABLE_DAYS`], and `MissingPrice` when no daily, weekly
    /// or monthly rate exists or can be derived (for rentals that cannot be
    /// charged hourly).
    pub fn quote(&self, from: Timestamp, until: Timestamp) -> Result<RateQuote, PricingServiceError> {
        let seconds = until.as_second() - from.as_second();

        if seconds <= 0 {
            return Err(PricingServiceError::InvalidRange);
        }

        let seconds = seconds.unsigned_abs();

        let days = u32::try_from(seconds.div_ceil(SECONDS_PER_DAY))
            .map_err(|_| PricingServiceError::TooLong)?;

        if days > MAX_BILLABLE_DAYS {
            return Err(PricingServiceError::TooLong);
        }

        if let Some(hourly) = self.hourly {
            let from_date = from.to_zoned(TimeZone::UTC).date();
            let until_date = until.to_zoned(TimeZone::UTC).date();

            if from_date == until_date {
                let hours = u32::try_from(seconds.div_ceil(SECONDS_PER_HOUR))
                    .map_err(|_| PricingServiceError::TooLong)?;

                let hourly_total = u64::from(hours).saturating_mul(hourly);

                // The one-day cover caps the hourly charge; on a tie the
                // day line wins.
                return match self.cheapest_cover(1) {
                    Ok(day_quote) if day_quote.total <= hourly_total => Ok(day_quote),
                    _ => Ok(RateQuote::from_line(PricePeriod::Hourly, hours, hourly)),
                };
            }
        }

        self.cheapest_cover(days)
    }

    /// Cheapest combination of daily, weekly and monthly charges covering
    /// at least `days` billable days.
    fn cheapest_cover(&self, days: u32) -> Result<RateQuote, PricingServiceError> {
        let (Some(daily), Some(weekly), Some(monthly)) = (
            self.effective_daily(),
            self.effective_weekly(),
            self.effective_monthly(),
        ) else {
            return Err(PricingServiceError::MissingPrice);
        };

        // Longest-first so that equal-cost ties land on the longer period.
        let tiers = [
            (PricePeriod::Monthly, DAYS_PER_MONTH as usize, monthly),
            (PricePeriod::Weekly, DAYS_PER_WEEK as usize, weekly),
            (PricePeriod::Daily, 1, daily),
        ];

        let len = days as usize + 1;

        let mut cost = vec![u64::MAX; len];
        let mut choice = vec![0usize; len];

        cost[0] = 0;

        for day in 1..len {
            for (tier, (_, span, amount)) in tiers.iter().enumerate() {
                let rest = day.saturating_sub(*span);
                let candidate = cost[rest].saturating_add(*amount);

                if candidate < cost[day] {
                    cost[day] = candidate;
                    choice[day] = tier;
                }
            }
        }

        let mut counts = [0u32; 3];
        let mut day = days as usize;

        while day > 0 {
            let tier = choice[day];
            counts[tier] += 1;
            day = day.saturating_sub(tiers[tier].1);
        }

        let mut lines = SmallVec::new();
        let mut total = 0u64;

        for ((period, _, unit_amount), count) in tiers.into_iter().zip(counts) {
            if count == 0 {
                continue;
            }

            let amount = u64::from(count).saturating_mul(unit_amount);

            total = total.saturating_add(amount);

            lines.push(RateLine {
                period,
                count,
                unit_amount,
                amount,
            });
        }

        Ok(RateQuote { lines, total })
    }

    fn effective_daily(&self) -> Option<u64> {
        self.daily
            .or_else(|| self.weekly.map(|weekly| weekly.div_ceil(DAYS_PER_WEEK)))
            .or_else(|| self.monthly.map(|monthly| monthly.div_ceil(DAYS_PER_MONTH)))
    }

    fn effective_weekly(&self) -> Option<u64> {
        self.weekly.or_else(|| {
            self.effective_daily()
                .map(|daily| daily.saturating_mul(DAYS_PER_WEEK))
        })
    }

    fn effective_monthly(&self) -> Option<u64> {
        self.monthly.or_else(|| {
            self.effective_weekly()
                .map(|weekly| weekly.saturating_mul(WEEKS_PER_MONTH))
        })
    }
}

impl FromIterator<(PricePeriod, u64)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (PricePeriod, u64)>>(iter: I) -> Self {
        let mut table = Self::default();

        for (period, amount) in iter {
            table.insert(period, amount);
        }

        table
    }
}
