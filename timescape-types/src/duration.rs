//! ISO-8601 durations (`PnYnMnWnDTnHnMnS`).
//!
//! Durations appear on either side of an interval expression such as
//! `2020-01-01/P1Y` and are only resolved against a concrete instant on demand.

use crate::error::TypesError;
use chrono::{DateTime, Months, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar duration with whole-number components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IsoDuration {
    pub years: u32,
    pub months: u32,
    pub weeks: u32,
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

// Designator order; a component may only follow components of lower rank.
const YEARS: u8 = 1;
const MONTHS: u8 = 2;
const WEEKS: u8 = 3;
const DAYS: u8 = 4;
const HOURS: u8 = 5;
const MINUTES: u8 = 6;
const SECONDS: u8 = 7;

impl IsoDuration {
    /// Returns `true` when every component is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Quick syntactic check used by interval parsing to tell durations from instants.
    pub fn can_parse(input: &str) -> bool {
        input.len() > 2 && input.starts_with('P')
    }

    fn calendar_months(&self) -> Option<Months> {
        self.years
            .checked_mul(12)
            .and_then(|m| m.checked_add(self.months))
            .map(Months::new)
    }

    fn fixed_delta(&self) -> Option<TimeDelta> {
        let seconds = i64::from(self.weeks) * 604_800
            + i64::from(self.days) * 86_400
            + i64::from(self.hours) * 3_600
            + i64::from(self.minutes) * 60
            + i64::from(self.seconds);
        TimeDelta::try_seconds(seconds)
    }

    /// `instant + self`, or `None` on overflow.
    pub fn add_to(&self, instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
        instant
            .checked_add_months(self.calendar_months()?)?
            .checked_add_signed(self.fixed_delta()?)
    }

    /// `instant - self`, or `None` on overflow.
    pub fn subtract_from(&self, instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
        instant
            .checked_sub_months(self.calendar_months()?)?
            .checked_sub_signed(self.fixed_delta()?)
    }

    fn set(&mut self, rank: u8, value: u32) {
        match rank {
            YEARS => self.years = value,
            MONTHS => self.months = value,
            WEEKS => self.weeks = value,
            DAYS => self.days = value,
            HOURS => self.hours = value,
            MINUTES => self.minutes = value,
            _ => self.seconds = value,
        }
    }
}

impl FromStr for IsoDuration {
    type Err = TypesError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid =
            |reason: &str| TypesError::InvalidDuration(format!("'{}': {}", input, reason));

        let body = input
            .strip_prefix('P')
            .ok_or_else(|| invalid("must start with 'P'"))?;

        let mut duration = IsoDuration::default();
        let mut digits = String::new();
        let mut in_time = false;
        let mut last_rank = 0u8;
        let mut components = 0usize;

        for ch in body.chars() {
            if ch.is_ascii_digit() {
                digits.push(ch);
                continue;
            }

            if ch == 'T' {
                if in_time || !digits.is_empty() {
                    return Err(invalid("misplaced 'T'"));
                }
                in_time = true;
                last_rank = DAYS;
                continue;
            }

            let rank = match (in_time, ch) {
                (false, 'Y') => YEARS,
                (false, 'M') => MONTHS,
                (false, 'W') => WEEKS,
                (false, 'D') => DAYS,
                (true, 'H') => HOURS,
                (true, 'M') => MINUTES,
                (true, 'S') => SECONDS,
                _ => return Err(invalid(&format!("unexpected designator '{}'", ch))),
            };

            if rank <= last_rank {
                return Err(invalid("designators out of order"));
            }
            if digits.is_empty() {
                return Err(invalid(&format!("missing value before '{}'", ch)));
            }

            let value: u32 = digits
                .parse()
                .map_err(|_| invalid("component value too large"))?;
            digits.clear();

            duration.set(rank, value);
            last_rank = rank;
            components += 1;
        }

        if !digits.is_empty() {
            return Err(invalid("trailing digits without designator"));
        }
        if components == 0 {
            return Err(invalid("no components"));
        }
        if in_time && last_rank <= DAYS {
            return Err(invalid("'T' without time components"));
        }

        Ok(duration)
    }
}

impl fmt::Display for IsoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("PT0S");
        }

        f.write_str("P")?;
        for (value, designator) in [
            (self.years, 'Y'),
            (self.months, 'M'),
            (self.weeks, 'W'),
            (self.days, 'D'),
        ] {
            if value > 0 {
                write!(f, "{}{}", value, designator)?;
            }
        }

        if self.hours > 0 || self.minutes > 0 || self.seconds > 0 {
            f.write_str("T")?;
            let time = [(self.hours, 'H'), (self.minutes, 'M'), (self.seconds, 'S')];
            for (value, designator) in time {
                if value > 0 {
                    write!(f, "{}{}", value, designator)?;
                }
            }
        }

        Ok(())
    }
}
