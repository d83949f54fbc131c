//! Temporal intervals with optional duration-valued bounds.
//!
//! An interval is written `start/end`, where either side may be an instant or
//! an ISO-8601 duration relative to the other side (`2020-01-01/P1Y`). A
//! duration-valued start is unbounded below and a duration-valued end is
//! unbounded above for containment, overlap, and union.

use crate::duration::IsoDuration;
use crate::error::TypesError;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, SubsecRound, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One side of a [`TemporalInterval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalBound {
    /// A concrete UTC instant.
    Instant(DateTime<Utc>),
    /// A duration measured from the opposite side.
    Relative(IsoDuration),
}

impl IntervalBound {
    /// The concrete instant, if this bound has one.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            IntervalBound::Instant(at) => Some(*at),
            IntervalBound::Relative(_) => None,
        }
    }

    fn truncated(self) -> Self {
        match self {
            IntervalBound::Instant(at) => IntervalBound::Instant(at.trunc_subsecs(3)),
            relative => relative,
        }
    }
}

impl From<DateTime<Utc>> for IntervalBound {
    fn from(at: DateTime<Utc>) -> Self {
        IntervalBound::Instant(at)
    }
}

impl From<IsoDuration> for IntervalBound {
    fn from(duration: IsoDuration) -> Self {
        IntervalBound::Relative(duration)
    }
}

impl fmt::Display for IntervalBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntervalBound::Instant(at) => {
                f.write_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
            }
            IntervalBound::Relative(duration) => write!(f, "{}", duration),
        }
    }
}

/// Cache bucket key derived from an interval's canonical string form.
///
/// Two intervals with equal bounds always produce the same key, no matter how
/// their source strings were written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IntervalKey(String);

impl IntervalKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IntervalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An ordered pair of bounds describing a span of time.
///
/// # Examples
///
/// ```
/// use timescape_types::interval::TemporalInterval;
///
/// let year: TemporalInterval = "2020-01-01/2020-12-31".parse().unwrap();
/// let june: TemporalInterval = "2020-06-01/2020-06-30".parse().unwrap();
///
/// assert!(year.contains(&june));
/// assert_eq!(year.to_string(), "2020-01-01T00:00:00.000Z/2020-12-31T00:00:00.000Z");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TemporalInterval {
    start: IntervalBound,
    end: IntervalBound,
}

impl TemporalInterval {
    /// Create an interval, rejecting concrete bounds that are out of order.
    ///
    /// Instants are truncated to whole milliseconds.
    pub fn new(
        start: impl Into<IntervalBound>,
        end: impl Into<IntervalBound>,
    ) -> Result<Self, TypesError> {
        let (start, end) = (start.into().truncated(), end.into().truncated());
        if let (IntervalBound::Instant(s), IntervalBound::Instant(e)) = (start, end)
            && s > e
        {
            return Err(TypesError::InvalidInterval(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> &IntervalBound {
        &self.start
    }

    pub fn end(&self) -> &IntervalBound {
        &self.end
    }

    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        self.start.instant()
    }

    pub fn end_instant(&self) -> Option<DateTime<Utc>> {
        self.end.instant()
    }

    /// Both bounds are the same instant.
    pub fn is_empty(&self) -> bool {
        matches!(
            (self.start, self.end),
            (IntervalBound::Instant(s), IntervalBound::Instant(e)) if s == e
        )
    }

    /// `self.start <= other.start && self.end >= other.end`.
    pub fn contains(&self, other: &TemporalInterval) -> bool {
        lower_le(self.start_instant(), other.start_instant())
            && upper_ge(self.end_instant(), other.end_instant())
    }

    /// `self.start <= other.end || self.end <= other.start`.
    ///
    /// This is intentionally looser than geometric overlap and not symmetric:
    /// any interval starting no later than `other` ends is considered
    /// overlapping.
    pub fn overlaps(&self, other: &TemporalInterval) -> bool {
        let starts_before_other_ends = match (self.start_instant(), other.end_instant()) {
            (Some(s), Some(e)) => s <= e,
            _ => true,
        };
        let ends_before_other_starts = match (self.end_instant(), other.start_instant()) {
            (Some(e), Some(s)) => e <= s,
            _ => false,
        };
        starts_before_other_ends || ends_before_other_starts
    }

    /// Smallest interval spanning both inputs.
    pub fn union(&self, other: &TemporalInterval) -> TemporalInterval {
        let start = if lower_le(self.start_instant(), other.start_instant()) {
            self.start
        } else {
            other.start
        };
        let end = if upper_ge(self.end_instant(), other.end_instant()) {
            self.end
        } else {
            other.end
        };
        TemporalInterval { start, end }
    }

    /// Canonical bucket key for this interval.
    pub fn key(&self) -> IntervalKey {
        IntervalKey(self.to_string())
    }

    /// Replace a duration-valued side with the instant it denotes relative to
    /// the other side. Returns `None` when neither side is concrete or the
    /// arithmetic overflows.
    pub fn resolve(&self) -> Option<TemporalInterval> {
        match (self.start, self.end) {
            (IntervalBound::Instant(_), IntervalBound::Instant(_)) => Some(*self),
            (IntervalBound::Instant(s), IntervalBound::Relative(d)) => Some(TemporalInterval {
                start: self.start,
                end: IntervalBound::Instant(d.add_to(s)?),
            }),
            (IntervalBound::Relative(d), IntervalBound::Instant(e)) => Some(TemporalInterval {
                start: IntervalBound::Instant(d.subtract_from(e)?),
                end: self.end,
            }),
            (IntervalBound::Relative(_), IntervalBound::Relative(_)) => None,
        }
    }

    /// Length of the interval when both sides are instants.
    pub fn span(&self) -> Option<TimeDelta> {
        Some(self.end_instant()? - self.start_instant()?)
    }
}

// `None` stands for an unbounded side: -inf on the lower end, +inf on the upper.
fn lower_le(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> bool {
    match (a, b) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(a), Some(b)) => a <= b,
    }
}

fn upper_ge(a: Option<DateTime<Utc>>, b: Option<DateTime<Utc>>) -> bool {
    match (a, b) {
        (None, _) => true,
        (Some(_), None) => false,
        (Some(a), Some(b)) => a >= b,
    }
}

/// Parse an ISO-8601 instant.
///
/// Accepts RFC 3339 timestamps, date-times with a `Z` or numeric offset on
/// signed or five-digit years (`-0044-03-15T00:00:00Z`), naive date-times
/// (taken as UTC), and the reduced forms `YYYY-MM-DD`, `YYYY-MM`, and `YYYY`.
/// Sub-millisecond digits are dropped so the result matches its canonical
/// form.
pub fn parse_instant(input: &str) -> Result<DateTime<Utc>, TypesError> {
    let input = input.trim();
    parse_exact(input)
        .map(|at| at.trunc_subsecs(3))
        .ok_or_else(|| {
            TypesError::InvalidInterval(format!("'{}' is not an ISO-8601 instant", input))
        })
}

fn parse_exact(input: &str) -> Option<DateTime<Utc>> {
    if let Ok(at) = DateTime::parse_from_rfc3339(input) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(at) = DateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f%:z") {
        return Some(at.with_timezone(&Utc));
    }

    let naive = input
        .strip_suffix('Z')
        .or_else(|| input.strip_suffix('z'))
        .unwrap_or(input);
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(at.and_utc());
        }
    }

    let unsigned = input.trim_start_matches(['-', '+']);
    let date = match unsigned.split('-').count() {
        1 => input
            .parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1)),
        2 => NaiveDate::parse_from_str(&format!("{}-01", input), "%Y-%m-%d").ok(),
        _ => NaiveDate::parse_from_str(input, "%Y-%m-%d").ok(),
    };

    date.and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn parse_bound(part: &str) -> Result<IntervalBound, TypesError> {
    if IsoDuration::can_parse(part) {
        Ok(IntervalBound::Relative(part.parse()?))
    } else {
        Ok(IntervalBound::Instant(parse_instant(part)?))
    }
}

impl FromStr for TemporalInterval {
    type Err = TypesError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parts = input.split('/');
        let (Some(start), Some(end), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(TypesError::InvalidInterval(format!(
                "'{}' must have the form start/end",
                input
            )));
        };
        TemporalInterval::new(parse_bound(start)?, parse_bound(end)?)
    }
}

impl TryFrom<String> for TemporalInterval {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TemporalInterval> for String {
    fn from(interval: TemporalInterval) -> Self {
        interval.to_string()
    }
}

impl fmt::Display for TemporalInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start, self.end)
    }
}
