//! Coverage regions: claims of complete knowledge over a time span and area.

use crate::event::LocatedEvent;
use chrono::TimeDelta;
use rustc_hash::FxHashSet;
use timescape_types::interval::TemporalInterval;
use timescape_types::region::GeographicRegion;

/// A time span paired with a map region, holding the ids of every event known
/// to fall inside it.
///
/// A coverage region says "all events whose interval lies within `interval`
/// and whose location lies within `region` are known". The id set is filled
/// during registration and is not checked against the bounds; readers
/// re-filter with [`LocatedEvent::in_period`] and [`LocatedEvent::in_place`].
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageRegion {
    interval: TemporalInterval,
    region: GeographicRegion,
    event_ids: FxHashSet<String>,
}

impl CoverageRegion {
    pub fn new(interval: TemporalInterval, region: GeographicRegion) -> Self {
        Self {
            interval,
            region,
            event_ids: FxHashSet::default(),
        }
    }

    /// Create a coverage region seeded with known ids.
    pub fn with_ids<I, S>(interval: TemporalInterval, region: GeographicRegion, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            interval,
            region,
            event_ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn interval(&self) -> &TemporalInterval {
        &self.interval
    }

    pub fn region(&self) -> &GeographicRegion {
        &self.region
    }

    /// Ids registered in this coverage, in no particular order.
    pub fn event_ids(&self) -> impl Iterator<Item = &str> {
        self.event_ids.iter().map(String::as_str)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.event_ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.event_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.event_ids.is_empty()
    }

    /// Planar area of the region, used to order coverage within a bucket.
    pub fn area(&self) -> f64 {
        self.region.area()
    }

    /// Length of the time span, when both bounds are instants.
    pub fn time_span(&self) -> Option<TimeDelta> {
        self.interval.span()
    }

    /// Human-readable identity, `interval|region`.
    pub fn key(&self) -> String {
        format!("{}|{}", self.interval, self.region)
    }

    /// Whether `event` falls within both bounds of this coverage.
    pub fn includes(&self, event: &LocatedEvent) -> bool {
        LocatedEvent::in_period(&self.interval, event)
            && LocatedEvent::in_place(&self.region, event)
    }

    /// Record `event` as known. Does not check [`includes`](Self::includes).
    pub fn register_event(&mut self, event: &LocatedEvent) {
        self.event_ids.insert(event.id.clone());
    }

    /// `a` covers `b` in both time and space.
    pub fn contains(a: &CoverageRegion, b: &CoverageRegion) -> bool {
        a.interval.contains(&b.interval) && a.region.contains(&b.region)
    }

    /// `a` and `b` overlap in time (asymmetric test) and intersect in space.
    pub fn overlaps(a: &CoverageRegion, b: &CoverageRegion) -> bool {
        a.interval.overlaps(&b.interval) && a.region.intersects(&b.region)
    }

    /// Merge two coverage regions into one enclosing both.
    ///
    /// The enclosing rectangle may claim area neither input actually fetched.
    pub fn union(a: &CoverageRegion, b: &CoverageRegion) -> CoverageRegion {
        CoverageRegion {
            interval: a.interval.union(&b.interval),
            region: a.region.union(&b.region),
            event_ids: a.event_ids.union(&b.event_ids).cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Point;

    fn interval(s: &str) -> TemporalInterval {
        s.parse().unwrap()
    }

    fn region(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> GeographicRegion {
        GeographicRegion::new(min_lon, min_lat, max_lon, max_lat).unwrap()
    }

    fn event(id: &str, x: f64, y: f64) -> LocatedEvent {
        LocatedEvent::new(id, interval("2020-06-01/2020-06-02"), Point::new(x, y), id)
    }

    #[test]
    fn test_includes() {
        let cov = CoverageRegion::new(
            interval("2020-01-01/2020-12-31"),
            region(0.0, 0.0, 10.0, 10.0),
        );
        assert!(cov.includes(&event("Q1", 5.0, 5.0)));
        assert!(!cov.includes(&event("Q2", 15.0, 5.0)));

        let later = CoverageRegion::new(
            interval("2021-01-01/2021-12-31"),
            region(0.0, 0.0, 10.0, 10.0),
        );
        assert!(!later.includes(&event("Q1", 5.0, 5.0)));
    }

    #[test]
    fn test_register_event_is_unconditional() {
        let mut cov = CoverageRegion::new(
            interval("2020-01-01/2020-12-31"),
            region(0.0, 0.0, 1.0, 1.0),
        );
        let outside = event("Q9", 50.0, 50.0);
        cov.register_event(&outside);
        cov.register_event(&outside);
        assert_eq!(cov.len(), 1);
        assert!(cov.contains_id("Q9"));
        assert!(!cov.includes(&outside));
    }

    #[test]
    fn test_contains() {
        let year = interval("2020-01-01/2020-12-31");
        let big = CoverageRegion::new(year, region(0.0, 0.0, 10.0, 10.0));
        let small = CoverageRegion::new(year, region(2.0, 2.0, 4.0, 4.0));
        let longer = CoverageRegion::new(
            interval("2019-01-01/2020-12-31"),
            region(2.0, 2.0, 4.0, 4.0),
        );

        assert!(CoverageRegion::contains(&big, &small));
        assert!(!CoverageRegion::contains(&small, &big));
        assert!(!CoverageRegion::contains(&big, &longer));
    }

    #[test]
    fn test_overlaps() {
        let year = interval("2020-01-01/2020-12-31");
        let a = CoverageRegion::new(year, region(0.0, 0.0, 10.0, 10.0));
        let b = CoverageRegion::new(year, region(5.0, 5.0, 15.0, 15.0));
        let far = CoverageRegion::new(year, region(20.0, 20.0, 30.0, 30.0));

        assert!(CoverageRegion::overlaps(&a, &b));
        assert!(!CoverageRegion::overlaps(&a, &far));
    }

    #[test]
    fn test_union_merges_bounds_and_ids() {
        let year = interval("2020-01-01/2020-12-31");
        let a = CoverageRegion::with_ids(year, region(0.0, 0.0, 10.0, 10.0), ["Q1", "Q2"]);
        let b = CoverageRegion::with_ids(year, region(5.0, 5.0, 15.0, 15.0), ["Q2", "Q3"]);

        let u = CoverageRegion::union(&a, &b);
        assert_eq!(*u.region(), region(0.0, 0.0, 15.0, 15.0));
        assert_eq!(*u.interval(), year);
        assert_eq!(u.len(), 3);
        assert!(CoverageRegion::contains(&u, &a));
        assert!(CoverageRegion::contains(&u, &b));
    }

    #[test]
    fn test_key_and_sizes() {
        let cov = CoverageRegion::new(
            interval("2020-01-01/2020-01-03"),
            region(0.0, 0.0, 2.0, 3.0),
        );
        assert_eq!(
            cov.key(),
            "2020-01-01T00:00:00.000Z/2020-01-03T00:00:00.000Z|0,0,2,3"
        );
        assert_eq!(cov.area(), 6.0);
        assert_eq!(cov.time_span(), Some(TimeDelta::days(2)));
    }
}
