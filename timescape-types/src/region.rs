use crate::error::TypesError;
use geo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An axis-aligned rectangle in longitude/latitude.
///
/// All four bounds are finite. `min <= max` is expected but not enforced, and
/// area is the planar product of both spans.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct GeographicRegion {
    min_lon: f64,
    min_lat: f64,
    max_lon: f64,
    max_lat: f64,
}

impl GeographicRegion {
    /// Create a new region from its bounds.
    ///
    /// # Arguments
    ///
    /// * `min_lon` - Western edge
    /// * `min_lat` - Southern edge
    /// * `max_lon` - Eastern edge
    /// * `max_lat` - Northern edge
    ///
    /// # Examples
    ///
    /// ```
    /// use timescape_types::region::GeographicRegion;
    ///
    /// let vienna = GeographicRegion::new(16.18, 48.11, 16.58, 48.32).unwrap();
    /// assert!(GeographicRegion::new(f64::NAN, 0.0, 1.0, 1.0).is_err());
    /// ```
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self, TypesError> {
        if let Some(bad) = [min_lon, min_lat, max_lon, max_lat]
            .iter()
            .find(|v| !v.is_finite())
        {
            return Err(TypesError::InvalidRegion(format!(
                "bound must be a finite number, got {}",
                bad
            )));
        }
        Ok(Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        })
    }

    /// Create a region from `[min_lon, min_lat, max_lon, max_lat]`.
    pub fn from_array(bounds: [f64; 4]) -> Result<Self, TypesError> {
        Self::new(bounds[0], bounds[1], bounds[2], bounds[3])
    }

    /// Create a region from a `geo::Rect` (x is longitude, y is latitude).
    pub fn from_rect(rect: Rect) -> Result<Self, TypesError> {
        Self::new(rect.min().x, rect.min().y, rect.max().x, rect.max().y)
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.min_lon, self.min_lat, self.max_lon, self.max_lat]
    }

    /// Convert to a `geo::Rect`. Note that `Rect` normalizes swapped bounds.
    pub fn to_rect(&self) -> Rect {
        Rect::new(
            geo::coord! { x: self.min_lon, y: self.min_lat },
            geo::coord! { x: self.max_lon, y: self.max_lat },
        )
    }

    /// Check if a point lies inside the region, edges included.
    pub fn contains_point(&self, point: &Point) -> bool {
        point.x() >= self.min_lon
            && point.x() <= self.max_lon
            && point.y() >= self.min_lat
            && point.y() <= self.max_lat
    }

    /// Check if `other` lies entirely inside this region.
    pub fn contains(&self, other: &GeographicRegion) -> bool {
        self.min_lon <= other.min_lon
            && self.min_lat <= other.min_lat
            && self.max_lon >= other.max_lon
            && self.max_lat >= other.max_lat
    }

    /// Check if the latitude spans or the longitude spans overlap.
    ///
    /// Touching edges count. Overlap on a single axis is enough, so two
    /// regions side by side in a horizontal band are reported as intersecting.
    pub fn intersects(&self, other: &GeographicRegion) -> bool {
        let lat_overlap = self.min_lat <= other.max_lat && other.min_lat <= self.max_lat;
        let lon_overlap = self.min_lon <= other.max_lon && other.min_lon <= self.max_lon;
        lat_overlap || lon_overlap
    }

    /// Smallest region enclosing both inputs.
    pub fn union(&self, other: &GeographicRegion) -> GeographicRegion {
        GeographicRegion {
            min_lon: self.min_lon.min(other.min_lon),
            min_lat: self.min_lat.min(other.min_lat),
            max_lon: self.max_lon.max(other.max_lon),
            max_lat: self.max_lat.max(other.max_lat),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Planar area in square degrees. Points and lines have zero area.
    pub fn area(&self) -> f64 {
        self.height() * self.width()
    }
}

impl TryFrom<[f64; 4]> for GeographicRegion {
    type Error = TypesError;

    fn try_from(bounds: [f64; 4]) -> Result<Self, Self::Error> {
        Self::from_array(bounds)
    }
}

impl From<GeographicRegion> for [f64; 4] {
    fn from(region: GeographicRegion) -> Self {
        region.to_array()
    }
}

impl fmt::Display for GeographicRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{},{}",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> GeographicRegion {
        GeographicRegion::new(min_lon, min_lat, max_lon, max_lat).unwrap()
    }

    #[test]
    fn test_rejects_non_finite_bounds() {
        assert!(GeographicRegion::new(f64::NAN, 0.0, 1.0, 1.0).is_err());
        assert!(GeographicRegion::new(0.0, f64::INFINITY, 1.0, 1.0).is_err());
        assert!(GeographicRegion::new(0.0, 0.0, f64::NEG_INFINITY, 1.0).is_err());
        assert!(matches!(
            GeographicRegion::from_array([0.0, 0.0, 1.0, f64::NAN]),
            Err(TypesError::InvalidRegion(_))
        ));
    }

    #[test]
    fn test_contains_point_inclusive() {
        let r = region(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains_point(&Point::new(5.0, 5.0)));
        assert!(r.contains_point(&Point::new(0.0, 0.0)));
        assert!(r.contains_point(&Point::new(10.0, 10.0)));
        assert!(!r.contains_point(&Point::new(-0.1, 5.0)));
        assert!(!r.contains_point(&Point::new(5.0, 10.1)));
    }

    #[test]
    fn test_contains_reflexive_and_antisymmetric() {
        let a = region(0.0, 0.0, 10.0, 10.0);
        let b = region(2.0, 2.0, 4.0, 4.0);
        assert!(a.contains(&a));
        assert!(a.contains(&b));
        assert!(!b.contains(&a));

        let c = region(0.0, 0.0, 10.0, 10.0);
        assert!(a.contains(&c) && c.contains(&a));
        assert_eq!(a, c);
    }

    #[test]
    fn test_intersects() {
        let a = region(0.0, 0.0, 10.0, 10.0);
        let overlapping = region(5.0, 5.0, 15.0, 15.0);
        let touching = region(10.0, 10.0, 20.0, 20.0);
        let disjoint = region(20.0, 20.0, 30.0, 30.0);
        let same_band = region(20.0, 2.0, 30.0, 8.0);

        assert!(a.intersects(&overlapping));
        assert!(overlapping.intersects(&a));
        assert!(a.intersects(&touching));
        assert!(!a.intersects(&disjoint));
        assert!(!disjoint.intersects(&a));
        assert!(a.intersects(&same_band));
    }

    #[test]
    fn test_union_and_area() {
        let a = region(0.0, 0.0, 10.0, 10.0);
        let b = region(5.0, 5.0, 15.0, 15.0);
        let u = a.union(&b);
        assert_eq!(u, region(0.0, 0.0, 15.0, 15.0));
        assert!(u.contains(&a) && u.contains(&b));
        assert_eq!(u.area(), 225.0);
        assert_eq!(region(1.0, 1.0, 1.0, 5.0).area(), 0.0);
    }

    #[test]
    fn test_rect_conversion() {
        let a = region(-74.0, 40.7, -73.9, 40.8);
        let rect = a.to_rect();
        assert_eq!(GeographicRegion::from_rect(rect).unwrap(), a);
        assert_eq!(a.to_string(), "-74,40.7,-73.9,40.8");
    }
}
