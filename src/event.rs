//! Located events and translation from raw data-source records.

use crate::error::{Result, TimescapeError};
use geo::Point;
use serde::{Deserialize, Serialize};
use timescape_types::interval::{TemporalInterval, parse_instant};
use timescape_types::point::{GeoLocation, parse_wkt_point, validate_lat_lon};
use timescape_types::region::GeographicRegion;

/// Something that happened somewhere, over some span of time.
///
/// Identity is the external `id` (for example a Wikidata entity id such as
/// `Q1`). Events are immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatedEvent {
    pub id: String,
    pub interval: TemporalInterval,
    /// x is longitude, y is latitude
    pub location: Point,
    pub label: String,
}

impl LocatedEvent {
    pub fn new(
        id: impl Into<String>,
        interval: TemporalInterval,
        location: Point,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            interval,
            location,
            label: label.into(),
        }
    }

    /// Whether the event happened entirely within `interval`.
    pub fn in_period(interval: &TemporalInterval, event: &LocatedEvent) -> bool {
        interval.contains(&event.interval)
    }

    /// Whether the event happened inside `region`.
    pub fn in_place(region: &GeographicRegion, event: &LocatedEvent) -> bool {
        region.contains_point(&event.location)
    }

    /// Translate a raw record into an event.
    ///
    /// A record without an end is treated as instantaneous.
    ///
    /// # Examples
    ///
    /// ```
    /// use timescape::{LocatedEvent, RawCoordinate, RawEventRecord};
    ///
    /// let record = RawEventRecord {
    ///     id: "Q1".into(),
    ///     label: "Test".into(),
    ///     start: Some("2020-06-01".into()),
    ///     end: Some("2020-06-02".into()),
    ///     coord: RawCoordinate::Text("Point(5 5)".into()),
    /// };
    /// let event = LocatedEvent::from_record(record).unwrap();
    /// assert_eq!(event.location.x(), 5.0);
    /// ```
    pub fn from_record(record: RawEventRecord) -> Result<Self> {
        let invalid = |reason: String| TimescapeError::InvalidRecord {
            id: record.id.clone(),
            reason,
        };

        let start_raw = record
            .start
            .as_deref()
            .ok_or_else(|| invalid("missing start time".to_string()))?;
        let start = parse_instant(start_raw).map_err(|e| invalid(e.to_string()))?;
        let end = match record.end.as_deref() {
            Some(raw) => parse_instant(raw).map_err(|e| invalid(e.to_string()))?,
            None => start,
        };
        let interval = TemporalInterval::new(start, end).map_err(|e| invalid(e.to_string()))?;
        let location = record.coord.to_point().map_err(|e| invalid(e.to_string()))?;

        Ok(LocatedEvent {
            id: record.id,
            interval,
            location,
            label: record.label,
        })
    }
}

/// A record as delivered by a data source, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEventRecord {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    pub coord: RawCoordinate,
}

/// The coordinate shapes accepted from data sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCoordinate {
    /// GeoJSON point, `{"type": "Point", "coordinates": [lon, lat]}`
    GeoJson {
        #[serde(rename = "type")]
        kind: String,
        coordinates: Vec<f64>,
    },
    /// Browser-style coordinates with optional accuracy in meters
    LatLon {
        latitude: f64,
        longitude: f64,
        #[serde(default)]
        altitude: Option<f64>,
        #[serde(default, alias = "accuracy")]
        uncertainty: Option<f64>,
    },
    /// `geo:` URI or WKT `Point(lon lat)` literal
    Text(String),
}

impl RawCoordinate {
    pub fn to_point(&self) -> std::result::Result<Point, timescape_types::TypesError> {
        match self {
            RawCoordinate::GeoJson { kind, coordinates } => {
                if kind != "Point" || coordinates.len() < 2 {
                    return Err(timescape_types::TypesError::InvalidCoordinate(format!(
                        "expected a GeoJSON Point with two coordinates, got {} with {}",
                        kind,
                        coordinates.len()
                    )));
                }
                validate_lat_lon(coordinates[1], coordinates[0])?;
                Ok(Point::new(coordinates[0], coordinates[1]))
            }
            RawCoordinate::LatLon {
                latitude,
                longitude,
                ..
            } => Ok(GeoLocation::new(*latitude, *longitude)?.to_point()),
            RawCoordinate::Text(text) => {
                if text.trim_start().to_ascii_lowercase().starts_with("geo:") {
                    Ok(text.trim().parse::<GeoLocation>()?.to_point())
                } else {
                    parse_wkt_point(text)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(coord: RawCoordinate) -> RawEventRecord {
        RawEventRecord {
            id: "Q1".into(),
            label: "Test".into(),
            start: Some("2020-06-01".into()),
            end: Some("2020-06-02".into()),
            coord,
        }
    }

    #[test]
    fn test_from_record() {
        let event = LocatedEvent::from_record(record(RawCoordinate::Text("Point(5 5)".into())))
            .unwrap();
        assert_eq!(event.id, "Q1");
        assert_eq!(event.label, "Test");
        assert_eq!(event.location, Point::new(5.0, 5.0));
        assert_eq!(
            event.interval,
            "2020-06-01/2020-06-02".parse::<TemporalInterval>().unwrap()
        );
    }

    #[test]
    fn test_from_record_before_common_era() {
        let mut bce = record(RawCoordinate::Text("Point(12.4853 41.8925)".into()));
        bce.start = Some("-0044-03-15T00:00:00Z".into());
        bce.end = Some("-0044-03-15T00:00:00Z".into());

        let event = LocatedEvent::from_record(bce).unwrap();
        assert_eq!(
            event.interval.to_string(),
            "-0044-03-15T00:00:00.000Z/-0044-03-15T00:00:00.000Z"
        );

        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(serde_json::from_str::<LocatedEvent>(&json).unwrap(), event);
    }

    #[test]
    fn test_coordinate_shapes_agree() {
        let shapes = [
            RawCoordinate::Text("Point(16.37 48.21)".into()),
            RawCoordinate::Text("geo:48.21,16.37".into()),
            RawCoordinate::GeoJson {
                kind: "Point".into(),
                coordinates: vec![16.37, 48.21],
            },
            RawCoordinate::LatLon {
                latitude: 48.21,
                longitude: 16.37,
                altitude: None,
                uncertainty: Some(10.0),
            },
        ];
        for shape in shapes {
            assert_eq!(shape.to_point().unwrap(), Point::new(16.37, 48.21));
        }
    }

    #[test]
    fn test_coordinate_deserialization() {
        let geojson: RawCoordinate =
            serde_json::from_str(r#"{"type":"Point","coordinates":[1.0,2.0]}"#).unwrap();
        assert!(matches!(geojson, RawCoordinate::GeoJson { .. }));

        let browser: RawCoordinate =
            serde_json::from_str(r#"{"latitude":2.0,"longitude":1.0,"accuracy":5.0}"#).unwrap();
        assert!(matches!(
            browser,
            RawCoordinate::LatLon {
                uncertainty: Some(_),
                ..
            }
        ));

        let text: RawCoordinate = serde_json::from_str(r#""Point(1 2)""#).unwrap();
        assert_eq!(text.to_point().unwrap(), Point::new(1.0, 2.0));
    }

    #[test]
    fn test_missing_end_is_instantaneous() {
        let mut raw = record(RawCoordinate::Text("Point(0 0)".into()));
        raw.end = None;
        let event = LocatedEvent::from_record(raw).unwrap();
        assert!(event.interval.is_empty());
    }

    #[test]
    fn test_rejects_bad_records() {
        let mut reversed = record(RawCoordinate::Text("Point(0 0)".into()));
        reversed.start = Some("2020-07-01".into());
        assert!(matches!(
            LocatedEvent::from_record(reversed),
            Err(TimescapeError::InvalidRecord { .. })
        ));

        let mut no_start = record(RawCoordinate::Text("Point(0 0)".into()));
        no_start.start = None;
        assert!(LocatedEvent::from_record(no_start).is_err());

        let bad_coord = record(RawCoordinate::Text("somewhere".into()));
        assert!(LocatedEvent::from_record(bad_coord).is_err());
    }

    #[test]
    fn test_membership_predicates() {
        let event = LocatedEvent::from_record(record(RawCoordinate::Text("Point(5 5)".into())))
            .unwrap();
        let year: TemporalInterval = "2020-01-01/2020-12-31".parse().unwrap();
        let july: TemporalInterval = "2020-07-01/2020-07-31".parse().unwrap();

        assert!(LocatedEvent::in_period(&year, &event));
        assert!(!LocatedEvent::in_period(&july, &event));

        let around = GeographicRegion::new(0.0, 0.0, 10.0, 10.0).unwrap();
        let elsewhere = GeographicRegion::new(2.0, 2.0, 4.0, 4.0).unwrap();
        assert!(LocatedEvent::in_place(&around, &event));
        assert!(!LocatedEvent::in_place(&elsewhere, &event));
    }
}
