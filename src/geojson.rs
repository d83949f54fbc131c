//! GeoJSON export for events and regions.

use crate::error::Result;
use crate::event::LocatedEvent;
use geojson::feature::Id;
use geojson::{Feature, FeatureCollection, Geometry, Value};
use serde_json::{Map, json};
use timescape_types::region::GeographicRegion;

/// Converts an event to a Point feature carrying id, label, start, and end.
pub fn event_to_feature(event: &LocatedEvent) -> Feature {
    let mut properties = Map::new();
    properties.insert("label".to_string(), json!(event.label));
    properties.insert("start".to_string(), json!(event.interval.start().to_string()));
    properties.insert("end".to_string(), json!(event.interval.end().to_string()));

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![
            event.location.x(),
            event.location.y(),
        ]))),
        id: Some(Id::String(event.id.clone())),
        properties: Some(properties),
        foreign_members: None,
    }
}

/// Converts events to a FeatureCollection whose bbox encloses them all.
pub fn events_to_feature_collection(events: &[LocatedEvent]) -> FeatureCollection {
    let bbox = events
        .iter()
        .map(|e| (e.location.x(), e.location.y()))
        .fold(None, |acc: Option<[f64; 4]>, (x, y)| {
            Some(match acc {
                None => [x, y, x, y],
                Some([min_x, min_y, max_x, max_y]) => {
                    [min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y)]
                }
            })
        });

    FeatureCollection {
        bbox: bbox.map(|b| b.to_vec()),
        features: events.iter().map(event_to_feature).collect(),
        foreign_members: None,
    }
}

/// Serializes events as a GeoJSON FeatureCollection string.
pub fn events_to_geojson(events: &[LocatedEvent]) -> Result<String> {
    Ok(serde_json::to_string(&events_to_feature_collection(events))?)
}

/// GeoJSON bbox array, `[min_lon, min_lat, max_lon, max_lat]`.
pub fn region_to_bbox(region: &GeographicRegion) -> Vec<f64> {
    region.to_array().to_vec()
}

/// Converts a region to a closed, counter-clockwise Polygon geometry.
pub fn region_to_polygon(region: &GeographicRegion) -> Geometry {
    let [min_x, min_y, max_x, max_y] = region.to_array();
    let ring = vec![
        vec![min_x, min_y],
        vec![max_x, min_y],
        vec![max_x, max_y],
        vec![min_x, max_y],
        vec![min_x, min_y],
    ];
    let mut geometry = Geometry::new(Value::Polygon(vec![ring]));
    geometry.bbox = Some(region_to_bbox(region));
    geometry
}
