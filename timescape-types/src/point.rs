//! Coordinate literals: RFC 5870 `geo:` URIs and WKT points.
//!
//! Both formats are converted to `geo::Point` with x as longitude and y as
//! latitude, the GeoJSON axis order.

use crate::error::TypesError;
use geo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A location parsed from a `geo:` URI such as `geo:48.2010,16.3695,183;u=6.5`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub altitude: Option<f64>,
    /// Location uncertainty in meters (`u=` parameter).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uncertainty: Option<f64>,
}

impl GeoLocation {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, TypesError> {
        validate_lat_lon(latitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
            altitude: None,
            uncertainty: None,
        })
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = Some(altitude);
        self
    }

    pub fn with_uncertainty(mut self, uncertainty: f64) -> Self {
        self.uncertainty = Some(uncertainty);
        self
    }

    pub fn to_point(&self) -> Point {
        Point::new(self.longitude, self.latitude)
    }
}

/// Longitude in [-180, 180] and latitude in [-90, 90], both finite.
pub fn validate_lat_lon(latitude: f64, longitude: f64) -> Result<(), TypesError> {
    if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
        return Err(TypesError::InvalidCoordinate(format!(
            "Latitude out of range [-90.0, 90.0]: {}",
            latitude
        )));
    }
    if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
        return Err(TypesError::InvalidCoordinate(format!(
            "Longitude out of range [-180.0, 180.0]: {}",
            longitude
        )));
    }
    Ok(())
}

fn parse_number(raw: &str, what: &str) -> Result<f64, TypesError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| TypesError::InvalidCoordinate(format!("{} '{}' is not a number", what, raw)))
}

impl FromStr for GeoLocation {
    type Err = TypesError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let invalid = || TypesError::InvalidCoordinate(format!("'{}' is not a geo: URI", input));

        let scheme = input.get(..4).ok_or_else(invalid)?;
        if !scheme.eq_ignore_ascii_case("geo:") {
            return Err(invalid());
        }

        let mut sections = input[4..].split(';');
        let coords: Vec<&str> = sections.next().unwrap_or_default().split(',').collect();
        if !(2..=3).contains(&coords.len()) {
            return Err(invalid());
        }

        let mut location = GeoLocation::new(
            parse_number(coords[0], "latitude")?,
            parse_number(coords[1], "longitude")?,
        )?;
        if let Some(alt) = coords.get(2) {
            location.altitude = Some(parse_number(alt, "altitude")?);
        }

        for param in sections {
            if let Some((key, value)) = param.split_once('=')
                && key.eq_ignore_ascii_case("u")
            {
                location.uncertainty = Some(parse_number(value, "uncertainty")?);
            }
        }

        Ok(location)
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "geo:{},{}", self.latitude, self.longitude)?;
        if let Some(alt) = self.altitude {
            write!(f, ",{}", alt)?;
        }
        if let Some(u) = self.uncertainty {
            write!(f, ";u={}", u)?;
        }
        Ok(())
    }
}

/// Parse a WKT point literal, e.g. `Point(16.3695 48.2010)` (longitude first).
///
/// Wikidata returns coordinates in this form, sometimes prefixed with a CRS
/// IRI in angle brackets.
pub fn parse_wkt_point(input: &str) -> Result<Point, TypesError> {
    let invalid = || TypesError::InvalidCoordinate(format!("'{}' is not a WKT point", input));

    let mut text = input.trim();
    if text.starts_with('<') {
        let close = text.find('>').ok_or_else(invalid)?;
        text = text[close + 1..].trim_start();
    }

    let keyword = text.get(..5).ok_or_else(invalid)?;
    if !keyword.eq_ignore_ascii_case("point") {
        return Err(invalid());
    }
    let body = text[5..]
        .trim()
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(invalid)?;

    let mut values = body.split_whitespace();
    let (Some(lon), Some(lat)) = (values.next(), values.next()) else {
        return Err(invalid());
    };
    let (lon, lat) = (parse_number(lon, "longitude")?, parse_number(lat, "latitude")?);
    validate_lat_lon(lat, lon)?;

    Ok(Point::new(lon, lat))
}
