//! The textual coordinate representation stored per obra.
//!
//! Encoding rules (consumers must use [`parse_text`], never a generic CSV
//! parser):
//!
//! - Point: `"lat,lon"`, latitude-first, swapped from the WKB
//!   longitude-first convention.
//! - LineString / MultiPoint: points joined by `/`.
//! - Polygon / MultiLineString: rings formatted as above, joined by ` | `.

use obramap_core::models::{Coordinate, Geometry};
use thiserror::Error;

/// Separator between points within a ring.
pub const POINT_SEPARATOR: &str = "/";

/// Separator between rings, pipe with surrounding spaces.
pub const RING_SEPARATOR: &str = " | ";

#[derive(Debug, Error, PartialEq)]
pub enum CoordParseError {
    #[error("Malformed coordinate point '{point}': {reason}")]
    InvalidPoint { point: String, reason: String },
}

fn format_point(&[lon, lat]: &[f64; 2]) -> String {
    format!("{},{}", lat, lon)
}

fn format_ring(points: &[[f64; 2]]) -> String {
    points.iter().map(format_point).collect::<Vec<_>>().join(POINT_SEPARATOR)
}

/// Encode a decoded geometry into the stored coordinate text.
///
/// Returns `None` for kinds the viewer does not support (MultiPolygon);
/// callers treat that as "no geometry" for the obra.
pub fn encode(geometry: &Geometry) -> Option<String> {
    match geometry {
        Geometry::Point { coordinates } => Some(format_point(coordinates)),
        Geometry::LineString { coordinates } | Geometry::MultiPoint { coordinates } => {
            Some(format_ring(coordinates))
        }
        Geometry::Polygon { coordinates } | Geometry::MultiLineString { coordinates } => Some(
            coordinates.iter().map(|ring| format_ring(ring)).collect::<Vec<_>>().join(RING_SEPARATOR),
        ),
        Geometry::MultiPolygon { .. } => None,
    }
}

/// Decode a hex-encoded WKB payload straight to coordinate text.
///
/// Absent, malformed, or unsupported input yields `None` with a logged
/// diagnostic; ingestion continues with the remaining records.
pub fn wkb_hex_to_text(wkb_hex: &str) -> Option<String> {
    let trimmed = wkb_hex.trim();
    if trimmed.is_empty() {
        return None;
    }

    let bytes = match hex::decode(trimmed) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding geometry: invalid hex payload");
            return None;
        }
    };

    let geometry = match crate::wkb::parse_wkb(&bytes) {
        Ok(geometry) => geometry,
        Err(e) => {
            tracing::warn!(error = %e, "Discarding geometry: WKB decode failed");
            return None;
        }
    };

    let text = encode(&geometry);
    if text.is_none() {
        tracing::warn!(
            geometry_type = ?geometry.geometry_type(),
            "Discarding geometry: kind has no text encoding"
        );
    }
    text
}

/// Parse stored coordinate text back into ordered coordinate rings.
///
/// Splits on the ring separator (tolerating a bare `|` without spaces),
/// then the point separator, then the internal comma. Input without a
/// ring separator is one ring. An empty string is zero rings. Any
/// component that fails float conversion invalidates the entire text:
/// callers drop that obra's geometry for the current pass rather than
/// substituting a default.
pub fn parse_text(text: &str) -> Result<Vec<Vec<Coordinate>>, CoordParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    trimmed
        .split('|')
        .map(|ring| {
            ring.trim()
                .split(POINT_SEPARATOR)
                .map(parse_point)
                .collect::<Result<Vec<_>, _>>()
        })
        .collect()
}

fn parse_point(raw: &str) -> Result<Coordinate, CoordParseError> {
    let raw = raw.trim();
    let mut parts = raw.split(',');

    let (lat, lon) = match (parts.next(), parts.next(), parts.next()) {
        (Some(lat), Some(lon), None) => (lat.trim(), lon.trim()),
        _ => {
            return Err(CoordParseError::InvalidPoint {
                point: raw.to_string(),
                reason: "expected exactly two comma-separated components".to_string(),
            })
        }
    };

    let latitude = lat.parse::<f64>().map_err(|e| CoordParseError::InvalidPoint {
        point: raw.to_string(),
        reason: format!("latitude: {}", e),
    })?;
    let longitude = lon.parse::<f64>().map_err(|e| CoordParseError::InvalidPoint {
        point: raw.to_string(),
        reason: format!("longitude: {}", e),
    })?;

    Ok(Coordinate::new(latitude, longitude))
}
