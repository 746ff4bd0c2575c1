//! Well-known-binary geometry decoding.
//!
//! Handles both plain ISO WKB and the PostGIS EWKB variant the upstream
//! API delivers: the SRID payload is skipped and Z/M ordinates are read
//! and discarded, since the viewer only uses horizontal positions.

use obramap_core::models::Geometry;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WkbError {
    #[error("Empty WKB input")]
    Empty,

    #[error("Truncated WKB input at offset {offset}")]
    Truncated { offset: usize },

    #[error("Invalid byte-order marker {0:#04x}")]
    InvalidByteOrder(u8),

    #[error("Unsupported WKB geometry type code {0}")]
    UnsupportedType(u32),

    #[error("Expected nested {expected} element, found type code {found}")]
    NestedTypeMismatch { expected: &'static str, found: u32 },
}

// EWKB dimension/SRID flags (PostGIS)
const EWKB_Z: u32 = 0x8000_0000;
const EWKB_M: u32 = 0x4000_0000;
const EWKB_SRID: u32 = 0x2000_0000;

struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], WkbError> {
        if self.pos + n > self.buf.len() {
            return Err(WkbError::Truncated { offset: self.pos });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, WkbError> {
        Ok(self.take(1)?[0])
    }

    fn read_u32(&mut self, little_endian: bool) -> Result<u32, WkbError> {
        let bytes: [u8; 4] = self.take(4)?.try_into().expect("slice length checked");
        Ok(if little_endian { u32::from_le_bytes(bytes) } else { u32::from_be_bytes(bytes) })
    }

    fn read_f64(&mut self, little_endian: bool) -> Result<f64, WkbError> {
        let bytes: [u8; 8] = self.take(8)?.try_into().expect("slice length checked");
        Ok(if little_endian { f64::from_le_bytes(bytes) } else { f64::from_be_bytes(bytes) })
    }
}

/// Decoded geometry header: endianness, base type code, extra dimensions.
struct Header {
    little_endian: bool,
    code: u32,
    has_z: bool,
    has_m: bool,
}

fn read_header(reader: &mut Reader<'_>) -> Result<Header, WkbError> {
    let little_endian = match reader.read_u8()? {
        0 => false,
        1 => true,
        other => return Err(WkbError::InvalidByteOrder(other)),
    };

    let raw = reader.read_u32(little_endian)?;

    let ewkb_z = raw & EWKB_Z != 0;
    let ewkb_m = raw & EWKB_M != 0;
    let has_srid = raw & EWKB_SRID != 0;
    let base = raw & !(EWKB_Z | EWKB_M | EWKB_SRID);

    // ISO WKB encodes dimensionality in the thousands digit (1001 = PointZ)
    let code = base % 1000;
    let iso_dim = base / 1000;
    let has_z = ewkb_z || iso_dim == 1 || iso_dim == 3;
    let has_m = ewkb_m || iso_dim == 2 || iso_dim == 3;

    if has_srid {
        reader.read_u32(little_endian)?;
    }

    Ok(Header { little_endian, code, has_z, has_m })
}

fn read_position(reader: &mut Reader<'_>, header: &Header) -> Result<[f64; 2], WkbError> {
    let lon = reader.read_f64(header.little_endian)?;
    let lat = reader.read_f64(header.little_endian)?;
    if header.has_z {
        reader.read_f64(header.little_endian)?;
    }
    if header.has_m {
        reader.read_f64(header.little_endian)?;
    }
    Ok([lon, lat])
}

fn read_positions(reader: &mut Reader<'_>, header: &Header) -> Result<Vec<[f64; 2]>, WkbError> {
    let count = reader.read_u32(header.little_endian)? as usize;
    let mut points = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        points.push(read_position(reader, header)?);
    }
    Ok(points)
}

fn read_rings(reader: &mut Reader<'_>, header: &Header) -> Result<Vec<Vec<[f64; 2]>>, WkbError> {
    let count = reader.read_u32(header.little_endian)? as usize;
    let mut rings = Vec::with_capacity(count.min(4096));
    for _ in 0..count {
        rings.push(read_positions(reader, header)?);
    }
    Ok(rings)
}

fn read_geometry(reader: &mut Reader<'_>) -> Result<Geometry, WkbError> {
    let header = read_header(reader)?;

    match header.code {
        1 => Ok(Geometry::Point { coordinates: read_position(reader, &header)? }),
        2 => Ok(Geometry::LineString { coordinates: read_positions(reader, &header)? }),
        3 => Ok(Geometry::Polygon { coordinates: read_rings(reader, &header)? }),
        4 => {
            // Each element of a multi-geometry is a full WKB geometry with
            // its own byte-order marker and type code.
            let count = reader.read_u32(header.little_endian)? as usize;
            let mut points = Vec::with_capacity(count.min(4096));
            for _ in 0..count {
                match read_geometry(reader)? {
                    Geometry::Point { coordinates } => points.push(coordinates),
                    other => {
                        return Err(WkbError::NestedTypeMismatch {
                            expected: "Point",
                            found: type_code(&other),
                        })
                    }
                }
            }
            Ok(Geometry::MultiPoint { coordinates: points })
        }
        5 => {
            let count = reader.read_u32(header.little_endian)? as usize;
            let mut lines = Vec::with_capacity(count.min(4096));
            for _ in 0..count {
                match read_geometry(reader)? {
                    Geometry::LineString { coordinates } => lines.push(coordinates),
                    other => {
                        return Err(WkbError::NestedTypeMismatch {
                            expected: "LineString",
                            found: type_code(&other),
                        })
                    }
                }
            }
            Ok(Geometry::MultiLineString { coordinates: lines })
        }
        6 => {
            let count = reader.read_u32(header.little_endian)? as usize;
            let mut polygons = Vec::with_capacity(count.min(4096));
            for _ in 0..count {
                match read_geometry(reader)? {
                    Geometry::Polygon { coordinates } => polygons.push(coordinates),
                    other => {
                        return Err(WkbError::NestedTypeMismatch {
                            expected: "Polygon",
                            found: type_code(&other),
                        })
                    }
                }
            }
            Ok(Geometry::MultiPolygon { coordinates: polygons })
        }
        other => Err(WkbError::UnsupportedType(other)),
    }
}

fn type_code(geometry: &Geometry) -> u32 {
    match geometry {
        Geometry::Point { .. } => 1,
        Geometry::LineString { .. } => 2,
        Geometry::Polygon { .. } => 3,
        Geometry::MultiPoint { .. } => 4,
        Geometry::MultiLineString { .. } => 5,
        Geometry::MultiPolygon { .. } => 6,
    }
}

/// Parse a WKB byte sequence into a [`Geometry`].
///
/// Never panics on malformed input; every failure mode is a [`WkbError`].
pub fn parse_wkb(bytes: &[u8]) -> Result<Geometry, WkbError> {
    if bytes.is_empty() {
        return Err(WkbError::Empty);
    }
    read_geometry(&mut Reader::new(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn le_point(lon: f64, lat: f64) -> Vec<u8> {
        let mut buf = vec![0x01, 0x01, 0x00, 0x00, 0x00];
        buf.extend_from_slice(&lon.to_le_bytes());
        buf.extend_from_slice(&lat.to_le_bytes());
        buf
    }

    fn le_line_string(points: &[(f64, f64)]) -> Vec<u8> {
        let mut buf = vec![0x01, 0x02, 0x00, 0x00, 0x00];
        buf.extend_from_slice(&(points.len() as u32).to_le_bytes());
        for (lon, lat) in points {
            buf.extend_from_slice(&lon.to_le_bytes());
            buf.extend_from_slice(&lat.to_le_bytes());
        }
        buf
    }

    #[test]
    fn test_parse_le_point() {
        let geom = parse_wkb(&le_point(-34.95, -8.05)).unwrap();
        assert_eq!(geom, Geometry::Point { coordinates: [-34.95, -8.05] });
    }

    #[test]
    fn test_parse_be_point() {
        let mut buf = vec![0x00, 0x00, 0x00, 0x00, 0x01];
        buf.extend_from_slice(&(-34.95f64).to_be_bytes());
        buf.extend_from_slice(&(-8.05f64).to_be_bytes());
        let geom = parse_wkb(&buf).unwrap();
        assert_eq!(geom, Geometry::Point { coordinates: [-34.95, -8.05] });
    }

    #[test]
    fn test_parse_ewkb_point_with_srid() {
        // PostGIS EWKB: type code carries the SRID flag, then 4 SRID bytes
        let mut buf = vec![0x01];
        buf.extend_from_slice(&(1u32 | super::EWKB_SRID).to_le_bytes());
        buf.extend_from_slice(&4326u32.to_le_bytes());
        buf.extend_from_slice(&(-34.95f64).to_le_bytes());
        buf.extend_from_slice(&(-8.05f64).to_le_bytes());
        let geom = parse_wkb(&buf).unwrap();
        assert_eq!(geom, Geometry::Point { coordinates: [-34.95, -8.05] });
    }

    #[test]
    fn test_parse_iso_point_z_drops_altitude() {
        let mut buf = vec![0x01];
        buf.extend_from_slice(&1001u32.to_le_bytes());
        buf.extend_from_slice(&(-34.95f64).to_le_bytes());
        buf.extend_from_slice(&(-8.05f64).to_le_bytes());
        buf.extend_from_slice(&12.5f64.to_le_bytes());
        let geom = parse_wkb(&buf).unwrap();
        assert_eq!(geom, Geometry::Point { coordinates: [-34.95, -8.05] });
    }

    #[test]
    fn test_parse_line_string() {
        let geom = parse_wkb(&le_line_string(&[(-34.95, -8.05), (-34.94, -8.04)])).unwrap();
        assert_eq!(
            geom,
            Geometry::LineString { coordinates: vec![[-34.95, -8.05], [-34.94, -8.04]] }
        );
    }

    #[test]
    fn test_parse_polygon() {
        let mut buf = vec![0x01, 0x03, 0x00, 0x00, 0x00];
        buf.extend_from_slice(&1u32.to_le_bytes()); // one ring
        buf.extend_from_slice(&3u32.to_le_bytes()); // three points
        for (lon, lat) in [(0.0, 0.0), (1.0, 0.0), (0.0, 0.0)] {
            buf.extend_from_slice(&(lon as f64).to_le_bytes());
            buf.extend_from_slice(&(lat as f64).to_le_bytes());
        }
        let geom = parse_wkb(&buf).unwrap();
        assert_eq!(
            geom,
            Geometry::Polygon { coordinates: vec![vec![[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]] }
        );
    }

    #[test]
    fn test_parse_multi_point_of_nested_geometries() {
        let mut buf = vec![0x01, 0x04, 0x00, 0x00, 0x00];
        buf.extend_from_slice(&2u32.to_le_bytes());
        buf.extend_from_slice(&le_point(-34.95, -8.05));
        buf.extend_from_slice(&le_point(-34.94, -8.04));
        let geom = parse_wkb(&buf).unwrap();
        assert_eq!(
            geom,
            Geometry::MultiPoint { coordinates: vec![[-34.95, -8.05], [-34.94, -8.04]] }
        );
    }

    #[test]
    fn test_parse_multi_line_string() {
        let mut buf = vec![0x01, 0x05, 0x00, 0x00, 0x00];
        buf.extend_from_slice(&2u32.to_le_bytes());
        buf.extend_from_slice(&le_line_string(&[(0.0, 0.0), (1.0, 1.0)]));
        buf.extend_from_slice(&le_line_string(&[(2.0, 2.0), (3.0, 3.0)]));
        let geom = parse_wkb(&buf).unwrap();
        assert_eq!(
            geom,
            Geometry::MultiLineString {
                coordinates: vec![vec![[0.0, 0.0], [1.0, 1.0]], vec![[2.0, 2.0], [3.0, 3.0]]]
            }
        );
    }

    #[test]
    fn test_truncated_input_errors() {
        let full = le_point(-34.95, -8.05);
        let err = parse_wkb(&full[..full.len() - 3]).unwrap_err();
        assert!(matches!(err, WkbError::Truncated { .. }));
    }

    #[test]
    fn test_empty_input_errors() {
        assert_eq!(parse_wkb(&[]), Err(WkbError::Empty));
    }

    #[test]
    fn test_unknown_type_code_errors() {
        let buf = vec![0x01, 0x07, 0x00, 0x00, 0x00]; // GeometryCollection
        assert_eq!(parse_wkb(&buf), Err(WkbError::UnsupportedType(7)));
    }

    #[test]
    fn test_invalid_byte_order_errors() {
        assert_eq!(parse_wkb(&[0x02, 0x01, 0x00, 0x00, 0x00]), Err(WkbError::InvalidByteOrder(2)));
    }

    #[test]
    fn test_nested_type_mismatch_errors() {
        // MultiPoint whose element is a LineString
        let mut buf = vec![0x01, 0x04, 0x00, 0x00, 0x00];
        buf.extend_from_slice(&1u32.to_le_bytes());
        buf.extend_from_slice(&le_line_string(&[(0.0, 0.0), (1.0, 1.0)]));
        let err = parse_wkb(&buf).unwrap_err();
        assert_eq!(err, WkbError::NestedTypeMismatch { expected: "Point", found: 2 });
    }
}
