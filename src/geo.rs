//! Binary codec for geographic coordinates.
//!
//! A coordinate is stored as two little-endian `f32` values, latitude first,
//! for a fixed width of [`COORDINATE_BYTES`]. A polyline is the plain
//! concatenation of its coordinates: no length prefix, no padding, no tag.
//! The number of coordinates in a blob is therefore `len / 8`, and any other
//! length is corrupt data.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Encoded width of a single coordinate.
pub const COORDINATE_BYTES: usize = 8;

/// Errors raised while decoding a coordinate blob.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeoError {
    /// The blob is not a whole number of coordinate pairs.
    #[error("coordinate blob of {len} bytes is not a multiple of {COORDINATE_BYTES}")]
    InvalidLength { len: usize },

    /// A single position was expected but the blob held a different count.
    #[error("expected exactly one coordinate, found {count}")]
    NotSingle { count: usize },
}

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    /// Degrees north, negative for south.
    #[serde(rename = "lat")]
    pub latitude: f32,
    /// Degrees east, negative for west.
    #[serde(rename = "lng")]
    pub longitude: f32,
}

impl GeoCoordinate {
    /// A coordinate from degrees.
    pub fn new(latitude: f32, longitude: f32) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Encodes this coordinate into its 8-byte form.
    pub fn to_bytes(self) -> [u8; COORDINATE_BYTES] {
        let mut out = [0u8; COORDINATE_BYTES];
        out[..4].copy_from_slice(&self.latitude.to_le_bytes());
        out[4..].copy_from_slice(&self.longitude.to_le_bytes());
        out
    }

    /// Decodes a blob that must contain exactly one coordinate.
    pub fn from_bytes(data: &[u8]) -> Result<Self, GeoError> {
        let mut coordinates = decode_polyline(data)?;
        match coordinates.len() {
            1 => Ok(coordinates.remove(0)),
            count => Err(GeoError::NotSingle { count }),
        }
    }

    fn from_chunk(chunk: &[u8; COORDINATE_BYTES]) -> Self {
        let [a, b, c, d, e, f, g, h] = *chunk;
        Self {
            latitude: f32::from_le_bytes([a, b, c, d]),
            longitude: f32::from_le_bytes([e, f, g, h]),
        }
    }
}

/// Encodes a sequence of coordinates, in order, into `8 * n` bytes.
pub fn encode_polyline(coordinates: &[GeoCoordinate]) -> Vec<u8> {
    let mut out = Vec::with_capacity(coordinates.len() * COORDINATE_BYTES);
    for coordinate in coordinates {
        out.extend_from_slice(&coordinate.to_bytes());
    }
    out
}

/// Decodes a blob produced by [`encode_polyline`].
pub fn decode_polyline(data: &[u8]) -> Result<Vec<GeoCoordinate>, GeoError> {
    if data.len() % COORDINATE_BYTES != 0 {
        return Err(GeoError::InvalidLength { len: data.len() });
    }

    Ok(data
        .chunks_exact(COORDINATE_BYTES)
        .map(|chunk| {
            let mut raw = [0u8; COORDINATE_BYTES];
            raw.copy_from_slice(chunk);
            GeoCoordinate::from_chunk(&raw)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_latitude_then_longitude_little_endian() {
        let bytes = GeoCoordinate::new(1.0, -2.5).to_bytes();
        assert_eq!(&bytes[..4], &1.0f32.to_le_bytes());
        assert_eq!(&bytes[4..], &(-2.5f32).to_le_bytes());
    }

    #[test]
    fn polyline_round_trip_is_exact() {
        let route = vec![
            GeoCoordinate::new(46.5, 7.9),
            GeoCoordinate::new(46.6, 8.0),
            GeoCoordinate::new(-33.918_86, 151.231_23),
            GeoCoordinate::new(f32::MIN_POSITIVE, f32::MAX),
        ];

        let encoded = encode_polyline(&route);
        assert_eq!(encoded.len(), route.len() * COORDINATE_BYTES);

        let decoded = decode_polyline(&encoded).unwrap();
        assert_eq!(decoded, route);
        assert_eq!(encode_polyline(&decoded), encoded);
    }

    #[test]
    fn empty_polyline_is_empty_blob() {
        assert!(encode_polyline(&[]).is_empty());
        assert!(decode_polyline(&[]).unwrap().is_empty());
    }

    #[test]
    fn negative_zero_survives_round_trip() {
        let encoded = encode_polyline(&[GeoCoordinate::new(-0.0, 0.0)]);
        let decoded = decode_polyline(&encoded).unwrap();
        assert!(decoded[0].latitude.is_sign_negative());
        assert_eq!(encode_polyline(&decoded), encoded);
    }

    #[test]
    fn ragged_blob_is_rejected() {
        for len in [1, 7, 9, 15, 17] {
            let data = vec![0u8; len];
            assert_eq!(
                decode_polyline(&data),
                Err(GeoError::InvalidLength { len })
            );
        }
    }

    #[test]
    fn single_position_requires_exactly_one_pair() {
        let position = GeoCoordinate::new(59.33, 18.06);
        assert_eq!(
            GeoCoordinate::from_bytes(&position.to_bytes()).unwrap(),
            position
        );
        assert_eq!(
            GeoCoordinate::from_bytes(&[]),
            Err(GeoError::NotSingle { count: 0 })
        );
        assert_eq!(
            GeoCoordinate::from_bytes(&encode_polyline(&[position, position])),
            Err(GeoError::NotSingle { count: 2 })
        );
    }

    #[test]
    fn json_uses_lat_lng() {
        let json = serde_json::to_value(GeoCoordinate::new(1.5, 2.5)).unwrap();
        assert_eq!(json, serde_json::json!({ "lat": 1.5, "lng": 2.5 }));
    }
}
