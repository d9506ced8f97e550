//! Snapshot payload models
//!
//! One snapshot is the `mcbroken.json` file recorded by a single archive
//! commit: a JSON array of restaurant points, each carrying its coordinates
//! and the machine status at capture time.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

/// Restaurant identity: the exact coordinate pair of the point.
///
/// Coordinates are compared bit-for-bit after folding `-0.0` into `0.0`, so
/// two records are the same restaurant only when their numbers are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RestaurantKey {
    longitude_bits: u64,
    latitude_bits: u64,
}

impl RestaurantKey {
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude_bits: canonical_bits(longitude),
            latitude_bits: canonical_bits(latitude),
        }
    }

    pub fn longitude(&self) -> f64 {
        f64::from_bits(self.longitude_bits)
    }

    pub fn latitude(&self) -> f64 {
        f64::from_bits(self.latitude_bits)
    }
}

fn canonical_bits(value: f64) -> u64 {
    if value == 0.0 {
        0.0f64.to_bits()
    } else {
        value.to_bits()
    }
}

impl fmt::Display for RestaurantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.longitude(), self.latitude())
    }
}

/// One restaurant entry within a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireRecord", into = "WireRecord")]
pub struct RestaurantRecord {
    /// (longitude, latitude)
    pub coordinates: (f64, f64),
    pub country: String,
    /// Whether the restaurant status is currently tracked
    pub is_active: bool,
    /// Whether the ice-cream machine was reported broken at capture time
    pub is_broken: bool,
}

impl RestaurantRecord {
    pub fn key(&self) -> RestaurantKey {
        RestaurantKey::new(self.coordinates.0, self.coordinates.1)
    }

    /// True when this record counts as one broken-hour
    pub fn counts_as_broken(&self) -> bool {
        self.country == USA && self.is_active && self.is_broken
    }
}

/// Country code the archive uses for US restaurants
pub const USA: &str = "USA";

/// Parsed payload of one archive commit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    records: Vec<RestaurantRecord>,
}

impl Snapshot {
    pub fn new(records: Vec<RestaurantRecord>) -> Self {
        Self { records }
    }

    /// Parses a raw `mcbroken.json` payload
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn records(&self) -> &[RestaurantRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ===== Wire format =====

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireRecord {
    geometry: WireGeometry,
    properties: WireProperties,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireGeometry {
    coordinates: (f64, f64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct WireProperties {
    country: String,
    is_active: bool,
    #[serde(deserialize_with = "deserialize_flag")]
    is_broken: bool,
}

impl From<WireRecord> for RestaurantRecord {
    fn from(wire: WireRecord) -> Self {
        Self {
            coordinates: wire.geometry.coordinates,
            country: wire.properties.country,
            is_active: wire.properties.is_active,
            is_broken: wire.properties.is_broken,
        }
    }
}

impl From<RestaurantRecord> for WireRecord {
    fn from(record: RestaurantRecord) -> Self {
        Self {
            geometry: WireGeometry {
                coordinates: record.coordinates,
            },
            properties: WireProperties {
                country: record.country,
                is_active: record.is_active,
                is_broken: record.is_broken,
            },
        }
    }
}

/// Accepts `true`/`false` as well as the `0`/`1` integers older snapshots use
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(u64),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Int(0) => Ok(false),
        Flag::Int(1) => Ok(true),
        Flag::Int(other) => Err(D::Error::custom(format!(
            "expected boolean or 0/1 flag, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {
            "geometry": {"type": "Point", "coordinates": [-87.6298, 41.8781]},
            "properties": {
                "country": "USA",
                "is_active": true,
                "is_broken": true,
                "state": "IL",
                "dot": "broken"
            },
            "type": "Feature"
        },
        {
            "geometry": {"coordinates": [-0.1276, 51.5072]},
            "properties": {"country": "UK", "is_active": true, "is_broken": 0}
        }
    ]"#;

    #[test]
    fn parses_payload_and_ignores_extra_fields() {
        let snapshot = Snapshot::from_json(SAMPLE).unwrap();
        assert_eq!(snapshot.len(), 2);

        let first = &snapshot.records()[0];
        assert_eq!(first.coordinates, (-87.6298, 41.8781));
        assert_eq!(first.country, "USA");
        assert!(first.is_active);
        assert!(first.is_broken);
        assert!(first.counts_as_broken());

        let second = &snapshot.records()[1];
        assert!(!second.is_broken);
        assert!(!second.counts_as_broken());
    }

    #[test]
    fn accepts_integer_broken_flag() {
        let raw = r#"[{"geometry":{"coordinates":[1.0,2.0]},
                      "properties":{"country":"USA","is_active":true,"is_broken":1}}]"#;
        let snapshot = Snapshot::from_json(raw).unwrap();
        assert!(snapshot.records()[0].is_broken);
    }

    #[test]
    fn rejects_out_of_range_broken_flag() {
        let raw = r#"[{"geometry":{"coordinates":[1.0,2.0]},
                      "properties":{"country":"USA","is_active":true,"is_broken":2}}]"#;
        assert!(Snapshot::from_json(raw).is_err());
    }

    #[test]
    fn rejects_missing_required_fields() {
        let no_country = r#"[{"geometry":{"coordinates":[1.0,2.0]},
                             "properties":{"is_active":true,"is_broken":true}}]"#;
        assert!(Snapshot::from_json(no_country).is_err());

        let no_geometry = r#"[{"properties":{"country":"USA","is_active":true,"is_broken":true}}]"#;
        assert!(Snapshot::from_json(no_geometry).is_err());
    }

    #[test]
    fn rejects_non_array_payload() {
        assert!(Snapshot::from_json(r#"{"type":"FeatureCollection"}"#).is_err());
        assert!(Snapshot::from_json("not json").is_err());
    }

    #[test]
    fn rejects_coordinates_without_exactly_two_numbers() {
        let raw = r#"[{"geometry":{"coordinates":[1.0]},
                      "properties":{"country":"USA","is_active":true,"is_broken":true}}]"#;
        assert!(Snapshot::from_json(raw).is_err());
    }

    #[test]
    fn serializes_back_to_wire_shape() {
        let record = RestaurantRecord {
            coordinates: (1.5, -2.5),
            country: "USA".to_string(),
            is_active: false,
            is_broken: true,
        };
        let json = serde_json::to_value(Snapshot::new(vec![record])).unwrap();
        assert_eq!(json[0]["geometry"]["coordinates"], serde_json::json!([1.5, -2.5]));
        assert_eq!(json[0]["properties"]["is_active"], serde_json::json!(false));
    }

    #[test]
    fn key_equality_follows_numeric_equality() {
        assert_eq!(RestaurantKey::new(-0.0, 1.0), RestaurantKey::new(0.0, 1.0));
        assert_eq!(RestaurantKey::new(10.25, 3.5), RestaurantKey::new(10.25, 3.5));
        assert_ne!(RestaurantKey::new(10.25, 3.5), RestaurantKey::new(3.5, 10.25));
        // Different textual precision that parses to a different float is a different key
        assert_ne!(
            RestaurantKey::new(-87.6298, 41.8781),
            RestaurantKey::new(-87.62980001, 41.8781)
        );
    }
}
