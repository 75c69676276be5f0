//! The tagged-value wire representation of a document field.
//!
//! A [`TaggedValue`] carries exactly one variant. On the wire it is rendered the
//! way the document database's REST API renders values: a single-key object
//! whose key names the variant (`{"stringValue": "..."}`,
//! `{"mapValue": {"fields": {...}}}`, ...). Integers travel as decimal strings
//! but plain JSON numbers are accepted as well. Non-finite doubles travel as
//! `"NaN"`, `"Infinity"` and `"-Infinity"`.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Field map of a document or nested map value. A missing key means "not
/// present", which is distinct from a key holding [`TaggedValue::Null`].
pub type Document = BTreeMap<String, TaggedValue>;

/// Geographic point in degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Opaque byte sequence field. Kept distinct from `Vec<u8>`, which decodes as
/// a collection of integers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Blob(pub Vec<u8>);

impl Blob {
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Blob {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Blob {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

/// One self-describing document value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "WireValue", into = "WireValue")]
pub enum TaggedValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    Timestamp(DateTime<Utc>),
    GeoPoint(GeoPoint),
    Array(Vec<TaggedValue>),
    Map(Document),
}

/// Discriminant of a [`TaggedValue`], used in error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Int,
    Double,
    String,
    Bytes,
    Timestamp,
    GeoPoint,
    Array,
    Map,
}

impl ValueKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Int => "integer",
            Self::Double => "double",
            Self::String => "string",
            Self::Bytes => "bytes",
            Self::Timestamp => "timestamp",
            Self::GeoPoint => "geo point",
            Self::Array => "array",
            Self::Map => "map",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TaggedValue {
    #[must_use]
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Double(_) => ValueKind::Double,
            Self::String(_) => ValueKind::String,
            Self::Bytes(_) => ValueKind::Bytes,
            Self::Timestamp(_) => ValueKind::Timestamp,
            Self::GeoPoint(_) => ValueKind::GeoPoint,
            Self::Array(_) => ValueKind::Array,
            Self::Map(_) => ValueKind::Map,
        }
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_map(&self) -> Option<&Document> {
        match self {
            Self::Map(fields) => Some(fields),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> Option<&[TaggedValue]> {
        match self {
            Self::Array(values) => Some(values),
            _ => None,
        }
    }
}

impl From<bool> for TaggedValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for TaggedValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for TaggedValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

impl From<&str> for TaggedValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for TaggedValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<DateTime<Utc>> for TaggedValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

impl From<GeoPoint> for TaggedValue {
    fn from(value: GeoPoint) -> Self {
        Self::GeoPoint(value)
    }
}

impl From<Vec<TaggedValue>> for TaggedValue {
    fn from(values: Vec<TaggedValue>) -> Self {
        Self::Array(values)
    }
}

impl From<Document> for TaggedValue {
    fn from(fields: Document) -> Self {
        Self::Map(fields)
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
enum WireValue {
    NullValue(()),
    BooleanValue(bool),
    IntegerValue(#[serde(with = "int64_string")] i64),
    DoubleValue(#[serde(with = "double_value")] f64),
    StringValue(String),
    BytesValue(#[serde(with = "base64_bytes")] Vec<u8>),
    TimestampValue(DateTime<Utc>),
    GeoPointValue(GeoPoint),
    ArrayValue(WireArray),
    MapValue(WireMap),
}

#[derive(Serialize, Deserialize)]
struct WireArray {
    #[serde(default)]
    values: Vec<TaggedValue>,
}

#[derive(Serialize, Deserialize)]
struct WireMap {
    #[serde(default)]
    fields: Document,
}

impl From<WireValue> for TaggedValue {
    fn from(wire: WireValue) -> Self {
        match wire {
            WireValue::NullValue(()) => Self::Null,
            WireValue::BooleanValue(value) => Self::Bool(value),
            WireValue::IntegerValue(value) => Self::Int(value),
            WireValue::DoubleValue(value) => Self::Double(value),
            WireValue::StringValue(value) => Self::String(value),
            WireValue::BytesValue(value) => Self::Bytes(value),
            WireValue::TimestampValue(value) => Self::Timestamp(value),
            WireValue::GeoPointValue(value) => Self::GeoPoint(value),
            WireValue::ArrayValue(array) => Self::Array(array.values),
            WireValue::MapValue(map) => Self::Map(map.fields),
        }
    }
}

impl From<TaggedValue> for WireValue {
    fn from(value: TaggedValue) -> Self {
        match value {
            TaggedValue::Null => Self::NullValue(()),
            TaggedValue::Bool(value) => Self::BooleanValue(value),
            TaggedValue::Int(value) => Self::IntegerValue(value),
            TaggedValue::Double(value) => Self::DoubleValue(value),
            TaggedValue::String(value) => Self::StringValue(value),
            TaggedValue::Bytes(value) => Self::BytesValue(value),
            TaggedValue::Timestamp(value) => Self::TimestampValue(value),
            TaggedValue::GeoPoint(value) => Self::GeoPointValue(value),
            TaggedValue::Array(values) => Self::ArrayValue(WireArray { values }),
            TaggedValue::Map(fields) => Self::MapValue(WireMap { fields }),
        }
    }
}

mod int64_string {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
        struct Int64Visitor;

        impl Visitor<'_> for Int64Visitor {
            type Value = i64;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a 64-bit integer or its decimal string form")
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
                Ok(value)
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
                i64::try_from(value).map_err(|_| E::custom(format!("integer {value} overflows i64")))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<i64, E> {
                value
                    .trim()
                    .parse()
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(value), &self))
            }
        }

        deserializer.deserialize_any(Int64Visitor)
    }
}

mod double_value {
    use std::fmt;

    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};

    const NAN: &str = "NaN";
    const INFINITY: &str = "Infinity";
    const NEG_INFINITY: &str = "-Infinity";

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_str(NAN)
        } else if value.is_infinite() {
            serializer.serialize_str(if value.is_sign_positive() { INFINITY } else { NEG_INFINITY })
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        struct DoubleVisitor;

        impl Visitor<'_> for DoubleVisitor {
            type Value = f64;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number, \"NaN\", \"Infinity\" or \"-Infinity\"")
            }

            fn visit_f64<E: de::Error>(self, value: f64) -> Result<f64, E> {
                Ok(value)
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<f64, E> {
                Ok(value as f64)
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<f64, E> {
                Ok(value as f64)
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<f64, E> {
                match value {
                    NAN => Ok(f64::NAN),
                    INFINITY => Ok(f64::INFINITY),
                    NEG_INFINITY => Ok(f64::NEG_INFINITY),
                    other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
                }
            }
        }

        deserializer.deserialize_any(DoubleVisitor)
    }
}

mod base64_bytes {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
