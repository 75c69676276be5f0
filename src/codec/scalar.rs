//! Scalar and special-encoding shapes.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{FromValue, Shape, ToValue};
use crate::error::DecodeError;
use crate::types::{Blob, GeoPoint, TaggedValue};

impl FromValue for bool {
    fn shape() -> Shape {
        Shape::Bool
    }

    fn from_null() -> Self {
        false
    }

    fn from_value(value: &TaggedValue) -> Result<Self, DecodeError> {
        match value {
            TaggedValue::Bool(flag) => Ok(*flag),
            other => Err(DecodeError::mismatch(Self::shape(), other.kind())),
        }
    }
}

impl ToValue for bool {
    fn to_value(&self) -> TaggedValue {
        TaggedValue::Bool(*self)
    }
}

impl FromValue for i64 {
    fn shape() -> Shape {
        Shape::Integer
    }

    fn from_null() -> Self {
        0
    }

    fn from_value(value: &TaggedValue) -> Result<Self, DecodeError> {
        match value {
            TaggedValue::Int(number) => Ok(*number),
            other => Err(DecodeError::mismatch(Self::shape(), other.kind())),
        }
    }
}

impl ToValue for i64 {
    fn to_value(&self) -> TaggedValue {
        TaggedValue::Int(*self)
    }
}

impl FromValue for i32 {
    fn shape() -> Shape {
        Shape::Integer
    }

    fn from_null() -> Self {
        0
    }

    fn from_value(value: &TaggedValue) -> Result<Self, DecodeError> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide).map_err(|_| DecodeError::OutOfRange {
            value: wide,
            target: "i32",
        })
    }
}

impl ToValue for i32 {
    fn to_value(&self) -> TaggedValue {
        TaggedValue::Int(i64::from(*self))
    }
}

// Floating-point fields accept integer sources as well.
impl FromValue for f64 {
    fn shape() -> Shape {
        Shape::Float
    }

    fn from_null() -> Self {
        0.0
    }

    fn from_value(value: &TaggedValue) -> Result<Self, DecodeError> {
        match value {
            TaggedValue::Double(number) => Ok(*number),
            TaggedValue::Int(number) => Ok(*number as f64),
            other => Err(DecodeError::mismatch(Self::shape(), other.kind())),
        }
    }
}

impl ToValue for f64 {
    fn to_value(&self) -> TaggedValue {
        TaggedValue::Double(*self)
    }
}

impl FromValue for f32 {
    fn shape() -> Shape {
        Shape::Float
    }

    fn from_null() -> Self {
        0.0
    }

    fn from_value(value: &TaggedValue) -> Result<Self, DecodeError> {
        f64::from_value(value).map(|number| number as f32)
    }
}

impl ToValue for f32 {
    fn to_value(&self) -> TaggedValue {
        TaggedValue::Double(f64::from(*self))
    }
}

impl FromValue for String {
    fn shape() -> Shape {
        Shape::String
    }

    fn from_null() -> Self {
        String::new()
    }

    fn from_value(value: &TaggedValue) -> Result<Self, DecodeError> {
        match value {
            TaggedValue::String(text) => Ok(text.clone()),
            other => Err(DecodeError::mismatch(Self::shape(), other.kind())),
        }
    }
}

impl ToValue for String {
    fn to_value(&self) -> TaggedValue {
        TaggedValue::String(self.clone())
    }
}

impl FromValue for DateTime<Utc> {
    fn shape() -> Shape {
        Shape::Timestamp
    }

    fn from_null() -> Self {
        DateTime::<Utc>::default()
    }

    fn from_value(value: &TaggedValue) -> Result<Self, DecodeError> {
        match value {
            TaggedValue::Timestamp(at) => Ok(*at),
            other => Err(DecodeError::mismatch(Self::shape(), other.kind())),
        }
    }
}

impl ToValue for DateTime<Utc> {
    fn to_value(&self) -> TaggedValue {
        TaggedValue::Timestamp(*self)
    }
}

impl FromValue for Blob {
    fn shape() -> Shape {
        Shape::Bytes
    }

    fn from_null() -> Self {
        Blob::default()
    }

    fn from_value(value: &TaggedValue) -> Result<Self, DecodeError> {
        match value {
            TaggedValue::Bytes(bytes) => Ok(Blob(bytes.clone())),
            other => Err(DecodeError::mismatch(Self::shape(), other.kind())),
        }
    }
}

impl ToValue for Blob {
    fn to_value(&self) -> TaggedValue {
        TaggedValue::Bytes(self.0.clone())
    }
}

/// Identifiers travel as strings and must parse; a malformed one is a hard
/// error rather than a silent nil id.
impl FromValue for Uuid {
    fn shape() -> Shape {
        Shape::Identifier
    }

    fn from_null() -> Self {
        Uuid::nil()
    }

    fn from_value(value: &TaggedValue) -> Result<Self, DecodeError> {
        match value {
            TaggedValue::String(text) => {
                Uuid::parse_str(text).map_err(|err| DecodeError::InvalidIdentifier {
                    value: text.clone(),
                    reason: err.to_string(),
                })
            }
            other => Err(DecodeError::mismatch(Self::shape(), other.kind())),
        }
    }
}

impl ToValue for Uuid {
    fn to_value(&self) -> TaggedValue {
        TaggedValue::String(self.hyphenated().to_string())
    }
}

impl FromValue for GeoPoint {
    fn shape() -> Shape {
        Shape::GeoPoint
    }

    fn from_null() -> Self {
        GeoPoint::default()
    }

    fn from_value(value: &TaggedValue) -> Result<Self, DecodeError> {
        match value {
            TaggedValue::GeoPoint(point) => Ok(*point),
            other => Err(DecodeError::mismatch(Self::shape(), other.kind())),
        }
    }
}

impl ToValue for GeoPoint {
    fn to_value(&self) -> TaggedValue {
        TaggedValue::GeoPoint(*self)
    }
}
