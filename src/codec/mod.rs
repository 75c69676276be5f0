//! Type-directed conversion between tagged-value documents and typed records.
//!
//! Every decodable Rust type implements [`FromValue`] (and [`ToValue`] for the
//! reverse direction). Record types declare their field-to-tag mapping once
//! through [`tagged_record!`](crate::tagged_record), which generates a
//! [`Record`] impl whose decode and encode walk the same table. Dispatch is
//! resolved at compile time; nothing inspects types at runtime.
//!
//! Decoding rules shared by every shape:
//! - a tag missing from the map leaves the field at its default value;
//! - a present `Null` yields [`FromValue::from_null`] (zero value, or `None`
//!   for optional fields) and never runs the shape's own validation;
//! - any other variant that does not match the shape is a
//!   [`DecodeError::TypeMismatch`].

mod collection;
mod record;
mod scalar;

use std::fmt;

use crate::error::DecodeError;
use crate::types::{Document, TaggedValue};

/// Declared target shape of a record field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Shape {
    Bool,
    Integer,
    Float,
    String,
    Timestamp,
    Bytes,
    Identifier,
    GeoPoint,
    Record(&'static str),
    Optional(Box<Shape>),
    Collection(Box<Shape>),
    Mapping(Box<Shape>),
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("boolean"),
            Self::Integer => f.write_str("integer"),
            Self::Float => f.write_str("floating-point number"),
            Self::String => f.write_str("string"),
            Self::Timestamp => f.write_str("timestamp"),
            Self::Bytes => f.write_str("bytes"),
            Self::Identifier => f.write_str("identifier"),
            Self::GeoPoint => f.write_str("geo point"),
            Self::Record(name) => write!(f, "record `{name}`"),
            Self::Optional(inner) => write!(f, "optional {inner}"),
            Self::Collection(inner) => write!(f, "array of {inner}"),
            Self::Mapping(inner) => write!(f, "map of {inner}"),
        }
    }
}

/// One entry of a record's static field table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    /// Rust field name.
    pub field: &'static str,
    /// Key looked up in the tagged-value map.
    pub tag: &'static str,
    pub shape: Shape,
}

/// A Rust type that can be produced from a tagged value.
pub trait FromValue: Sized {
    /// Shape reported in mappings and mismatch errors.
    fn shape() -> Shape;

    /// Value used when the wire holds an explicit `Null`.
    fn from_null() -> Self;

    /// Convert a non-null value. Callers go through [`decode_value`], which
    /// routes `Null` to [`FromValue::from_null`].
    fn from_value(value: &TaggedValue) -> Result<Self, DecodeError>;
}

/// A Rust type that can be rendered back into a tagged value.
pub trait ToValue {
    fn to_value(&self) -> TaggedValue;
}

/// A record type with a static field-to-tag mapping.
pub trait Record: Default + FromValue + ToValue {
    const NAME: &'static str;

    fn field_mappings() -> Vec<FieldMapping>;

    fn decode_fields(fields: &Document) -> Result<Self, DecodeError>;

    fn encode_fields(&self) -> Document;
}

/// Decode a single value, applying the shared `Null` rule.
pub fn decode_value<T: FromValue>(value: &TaggedValue) -> Result<T, DecodeError> {
    if value.is_null() {
        Ok(T::from_null())
    } else {
        T::from_value(value)
    }
}

/// Decode a whole document into a fresh record.
pub fn decode<R: Record>(document: &Document) -> Result<R, DecodeError> {
    R::decode_fields(document)
}

/// Encode a record with the same tags it is decoded from.
#[must_use]
pub fn encode<R: Record>(record: &R) -> Document {
    record.encode_fields()
}
