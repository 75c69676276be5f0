//! Optional, collection and map shapes.

use std::collections::{BTreeMap, HashMap};

use super::{FromValue, Shape, ToValue, decode_value};
use crate::error::{DecodeError, PathSegment};
use crate::types::{Document, TaggedValue};

// `Null` becomes `None` through `from_null`, so `from_value` only ever sees a
// present value.
impl<T: FromValue> FromValue for Option<T> {
    fn shape() -> Shape {
        Shape::Optional(Box::new(T::shape()))
    }

    fn from_null() -> Self {
        None
    }

    fn from_value(value: &TaggedValue) -> Result<Self, DecodeError> {
        T::from_value(value).map(Some)
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> TaggedValue {
        match self {
            Some(inner) => inner.to_value(),
            None => TaggedValue::Null,
        }
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn shape() -> Shape {
        Shape::Collection(Box::new(T::shape()))
    }

    fn from_null() -> Self {
        Vec::new()
    }

    fn from_value(value: &TaggedValue) -> Result<Self, DecodeError> {
        let TaggedValue::Array(items) = value else {
            return Err(DecodeError::mismatch(Self::shape(), value.kind()));
        };
        items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                decode_value::<T>(item).map_err(|err| err.at(PathSegment::Index(index)))
            })
            .collect()
    }
}

impl<T: ToValue> ToValue for Vec<T> {
    fn to_value(&self) -> TaggedValue {
        TaggedValue::Array(self.iter().map(ToValue::to_value).collect())
    }
}

fn decode_entries<T, M>(value: &TaggedValue, shape: impl FnOnce() -> Shape) -> Result<M, DecodeError>
where
    T: FromValue,
    M: FromIterator<(String, T)>,
{
    let TaggedValue::Map(fields) = value else {
        return Err(DecodeError::mismatch(shape(), value.kind()));
    };
    fields
        .iter()
        .map(|(key, item)| {
            decode_value::<T>(item)
                .map(|decoded| (key.clone(), decoded))
                .map_err(|err| err.at(PathSegment::Key(key.clone())))
        })
        .collect()
}

fn encode_entries<'a, T: ToValue + 'a>(
    entries: impl Iterator<Item = (&'a String, &'a T)>,
) -> TaggedValue {
    let fields: Document = entries
        .map(|(key, item)| (key.clone(), item.to_value()))
        .collect();
    TaggedValue::Map(fields)
}

impl<T: FromValue> FromValue for HashMap<String, T> {
    fn shape() -> Shape {
        Shape::Mapping(Box::new(T::shape()))
    }

    fn from_null() -> Self {
        HashMap::new()
    }

    fn from_value(value: &TaggedValue) -> Result<Self, DecodeError> {
        decode_entries::<T, _>(value, Self::shape)
    }
}

impl<T: ToValue> ToValue for HashMap<String, T> {
    fn to_value(&self) -> TaggedValue {
        encode_entries(self.iter())
    }
}

impl<T: FromValue> FromValue for BTreeMap<String, T> {
    fn shape() -> Shape {
        Shape::Mapping(Box::new(T::shape()))
    }

    fn from_null() -> Self {
        BTreeMap::new()
    }

    fn from_value(value: &TaggedValue) -> Result<Self, DecodeError> {
        decode_entries::<T, _>(value, Self::shape)
    }
}

impl<T: ToValue> ToValue for BTreeMap<String, T> {
    fn to_value(&self) -> TaggedValue {
        encode_entries(self.iter())
    }
}
