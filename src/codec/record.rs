//! Declarative field mappings for record types.

/// Declare a record struct together with its wire tags.
///
/// ```
/// use cashwatch_core::tagged_record;
///
/// tagged_record! {
///     #[derive(Debug, Clone, Default, PartialEq)]
///     pub struct Till {
///         pub label: String => "label",
///         pub float: Option<f64> => "float_amount",
///     }
/// }
///
/// let mut fields = cashwatch_core::types::Document::new();
/// fields.insert("label".into(), "front".into());
/// let till: Till = cashwatch_core::codec::decode(&fields).unwrap();
/// assert_eq!(till.label, "front");
/// assert_eq!(till.float, None);
/// ```
///
/// The struct must derive `Default`; decoding starts from it and only fields
/// whose tag is present are overwritten.
#[macro_export]
macro_rules! tagged_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty => $tag:literal
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::codec::Record for $name {
            const NAME: &'static str = stringify!($name);

            fn field_mappings() -> ::std::vec::Vec<$crate::codec::FieldMapping> {
                ::std::vec![
                    $(
                        $crate::codec::FieldMapping {
                            field: stringify!($field),
                            tag: $tag,
                            shape: <$ty as $crate::codec::FromValue>::shape(),
                        },
                    )*
                ]
            }

            fn decode_fields(
                fields: &$crate::types::Document,
            ) -> ::std::result::Result<Self, $crate::DecodeError> {
                let mut record = <Self as ::std::default::Default>::default();
                $(
                    if let ::std::option::Option::Some(value) = fields.get($tag) {
                        record.$field = $crate::codec::decode_value::<$ty>(value)
                            .map_err(|err| err.at($crate::PathSegment::Field($tag)))?;
                    }
                )*
                ::std::result::Result::Ok(record)
            }

            fn encode_fields(&self) -> $crate::types::Document {
                let mut fields = $crate::types::Document::new();
                $(
                    fields.insert(
                        ::std::string::String::from($tag),
                        $crate::codec::ToValue::to_value(&self.$field),
                    );
                )*
                fields
            }
        }

        impl $crate::codec::FromValue for $name {
            fn shape() -> $crate::codec::Shape {
                $crate::codec::Shape::Record(stringify!($name))
            }

            fn from_null() -> Self {
                <Self as ::std::default::Default>::default()
            }

            fn from_value(
                value: &$crate::types::TaggedValue,
            ) -> ::std::result::Result<Self, $crate::DecodeError> {
                match value {
                    $crate::types::TaggedValue::Map(fields) => {
                        <Self as $crate::codec::Record>::decode_fields(fields)
                    }
                    other => ::std::result::Result::Err($crate::DecodeError::TypeMismatch {
                        expected: <Self as $crate::codec::FromValue>::shape(),
                        found: other.kind(),
                    }),
                }
            }
        }

        impl $crate::codec::ToValue for $name {
            fn to_value(&self) -> $crate::types::TaggedValue {
                $crate::types::TaggedValue::Map(<Self as $crate::codec::Record>::encode_fields(self))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{DateTime, TimeZone, Utc};
    use uuid::Uuid;

    use crate::codec::{FieldMapping, Record, Shape, decode, encode};
    use crate::types::{Blob, Document, GeoPoint, TaggedValue, ValueKind};
    use crate::{DecodeError, tagged_record};

    tagged_record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Terminal {
            serial: Uuid => "serial",
            location: GeoPoint => "location",
            firmware: Blob => "firmware",
        }
    }

    tagged_record! {
        #[derive(Debug, Clone, Default, PartialEq)]
        struct Store {
            name: String => "name",
            opened_at: DateTime<Utc> => "opened_at",
            floor_area: f64 => "floor_area",
            registers: i32 => "registers",
            manager: Option<String> => "manager",
            main_terminal: Option<Terminal> => "main_terminal",
            terminals: Vec<Terminal> => "terminals",
            drawer_totals: HashMap<String, f64> => "drawer_totals",
            tags: Vec<String> => "tags",
        }
    }

    fn terminal_value(serial: &str) -> TaggedValue {
        let mut fields = Document::new();
        fields.insert("serial".into(), TaggedValue::from(serial));
        fields.insert(
            "location".into(),
            TaggedValue::GeoPoint(GeoPoint::new(1.5, 2.5)),
        );
        fields.insert("firmware".into(), TaggedValue::Bytes(vec![0xCA, 0xFE]));
        TaggedValue::Map(fields)
    }

    fn sample_store() -> Store {
        Store {
            name: "Harbor".into(),
            opened_at: Utc.with_ymd_and_hms(2023, 1, 2, 3, 4, 5).unwrap(),
            floor_area: 120.5,
            registers: 3,
            manager: Some("dana".into()),
            main_terminal: Some(Terminal {
                serial: Uuid::from_u128(7),
                location: GeoPoint::new(-6.2, 106.8),
                firmware: Blob(vec![1, 2]),
            }),
            terminals: vec![Terminal::default()],
            drawer_totals: HashMap::from([("cash".to_string(), 10.0)]),
            tags: vec!["north".into(), "late".into()],
        }
    }

    #[test]
    fn mappings_follow_declaration_order() {
        let mappings = Store::field_mappings();
        assert_eq!(mappings.len(), 9);
        assert_eq!(
            mappings[5],
            FieldMapping {
                field: "main_terminal",
                tag: "main_terminal",
                shape: Shape::Optional(Box::new(Shape::Record("Terminal"))),
            }
        );
        assert_eq!(Store::NAME, "Store");
    }

    #[test]
    fn missing_tags_leave_defaults() {
        let mut fields = Document::new();
        fields.insert("name".into(), TaggedValue::from("Harbor"));
        let store: Store = decode(&fields).unwrap();
        assert_eq!(
            store,
            Store {
                name: "Harbor".into(),
                ..Store::default()
            }
        );
    }

    #[test]
    fn null_fields_never_error() {
        let fields: Document = Store::field_mappings()
            .into_iter()
            .map(|mapping| (mapping.tag.to_string(), TaggedValue::Null))
            .collect();
        let store: Store = decode(&fields).unwrap();
        assert_eq!(store, Store::default());
    }

    #[test]
    fn nested_records_and_integer_promotion() {
        let mut fields = Document::new();
        fields.insert("floor_area".into(), TaggedValue::Int(80));
        fields.insert("main_terminal".into(), terminal_value(&Uuid::from_u128(9).to_string()));
        fields.insert(
            "terminals".into(),
            TaggedValue::Array(vec![terminal_value(&Uuid::from_u128(1).to_string())]),
        );

        let store: Store = decode(&fields).unwrap();
        assert_eq!(store.floor_area, 80.0);
        let main = store.main_terminal.unwrap();
        assert_eq!(main.serial, Uuid::from_u128(9));
        assert_eq!(main.firmware, Blob(vec![0xCA, 0xFE]));
        assert_eq!(store.terminals[0].location, GeoPoint::new(1.5, 2.5));
    }

    #[test]
    fn nested_identifier_failure_reports_path() {
        let mut fields = Document::new();
        fields.insert(
            "terminals".into(),
            TaggedValue::Array(vec![
                terminal_value(&Uuid::from_u128(1).to_string()),
                terminal_value("register-2"),
            ]),
        );

        let err = decode::<Store>(&fields).unwrap_err();
        assert_eq!(err.path(), "terminals[1].serial");
        assert!(matches!(
            err.root_cause(),
            DecodeError::InvalidIdentifier { value, .. } if value == "register-2"
        ));
    }

    #[test]
    fn record_expects_map() {
        let mut fields = Document::new();
        fields.insert(
            "main_terminal".into(),
            TaggedValue::Array(Vec::new()),
        );
        let err = decode::<Store>(&fields).unwrap_err();
        assert_eq!(
            err.root_cause(),
            &DecodeError::TypeMismatch {
                expected: Shape::Record("Terminal"),
                found: ValueKind::Array,
            }
        );
    }

    #[test]
    fn encode_then_decode_is_identity() {
        let store = sample_store();
        let document = encode(&store);
        assert_eq!(document["manager"], TaggedValue::from("dana"));
        assert_eq!(document["registers"], TaggedValue::Int(3));

        let decoded: Store = decode(&document).unwrap();
        assert_eq!(decoded, store);

        let mut unmanaged = store;
        unmanaged.manager = None;
        let document = encode(&unmanaged);
        assert_eq!(document["manager"], TaggedValue::Null);
        assert_eq!(decode::<Store>(&document).unwrap(), unmanaged);
    }
}
