//! Change-event envelope and document event payload.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value::Document;

/// Delivery envelope of a document change event.
///
/// Serializes to the structured JSON event format: a JSON payload is carried
/// inline under `data`, anything else as base64 under `data_base64`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireEvent", into = "WireEvent")]
pub struct CloudEvent {
    pub id: String,
    pub source: String,
    pub event_type: String,
    pub subject: Option<String>,
    pub time: Option<DateTime<Utc>>,
    /// Declared media type of `data`; must match the configured encoding.
    pub data_content_type: Option<String>,
    pub data: Vec<u8>,
}

impl CloudEvent {
    #[must_use]
    pub fn new(id: impl Into<String>, data_content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            id: id.into(),
            data_content_type: Some(data_content_type.into()),
            data,
            ..Self::default()
        }
    }

    /// Media type without parameters, lower-cased (`application/json`).
    #[must_use]
    pub fn media_type(&self) -> Option<String> {
        self.data_content_type.as_deref().map(normalize_media_type)
    }
}

pub(crate) fn normalize_media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// An absent content type defaults to JSON in the structured format.
fn is_json_media_type(content_type: Option<&str>) -> bool {
    content_type.is_none_or(|declared| {
        let media_type = normalize_media_type(declared);
        media_type == "application/json" || media_type.ends_with("+json")
    })
}

const EVENT_FORMAT_VERSION: &str = "1.0";

fn default_format_version() -> String {
    EVENT_FORMAT_VERSION.to_string()
}

#[derive(Serialize, Deserialize)]
struct WireEvent {
    #[serde(default = "default_format_version")]
    specversion: String,
    id: String,
    #[serde(default)]
    source: String,
    #[serde(default, rename = "type")]
    event_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    datacontenttype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data_base64: Option<String>,
}

impl TryFrom<WireEvent> for CloudEvent {
    type Error = String;

    fn try_from(wire: WireEvent) -> Result<Self, Self::Error> {
        let data = match (wire.data, wire.data_base64) {
            (Some(_), Some(_)) => {
                return Err("event carries both `data` and `data_base64`".to_string());
            }
            (None, Some(encoded)) => STANDARD
                .decode(encoded.as_bytes())
                .map_err(|err| format!("invalid `data_base64`: {err}"))?,
            (Some(serde_json::Value::String(text)), None)
                if !is_json_media_type(wire.datacontenttype.as_deref()) =>
            {
                text.into_bytes()
            }
            (Some(value), None) => serde_json::to_vec(&value).map_err(|err| err.to_string())?,
            (None, None) => Vec::new(),
        };
        Ok(Self {
            id: wire.id,
            source: wire.source,
            event_type: wire.event_type,
            subject: wire.subject,
            time: wire.time,
            data_content_type: wire.datacontenttype,
            data,
        })
    }
}

impl From<CloudEvent> for WireEvent {
    fn from(event: CloudEvent) -> Self {
        let inline = (!event.data.is_empty()
            && is_json_media_type(event.data_content_type.as_deref()))
        .then(|| serde_json::from_slice::<serde_json::Value>(&event.data).ok())
        .flatten()
        .filter(|value| !value.is_null());
        let data_base64 =
            (inline.is_none() && !event.data.is_empty()).then(|| STANDARD.encode(&event.data));
        Self {
            specversion: default_format_version(),
            id: event.id,
            source: event.source,
            event_type: event.event_type,
            subject: event.subject,
            time: event.time,
            datacontenttype: event.data_content_type,
            data: inline,
            data_base64,
        }
    }
}

/// Snapshot of one document version.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub fields: Document,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_time: Option<DateTime<Utc>>,
}

/// Field paths touched by an update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMask {
    #[serde(default)]
    pub field_paths: Vec<String>,
}

/// Before/after pair carried by a change event. A missing `value` means the
/// document was deleted; a missing `old_value` means it was just created.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEventData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<DocumentSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<DocumentSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_mask: Option<DocumentMask>,
}

impl DocumentEventData {
    /// Whether the update mask names `tag` (or a path below it). Without a
    /// mask every field counts as touched.
    #[must_use]
    pub fn touches(&self, tag: &str) -> bool {
        match &self.update_mask {
            None => true,
            Some(mask) => mask.field_paths.iter().any(|path| {
                path == tag
                    || path
                        .strip_prefix(tag)
                        .is_some_and(|rest| rest.starts_with('.'))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn media_type_ignores_parameters_and_case() {
        let event = CloudEvent::new("1", "Application/JSON; charset=utf-8", Vec::new());
        assert_eq!(event.media_type().as_deref(), Some("application/json"));
        assert_eq!(CloudEvent::default().media_type(), None);
    }

    #[test]
    fn structured_event_with_inline_json_data() {
        let raw = json!({
            "specversion": "1.0",
            "id": "evt-7",
            "source": "//firestore.googleapis.com/projects/p/databases/(default)",
            "type": "google.cloud.firestore.document.v1.updated",
            "subject": "documents/employee_shifts/s1",
            "time": "2024-06-01T07:05:00Z",
            "datacontenttype": "application/json",
            "data": {"value": {"fields": {"uuid": {"stringValue": "s1"}}}}
        });
        let event: CloudEvent = serde_json::from_value(raw).unwrap();
        assert_eq!(event.id, "evt-7");
        assert_eq!(event.event_type, "google.cloud.firestore.document.v1.updated");
        assert_eq!(event.subject.as_deref(), Some("documents/employee_shifts/s1"));
        assert!(event.time.is_some());

        let data: DocumentEventData = serde_json::from_slice(&event.data).unwrap();
        assert_eq!(data.value.unwrap().fields["uuid"].as_str(), Some("s1"));
    }

    #[test]
    fn structured_event_with_base64_data() {
        let raw = json!({
            "specversion": "1.0",
            "id": "evt-8",
            "source": "s",
            "type": "t",
            "datacontenttype": "application/protobuf",
            "data_base64": "AQID"
        });
        let event: CloudEvent = serde_json::from_value(raw).unwrap();
        assert_eq!(event.data, vec![1, 2, 3]);

        let bad = json!({"id": "evt-9", "data_base64": "not base64!"});
        assert!(serde_json::from_value::<CloudEvent>(bad).is_err());
        let both = json!({"id": "evt-9", "data": {}, "data_base64": "AQID"});
        assert!(serde_json::from_value::<CloudEvent>(both).is_err());
    }

    #[test]
    fn events_serialize_in_structured_form() {
        let payload = serde_json::to_vec(&json!({"value": {"fields": {}}})).unwrap();
        let event = CloudEvent::new("evt-10", "application/json", payload);
        let encoded = serde_json::to_value(&event).unwrap();
        assert_eq!(encoded["specversion"], "1.0");
        assert_eq!(encoded["data"], json!({"value": {"fields": {}}}));
        assert!(encoded.get("data_base64").is_none());
        assert_eq!(serde_json::from_value::<CloudEvent>(encoded).unwrap(), event);

        let opaque = CloudEvent::new("evt-11", "application/json", b"{not json".to_vec());
        let encoded = serde_json::to_value(&opaque).unwrap();
        assert!(encoded.get("data").is_none());
        assert_eq!(serde_json::from_value::<CloudEvent>(encoded).unwrap(), opaque);
    }

    #[test]
    fn payload_parses_created_document() {
        let payload = json!({
            "value": {
                "name": "projects/p/databases/(default)/documents/employee_shifts/s1",
                "fields": {"uuid": {"stringValue": "s1"}},
                "createTime": "2024-06-01T07:00:00Z",
                "updateTime": "2024-06-01T07:00:00Z"
            },
            "updateMask": {"fieldPaths": ["cash_entries"]}
        });
        let data: DocumentEventData = serde_json::from_value(payload).unwrap();
        assert!(data.old_value.is_none());
        let after = data.value.as_ref().unwrap();
        assert!(after.name.ends_with("/s1"));
        assert!(after.create_time.is_some());
        assert!(data.touches("cash_entries"));
        assert!(!data.touches("username"));
    }

    #[test]
    fn touches_matches_nested_paths_only_on_boundaries() {
        let data = DocumentEventData {
            update_mask: Some(DocumentMask {
                field_paths: vec!["cash_entries.0".into(), "cash_entries_archive".into()],
            }),
            ..DocumentEventData::default()
        };
        assert!(data.touches("cash_entries"));
        assert!(DocumentEventData::default().touches("anything"));

        let other = DocumentEventData {
            update_mask: Some(DocumentMask {
                field_paths: vec!["cash_entries_archive".into()],
            }),
            ..DocumentEventData::default()
        };
        assert!(!other.touches("cash_entries"));
    }
}
