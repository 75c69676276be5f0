//! Cash entry change handler.
//!
//! One invocation validates the envelope, decodes the before/after shift
//! snapshots, diffs their cash entries and writes one pending entry document
//! per new entry. Work is sequential; the first error aborts the invocation
//! and documents written before it stay written.

use tracing::instrument;

use super::context::InvocationContext;
use super::store::{DocumentStore, StoreConnector};
use crate::codec::{self, Record};
use crate::constants::CASH_ENTRIES_TAG;
use crate::detect::detect_new;
use crate::error::{DecodeError, Result, TriggerError};
use crate::types::{
    CloudEvent, DocumentEventData, DocumentSnapshot, EmployeeShift, PendingEntry, TriggerOptions,
};

/// Outcome of a successful invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerReport {
    /// The event carried no new document version.
    pub document_deleted: bool,
    /// Resource name of the changed document, when the payload carried one.
    pub document_name: Option<String>,
    /// Cash entries present after the change but not before it.
    pub new_entries: usize,
    /// Ids of the pending entry documents created, in write order.
    pub written: Vec<String>,
}

/// Decode both snapshots of a shift event. Absent snapshots stay `None`.
pub fn decode_event(
    data: &DocumentEventData,
) -> std::result::Result<(Option<EmployeeShift>, Option<EmployeeShift>), DecodeError> {
    let before = decode_snapshot(data.old_value.as_ref())?;
    let after = decode_snapshot(data.value.as_ref())?;
    Ok((before, after))
}

fn decode_snapshot(
    snapshot: Option<&DocumentSnapshot>,
) -> std::result::Result<Option<EmployeeShift>, DecodeError> {
    snapshot
        .map(|snapshot| codec::decode::<EmployeeShift>(&snapshot.fields))
        .transpose()
}

/// Handler for employee shift change events.
#[derive(Debug, Clone)]
pub struct CashEntryTrigger<C> {
    options: TriggerOptions,
    connector: C,
}

impl<C: StoreConnector> CashEntryTrigger<C> {
    #[must_use]
    pub fn new(options: TriggerOptions, connector: C) -> Self {
        Self { options, connector }
    }

    #[must_use]
    pub fn options(&self) -> &TriggerOptions {
        &self.options
    }

    #[must_use]
    pub fn connector(&self) -> &C {
        &self.connector
    }

    /// Check the declared content type, then parse the payload.
    pub fn parse_event(&self, event: &CloudEvent) -> Result<DocumentEventData> {
        let expected = self.options.expected_media_type();
        if event.media_type().as_deref() != Some(expected.as_str()) {
            return Err(TriggerError::ContentType {
                found: event.data_content_type.clone().unwrap_or_default(),
                expected,
            });
        }
        Ok(serde_json::from_slice(&event.data)?)
    }

    #[instrument(name = "cash_entries.handle", skip_all, fields(event.id = %event.id))]
    pub fn handle(&self, event: &CloudEvent, ctx: &InvocationContext) -> Result<TriggerReport> {
        ctx.check()?;
        let data = self.parse_event(event)?;

        let Some(after_snapshot) = data.value.as_ref() else {
            tracing::info!("document deleted; no new document data available");
            return Ok(TriggerReport {
                document_deleted: true,
                document_name: data.old_value.as_ref().map(|doc| doc.name.clone()),
                ..TriggerReport::default()
            });
        };

        let before = decode_snapshot(data.old_value.as_ref())?.unwrap_or_default();
        let after: EmployeeShift = codec::decode(&after_snapshot.fields)?;
        if data.old_value.is_none() {
            tracing::debug!(shift.uuid = %after.uuid, "document created; treating prior entries as empty");
        }
        if !data.touches(CASH_ENTRIES_TAG) {
            tracing::debug!(
                shift.uuid = %after.uuid,
                "update mask does not name {CASH_ENTRIES_TAG}"
            );
        }

        let fresh = detect_new(&before.cash_entries, &after.cash_entries);
        tracing::info!(
            shift.uuid = %after.uuid,
            entries.before = before.cash_entries.len(),
            entries.after = after.cash_entries.len(),
            entries.new = fresh.len(),
            "diffed cash entries"
        );

        let mut report = TriggerReport {
            document_name: Some(after_snapshot.name.clone()),
            new_entries: fresh.len(),
            ..TriggerReport::default()
        };
        if fresh.is_empty() {
            return Ok(report);
        }

        ctx.check()?;
        let collection = self.options.pending_collection.as_str();
        let mut store = self.connector.connect().inspect_err(|err| {
            tracing::warn!(error = %err, "document store connection failed");
        })?;

        for entry in fresh {
            ctx.check()?;
            let pending = PendingEntry::new(&after, entry.clone());
            let id = store
                .create_document(collection, codec::encode(&pending))
                .inspect_err(|err| {
                    tracing::warn!(
                        collection,
                        entry.uuid = %pending.cash_entry.uuid,
                        written = report.written.len(),
                        error = %err,
                        "failed to create {}",
                        PendingEntry::NAME
                    );
                })?;
            tracing::debug!(
                collection,
                document.id = %id,
                entry.uuid = %pending.cash_entry.uuid,
                indexes = pending.indexes.len(),
                "created pending entry"
            );
            report.written.push(id);
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::trigger::MemoryConnector;

    fn event(payload: serde_json::Value) -> CloudEvent {
        CloudEvent::new("evt-1", "application/json", payload.to_string().into_bytes())
    }

    fn trigger() -> CashEntryTrigger<MemoryConnector> {
        CashEntryTrigger::new(TriggerOptions::default(), MemoryConnector::default())
    }

    #[test]
    fn parse_rejects_missing_content_type() {
        let mut evt = event(json!({}));
        evt.data_content_type = None;
        let err = trigger().parse_event(&evt).unwrap_err();
        assert!(matches!(err, TriggerError::ContentType { ref found, .. } if found.is_empty()));
    }

    #[test]
    fn malformed_body_is_a_payload_error() {
        let evt = CloudEvent::new("evt-2", "application/json", b"{not json".to_vec());
        let err = trigger().handle(&evt, &InvocationContext::background()).unwrap_err();
        assert!(matches!(err, TriggerError::Payload(_)));
    }

    #[test]
    fn decode_event_keeps_absent_snapshots_absent() {
        let data: DocumentEventData = serde_json::from_value(json!({
            "value": {"fields": {"uuid": {"stringValue": "s1"}}}
        }))
        .unwrap();
        let (before, after) = decode_event(&data).unwrap();
        assert!(before.is_none());
        assert_eq!(after.unwrap().uuid, "s1");
    }

    #[test]
    fn decode_failure_in_before_snapshot_aborts() {
        let evt = event(json!({
            "oldValue": {"fields": {"cash_entries": {"stringValue": "oops"}}},
            "value": {"fields": {}}
        }));
        let trigger = trigger();
        let err = trigger.handle(&evt, &InvocationContext::background()).unwrap_err();
        match err {
            TriggerError::Decode(decode) => assert_eq!(decode.path(), "cash_entries"),
            other => panic!("unexpected error {other:?}"),
        }
        assert_eq!(trigger.connector().store().len().unwrap(), 0);
    }

    #[test]
    fn unchanged_entries_never_connect() {
        let shift = json!({"fields": {"cash_entries": {"arrayValue": {"values": [
            {"mapValue": {"fields": {"uuid": {"stringValue": "a"}}}}
        ]}}}});
        let evt = event(json!({"oldValue": shift.clone(), "value": shift}));
        let report = trigger()
            .handle(&evt, &InvocationContext::background())
            .unwrap();
        assert_eq!(report.new_entries, 0);
        assert!(report.written.is_empty());
        assert!(!report.document_deleted);
    }
}
