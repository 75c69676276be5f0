//! Public types exposed by the `cashwatch-core` crate.

pub mod event;
pub mod models;
pub mod options;
pub mod value;

pub use event::{CloudEvent, DocumentEventData, DocumentMask, DocumentSnapshot};
pub use models::{CashEntry, EmployeeShift, PendingEntry, ShiftData};
pub use options::{TriggerOptions, TriggerOptionsBuilder};
pub use value::{Blob, Document, GeoPoint, TaggedValue, ValueKind};
