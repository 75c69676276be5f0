#![deny(clippy::all, clippy::pedantic)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![cfg_attr(
    test,
    allow(
        clippy::useless_vec,
        clippy::uninlined_format_args,
        clippy::float_cmp,
        clippy::cast_precision_loss
    )
)]
#![allow(clippy::module_name_repetitions)]
//
// Documentation lints: internal helpers are self-describing; public APIs still
// carry docs where the behavior is not obvious from the signature.
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
//
// Numeric casts are limited to integer-to-float promotion and f64 -> f32
// narrowing of decoded document values.
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
//
// Builders take owned values and return `Self`.
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::implicit_hasher)]

//! Core of the cash entry change trigger.
//!
//! - [`types::TaggedValue`] models one self-describing document value.
//! - [`codec`] converts tagged-value documents to and from typed records
//!   declared with [`tagged_record!`].
//! - [`detect_new`] finds cash entries appended between two snapshots.
//! - [`build_search_index`] derives prefix search tokens from a description.
//! - [`trigger::CashEntryTrigger`] wires them together for one change event.

/// The cashwatch-core crate version (matches `Cargo.toml`).
pub const CASHWATCH_CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod codec;
pub mod constants;
pub mod detect;
pub mod error;
pub mod search;
pub mod trigger;
pub mod types;

pub use codec::{FieldMapping, FromValue, Record, Shape, ToValue, decode, encode};
pub use constants::*;
pub use detect::detect_new;
pub use error::{DecodeError, PathSegment, Result, TriggerError};
pub use search::build_search_index;
pub use trigger::{
    CashEntryTrigger, DocumentStore, InvocationContext, MemoryConnector, MemoryStore,
    StoreConnector, StoredDocument, TriggerReport, decode_event,
};
pub use types::{
    Blob, CashEntry, CloudEvent, Document, DocumentEventData, DocumentMask, DocumentSnapshot,
    EmployeeShift, GeoPoint, PendingEntry, ShiftData, TaggedValue, TriggerOptions,
    TriggerOptionsBuilder, ValueKind,
};
