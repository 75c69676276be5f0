//! Event handling around the codec, detector and indexer.

mod context;
mod handler;
pub mod store;

pub use context::InvocationContext;
pub use handler::{CashEntryTrigger, TriggerReport, decode_event};
pub use store::{DocumentStore, MemoryConnector, MemoryStore, StoreConnector, StoredDocument};
