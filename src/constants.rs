//! Crate-wide constants shared by the codec, indexer and trigger.

/// Hard cap on prefix and word tokens produced for a single description.
/// The trailing whole-phrase token is not counted against it.
pub const MAX_INDEX_TOKENS: usize = 35;

/// Prefix length ceiling per word position: first word, second word, rest.
pub const PREFIX_CEILINGS: [usize; 3] = [10, 5, 3];

/// Non-leading words shorter than this only contribute the whole word.
pub const MIN_PREFIX_WORD_CHARS: usize = 3;

/// Destination collection for detected cash entries awaiting review.
pub const PENDING_ENTRIES_COLLECTION: &str = "pending_expense_entries";

/// Media type of the JSON-rendered document event payload.
pub const EVENT_CONTENT_TYPE: &str = "application/json";

/// Wire tag of the repeated sub-collection diffed between snapshots.
pub const CASH_ENTRIES_TAG: &str = "cash_entries";

/// Environment override for the destination collection.
pub const ENV_PENDING_COLLECTION: &str = "CASHWATCH_PENDING_COLLECTION";

/// Environment override for the expected event content type.
pub const ENV_CONTENT_TYPE: &str = "CASHWATCH_CONTENT_TYPE";
