//! Records read from employee shift documents and written as pending entries.

use chrono::{DateTime, Utc};

use crate::search::build_search_index;
use crate::tagged_record;

tagged_record! {
    /// One cash movement recorded during a shift.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct CashEntry {
        pub created_at: DateTime<Utc> => "created_at",
        pub description: String => "description",
        pub expense: bool => "expense",
        pub username: String => "username",
        pub uuid: String => "uuid",
        pub value: f64 => "value",
    }
}

tagged_record! {
    /// An employee shift document with its repeated cash entries.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct EmployeeShift {
        pub uuid: String => "uuid",
        pub branch_uuid: String => "branch_uuid",
        pub username: String => "username",
        pub created_at: DateTime<Utc> => "created_at",
        pub cash_entries: Vec<CashEntry> => "cash_entries",
    }
}

tagged_record! {
    /// Shift metadata denormalized onto each pending entry.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct ShiftData {
        pub uuid: String => "uuid",
        pub start_time: DateTime<Utc> => "start_time",
        pub main_shift_user: String => "main_shift_user",
    }
}

tagged_record! {
    /// A newly detected cash entry awaiting review.
    #[derive(Debug, Clone, Default, PartialEq)]
    pub struct PendingEntry {
        pub cash_entry: CashEntry => "cash_entry",
        pub branch_uuid: String => "branch_uuid",
        pub resolved: bool => "resolved",
        pub resolved_by: Option<String> => "resolved_by",
        pub resolved_at: Option<DateTime<Utc>> => "resolved_at",
        pub notes: Option<String> => "notes",
        pub shift_data: ShiftData => "shift_data",
        /// Search tokens derived from the entry description.
        pub indexes: Vec<String> => "indexes",
    }
}

impl ShiftData {
    #[must_use]
    pub fn from_shift(shift: &EmployeeShift) -> Self {
        Self {
            uuid: shift.uuid.clone(),
            start_time: shift.created_at,
            main_shift_user: shift.username.clone(),
        }
    }
}

impl PendingEntry {
    /// Build the unresolved pending entry for `entry`, found on `shift`.
    #[must_use]
    pub fn new(shift: &EmployeeShift, entry: CashEntry) -> Self {
        let indexes = build_search_index(&entry.description);
        Self {
            cash_entry: entry,
            branch_uuid: shift.branch_uuid.clone(),
            resolved: false,
            resolved_by: None,
            resolved_at: None,
            notes: None,
            shift_data: ShiftData::from_shift(shift),
            indexes,
        }
    }
}
