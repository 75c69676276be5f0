//! Change detection between the before/after copies of a repeated field.
//!
//! Equality is the element type's full structural `PartialEq`: an entry is
//! "seen" only if some element of `before` matches it in every field, wherever
//! it sits. Position changes alone never make an entry new.

/// Elements of `after` without a structurally equal element in `before`,
/// in `after` order.
///
/// A document without a prior snapshot is handled by passing an empty
/// `before`, which reports every element of `after`.
#[must_use]
pub fn detect_new<'a, T: PartialEq>(before: &[T], after: &'a [T]) -> Vec<&'a T> {
    after
        .iter()
        .filter(|candidate| !before.iter().any(|seen| seen == *candidate))
        .collect()
}
