//! The auto-default predicate: may the engine overwrite a field?

use std::ops::RangeInclusive;

use rust_decimal::Decimal;

use crate::store::FieldState;
use crate::value::FieldValue;

/// Returns `true` when it is safe to auto-compute and overwrite a field.
///
/// A field the user never touched is always fair game. When `domain` is
/// given, a user-owned field whose current value is missing, non-numeric
/// or outside the range is also overwritten: the stored entry is treated
/// as invalid and replaced by the computed default.
///
/// Evaluated fresh on every pass; there is no latch.
pub fn should_auto_default(
    value: Option<&FieldValue>,
    state: &FieldState,
    domain: Option<&RangeInclusive<Decimal>>,
) -> bool {
    if !state.is_overridden() {
        return true;
    }
    match domain {
        None => false,
        Some(range) => match value.and_then(FieldValue::as_decimal) {
            Some(d) => !range.contains(&d),
            None => true,
        },
    }
}
