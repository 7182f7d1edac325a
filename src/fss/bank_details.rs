//! Bank-details payload shaping.

use serde_json::Value;

/// Number of trailing sortcode digits left visible after masking.
const VISIBLE_SORTCODE_DIGITS: usize = 2;

/// Shape a bank-details payload for the caller.
///
/// Callers authorized for the full view get the payload untouched. Everyone
/// else gets the sortcode masked down to its last two digits
/// (`"ending with 56"`); all other fields pass through unchanged.
#[must_use]
pub fn process_bank_details(mut details: Value, full_view: bool) -> Value {
    if full_view {
        return details;
    }

    if let Some(sortcode) = details.get("sortcode").and_then(Value::as_str) {
        let visible: String = sortcode
            .chars()
            .rev()
            .take(VISIBLE_SORTCODE_DIGITS)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        details["sortcode"] = Value::String(format!("ending with {visible}"));
    }

    details
}
