use serde_json::Value;

/// Returns true when `candidate` is a JSON object carrying a `who` key.
///
/// The full schema is not enforced; only output that cannot be a record at all
/// (scalars, arrays, objects without an identity) is rejected.
pub fn is_valid_logline(candidate: &Value) -> bool {
    candidate
        .as_object()
        .is_some_and(|object| object.contains_key("who"))
}
