use serde_json::Value;

/// Extract the deletion target from a raw request body.
///
/// The body is never rejected: anything that is not a JSON object counts as
/// `{}`. Strings are taken verbatim, numbers and booleans become their JSON
/// text, and every other shape (null, array, object, missing) becomes the
/// empty string, which the caller reports as a missing target.
pub fn target_user_id(body: &[u8]) -> String {
    let parsed = serde_json::from_slice::<Value>(body).unwrap_or(Value::Null);

    match parsed.get("user_id") {
        Some(Value::String(id)) => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        Some(Value::Bool(flag)) => flag.to_string(),
        _ => String::new(),
    }
}
