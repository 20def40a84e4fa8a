//! Human-readable diffs for audit entries

use serde_json::{Map, Value};

const MAX_STRING_CHARS: usize = 40;

/// Describe the changes between two JSON states
///
/// Nested objects are walked and reported with dotted paths
/// (`period.end: ...`); arrays are summarized by length. Returns `None` when
/// nothing changed.
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let mut changes = Vec::new();
    collect_changes(before, after, "", &mut changes);

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

fn collect_changes(before: &Value, after: &Value, path: &str, changes: &mut Vec<String>) {
    if before == after {
        return;
    }

    match (before, after) {
        (Value::Object(b), Value::Object(a)) => collect_object_changes(b, a, path, changes),
        _ if path.is_empty() => {
            changes.push(format!("{} -> {}", format_value(before), format_value(after)))
        }
        _ => changes.push(format!(
            "{}: {} -> {}",
            path,
            format_value(before),
            format_value(after)
        )),
    }
}

fn collect_object_changes(
    before: &Map<String, Value>,
    after: &Map<String, Value>,
    path: &str,
    changes: &mut Vec<String>,
) {
    let join = |key: &str| {
        if path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", path, key)
        }
    };

    for (key, before_val) in before {
        match after.get(key) {
            Some(after_val) => collect_changes(before_val, after_val, &join(key), changes),
            None => changes.push(format!("{}: {} -> (removed)", join(key), format_value(before_val))),
        }
    }

    for (key, after_val) in after {
        if !before.contains_key(key) {
            changes.push(format!("{}: (added) -> {}", join(key), format_value(after_val)));
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > MAX_STRING_CHARS => {
            let head: String = s.chars().take(MAX_STRING_CHARS - 3).collect();
            format!("\"{}...\"", head)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
