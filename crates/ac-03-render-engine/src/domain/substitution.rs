//! Placeholder substitution by tree splicing.
//!
//! Only string nodes that are exactly one `{{binding:<key>}}` token are
//! replaced. Replacements are inserted as JSON values and never scanned
//! again, so text inside a fetched value that looks like a token stays as
//! it is.

use std::collections::HashMap;

use serde_json::Value;
use shared_types::placeholder_key;

/// Replace placeholder nodes in `option` with values keyed by placeholder
/// key. Returns the number of nodes replaced.
///
/// Tokens without a value are left untouched.
pub fn splice(option: &mut Value, values: &HashMap<String, Value>) -> usize {
    match option {
        Value::Array(items) => items.iter_mut().map(|item| splice(item, values)).sum(),
        Value::Object(map) => map.values_mut().map(|item| splice(item, values)).sum(),
        Value::String(text) => {
            let replacement = placeholder_key(text).and_then(|key| values.get(key)).cloned();
            match replacement {
                Some(value) => {
                    *option = value;
                    1
                }
                None => 0,
            }
        }
        _ => 0,
    }
}
