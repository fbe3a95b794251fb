//! Reply texts.
//!
//! Strings are embedded at compile time and looked up by dotted key,
//! e.g. `"gban.banned"`. Placeholders use `{name}` and are filled by the
//! caller with `str::replace`.

use std::sync::OnceLock;

use serde_json::Value;
use tracing::warn;

static TRANSLATIONS: OnceLock<Value> = OnceLock::new();

/// Load the embedded English table.
pub fn init() {
    match serde_json::from_str(include_str!("en.json")) {
        Ok(val) => {
            let _ = TRANSLATIONS.set(val);
        }
        Err(e) => warn!("Failed to parse embedded translations: {}", e),
    }
}

/// Text for `key`, or the key itself when it is unknown.
pub fn get_text(key: &str) -> String {
    TRANSLATIONS
        .get()
        .and_then(|val| resolve_key(val, key))
        .unwrap_or_else(|| key.to_string())
}

fn resolve_key(val: &Value, key: &str) -> Option<String> {
    let mut current = val;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    current.as_str().map(|s| s.to_string())
}
