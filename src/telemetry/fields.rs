//! Structured fields attached to log records.

use serde_json::{Map, Value};

/// A set of named values attached to a record beyond level, time and message.
pub type Fields = Map<String, Value>;

/// Merge field maps left to right into a fresh map.
///
/// On key collision the map supplied last wins. Inputs are left untouched.
pub fn merge_fields(fields: &[&Fields]) -> Fields {
    let mut merged = Fields::new();
    for map in fields {
        for (k, v) in map.iter() {
            merged.insert(k.clone(), v.clone());
        }
    }
    merged
}

/// Build a [`Fields`] map from `key => value` pairs.
///
/// Values may be any expression serializable by `serde_json`.
///
/// # Example
/// ```
/// use core_kit::fields;
///
/// let f = fields! { "request_id" => "12345", "duration_ms" => 150 };
/// assert_eq!(f["duration_ms"], 150);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::telemetry::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::telemetry::Fields::new();
        $(
            map.insert(::std::string::String::from($key), $crate::serde_json::json!($value));
        )+
        map
    }};
}
