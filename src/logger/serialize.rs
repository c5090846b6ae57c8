//! Best-effort conversion of arbitrary values into loggable strings.
//!
//! Free-form fields (headers, bodies, call parameters) end up as plain strings
//! in a record. Conversion never fails: a value that cannot be encoded as JSON
//! falls back to its `Debug` rendering.

use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Convert `value` into a compact JSON string.
///
/// Strings are returned unchanged (no surrounding quotes). Objects keep their
/// insertion order. Anything `serde_json` refuses to encode, such as maps with
/// non-string keys, is rendered with `Debug` instead.
pub fn to_log_string<T>(value: &T) -> String
where
    T: Serialize + fmt::Debug + ?Sized,
{
    match serde_json::to_value(value) {
        Ok(Value::String(s)) => s,
        Ok(other) => other.to_string(),
        Err(e) => {
            tracing::trace!(error = %e, "Value is not JSON-encodable, using Debug output");
            let fallback = format!("{:?}", value);
            if fallback.is_empty() {
                std::any::type_name::<T>().to_string()
            } else {
                fallback
            }
        }
    }
}

/// Render raw payload bytes as text, replacing invalid UTF-8 sequences.
pub fn bytes_to_log_string(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser::{Error as _, Serializer};
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Debug)]
    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("not supported"))
        }
    }

    #[derive(Serialize)]
    struct Silent;

    impl fmt::Debug for Silent {
        fn fmt(&self, _f: &mut fmt::Formatter<'_>) -> fmt::Result {
            Ok(())
        }
    }

    #[test]
    fn test_string_returned_unchanged() {
        assert_eq!(to_log_string("plain text"), "plain text");
        assert_eq!(to_log_string(&String::from("{\"a\":1}")), "{\"a\":1}");
    }

    #[test]
    fn test_compact_json_in_insertion_order() {
        let value = json!({"o1": "ov1", "o2": "ov2", "a": [1, 2]});
        assert_eq!(to_log_string(&value), r#"{"o1":"ov1","o2":"ov2","a":[1,2]}"#);
        assert_eq!(to_log_string(&42), "42");
        assert_eq!(to_log_string(&Value::Null), "null");
    }

    #[test]
    fn test_non_string_keys_fall_back_to_debug() {
        let mut map = HashMap::new();
        map.insert((1, 2), "pair");
        let out = to_log_string(&map);
        assert!(!out.is_empty());
        assert!(out.contains("pair"));
    }

    #[test]
    fn test_failing_serializer_falls_back_to_debug() {
        assert_eq!(to_log_string(&Unencodable), "Unencodable");
        let nested = vec![Unencodable];
        assert_eq!(to_log_string(&nested), "[Unencodable]");
    }

    #[test]
    fn test_fallback_is_never_empty() {
        // Serializes fine as null, so the fallback is not involved.
        assert_eq!(to_log_string(&Silent), "null");

        let mut map = HashMap::new();
        map.insert((0, 0), Silent);
        assert!(!to_log_string(&map).is_empty());
    }

    #[test]
    fn test_bytes_rendered_as_text() {
        assert_eq!(bytes_to_log_string(b"raw"), "raw");
        assert_eq!(bytes_to_log_string(&[0x61, 0xff, 0x62]), "a\u{fffd}b");
    }
}
