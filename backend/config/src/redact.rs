//! Config redaction: mask secrets before a config is printed or logged.

use serde_json::Value;

const REDACTED: &str = "__REDACTED__";

/// Keys whose values are always masked.
static SENSITIVE_KEYS: &[&str] = &["apiKey", "api_key", "token", "secret", "password"];

/// Redact a config JSON value, replacing every non-empty sensitive string.
pub fn redact(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_sensitive_key(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) if is_sensitive_key(key) && !s.is_empty() => {
            Value::String(REDACTED.to_string())
        }
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_recursive(v, k)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn masks_api_key() {
        let v = json!({"vision": {"apiKey": "AIzaSyExample", "model": "gemini-2.0-flash"}});
        let r = redact(&v);
        assert_eq!(r["vision"]["apiKey"], REDACTED);
        assert_eq!(r["vision"]["model"], "gemini-2.0-flash");
    }

    #[test]
    fn leaves_empty_and_non_string_values() {
        let v = json!({"apiKey": "", "server": {"port": 8080}});
        let r = redact(&v);
        assert_eq!(r["apiKey"], "");
        assert_eq!(r["server"]["port"], 8080);
    }
}
