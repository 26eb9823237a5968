//! Best-effort JSON extraction from model output.
//!
//! Models wrap JSON in prose, code fences, or trailing commentary. We take
//! the substring from the first `{` to the last `}` and try to parse it;
//! any failure degrades to the caller's default instead of surfacing an
//! error.

use serde::de::DeserializeOwned;

/// A value recovered from model output, flagged when the default had to
/// stand in for unparsable content.
#[derive(Debug, Clone)]
pub struct Extracted<T> {
    pub value: T,
    pub degraded: bool,
}

impl<T> Extracted<T> {
    pub fn parsed(value: T) -> Self {
        Self {
            value,
            degraded: false,
        }
    }

    pub fn fallback(value: T) -> Self {
        Self {
            value,
            degraded: true,
        }
    }
}

/// Pull a JSON object out of free-form model text. Never fails: if no
/// object can be located or parsed, returns `T::default()` marked degraded.
pub fn extract_json<T>(raw: &str) -> Extracted<T>
where
    T: DeserializeOwned + Default,
{
    let Some(start) = raw.find('{') else {
        tracing::warn!(raw_len = raw.len(), "no JSON object found in model output");
        return Extracted::fallback(T::default());
    };
    let Some(end) = raw.rfind('}') else {
        tracing::warn!(raw_len = raw.len(), "unterminated JSON object in model output");
        return Extracted::fallback(T::default());
    };
    if end < start {
        return Extracted::fallback(T::default());
    }
    match serde_json::from_str(&raw[start..=end]) {
        Ok(value) => Extracted::parsed(value),
        Err(err) => {
            tracing::warn!(error = %err, "failed to parse JSON from model output");
            Extracted::fallback(T::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    struct Sample {
        #[serde(default)]
        topic: String,
        #[serde(default)]
        score: f64,
    }

    #[test]
    fn test_extracts_bare_object() {
        let out: Extracted<Sample> = extract_json(r#"{"topic":"walk","score":0.8}"#);
        assert!(!out.degraded);
        assert_eq!(out.value.topic, "walk");
        assert_eq!(out.value.score, 0.8);
    }

    #[test]
    fn test_extracts_fenced_object() {
        let raw = "Here you go:\n```json\n{\"topic\": \"dinner\", \"score\": 0.5}\n```\nHope that helps!";
        let out: Extracted<Sample> = extract_json(raw);
        assert!(!out.degraded);
        assert_eq!(out.value.topic, "dinner");
    }

    #[test]
    fn test_no_object_falls_back() {
        let out: Extracted<Sample> = extract_json("I cannot answer that.");
        assert!(out.degraded);
        assert_eq!(out.value, Sample::default());
    }

    #[test]
    fn test_malformed_object_falls_back() {
        let out: Extracted<Sample> = extract_json(r#"{"topic": "walk", "score": }"#);
        assert!(out.degraded);
        assert_eq!(out.value, Sample::default());
    }

    #[test]
    fn test_brace_order_reversed_falls_back() {
        let out: Extracted<Sample> = extract_json("} weird {");
        assert!(out.degraded);
    }

    #[test]
    fn test_never_panics_on_garbage() {
        for raw in ["", "{", "}", "{{{{", "null", "\u{0}\u{1}{}"] {
            let _: Extracted<Sample> = extract_json(raw);
        }
    }
}
