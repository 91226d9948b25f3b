//! Pulling the generated text out of an inference response body.

use captionforge_core::CaptionError;
use serde_json::Value;

/// Stand-in value when none of the expected fields hold any text.
pub const NO_ANALYSIS_SENTINEL: &str = "No analysis generated.";

/// Text recovered from a response body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub text: String,
    /// The expected field was absent (or held the sentinel) so `text` is the
    /// raw response body.
    pub raw_fallback: bool,
}

/// Parse `body` as JSON and extract the generated text.
///
/// Each JSON pointer in `pointers` is tried in order. A string value is taken
/// as-is; an array of content blocks yields the `text` of its `"text"` blocks
/// joined by newlines. When nothing matches, or the match equals
/// [`NO_ANALYSIS_SENTINEL`], the full raw body is returned instead.
pub fn extract_analysis(body: &str, pointers: &[String]) -> Result<Extraction, CaptionError> {
    let json: Value =
        serde_json::from_str(body).map_err(|e| CaptionError::ParseResponse(e.to_string()))?;

    let analysis = pointers
        .iter()
        .find_map(|p| json.pointer(p).and_then(text_of))
        .unwrap_or_else(|| NO_ANALYSIS_SENTINEL.to_string());

    if analysis == NO_ANALYSIS_SENTINEL {
        return Ok(Extraction { text: body.to_string(), raw_fallback: true });
    }
    Ok(Extraction { text: analysis, raw_fallback: false })
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(blocks) => {
            let parts: Vec<&str> = blocks
                .iter()
                .filter(|b| b["type"] == "text")
                .filter_map(|b| b["text"].as_str())
                .collect();
            if parts.is_empty() { None } else { Some(parts.join("\n")) }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_pointers() -> Vec<String> {
        vec!["/message/content".to_string(), "/content".to_string()]
    }

    #[test]
    fn takes_message_content_string() {
        let body = r#"{"message":{"content":"A red bicycle."}}"#;
        let out = extract_analysis(body, &default_pointers()).unwrap();
        assert_eq!(out, Extraction { text: "A red bicycle.".into(), raw_fallback: false });
    }

    #[test]
    fn joins_text_blocks() {
        let body = r#"{"id":"msg_1","type":"message","role":"assistant","content":[
            {"type":"text","text":"First line."},
            {"type":"tool_use","id":"t","name":"x","input":{}},
            {"type":"text","text":"Second line."}],"stop_reason":"end_turn"}"#;
        let out = extract_analysis(body, &default_pointers()).unwrap();
        assert_eq!(out.text, "First line.\nSecond line.");
        assert!(!out.raw_fallback);
    }

    #[test]
    fn missing_field_falls_back_to_raw_body() {
        let body = r#"{"id":"msg_1","stop_reason":"max_tokens"}"#;
        let out = extract_analysis(body, &["/message/content".to_string()]).unwrap();
        assert_eq!(out.text, body);
        assert!(out.raw_fallback);
    }

    #[test]
    fn sentinel_value_falls_back_to_raw_body() {
        let body = r#"{"message":{"content":"No analysis generated."}}"#;
        let out = extract_analysis(body, &default_pointers()).unwrap();
        assert_eq!(out.text, body);
        assert!(out.raw_fallback);
    }

    #[test]
    fn empty_string_is_kept() {
        let body = r#"{"message":{"content":""}}"#;
        let out = extract_analysis(body, &default_pointers()).unwrap();
        assert_eq!(out.text, "");
        assert!(!out.raw_fallback);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let err = extract_analysis("<html>502 Bad Gateway</html>", &default_pointers()).unwrap_err();
        assert!(matches!(err, CaptionError::ParseResponse(_)));
    }
}
