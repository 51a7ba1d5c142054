//! Extraction of the final text payload from completion endpoint responses.
//!
//! The endpoint answers either as a single JSON object carrying the payload in
//! `object` (or `message`), or as a newline-delimited pseudo-stream of
//! `data: {json}` chunks ending in a `[DONE]` sentinel. Both shapes reduce to
//! plain text here; parsing is pure and idempotent.

use serde_json::Value;

const STREAM_PREFIX: &str = "data:";
const STREAM_SENTINEL: &str = "[DONE]";

/// Extract the authoritative text payload from a raw response body.
///
/// Stream chunks are scanned from the end backward (the most recent chunk
/// wins); sentinel, loader/keepalive, and malformed chunks are skipped.
/// Returns an empty string when nothing usable is found; callers treat empty
/// as failure.
pub fn extract_text(raw: &str) -> String {
    let chunks: Vec<&str> = raw
        .lines()
        .filter_map(|line| line.trim().strip_prefix(STREAM_PREFIX))
        .map(str::trim)
        .collect();

    if chunks.is_empty() {
        return match serde_json::from_str::<Value>(raw) {
            Ok(body) => payload_field(&body).unwrap_or_default().trim().to_string(),
            Err(_) => String::new(),
        };
    }

    for chunk in chunks.iter().rev() {
        if *chunk == STREAM_SENTINEL {
            continue;
        }
        let Ok(decoded) = serde_json::from_str::<Value>(chunk) else {
            continue;
        };
        if is_loader_chunk(&decoded) {
            continue;
        }
        if let Some(text) = payload_field(&decoded) {
            if !text.trim().is_empty() {
                return text.trim().to_string();
            }
        }
    }

    String::new()
}

/// Payload field preference: `message` first, then `object`.
fn payload_field(value: &Value) -> Option<&str> {
    value
        .get("message")
        .and_then(Value::as_str)
        .or_else(|| value.get("object").and_then(Value::as_str))
}

/// Loader/keepalive chunks carry transport state, not content.
fn is_loader_chunk(value: &Value) -> bool {
    matches!(
        value.get("status").and_then(Value::as_str),
        Some("loading" | "processing" | "ping")
    )
}

/// Remove Markdown code-fence markers the model wraps structured answers in.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "")
        .replace("```text", "")
        .replace("```", "")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json_object_field() {
        assert_eq!(extract_text(r#"{"object": "Hello world"}"#), "Hello world");
    }

    #[test]
    fn test_plain_json_prefers_message() {
        assert_eq!(
            extract_text(r#"{"message": "from message", "object": "from object"}"#),
            "from message"
        );
    }

    #[test]
    fn test_plain_body_without_payload_is_empty() {
        assert_eq!(extract_text(r#"{"other": "field"}"#), "");
        assert_eq!(extract_text("not json at all"), "");
        assert_eq!(extract_text(""), "");
    }

    #[test]
    fn test_stream_last_chunk_wins() {
        let raw = "data: {\"object\": \"partial\"}\n\
                   data: {\"object\": \"complete answer\"}\n\
                   data: [DONE]";
        assert_eq!(extract_text(raw), "complete answer");
    }

    #[test]
    fn test_stream_skips_loader_and_malformed_chunks() {
        let raw = "data: {\"object\": \"real content\"}\n\
                   data: {\"status\": \"loading\", \"object\": \"spinner\"}\n\
                   data: {broken json\n\
                   data: [DONE]";
        assert_eq!(extract_text(raw), "real content");
    }

    #[test]
    fn test_stream_skips_empty_payloads() {
        let raw = "data: {\"message\": \"kept\"}\n\
                   data: {\"message\": \"   \"}";
        assert_eq!(extract_text(raw), "kept");
    }

    #[test]
    fn test_stream_with_nothing_usable_is_empty() {
        let raw = "data: {\"status\": \"ping\"}\ndata: [DONE]";
        assert_eq!(extract_text(raw), "");
    }

    #[test]
    fn test_non_stream_lines_are_ignored_when_stream_present() {
        let raw = "event: completion\n\
                   data: {\"message\": \"streamed\"}\n\
                   \n\
                   data: [DONE]";
        assert_eq!(extract_text(raw), "streamed");
    }

    #[test]
    fn test_extract_is_idempotent_on_raw_input() {
        let raw = "data: {\"object\": \"stable\"}\ndata: [DONE]";
        assert_eq!(extract_text(raw), extract_text(raw));
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(
            strip_code_fences("```json\n{\"cash_flow\": -5}\n```"),
            "{\"cash_flow\": -5}"
        );
        assert_eq!(strip_code_fences("```text\nplain\n```"), "plain");
        assert_eq!(strip_code_fences("no fences"), "no fences");
        // Idempotent
        let once = strip_code_fences("```json\nx\n```");
        assert_eq!(strip_code_fences(&once), once);
    }
}
