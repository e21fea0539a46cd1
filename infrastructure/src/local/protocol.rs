//! Wire types of the streaming generate endpoint.

use serde::{Deserialize, Serialize};

/// Request body for `POST /api/generate`
#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

/// One NDJSON line of the streamed response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateChunk {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub done: bool,
}

impl GenerateChunk {
    /// Parse one line; blank or malformed lines yield `None`.
    pub fn parse_line(line: &[u8]) -> Option<Self> {
        let line = std::str::from_utf8(line).ok()?.trim();
        if line.is_empty() {
            return None;
        }
        serde_json::from_str(line).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_fragment_line() {
        let chunk = GenerateChunk::parse_line(br#"{"response":"Ol","done":false}"#).unwrap();
        assert_eq!(chunk.response.as_deref(), Some("Ol"));
        assert!(!chunk.done);
    }

    #[test]
    fn test_parses_final_line_without_response() {
        let chunk = GenerateChunk::parse_line(br#"{"done":true,"total_duration":12}"#).unwrap();
        assert!(chunk.response.is_none());
        assert!(chunk.done);
    }

    #[test]
    fn test_skips_malformed_and_blank_lines() {
        assert!(GenerateChunk::parse_line(b"not json").is_none());
        assert!(GenerateChunk::parse_line(b"   ").is_none());
        assert!(GenerateChunk::parse_line(&[0xff, 0xfe]).is_none());
    }

    #[test]
    fn test_request_serializes_stream_flag() {
        let req = GenerateRequest {
            model: "llama3:latest",
            prompt: "ANA:",
            temperature: 0.7,
            max_tokens: 512,
            stream: true,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["stream"], true);
        assert_eq!(value["max_tokens"], 512);
    }
}
