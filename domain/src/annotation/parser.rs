//! Annotation tag parser.

use thiserror::Error;

/// Opening marker of the product-usage tag.
pub const LOG_MARKER: &str = "[LOG: produto_id=";

/// Payload meaning "no product was used".
pub const NONE_SENTINEL: &str = "nenhum";

const TAG_END: char = ']';

/// Why a tag could not be read
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("annotation tag has no closing ']'")]
    Unterminated,
}

/// What the tag said about product usage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// The reply carried no tag.
    Absent,
    /// The tag carried the none-sentinel.
    NoProducts,
    /// Candidate ids in tag order, duplicates kept.
    Products(Vec<i64>),
}

/// A raw reply split into its visible text and its tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    /// Text shown to the user and appended to history.
    pub cleaned: String,
    /// Raw text between the marker and `]`, when one was found.
    pub payload: Option<String>,
    pub annotation: Result<Annotation, AnnotationError>,
}

/// Split `raw` into the visible reply and its annotation.
///
/// - No marker: the whole string is the reply, [`Annotation::Absent`].
/// - Marker without `]`: the whole string is the reply, [`AnnotationError::Unterminated`].
/// - Otherwise the reply is everything before the marker with trailing
///   whitespace removed, and the payload is read as a comma-separated id list.
pub fn parse_reply(raw: &str) -> ParsedReply {
    let Some(start) = raw.find(LOG_MARKER) else {
        return ParsedReply {
            cleaned: raw.to_string(),
            payload: None,
            annotation: Ok(Annotation::Absent),
        };
    };

    let rest = &raw[start + LOG_MARKER.len()..];
    let Some(end) = rest.find(TAG_END) else {
        return ParsedReply {
            cleaned: raw.to_string(),
            payload: Some(rest.to_string()),
            annotation: Err(AnnotationError::Unterminated),
        };
    };

    let payload = &rest[..end];
    ParsedReply {
        cleaned: raw[..start].trim_end().to_string(),
        payload: Some(payload.to_string()),
        annotation: Ok(parse_payload(payload)),
    }
}

/// Read the id list of a tag payload.
///
/// Pieces that are not purely ASCII digits are dropped. A digit run too large
/// for an id cannot name a catalog product and is dropped as well.
pub fn parse_payload(payload: &str) -> Annotation {
    if payload.trim() == NONE_SENTINEL {
        return Annotation::NoProducts;
    }

    let mut ids = Vec::new();
    for piece in payload.split(',') {
        let piece = piece.trim();
        if piece.is_empty() || !piece.bytes().all(|b| b.is_ascii_digit()) {
            continue;
        }
        let Ok(id) = piece.parse::<i64>() else {
            continue;
        };
        ids.push(id);
    }
    Annotation::Products(ids)
}
