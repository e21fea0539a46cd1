//! Utterance value object

use std::fmt;

/// Non-blank text submitted by the user (Value Object)
///
/// The content is stored trimmed; whitespace-only input has no utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    content: String,
}

impl Utterance {
    /// Returns `None` for empty or whitespace-only input.
    pub fn try_new(content: impl AsRef<str>) -> Option<Self> {
        let trimmed = content.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self {
                content: trimmed.to_string(),
            })
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

impl fmt::Display for Utterance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}
