//! Client identification

/// Name and phone of the client in the current negotiation.
///
/// A session is only persisted once both are known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientInfo {
    name: String,
    phone: String,
}

impl ClientInfo {
    pub fn new(name: impl AsRef<str>, phone: impl AsRef<str>) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
            phone: phone.as_ref().trim().to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    /// Both name and phone are non-empty.
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.phone.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completeness_requires_both_fields() {
        assert!(!ClientInfo::default().is_complete());
        assert!(!ClientInfo::new("Ana", "  ").is_complete());
        assert!(!ClientInfo::new("", "1199999").is_complete());
        assert!(ClientInfo::new(" Ana Souza ", "1199999").is_complete());
        assert_eq!(ClientInfo::new(" Ana Souza ", "1").name(), "Ana Souza");
    }
}
