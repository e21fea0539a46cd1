//! Agent backend configuration from TOML (`[agent]`, `[hosted]`, `[local]`)

use serde::{Deserialize, Serialize};

/// Which agent backend answers the negotiation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentBackend {
    /// Remote assistant with server-side threads
    #[default]
    Hosted,
    /// Locally served streaming model
    Local,
}

impl AgentBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentBackend::Hosted => "hosted",
            AgentBackend::Local => "local",
        }
    }
}

impl std::str::FromStr for AgentBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "hosted" => Ok(AgentBackend::Hosted),
            "local" => Ok(AgentBackend::Local),
            other => Err(format!(
                "unknown backend '{}' (expected 'hosted' or 'local')",
                other
            )),
        }
    }
}

/// Raw `[agent]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAgentConfig {
    pub backend: AgentBackend,
}

/// Raw `[hosted]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHostedConfig {
    /// API base URL
    pub api_base: String,
    /// Assistant that answers every run
    pub assistant_id: String,
    /// Environment variable holding the API key
    pub api_key_env: String,
}

impl Default for FileHostedConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.openai.com/v1".to_string(),
            assistant_id: String::new(),
            api_key_env: "OPENAI_API_KEY".to_string(),
        }
    }
}

/// Raw `[local]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLocalConfig {
    /// Streaming generate endpoint
    pub url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Overrides the built-in negotiation instructions
    pub system_prompt: Option<String>,
}

impl Default for FileLocalConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:11434/api/generate".to_string(),
            model: "llama3:latest".to_string(),
            temperature: 0.7,
            max_tokens: 512,
            system_prompt: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("LOCAL".parse::<AgentBackend>(), Ok(AgentBackend::Local));
        assert_eq!("hosted".parse::<AgentBackend>(), Ok(AgentBackend::Hosted));
        assert!("bedrock".parse::<AgentBackend>().is_err());
    }

    #[test]
    fn test_system_prompt_override() {
        let toml_str = r#"
[local]
system_prompt = "Seja breve."
"#;
        let config: super::super::FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.local.system_prompt.as_deref(), Some("Seja breve."));
        assert_eq!(config.local.temperature, 0.7);
    }
}
