//! HTTP client for the assistant API.
//!
//! Thin typed wrapper over the thread, message, run and assistant endpoints.
//! Every non-success status is turned into [`AssistantsError::Http`] with a
//! truncated body so failures can be diagnosed from logs.

use crate::assistants::error::{AssistantsError, Result};
use crate::assistants::protocol::{
    AssistantObject, CreateMessageRequest, CreateRunRequest, MessageList, RunObject, ThreadObject,
};
use negotia_domain::util::truncate_str;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

const BETA_HEADER: (&str, &str) = ("OpenAI-Beta", "assistants=v2");
const MAX_ERROR_BODY: usize = 512;

/// Client for the Assistants endpoints
#[derive(Clone)]
pub struct AssistantsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for AssistantsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssistantsClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl AssistantsClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), base_url, api_key)
    }

    pub fn with_http_client(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Build a client whose key is read from the environment variable `key_env`.
    pub fn from_env(base_url: impl Into<String>, key_env: &str) -> Result<Self> {
        let api_key = std::env::var(key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AssistantsError::MissingCredential(key_env.to_string()))?;
        Ok(Self::new(base_url, api_key))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn create_thread(&self) -> Result<ThreadObject> {
        self.post("/threads", &serde_json::json!({})).await
    }

    pub async fn add_user_message(&self, thread_id: &str, content: &str) -> Result<()> {
        let body = CreateMessageRequest {
            role: "user",
            content,
        };
        let _: serde_json::Value = self
            .post(&format!("/threads/{}/messages", thread_id), &body)
            .await?;
        Ok(())
    }

    pub async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<RunObject> {
        let body = CreateRunRequest { assistant_id };
        self.post(&format!("/threads/{}/runs", thread_id), &body)
            .await
    }

    pub async fn retrieve_run(&self, thread_id: &str, run_id: &str) -> Result<RunObject> {
        self.get(&format!("/threads/{}/runs/{}", thread_id, run_id), &[])
            .await
    }

    pub async fn cancel_run(&self, thread_id: &str, run_id: &str) -> Result<RunObject> {
        self.post(
            &format!("/threads/{}/runs/{}/cancel", thread_id, run_id),
            &serde_json::json!({}),
        )
        .await
    }

    /// Newest-first messages of `thread_id` produced by `run_id`.
    pub async fn list_run_messages(&self, thread_id: &str, run_id: &str) -> Result<MessageList> {
        self.get(
            &format!("/threads/{}/messages", thread_id),
            &[("run_id", run_id), ("order", "desc")],
        )
        .await
    }

    pub async fn retrieve_assistant(&self, assistant_id: &str) -> Result<AssistantObject> {
        self.get(&format!("/assistants/{}", assistant_id), &[])
            .await
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        debug!("POST {}", path);
        let response = self
            .http
            .post(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .header(BETA_HEADER.0, BETA_HEADER.1)
            .json(body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        debug!("GET {}", path);
        let response = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .bearer_auth(&self.api_key)
            .header(BETA_HEADER.0, BETA_HEADER.1)
            .query(query)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(AssistantsError::Http {
                status: status.as_u16(),
                message: truncate_str(&body, MAX_ERROR_BODY).to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|e| AssistantsError::ParseError {
            error: e.to_string(),
            raw: truncate_str(&body, MAX_ERROR_BODY).to_string(),
        })
    }
}
