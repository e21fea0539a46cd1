//! Local model gateway.
//!
//! Sends the rendered history to a streaming generate endpoint and
//! concatenates the `response` fragments of the NDJSON body until a chunk
//! reports `done`. Malformed lines are skipped.

use crate::local::error::LocalModelError;
use crate::local::prompt::{DEFAULT_SYSTEM_PROMPT, render_prompt};
use crate::local::protocol::{GenerateChunk, GenerateRequest};
use async_trait::async_trait;
use futures::StreamExt;
use negotia_application::{AgentError, AgentGateway, AgentRequest};
use negotia_domain::util::truncate_str;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

pub const DEFAULT_URL: &str = "http://localhost:11434/api/generate";
pub const DEFAULT_MODEL: &str = "llama3:latest";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 512;

const MAX_ERROR_BODY: usize = 512;

/// [`AgentGateway`] for a locally served streaming model
pub struct LocalModelGateway {
    http: reqwest::Client,
    url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    system_prompt: String,
    max_wait: Duration,
}

impl LocalModelGateway {
    pub fn new(url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            model: model.into(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_wait: Duration::from_secs(120),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Overall limit for one generation, stream included.
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, LocalModelError> {
        let body = GenerateRequest {
            model: &self.model,
            prompt,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: true,
        };

        let response = self.http.post(&self.url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LocalModelError::Http {
                status: status.as_u16(),
                message: truncate_str(&text, MAX_ERROR_BODY).to_string(),
            });
        }

        let mut stream = response.bytes_stream();
        let mut buffer: Vec<u8> = Vec::new();
        let mut reply = String::new();
        let mut done = false;

        'read: while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(|e| LocalModelError::Stream(e.to_string()))?;
            buffer.extend_from_slice(&bytes);

            while let Some(pos) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=pos).collect();
                if apply_line(&line, &mut reply) {
                    done = true;
                    break 'read;
                }
            }
        }

        if !done && !buffer.is_empty() {
            apply_line(&buffer, &mut reply);
        }

        debug!(model = %self.model, chars = reply.len(), done, "Stream finished");
        Ok(reply)
    }
}

/// Append the fragment carried by `line` to `reply`; returns true once the
/// stream reports completion.
fn apply_line(line: &[u8], reply: &mut String) -> bool {
    match GenerateChunk::parse_line(line) {
        Some(chunk) => {
            if let Some(fragment) = chunk.response {
                reply.push_str(&fragment);
            }
            chunk.done
        }
        None => false,
    }
}

#[async_trait]
impl AgentGateway for LocalModelGateway {
    fn name(&self) -> &str {
        "local"
    }

    async fn generate_response(
        &self,
        request: AgentRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<String, AgentError> {
        let prompt = render_prompt(&self.system_prompt, request.history);
        info!(
            model = %self.model,
            turns = request.history.len(),
            "Generating local reply"
        );

        let reply = tokio::select! {
            _ = cancel.cancelled() => return Err(AgentError::Cancelled),
            result = tokio::time::timeout(self.max_wait, self.generate(&prompt)) => match result {
                Ok(reply) => reply?,
                Err(_) => {
                    warn!(model = %self.model, "Local generation exceeded max wait");
                    return Err(AgentError::Timeout(self.max_wait));
                }
            },
        };

        let reply = reply.trim();
        if reply.is_empty() {
            return Err(AgentError::NoContent);
        }
        Ok(reply.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use negotia_domain::Turn;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn gateway(server: &MockServer) -> LocalModelGateway {
        LocalModelGateway::new(format!("{}/api/generate", server.uri()), DEFAULT_MODEL)
            .with_system_prompt("SYS")
    }

    fn ndjson(lines: &[&str]) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(lines.join("\n"), "application/x-ndjson")
    }

    #[tokio::test]
    async fn test_concatenates_fragments_until_done() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_partial_json(json!({
                "model": "llama3:latest",
                "prompt": "SYS\n\nCliente: Oi\nANA:",
                "stream": true,
                "max_tokens": 512
            })))
            .respond_with(ndjson(&[
                r#"{"response":" Olá","done":false}"#,
                r#"{"response":", tudo bem?","done":false}"#,
                r#"{"response":" ","done":true}"#,
                r#"{"response":"ignored","done":false}"#,
            ]))
            .mount(&server)
            .await;

        let history = vec![Turn::user("Oi")];
        let request = AgentRequest {
            thread_id: None,
            message: "Oi",
            history: &history,
        };

        let reply = gateway(&server)
            .generate_response(request, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(reply, "Olá, tudo bem?");
    }

    #[tokio::test]
    async fn test_skips_malformed_lines_and_reads_trailing_line() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ndjson(&[
                r#"{"response":"Podemos "}"#,
                "garbage",
                "",
                r#"{"response":"parcelar. [LOG: produto_id=nenhum]"}"#,
            ]))
            .mount(&server)
            .await;

        let history = vec![Turn::user("Quero parcelar")];
        let request = AgentRequest {
            thread_id: None,
            message: "Quero parcelar",
            history: &history,
        };

        let reply = gateway(&server)
            .generate_response(request, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(reply, "Podemos parcelar. [LOG: produto_id=nenhum]");
    }

    #[tokio::test]
    async fn test_blank_reply_is_no_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ndjson(&[r#"{"response":"  ","done":true}"#]))
            .mount(&server)
            .await;

        let request = AgentRequest {
            thread_id: None,
            message: "Oi",
            history: &[],
        };
        let result = gateway(&server)
            .generate_response(request, &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(AgentError::NoContent)));
    }

    #[tokio::test]
    async fn test_server_error_is_call_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(404).set_body_string("model not found"))
            .mount(&server)
            .await;

        let request = AgentRequest {
            thread_id: None,
            message: "Oi",
            history: &[],
        };
        let result = gateway(&server)
            .generate_response(request, &CancellationToken::new())
            .await;

        match result {
            Err(AgentError::CallFailed(msg)) => assert!(msg.contains("model not found")),
            other => panic!("expected CallFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_server_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ndjson(&[r#"{"response":"late","done":true}"#])
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let request = AgentRequest {
            thread_id: None,
            message: "Oi",
            history: &[],
        };
        let result = gateway(&server)
            .with_max_wait(Duration::from_millis(50))
            .generate_response(request, &CancellationToken::new())
            .await;

        assert!(matches!(result, Err(AgentError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_cancelled_token_short_circuits() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(
                ndjson(&[r#"{"response":"late","done":true}"#])
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let cancel = CancellationToken::new();
        cancel.cancel();
        let request = AgentRequest {
            thread_id: None,
            message: "Oi",
            history: &[],
        };
        let result = gateway(&server).generate_response(request, &cancel).await;

        assert!(matches!(result, Err(AgentError::Cancelled)));
    }
}
