//! Hosted assistant gateway.
//!
//! One turn is: append the user message to the thread, start a run, poll the
//! run with exponential backoff until it leaves `queued`/`in_progress`, then
//! read the newest assistant message of that run. Polling is bounded by
//! [`PollingParams::max_wait`] and by the caller's cancellation token; an
//! abandoned run is cancelled remotely on a best-effort basis.

use crate::assistants::client::AssistantsClient;
use crate::assistants::error::AssistantsError;
use crate::assistants::protocol::{AssistantObject, RunObject, RunStatus};
use async_trait::async_trait;
use negotia_application::{AgentError, AgentGateway, AgentRequest, PollingParams};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// [`AgentGateway`] backed by a hosted assistant and its remote threads
pub struct HostedAssistantGateway {
    client: AssistantsClient,
    assistant_id: String,
    polling: PollingParams,
}

impl HostedAssistantGateway {
    pub fn new(client: AssistantsClient, assistant_id: impl Into<String>) -> Self {
        Self {
            client,
            assistant_id: assistant_id.into(),
            polling: PollingParams::default(),
        }
    }

    pub fn with_polling(mut self, polling: PollingParams) -> Self {
        self.polling = polling;
        self
    }

    pub fn assistant_id(&self) -> &str {
        &self.assistant_id
    }

    /// Fetch the configured assistant, logging the model it runs on.
    pub async fn describe(&self) -> Result<AssistantObject, AssistantsError> {
        let assistant = self.client.retrieve_assistant(&self.assistant_id).await?;
        info!(
            assistant_id = %assistant.id,
            model = %assistant.model,
            "Assistant loaded"
        );
        Ok(assistant)
    }

    /// Poll `run` until it is no longer pending.
    async fn wait_for_run(
        &self,
        thread_id: &str,
        mut run: RunObject,
        cancel: &CancellationToken,
    ) -> Result<RunObject, AgentError> {
        // None when max_wait reaches past what an Instant can represent
        let deadline = Instant::now().checked_add(self.polling.max_wait);
        let mut attempt = 0u32;

        while run.status.is_pending() {
            let now = Instant::now();
            if deadline.is_some_and(|deadline| now >= deadline) {
                warn!(
                    thread_id,
                    run_id = %run.id,
                    status = run.status.as_str(),
                    "Run exceeded max wait"
                );
                self.abandon_run(thread_id, &run.id).await;
                return Err(AgentError::Timeout(self.polling.max_wait));
            }

            let mut delay = self.polling.delay_for(attempt);
            if let Some(deadline) = deadline {
                delay = delay.min(deadline - now);
            }
            tokio::select! {
                _ = cancel.cancelled() => {
                    self.abandon_run(thread_id, &run.id).await;
                    return Err(AgentError::Cancelled);
                }
                _ = tokio::time::sleep(delay) => {}
            }

            let run_id = run.id.clone();
            run = match cancellable(cancel, self.client.retrieve_run(thread_id, &run_id)).await {
                Err(AgentError::Cancelled) => {
                    self.abandon_run(thread_id, &run_id).await;
                    return Err(AgentError::Cancelled);
                }
                other => other?,
            };
            attempt += 1;
            debug!(
                run_id = %run.id,
                status = run.status.as_str(),
                attempt,
                "Polled run"
            );
        }

        Ok(run)
    }

    async fn abandon_run(&self, thread_id: &str, run_id: &str) {
        if let Err(e) = self.client.cancel_run(thread_id, run_id).await {
            warn!(thread_id, run_id, "Could not cancel abandoned run: {}", e);
        }
    }
}

/// Run `fut` unless `cancel` fires first.
async fn cancellable<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T, AssistantsError>>,
) -> Result<T, AgentError> {
    tokio::select! {
        _ = cancel.cancelled() => Err(AgentError::Cancelled),
        result = fut => result.map_err(AgentError::from),
    }
}

#[async_trait]
impl AgentGateway for HostedAssistantGateway {
    fn name(&self) -> &str {
        "assistants"
    }

    fn uses_threads(&self) -> bool {
        true
    }

    async fn start_thread(&self) -> Result<Option<String>, AgentError> {
        let thread = self.client.create_thread().await?;
        info!(thread_id = %thread.id, "Thread created");
        Ok(Some(thread.id))
    }

    async fn generate_response(
        &self,
        request: AgentRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<String, AgentError> {
        let thread_id = request.thread_id.ok_or(AssistantsError::MissingThread)?;

        cancellable(
            cancel,
            self.client.add_user_message(thread_id, request.message),
        )
        .await?;
        debug!(thread_id, "Message added to thread");

        let run = cancellable(cancel, self.client.create_run(thread_id, &self.assistant_id))
            .await?;
        info!(thread_id, run_id = %run.id, "Run started");

        let run = self.wait_for_run(thread_id, run, cancel).await?;
        if run.status != RunStatus::Completed {
            if let Some(err) = &run.last_error {
                warn!(
                    run_id = %run.id,
                    code = %err.code,
                    "Run failed: {}",
                    err.message
                );
            }
            return Err(AgentError::RunFailed {
                run_id: run.id,
                status: run.status.as_str().to_string(),
            });
        }

        let messages =
            cancellable(cancel, self.client.list_run_messages(thread_id, &run.id)).await?;
        match messages.reply_for_run(&run.id) {
            Some(text) => Ok(text.to_string()),
            None => {
                warn!(thread_id, run_id = %run.id, "No assistant message for run");
                Err(AgentError::NoContent)
            }
        }
    }
}
