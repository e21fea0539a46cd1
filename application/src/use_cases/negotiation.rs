//! Negotiation use case.
//!
//! [`NegotiationController`] owns the state of the active negotiation (memory,
//! product log, remote thread, client and current session filename) and runs
//! each user turn through the agent, the annotation protocol and the session
//! repository.
//!
//! # Turn flow
//!
//! 1. Blank input is ignored
//! 2. The user turn is appended to memory
//! 3. A remote thread is created if the backend needs one and none exists
//! 4. The agent is called; on failure the user turn stays in memory
//! 5. The raw reply is split into visible text and product log entries
//! 6. The visible reply is appended to memory
//! 7. With a complete client, the session is created or updated on disk

use crate::ports::agent_gateway::{AgentError, AgentGateway, AgentRequest};
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::session_repository::{SessionRepository, StorageError};
use negotia_domain::util::truncate_str;
use negotia_domain::{
    ClientInfo, Extraction, ExtractionOutcome, ProductCatalog, ProductLogEntry, ProductUsage,
    Role, SessionRecord, SessionSummary, ShortMemory, Utterance, VisibleTurn, attribute_products,
    extract_product_usage, now_iso,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Errors surfaced by negotiation operations.
#[derive(Error, Debug)]
pub enum NegotiationError {
    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Client name and phone are required to save a session")]
    MissingClientInfo,
}

/// Lifecycle position of a negotiation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationPhase {
    /// Nothing has been said yet.
    New,
    /// At least one turn is in memory.
    Active,
}

/// In-memory mirror of the current negotiation.
#[derive(Debug, Clone, Default)]
pub struct NegotiationState {
    memory: ShortMemory,
    products_log: Vec<ProductLogEntry>,
    thread_id: Option<String>,
    current_session: Option<String>,
    created_at: Option<String>,
    client: ClientInfo,
}

impl NegotiationState {
    /// State resumed from a persisted record.
    pub fn from_record(filename: impl Into<String>, record: SessionRecord) -> Self {
        let client = record.client();
        let mut memory = ShortMemory::new();
        memory.load_history(record.history);
        Self {
            memory,
            products_log: record.products_log,
            thread_id: record.assistant_thread,
            current_session: Some(filename.into()),
            created_at: Some(record.created_at).filter(|c| !c.is_empty()),
            client,
        }
    }

    /// Snapshot as a record; `created_at` falls back to now for unsaved sessions.
    pub fn to_record(&self) -> SessionRecord {
        SessionRecord {
            client_name: self.client.name().to_string(),
            client_phone: self.client.phone().to_string(),
            created_at: self.created_at.clone().unwrap_or_else(now_iso),
            history: self.memory.history(),
            products_log: self.products_log.clone(),
            assistant_thread: self.thread_id.clone(),
            updated_at: None,
        }
    }

    pub fn memory(&self) -> &ShortMemory {
        &self.memory
    }

    pub fn products_log(&self) -> &[ProductLogEntry] {
        &self.products_log
    }

    pub fn thread_id(&self) -> Option<&str> {
        self.thread_id.as_deref()
    }

    pub fn current_session(&self) -> Option<&str> {
        self.current_session.as_deref()
    }

    pub fn client(&self) -> &ClientInfo {
        &self.client
    }

    pub fn phase(&self) -> NegotiationPhase {
        if self.memory.is_empty() {
            NegotiationPhase::New
        } else {
            NegotiationPhase::Active
        }
    }
}

/// The agent's answer to one turn
#[derive(Debug, Clone)]
pub struct TurnReply {
    /// Visible reply as appended to history.
    pub reply: String,
    /// Annotation result for this turn.
    pub extraction: Extraction,
    /// Session filename written after this turn, if persisted.
    pub saved_as: Option<String>,
}

/// Result of submitting a user turn
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// Input was blank; nothing changed.
    Ignored,
    /// The agent answered without content; only the user turn was recorded.
    NoReply,
    Replied(TurnReply),
}

/// Use case driving one negotiation at a time.
pub struct NegotiationController {
    gateway: Arc<dyn AgentGateway>,
    repository: Arc<dyn SessionRepository>,
    catalog: Arc<ProductCatalog>,
    conversation_logger: Arc<dyn ConversationLogger>,
    state: NegotiationState,
}

impl NegotiationController {
    pub fn new(
        gateway: Arc<dyn AgentGateway>,
        repository: Arc<dyn SessionRepository>,
        catalog: Arc<ProductCatalog>,
    ) -> Self {
        Self {
            gateway,
            repository,
            catalog,
            conversation_logger: Arc::new(NoConversationLogger),
            state: NegotiationState::default(),
        }
    }

    /// Create with a conversation logger.
    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn state(&self) -> &NegotiationState {
        &self.state
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn backend_name(&self) -> &str {
        self.gateway.name()
    }

    /// Discard the current negotiation and start a fresh one.
    ///
    /// Memory, product log, client and session pointer are cleared. Thread
    /// backends get a new thread; if that fails the thread is created lazily
    /// on the next turn instead.
    pub async fn new_negotiation(&mut self) {
        info!("Starting new negotiation");
        self.state = NegotiationState::default();

        if self.gateway.uses_threads() {
            match self.gateway.start_thread().await {
                Ok(thread_id) => {
                    info!(thread_id = ?thread_id, "Created assistant thread");
                    self.state.thread_id = thread_id;
                }
                Err(e) => {
                    warn!(
                        "Could not create assistant thread, will retry on first turn: {}",
                        e
                    );
                }
            }
        }

        self.conversation_logger.log(ConversationEvent::new(
            "negotiation_started",
            json!({
                "backend": self.gateway.name(),
                "thread_id": self.state.thread_id,
            }),
        ));
    }

    /// Set the client for the current negotiation.
    pub fn set_client_info(&mut self, name: &str, phone: &str) {
        self.state.client = ClientInfo::new(name, phone);
        debug!(
            name = self.state.client.name(),
            phone = self.state.client.phone(),
            "Client info updated"
        );
    }

    /// Run one user turn through the agent.
    ///
    /// A failed agent call returns the error and leaves the user turn in
    /// memory. A storage failure after a reply returns the error with the
    /// reply already in memory, so the save can be retried.
    pub async fn submit_user_turn(
        &mut self,
        text: &str,
        cancel: &CancellationToken,
    ) -> Result<TurnOutcome, NegotiationError> {
        let Some(utterance) = Utterance::try_new(text) else {
            return Ok(TurnOutcome::Ignored);
        };

        info!("User turn: {}", truncate_str(utterance.content(), 100));
        self.state.memory.add(Role::User, utterance.content());
        self.conversation_logger.log(ConversationEvent::new(
            "user_turn",
            json!({
                "session": self.state.current_session,
                "content": utterance.content(),
            }),
        ));

        self.ensure_thread().await?;

        let request = AgentRequest {
            thread_id: self.state.thread_id.as_deref(),
            message: utterance.content(),
            history: self.state.memory.turns(),
        };

        let raw = match self.gateway.generate_response(request, cancel).await {
            Ok(raw) => raw,
            Err(AgentError::NoContent) => {
                warn!(
                    thread_id = ?self.state.thread_id,
                    "Agent produced no reply for this turn"
                );
                return Ok(TurnOutcome::NoReply);
            }
            Err(e) => {
                error!(
                    session = ?self.state.current_session,
                    thread_id = ?self.state.thread_id,
                    "Agent call failed: {}",
                    e
                );
                self.conversation_logger.log(ConversationEvent::new(
                    "agent_error",
                    json!({
                        "session": self.state.current_session,
                        "thread_id": self.state.thread_id,
                        "error": e.to_string(),
                    }),
                ));
                return Err(e.into());
            }
        };

        debug!("Raw agent reply: {}", truncate_str(&raw, 200));
        self.conversation_logger.log(ConversationEvent::new(
            "agent_reply",
            json!({
                "thread_id": self.state.thread_id,
                "raw": raw,
            }),
        ));

        let extraction = extract_product_usage(&raw, &self.catalog);
        self.log_extraction(&extraction);

        let reply = extraction.cleaned_reply.clone();
        self.state.memory.add(Role::Assistant, reply.clone());
        self.state
            .products_log
            .extend(extraction.entries().iter().cloned());

        let saved_as = if self.state.client.is_complete() {
            Some(self.persist()?)
        } else {
            None
        };

        Ok(TurnOutcome::Replied(TurnReply {
            reply,
            extraction,
            saved_as,
        }))
    }

    /// Persist the current negotiation, creating or updating its session.
    pub fn save_current_session(&mut self) -> Result<String, NegotiationError> {
        if !self.state.client.is_complete() {
            return Err(NegotiationError::MissingClientInfo);
        }
        Ok(self.persist()?)
    }

    /// Resume a persisted session.
    ///
    /// On error the current negotiation is left untouched.
    pub fn load_session(&mut self, filename: &str) -> Result<(), NegotiationError> {
        let record = self.repository.load_session(filename).map_err(|e| {
            error!(session = filename, "Failed to load session: {}", e);
            e
        })?;

        self.state = NegotiationState::from_record(filename, record);
        info!(
            session = filename,
            turns = self.state.memory.len(),
            products = self.state.products_log.len(),
            "Session loaded"
        );
        self.conversation_logger.log(ConversationEvent::new(
            "session_loaded",
            json!({
                "session": filename,
                "thread_id": self.state.thread_id,
            }),
        ));
        Ok(())
    }

    /// Saved sessions matching `search_term`, most recent first.
    pub fn list_sessions(
        &self,
        search_term: Option<&str>,
    ) -> Result<Vec<SessionSummary>, NegotiationError> {
        Ok(self.repository.list_sessions(search_term)?)
    }

    /// History with each assistant reply paired with the product it used.
    pub fn visible_history(&self) -> Vec<VisibleTurn> {
        attribute_products(self.state.memory.turns(), &self.state.products_log)
    }

    pub fn products_log(&self) -> &[ProductLogEntry] {
        &self.state.products_log
    }

    /// Usage counts for the current negotiation, most used first.
    pub fn product_usage(&self) -> Vec<ProductUsage> {
        ProductUsage::summarize(&self.state.products_log)
    }

    async fn ensure_thread(&mut self) -> Result<(), AgentError> {
        if !self.gateway.uses_threads() || self.state.thread_id.is_some() {
            return Ok(());
        }
        let thread_id = self.gateway.start_thread().await.map_err(|e| {
            error!("Failed to create assistant thread: {}", e);
            e
        })?;
        info!(thread_id = ?thread_id, "Created assistant thread lazily");
        self.state.thread_id = thread_id;
        Ok(())
    }

    fn persist(&mut self) -> Result<String, StorageError> {
        self.state.created_at.get_or_insert_with(now_iso);
        let record = self.state.to_record();

        let filename = match self.state.current_session.clone() {
            Some(filename) => {
                self.repository.update_session(&filename, &record)?;
                info!(session = %filename, "Session updated");
                filename
            }
            None => {
                let filename = self.repository.save_session(&record)?;
                info!(session = %filename, "New session saved");
                self.state.current_session = Some(filename.clone());
                filename
            }
        };

        self.conversation_logger.log(ConversationEvent::new(
            "session_saved",
            json!({
                "session": filename,
                "turns": record.history.len(),
                "products": record.products_log.len(),
            }),
        ));
        Ok(filename)
    }

    fn log_extraction(&self, extraction: &Extraction) {
        let payload = extraction.payload.as_deref().unwrap_or("");
        match &extraction.outcome {
            ExtractionOutcome::Untagged => info!("No product tag in reply"),
            ExtractionOutcome::Tagged {
                entries,
                unknown_ids,
            } => {
                for entry in entries {
                    info!(product_id = entry.id, "Product used: {}", entry.name);
                }
                if !unknown_ids.is_empty() {
                    debug!(?unknown_ids, "Dropped ids missing from catalog");
                }
            }
            ExtractionOutcome::Failed(e) => {
                error!(
                    thread_id = ?self.state.thread_id,
                    payload = truncate_str(payload, 80),
                    "Failed to read product tag: {}",
                    e
                );
            }
        }

        let product_ids: Vec<i64> = extraction.entries().iter().map(|e| e.id).collect();
        let error = match &extraction.outcome {
            ExtractionOutcome::Failed(e) => Some(e.to_string()),
            _ => None,
        };
        self.conversation_logger.log(ConversationEvent::new(
            "annotation",
            json!({
                "payload": extraction.payload,
                "product_ids": product_ids,
                "error": error,
            }),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use negotia_domain::Product;
    use std::collections::{BTreeMap, VecDeque};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    // ==================== Fakes ====================

    struct ScriptedGateway {
        threads: bool,
        replies: Mutex<VecDeque<Result<String, AgentError>>>,
        seen: Mutex<Vec<(Option<String>, String, usize)>>,
        threads_created: AtomicUsize,
    }

    impl ScriptedGateway {
        fn new(threads: bool, replies: Vec<Result<String, AgentError>>) -> Arc<Self> {
            Arc::new(Self {
                threads,
                replies: Mutex::new(replies.into()),
                seen: Mutex::new(Vec::new()),
                threads_created: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl AgentGateway for ScriptedGateway {
        fn name(&self) -> &str {
            "scripted"
        }

        fn uses_threads(&self) -> bool {
            self.threads
        }

        async fn start_thread(&self) -> Result<Option<String>, AgentError> {
            let n = self.threads_created.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(Some(format!("thread_{}", n)))
        }

        async fn generate_response(
            &self,
            request: AgentRequest<'_>,
            _cancel: &CancellationToken,
        ) -> Result<String, AgentError> {
            self.seen.lock().unwrap().push((
                request.thread_id.map(String::from),
                request.message.to_string(),
                request.history.len(),
            ));
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(AgentError::NoContent))
        }
    }

    #[derive(Default)]
    struct InMemoryRepository {
        docs: Mutex<BTreeMap<String, SessionRecord>>,
        counter: AtomicUsize,
        fail_writes: bool,
    }

    impl SessionRepository for InMemoryRepository {
        fn save_session(&self, record: &SessionRecord) -> Result<String, StorageError> {
            let filename = format!(
                "session_{}.json",
                self.counter.fetch_add(1, Ordering::SeqCst)
            );
            if self.fail_writes {
                return Err(StorageError::Write {
                    filename,
                    source: std::io::Error::other("disk full"),
                });
            }
            self.docs
                .lock()
                .unwrap()
                .insert(filename.clone(), record.clone());
            Ok(filename)
        }

        fn update_session(
            &self,
            filename: &str,
            record: &SessionRecord,
        ) -> Result<SessionRecord, StorageError> {
            let mut docs = self.docs.lock().unwrap();
            if !docs.contains_key(filename) {
                return Err(StorageError::NotFound {
                    filename: filename.to_string(),
                });
            }
            let mut stamped = record.clone();
            stamped.updated_at = Some(now_iso());
            docs.insert(filename.to_string(), stamped.clone());
            Ok(stamped)
        }

        fn load_session(&self, filename: &str) -> Result<SessionRecord, StorageError> {
            self.docs
                .lock()
                .unwrap()
                .get(filename)
                .cloned()
                .ok_or_else(|| StorageError::NotFound {
                    filename: filename.to_string(),
                })
        }

        fn list_sessions(
            &self,
            search_term: Option<&str>,
        ) -> Result<Vec<SessionSummary>, StorageError> {
            Ok(self
                .docs
                .lock()
                .unwrap()
                .iter()
                .filter(|(_, r)| r.matches(search_term.unwrap_or("")))
                .map(|(f, r)| SessionSummary {
                    filename: f.clone(),
                    record: r.clone(),
                })
                .collect())
        }
    }

    fn catalog() -> Arc<ProductCatalog> {
        Arc::new(
            ProductCatalog::new(vec![
                Product::new(3, "Cream X", "desconto"),
                Product::new(7, "Gel Y", "parcelamento"),
            ])
            .unwrap(),
        )
    }

    fn controller(
        gateway: Arc<ScriptedGateway>,
        repository: Arc<InMemoryRepository>,
    ) -> NegotiationController {
        NegotiationController::new(gateway, repository, catalog())
    }

    fn ok(s: &str) -> Result<String, AgentError> {
        Ok(s.to_string())
    }

    // ==================== Tests ====================

    #[tokio::test]
    async fn test_blank_input_is_ignored() {
        let gateway = ScriptedGateway::new(false, vec![]);
        let mut c = controller(gateway.clone(), Arc::default());
        let cancel = CancellationToken::new();

        let outcome = c.submit_user_turn("   \n", &cancel).await.unwrap();

        assert!(matches!(outcome, TurnOutcome::Ignored));
        assert!(c.state().memory().is_empty());
        assert!(gateway.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reply_is_cleaned_and_products_logged() {
        let gateway = ScriptedGateway::new(
            false,
            vec![ok("Sure, use the cream. [LOG: produto_id=3,7]")],
        );
        let mut c = controller(gateway.clone(), Arc::default());

        let outcome = c
            .submit_user_turn("  Quero desconto ", &CancellationToken::new())
            .await
            .unwrap();

        let TurnOutcome::Replied(reply) = outcome else {
            panic!("expected a reply");
        };
        assert_eq!(reply.reply, "Sure, use the cream.");
        assert!(reply.saved_as.is_none());

        let history = c.state().memory().history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content(), "Quero desconto");
        assert_eq!(history[1].content(), "Sure, use the cream.");

        let ids: Vec<i64> = c.products_log().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 7]);

        let visible = c.visible_history();
        assert_eq!(visible[1].product.as_ref().map(|p| p.id), Some(3));

        // The gateway saw the user turn as the last history entry.
        let seen = gateway.seen.lock().unwrap();
        assert_eq!(seen[0], (None, "Quero desconto".to_string(), 1));
    }

    #[tokio::test]
    async fn test_agent_failure_keeps_user_turn() {
        let gateway =
            ScriptedGateway::new(false, vec![Err(AgentError::CallFailed("503".into()))]);
        let mut c = controller(gateway, Arc::default());

        let result = c.submit_user_turn("Olá", &CancellationToken::new()).await;

        assert!(matches!(
            result,
            Err(NegotiationError::Agent(AgentError::CallFailed(_)))
        ));
        assert_eq!(c.state().memory().len(), 1);
        assert_eq!(c.state().phase(), NegotiationPhase::Active);
    }

    #[tokio::test]
    async fn test_no_content_records_only_user_turn() {
        let gateway = ScriptedGateway::new(false, vec![Err(AgentError::NoContent)]);
        let mut c = controller(gateway, Arc::default());

        let outcome = c
            .submit_user_turn("Olá", &CancellationToken::new())
            .await
            .unwrap();

        assert!(matches!(outcome, TurnOutcome::NoReply));
        assert_eq!(c.state().memory().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_tag_still_delivers_reply() {
        let raw = "Posso oferecer parcelamento [LOG: produto_id=7";
        let gateway = ScriptedGateway::new(false, vec![ok(raw)]);
        let mut c = controller(gateway, Arc::default());

        let outcome = c
            .submit_user_turn("e aí?", &CancellationToken::new())
            .await
            .unwrap();

        let TurnOutcome::Replied(reply) = outcome else {
            panic!("expected a reply");
        };
        assert!(reply.extraction.is_failed());
        assert_eq!(reply.reply, raw);
        assert_eq!(c.state().memory().len(), 2);
        assert!(c.products_log().is_empty());
    }

    #[tokio::test]
    async fn test_persists_only_with_complete_client() {
        let gateway = ScriptedGateway::new(false, vec![ok("um"), ok("dois"), ok("três")]);
        let repository = Arc::new(InMemoryRepository::default());
        let mut c = controller(gateway, repository.clone());
        let cancel = CancellationToken::new();

        c.set_client_info("Ana Souza", "");
        c.submit_user_turn("a", &cancel).await.unwrap();
        assert!(repository.docs.lock().unwrap().is_empty());
        assert!(c.state().current_session().is_none());

        c.set_client_info("Ana Souza", "11999990000");
        let TurnOutcome::Replied(second) = c.submit_user_turn("b", &cancel).await.unwrap() else {
            panic!("expected a reply");
        };
        let filename = second.saved_as.expect("session created");
        let first_doc = repository.load_session(&filename).unwrap();
        assert_eq!(first_doc.history.len(), 4);
        assert!(first_doc.updated_at.is_none());

        let TurnOutcome::Replied(third) = c.submit_user_turn("c", &cancel).await.unwrap() else {
            panic!("expected a reply");
        };
        assert_eq!(third.saved_as.as_deref(), Some(filename.as_str()));

        let docs = repository.docs.lock().unwrap();
        assert_eq!(docs.len(), 1);
        let updated = &docs[&filename];
        assert_eq!(updated.history.len(), 6);
        assert_eq!(updated.created_at, first_doc.created_at);
        assert!(updated.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_threads_are_created_lazily_once() {
        let gateway = ScriptedGateway::new(true, vec![ok("a"), ok("b")]);
        let mut c = controller(gateway.clone(), Arc::default());
        let cancel = CancellationToken::new();

        c.submit_user_turn("1", &cancel).await.unwrap();
        c.submit_user_turn("2", &cancel).await.unwrap();

        assert_eq!(gateway.threads_created.load(Ordering::SeqCst), 1);
        let seen = gateway.seen.lock().unwrap();
        assert!(seen.iter().all(|s| s.0.as_deref() == Some("thread_1")));
    }

    #[tokio::test]
    async fn test_new_negotiation_resets_state_and_thread() {
        let gateway = ScriptedGateway::new(true, vec![ok("x [LOG: produto_id=3]")]);
        let mut c = controller(gateway.clone(), Arc::default());
        c.set_client_info("Ana", "1");
        c.submit_user_turn("1", &CancellationToken::new())
            .await
            .unwrap();
        assert!(c.state().current_session().is_some());

        c.new_negotiation().await;

        assert_eq!(c.state().phase(), NegotiationPhase::New);
        assert!(c.products_log().is_empty());
        assert!(c.state().current_session().is_none());
        assert!(!c.state().client().is_complete());
        assert_eq!(c.state().thread_id(), Some("thread_2"));
    }

    #[tokio::test]
    async fn test_load_session_restores_state() {
        let gateway = ScriptedGateway::new(true, vec![ok("oi [LOG: produto_id=7]")]);
        let repository = Arc::new(InMemoryRepository::default());
        let mut c = controller(gateway.clone(), repository.clone());
        c.set_client_info("Ana", "1");
        c.submit_user_turn("olá", &CancellationToken::new())
            .await
            .unwrap();
        let filename = c.state().current_session().unwrap().to_string();

        c.new_negotiation().await;
        c.load_session(&filename).unwrap();

        assert_eq!(c.state().current_session(), Some(filename.as_str()));
        assert_eq!(c.state().memory().len(), 2);
        assert_eq!(c.products_log().len(), 1);
        assert_eq!(c.state().thread_id(), Some("thread_1"));
        assert_eq!(c.state().client().name(), "Ana");
        assert_eq!(c.product_usage()[0].id, 7);
    }

    #[tokio::test]
    async fn test_failed_load_leaves_state_untouched() {
        let gateway = ScriptedGateway::new(false, vec![ok("oi")]);
        let mut c = controller(gateway, Arc::default());
        c.submit_user_turn("olá", &CancellationToken::new())
            .await
            .unwrap();

        let result = c.load_session("session_missing.json");

        assert!(matches!(
            result,
            Err(NegotiationError::Storage(StorageError::NotFound { .. }))
        ));
        assert_eq!(c.state().memory().len(), 2);
    }

    #[tokio::test]
    async fn test_save_requires_client_info() {
        let gateway = ScriptedGateway::new(false, vec![]);
        let mut c = controller(gateway, Arc::default());
        assert!(matches!(
            c.save_current_session(),
            Err(NegotiationError::MissingClientInfo)
        ));
    }

    #[tokio::test]
    async fn test_write_failure_keeps_reply_in_memory() {
        let gateway = ScriptedGateway::new(false, vec![ok("resposta")]);
        let repository = Arc::new(InMemoryRepository {
            fail_writes: true,
            ..Default::default()
        });
        let mut c = controller(gateway, repository);
        c.set_client_info("Ana", "1");

        let result = c.submit_user_turn("olá", &CancellationToken::new()).await;

        assert!(matches!(
            result,
            Err(NegotiationError::Storage(StorageError::Write { .. }))
        ));
        assert_eq!(c.state().memory().len(), 2);
        assert!(c.state().current_session().is_none());
    }
}
