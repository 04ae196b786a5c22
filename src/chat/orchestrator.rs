use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::context::{PromptAssembler, NOT_FOUND_ANSWER};
use crate::core::config::AppConfig;
use crate::history::{ConversationLocks, ConversationStore, HistoryError, Turn};
use crate::llm::{GenerationBackend, GenerationError};
use crate::rag::Retriever;

pub const GENERATION_FAILURE_ANSWER: &str =
    "Desculpe, ocorreu um erro ao processar sua solicitação.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Answered,
    /// Retrieval produced nothing; the fixed not-found answer was returned.
    EmptyContext,
    /// The backend failed or timed out; the fixed apology was returned.
    GenerationFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub answer: String,
    pub conversation_id: String,
    pub outcome: Outcome,
}

#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub top_k: usize,
    pub generation_timeout: Duration,
}

impl OrchestratorSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            top_k: config.retrieval.top_k,
            generation_timeout: Duration::from_secs(config.generation.timeout_secs),
        }
    }
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

/// Runs one chat request: retrieve, assemble, generate, record.
///
/// Every per-request failure is absorbed here and turned into one of the fixed
/// answers. Only history lookups for unknown ids surface an error.
pub struct ConversationOrchestrator {
    retriever: Retriever,
    assembler: PromptAssembler,
    backend: Arc<dyn GenerationBackend>,
    store: Arc<dyn ConversationStore>,
    locks: ConversationLocks,
    settings: OrchestratorSettings,
}

impl ConversationOrchestrator {
    pub fn new(
        retriever: Retriever,
        assembler: PromptAssembler,
        backend: Arc<dyn GenerationBackend>,
        store: Arc<dyn ConversationStore>,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            retriever,
            assembler,
            backend,
            store,
            locks: ConversationLocks::new(),
            settings,
        }
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    pub fn backend(&self) -> &dyn GenerationBackend {
        self.backend.as_ref()
    }

    pub async fn submit_query(&self, query: &str, conversation_id: Option<&str>) -> ChatReply {
        let conversation_id = resolve_conversation_id(conversation_id);
        tracing::info!(conversation_id = %conversation_id, "Chat request received");

        tracing::debug!(conversation_id = %conversation_id, "Retrieving context");
        let retrieved = self.retriever.retrieve(query, self.settings.top_k).await;
        if retrieved.is_empty() {
            tracing::info!(conversation_id = %conversation_id, "No relevant context found");
            return ChatReply {
                answer: NOT_FOUND_ANSWER.to_string(),
                conversation_id,
                outcome: Outcome::EmptyContext,
            };
        }

        // Held until the turns are recorded so same-id requests never interleave.
        let _guard = self.locks.acquire(&conversation_id).await;

        let history = self
            .store
            .recent(&conversation_id, self.assembler.history_window())
            .await;
        tracing::debug!(
            conversation_id = %conversation_id,
            chunks = retrieved.len(),
            history = history.len(),
            "Assembling prompt"
        );
        let prompt = self.assembler.assemble(query, &retrieved, &history);
        let system = self.assembler.system_preamble();

        tracing::debug!(
            conversation_id = %conversation_id,
            backend = self.backend.name(),
            "Generating answer"
        );
        let answer = match self.generate(&system, &prompt).await {
            Ok(answer) => answer,
            Err(err) => {
                tracing::error!(conversation_id = %conversation_id, "Generation failed: {}", err);
                return ChatReply {
                    answer: GENERATION_FAILURE_ANSWER.to_string(),
                    conversation_id,
                    outcome: Outcome::GenerationFailed,
                };
            }
        };

        self.store
            .append(
                &conversation_id,
                vec![Turn::user(query), Turn::assistant(answer.clone())],
            )
            .await;
        tracing::info!(conversation_id = %conversation_id, "Answer recorded");

        ChatReply {
            answer,
            conversation_id,
            outcome: Outcome::Answered,
        }
    }

    pub async fn get_history(&self, conversation_id: &str) -> Result<Vec<Turn>, HistoryError> {
        self.store.history(conversation_id).await
    }

    /// History rendered as `"Role: text"` lines.
    pub async fn fetch_history(&self, conversation_id: &str) -> Result<Vec<String>, HistoryError> {
        let labels = self.assembler.labels();
        Ok(self
            .get_history(conversation_id)
            .await?
            .iter()
            .map(|turn| turn.render(labels))
            .collect())
    }

    pub async fn conversation_count(&self) -> usize {
        self.store.conversation_count().await
    }

    async fn generate(&self, system: &str, prompt: &str) -> Result<String, GenerationError> {
        let timeout = self.settings.generation_timeout;
        match tokio::time::timeout(timeout, self.backend.generate(system, prompt)).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout(timeout)),
        }
    }
}

/// Keeps a supplied id verbatim; only a missing or blank one is replaced.
fn resolve_conversation_id(supplied: Option<&str>) -> String {
    match supplied.filter(|id| !id.trim().is_empty()) {
        Some(id) => id.to_string(),
        None => Uuid::new_v4().to_string(),
    }
}
