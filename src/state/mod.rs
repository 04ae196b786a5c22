use std::sync::Arc;

use crate::chat::{ConversationOrchestrator, OrchestratorSettings};
use crate::context::PromptAssembler;
use crate::core::config::{AppConfig, AppPaths, ConfigService};
use crate::history::{ConversationStore, InMemoryConversationStore};
use crate::llm::{GenerationBackend, OpenAiBackend};
use crate::rag::{load_retriever, Retriever};

pub mod error;

use error::InitializationError;

/// Shared application state handed to every route.
///
/// Everything in here is built once at startup; the only mutable parts are the
/// conversation store and the per-conversation locks inside the orchestrator.
pub struct AppState {
    pub config: AppConfig,
    pub orchestrator: ConversationOrchestrator,
}

impl AppState {
    /// Initializes the application state.
    ///
    /// This process includes:
    /// 1. Loading and validating configuration
    /// 2. Loading the index and probing the embedding endpoint
    /// 3. Building the generation client
    pub async fn initialize(paths: Arc<AppPaths>) -> Result<Arc<Self>, InitializationError> {
        let config = ConfigService::new(paths.clone()).load_config()?;

        let retriever = load_retriever(&config, &paths)
            .await
            .map_err(InitializationError::Retrieval)?;

        let backend =
            OpenAiBackend::new(&config.generation).map_err(InitializationError::Generation)?;

        Ok(Arc::new(Self::from_parts(
            config,
            retriever,
            Arc::new(backend),
            Arc::new(InMemoryConversationStore::new()),
        )))
    }

    /// Assembles state from already-built components.
    pub fn from_parts(
        config: AppConfig,
        retriever: Retriever,
        backend: Arc<dyn GenerationBackend>,
        store: Arc<dyn ConversationStore>,
    ) -> Self {
        let orchestrator = ConversationOrchestrator::new(
            retriever,
            PromptAssembler::new(&config.assistant),
            backend,
            store,
            OrchestratorSettings::from_config(&config),
        );
        Self {
            config,
            orchestrator,
        }
    }
}
