//! Per-request pipeline tying retrieval, prompting, generation and history together.

mod orchestrator;

pub use orchestrator::{
    ChatReply, ConversationOrchestrator, OrchestratorSettings, Outcome, GENERATION_FAILURE_ANSWER,
};
