pub mod openai;
pub mod provider;
pub mod types;

pub use openai::OpenAiBackend;
pub use provider::{GenerationBackend, GenerationError};
pub use types::{ChatMessage, ChatRequest};
