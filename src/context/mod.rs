//! Prompt construction from retrieved chunks and recent history.

mod prompt;
mod window;

pub use prompt::{PromptAssembler, NOT_FOUND_ANSWER};
pub use window::recent_turns;
