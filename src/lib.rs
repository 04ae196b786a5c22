//! Conversational retrieval-augmented assistant over a fixed document index.

pub mod chat;
pub mod context;
pub mod core;
pub mod history;
pub mod llm;
pub mod rag;
pub mod server;
pub mod state;
