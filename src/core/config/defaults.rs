pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 20_000;

pub const DEFAULT_INDEX_PATH: &str = "data/index.json";
pub const DEFAULT_CHUNKS_PATH: &str = "data/chunks.json";
pub const DEFAULT_TOP_K: usize = 5;

pub const DEFAULT_EMBEDDING_BASE_URL: &str = "http://localhost:1234";
pub const DEFAULT_EMBEDDING_MODEL: &str = "BAAI/bge-m3";
pub const DEFAULT_EMBEDDING_TIMEOUT_SECS: u64 = 10;

pub const DEFAULT_GENERATION_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_GENERATION_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEMPERATURE: f64 = 0.1;
pub const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

pub const DEFAULT_ASSISTANT_NAME: &str = "Nova";
pub const DEFAULT_ASSISTANT_DOMAIN: &str = "FICO Blaze Advisor";
pub const DEFAULT_USER_LABEL: &str = "Usuário";
/// Raw turns, not user/assistant pairs.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

pub fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
