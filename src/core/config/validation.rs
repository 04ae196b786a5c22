use super::types::AppConfig;
use super::ConfigError;

pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    validate_usize_field(
        "app.max_input_length",
        config.app.max_input_length,
        1,
        10_000_000,
    )?;

    if config.server.host.trim().is_empty() {
        return Err(ConfigError::Invalid {
            field: "server.host",
            reason: "must not be empty".to_string(),
        });
    }

    validate_usize_field("retrieval.top_k", config.retrieval.top_k, 1, 1_000)?;
    validate_path_field("retrieval.index_path", &config.retrieval.index_path)?;
    validate_path_field("retrieval.chunks_path", &config.retrieval.chunks_path)?;

    validate_url_field("embedding.base_url", &config.embedding.base_url)?;
    validate_non_empty("embedding.model", &config.embedding.model)?;
    validate_u64_field(
        "embedding.timeout_secs",
        config.embedding.timeout_secs,
        1,
        3_600,
    )?;

    validate_url_field("generation.base_url", &config.generation.base_url)?;
    validate_non_empty("generation.model", &config.generation.model)?;
    validate_non_empty("generation.api_key_env", &config.generation.api_key_env)?;
    validate_u64_field(
        "generation.timeout_secs",
        config.generation.timeout_secs,
        1,
        3_600,
    )?;
    if !(0.0..=2.0).contains(&config.generation.temperature) {
        return Err(ConfigError::Invalid {
            field: "generation.temperature",
            reason: format!(
                "must be between 0.0 and 2.0 (got {})",
                config.generation.temperature
            ),
        });
    }

    validate_non_empty("assistant.name", &config.assistant.name)?;
    validate_non_empty("assistant.user_label", &config.assistant.user_label)?;
    validate_usize_field(
        "assistant.history_window",
        config.assistant.history_window,
        0,
        1_000,
    )?;

    Ok(())
}

fn validate_usize_field(
    field: &'static str,
    value: usize,
    min: usize,
    max: usize,
) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("must be between {} and {} (got {})", min, max, value),
        });
    }
    Ok(())
}

fn validate_u64_field(field: &'static str, value: u64, min: u64, max: u64) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("must be between {} and {} (got {})", min, max, value),
        });
    }
    Ok(())
}

fn validate_non_empty(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Invalid {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_path_field(field: &'static str, value: &std::path::Path) -> Result<(), ConfigError> {
    if value.as_os_str().is_empty() {
        return Err(ConfigError::Invalid {
            field,
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

fn validate_url_field(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("must be an http(s) URL (got '{}')", value),
        });
    }
    Ok(())
}
