use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::paths::AppPaths;
use super::types::{ApiKey, AppConfig};
use super::validation::validate_config;
use super::ConfigError;

#[derive(Clone)]
pub struct ConfigService {
    paths: Arc<AppPaths>,
}

impl ConfigService {
    pub fn new(paths: Arc<AppPaths>) -> Self {
        Self { paths }
    }

    pub fn config_path(&self) -> PathBuf {
        if let Ok(path) = env::var("NOVA_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        self.paths.project_root.join("config.yml")
    }

    /// Loads `config.yml`, applies environment overrides and validates the result.
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        self.load_with_env(&self.config_path(), |key| env::var(key).ok())
    }

    pub fn load_with_env<F>(&self, path: &Path, lookup: F) -> Result<AppConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = load_yaml_file(path)?;
        apply_env_overrides(&mut config, lookup)?;
        validate_config(&config)?;
        Ok(config)
    }
}

fn load_yaml_file(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        tracing::info!("No config file at {}; using defaults", path.display());
        return Ok(AppConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    if contents.trim().is_empty() {
        return Ok(AppConfig::default());
    }

    serde_yaml::from_str::<AppConfig>(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = lookup("PORT") {
        config.server.port = port.trim().parse::<u16>().map_err(|_| ConfigError::EnvOverride {
            var: "PORT".to_string(),
            value: port.clone(),
        })?;
    }

    if let Some(host) = lookup("NOVA_HOST") {
        config.server.host = host;
    }

    config.generation.api_key = lookup(&config.generation.api_key_env)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(ApiKey::new);

    Ok(())
}
