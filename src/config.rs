use crate::cli_args::Cli;
use crate::error::{AdvisorError, AdvisorResult};
use crate::git;
use crate::llm::prompt_builder::AdviceMode;
use crate::llm::{AdviceOptions, Provider, RetryPolicy};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Final resolved configuration for commitmentor.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: Provider,
    /// Left unvalidated here; `credential()` is the one place that checks it.
    pub api_key: Option<String>,
    pub model: String,
    pub api_base_url: String,
    pub template: Option<String>,
    pub mode: AdviceMode,
    pub message_path: Option<PathBuf>,
    pub context_path: Option<PathBuf>,
    pub preferences: Option<String>,
    pub apply: bool,
    pub options: AdviceOptions,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Config {
    /// Build the final config from CLI flags, environment, TOML file, and defaults.
    ///
    /// Precedence:
    ///   1. CLI flags
    ///   2. Env vars (`COHERE_API_KEY` / `OPENAI_API_KEY`, `COMMITMENTOR_MODEL`)
    ///   3. TOML `~/.config/commitmentor.toml`
    ///   4. Hardcoded defaults
    pub fn from_sources(cli: &Cli) -> Self {
        let file_cfg = load_file_config().unwrap_or_default();
        Self::resolve(cli, file_cfg, |key| env::var(key).ok())
    }

    pub fn resolve<E>(cli: &Cli, file_cfg: FileConfig, env: E) -> Self
    where
        E: Fn(&str) -> Option<String>,
    {
        let provider = cli.provider.or(file_cfg.provider).unwrap_or_default();

        let api_key = cli
            .api_key
            .clone()
            .or_else(|| env(provider.credential_var()))
            .or(file_cfg.api_key);

        let model = cli
            .model
            .clone()
            .or_else(|| env("COMMITMENTOR_MODEL"))
            .or(file_cfg.model)
            .unwrap_or_else(|| provider.default_model().to_string());

        let api_base_url = cli
            .api_base_url
            .clone()
            .or(file_cfg.api_base_url)
            .unwrap_or_else(|| provider.default_base_url().to_string());

        let context_path = if cli.no_context {
            None
        } else {
            cli.context.clone().or(file_cfg.context_path)
        };

        let defaults = RetryPolicy::default();
        let retry = RetryPolicy {
            max_retries: cli
                .retries
                .or(file_cfg.retries)
                .unwrap_or(defaults.max_retries),
            initial_backoff: file_cfg
                .initial_backoff_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.initial_backoff),
            max_elapsed: file_cfg
                .max_elapsed_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.max_elapsed),
        };

        Config {
            provider,
            api_key,
            model,
            api_base_url,
            template: cli.template.clone().or(file_cfg.template),
            mode: cli.mode.or(file_cfg.mode).unwrap_or_default(),
            message_path: cli.message_file.clone(),
            context_path,
            preferences: cli.preferences.clone().or(file_cfg.preferences),
            apply: cli.apply,
            options: AdviceOptions {
                max_tokens: cli.max_tokens.or(file_cfg.max_tokens),
                temperature: cli.temperature.or(file_cfg.temperature),
            },
            timeout: Duration::from_secs(
                cli.timeout
                    .or(file_cfg.timeout_secs)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            retry,
        }
    }

    /// The API key, or a configuration error when it is missing or blank.
    pub fn credential(&self) -> AdvisorResult<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(AdvisorError::Configuration(format!(
                "no API key for {}: set {} or pass --api-key",
                self.provider.label(),
                self.provider.credential_var()
            ))),
        }
    }

    pub fn commit_message_path(&self) -> PathBuf {
        self.message_path
            .clone()
            .unwrap_or_else(git::default_commit_message_path)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub provider: Option<Provider>,
    /// Default model to use when not provided via CLI or env.
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub template: Option<String>,
    pub mode: Option<AdviceMode>,
    pub context_path: Option<PathBuf>,
    pub preferences: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub timeout_secs: Option<u64>,
    pub retries: Option<u32>,
    pub initial_backoff_ms: Option<u64>,
    pub max_elapsed_secs: Option<u64>,
}

/// Return `~/.config/commitmentor.toml`
fn config_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(home.join(".config").join("commitmentor.toml"))
}

fn load_file_config() -> Option<FileConfig> {
    let path = config_path()?;
    if !path.exists() {
        return None;
    }

    let data = match fs::read_to_string(&path) {
        Ok(data) => data,
        Err(e) => {
            log::warn!("Ignoring unreadable config {}: {e}", path.display());
            return None;
        }
    };

    match toml::from_str::<FileConfig>(&data) {
        Ok(cfg) => {
            log::debug!("Loaded config from {}", path.display());
            Some(cfg)
        }
        Err(e) => {
            log::warn!("Ignoring malformed config {}: {e}", path.display());
            None
        }
    }
}
