//! Application state wiring config, credentials and the pipeline together.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use secrecy::SecretString;

use cove_core::entity::{BoxEntityRecognizer, HeuristicRecognizer, LlmEntityRecognizer};
use cove_core::llm::box_provider::BoxLlmProvider;
use cove_core::memory::EntityMemory;
use cove_core::pipeline::{ChainOfVerification, CompletionSettings};
use cove_infra::config::{load_global_config, resolve_data_dir};
use cove_infra::credential::{resolve_api_key, validate_api_key};
use cove_infra::llm::create_provider;
use cove_types::config::{GlobalConfig, RecognizerKind};
use cove_types::error::ConfigError;
use cove_types::llm::ProviderType;

use crate::cli::credential::prompt_api_key;

/// Command-line values that take precedence over `config.toml`.
#[derive(Default)]
pub struct Overrides {
    pub provider: Option<ProviderType>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub api_key: Option<SecretString>,
}

/// Everything a command needs to run verification turns.
pub struct AppState {
    pub pipeline: ChainOfVerification,
    pub config: GlobalConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load config, resolve the credential, then build provider, recognizer
    /// and pipeline. Any failure here happens before the first model call.
    pub async fn init(overrides: Overrides) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let mut config = load_global_config(&data_dir).await;
        apply_overrides(&mut config, &overrides)?;

        let provider_type = config.llm.provider;
        let api_key = match resolve_api_key(provider_type, overrides.api_key) {
            Some(key) => key,
            None => prompt_api_key(provider_type)?,
        };
        let api_key = validate_api_key(provider_type, api_key)?;

        let provider = Arc::new(create_provider(&config.llm, api_key)?);
        let recognizer = build_recognizer(&config, Arc::clone(&provider))?;

        let memory = EntityMemory::new(recognizer).with_memory_key(config.memory.memory_key.clone());
        let settings = CompletionSettings {
            model: config.llm.model.clone(),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
        };
        let pipeline =
            ChainOfVerification::new(provider, memory, settings, config.pipeline.answer_mode)
                .context("failed to wire the verification pipeline")?;

        tracing::info!(
            provider = %config.llm.provider,
            model = %config.llm.model,
            recognizer = %config.memory.recognizer,
            answer_mode = %config.pipeline.answer_mode,
            data_dir = %data_dir.display(),
            "Application state initialized"
        );

        Ok(Self {
            pipeline,
            config,
            data_dir,
        })
    }
}

fn apply_overrides(config: &mut GlobalConfig, overrides: &Overrides) -> Result<(), ConfigError> {
    if let Some(provider) = overrides.provider {
        config.llm.provider = provider;
    }
    if let Some(model) = &overrides.model {
        config.llm.model = model.clone();
    }
    if let Some(temperature) = overrides.temperature {
        config.llm.temperature = temperature;
    }
    if !(0.0..=2.0).contains(&config.llm.temperature) {
        return Err(ConfigError::Invalid(format!(
            "temperature must be between 0.0 and 2.0, got {}",
            config.llm.temperature
        )));
    }
    Ok(())
}

fn build_recognizer(
    config: &GlobalConfig,
    provider: Arc<BoxLlmProvider>,
) -> anyhow::Result<BoxEntityRecognizer> {
    let recognizer = match config.memory.recognizer {
        RecognizerKind::Heuristic => BoxEntityRecognizer::new(
            HeuristicRecognizer::new().context("entity recognizer is unavailable")?,
        ),
        RecognizerKind::Llm => {
            BoxEntityRecognizer::new(LlmEntityRecognizer::new(provider, config.llm.model.clone()))
        }
    };
    Ok(recognizer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_config_values() {
        let mut config = GlobalConfig::default();
        let overrides = Overrides {
            provider: Some(ProviderType::Mistral),
            model: Some("mistral-small-latest".to_string()),
            temperature: Some(0.1),
            api_key: None,
        };
        apply_overrides(&mut config, &overrides).unwrap();
        assert_eq!(config.llm.provider, ProviderType::Mistral);
        assert_eq!(config.llm.model, "mistral-small-latest");
        assert!((config.llm.temperature - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn test_out_of_range_temperature_is_rejected() {
        let mut config = GlobalConfig::default();
        let overrides = Overrides {
            temperature: Some(3.5),
            ..Overrides::default()
        };
        assert!(apply_overrides(&mut config, &overrides).is_err());
    }
}
