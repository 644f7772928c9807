//! LLM provider implementations.
//!
//! Contains concrete implementations of the [`LlmProvider`] trait defined in
//! `cove-core`, and a provider factory ([`create_provider`]) that constructs
//! the right provider from the `[llm]` config section.
//!
//! [`LlmProvider`]: cove_core::llm::provider::LlmProvider

pub mod anthropic;
pub mod openai_compat;

use secrecy::SecretString;

use cove_core::llm::box_provider::BoxLlmProvider;
use cove_types::config::LlmConfig;
use cove_types::error::ConfigError;
use cove_types::llm::ProviderType;

use self::anthropic::AnthropicProvider;
use self::openai_compat::OpenAiCompatibleProvider;
use self::openai_compat::config as oai;

/// Create a [`BoxLlmProvider`] from the `[llm]` config section.
///
/// `base_url`, when set, overrides the built-in endpoint of every provider.
///
/// # Errors
///
/// - [`ConfigError::MissingBaseUrl`] for `openai_compatible` without a base URL
/// - [`ConfigError::Invalid`] if the HTTP client cannot be constructed
pub fn create_provider(
    config: &LlmConfig,
    api_key: SecretString,
) -> Result<BoxLlmProvider, ConfigError> {
    let model = config.model.as_str();
    let base_url = config.base_url.as_deref();

    let provider = match config.provider {
        ProviderType::Anthropic => {
            let mut provider = AnthropicProvider::new(api_key, model)
                .map_err(|e| ConfigError::Invalid(e.to_string()))?;
            if let Some(url) = base_url {
                provider = provider.with_base_url(url);
            }
            BoxLlmProvider::new(provider)
        }
        ProviderType::OpenAiCompatible => {
            let url = base_url
                .ok_or_else(|| ConfigError::MissingBaseUrl(config.provider.to_string()))?;
            BoxLlmProvider::new(OpenAiCompatibleProvider::new(oai::custom(api_key, model, url)))
        }
        ProviderType::OpenAi | ProviderType::Gemini | ProviderType::Mistral => {
            let mut oai_config = match config.provider {
                ProviderType::Gemini => oai::gemini_defaults(api_key, model),
                ProviderType::Mistral => oai::mistral_defaults(api_key, model),
                _ => oai::openai_defaults(api_key, model),
            };
            if let Some(url) = base_url {
                oai_config.base_url = url.trim_end_matches('/').to_string();
            }
            BoxLlmProvider::new(OpenAiCompatibleProvider::new(oai_config))
        }
    };

    tracing::debug!(provider = provider.name(), model, "Created LLM provider");
    Ok(provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> SecretString {
        SecretString::from("test-key".to_string())
    }

    fn config(provider: ProviderType, base_url: Option<&str>) -> LlmConfig {
        LlmConfig {
            provider,
            base_url: base_url.map(str::to_string),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_create_each_provider() {
        let cases = [
            (ProviderType::OpenAi, "openai"),
            (ProviderType::Gemini, "gemini"),
            (ProviderType::Mistral, "mistral"),
            (ProviderType::Anthropic, "anthropic"),
        ];
        for (provider_type, name) in cases {
            let provider = create_provider(&config(provider_type, None), key()).unwrap();
            assert_eq!(provider.name(), name);
        }
    }

    #[test]
    fn test_openai_compatible_requires_base_url() {
        let result = create_provider(&config(ProviderType::OpenAiCompatible, None), key());
        assert!(matches!(result, Err(ConfigError::MissingBaseUrl(_))));

        let provider = create_provider(
            &config(ProviderType::OpenAiCompatible, Some("http://localhost:11434/v1")),
            key(),
        )
        .unwrap();
        assert_eq!(provider.name(), "openai_compatible");
    }
}
