//! API-key resolution.
//!
//! An explicit key (the `--api-key` flag) wins, then the provider's
//! environment variable, then the generic `COVE_API_KEY`. Interactive entry
//! is the binary's job; this module only validates what it is given.

use secrecy::{ExposeSecret, SecretString};

use cove_types::error::CredentialError;
use cove_types::llm::ProviderType;

/// Fallback variable consulted for every provider.
pub const GENERIC_API_KEY_ENV: &str = "COVE_API_KEY";

/// Look up a key for `provider` without prompting.
pub fn resolve_api_key(provider: ProviderType, explicit: Option<SecretString>) -> Option<SecretString> {
    resolve_api_key_with(provider, explicit, |name| std::env::var(name).ok())
}

/// [`resolve_api_key`] with an injectable environment lookup.
pub fn resolve_api_key_with(
    provider: ProviderType,
    explicit: Option<SecretString>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    if let Some(key) = explicit.filter(|k| !k.expose_secret().trim().is_empty()) {
        return Some(key);
    }

    [provider.api_key_env(), GENERIC_API_KEY_ENV]
        .into_iter()
        .find_map(|name| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .inspect(|_| tracing::debug!(env_var = name, "Using API key from environment"))
        })
        .map(SecretString::from)
}

/// Reject blank keys before any model call is attempted.
pub fn validate_api_key(
    provider: ProviderType,
    key: SecretString,
) -> Result<SecretString, CredentialError> {
    let trimmed = key.expose_secret().trim();
    if trimmed.is_empty() {
        return Err(CredentialError::Missing {
            provider: provider.to_string(),
            env_var: provider.api_key_env().to_string(),
        });
    }
    if trimmed.len() == key.expose_secret().len() {
        return Ok(key);
    }
    Ok(SecretString::from(trimmed.to_string()))
}
