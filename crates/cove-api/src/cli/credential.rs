//! Hidden API-key prompt, used when neither the flag nor the environment
//! provides a key.

use anyhow::Result;
use console::style;
use dialoguer::Password;
use secrecy::SecretString;

use cove_types::error::CredentialError;
use cove_types::llm::ProviderType;

/// Ask for the provider's API key without echoing it.
pub fn prompt_api_key(provider: ProviderType) -> Result<SecretString> {
    let value = Password::new()
        .with_prompt(format!(
            "{} API key ({} not set)",
            style(provider).bold(),
            provider.api_key_env()
        ))
        .allow_empty_password(true)
        .interact()
        .map_err(|e| CredentialError::Prompt(e.to_string()))?;

    Ok(SecretString::from(value))
}
