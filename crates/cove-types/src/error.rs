use thiserror::Error;

use crate::entity::EntityError;
use crate::llm::LlmError;
use crate::pipeline::Stage;

/// Errors from parsing or rendering a prompt template.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("missing value for template variable '{0}'")]
    MissingVariable(String),

    #[error("template placeholder '{0}' is not a declared input variable")]
    UndeclaredVariable(String),

    #[error("declared input variable '{0}' does not appear in the template")]
    UnusedVariable(String),

    #[error("unbalanced brace at byte {0}")]
    UnbalancedBrace(usize),
}

/// Errors detected while wiring stages into a sequential chain.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("chain must contain at least one step")]
    Empty,

    #[error("chain must declare at least one input variable")]
    NoInputs,

    #[error("step '{step}' needs variable '{variable}' which no input or earlier step produces")]
    UnsatisfiedVariable { step: String, variable: String },

    #[error("output key '{0}' is produced more than once")]
    DuplicateOutput(String),

    #[error("missing chain input '{0}'")]
    MissingInput(String),
}

/// Errors from running the verification pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{stage} stage failed: {source}")]
    Llm {
        stage: Stage,
        #[source]
        source: LlmError,
    },

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Chain(#[from] ChainError),
}

/// Errors resolving the model API credential.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("no API key provided for provider '{provider}' (set {env_var} or enter it when prompted)")]
    Missing { provider: String, env_var: String },

    #[error("credential prompt failed: {0}")]
    Prompt(String),
}

/// Errors from configuration that cannot fall back to defaults.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("provider '{0}' requires llm.base_url to be set")]
    MissingBaseUrl(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_error_display() {
        let err = TemplateError::MissingVariable("question".to_string());
        assert_eq!(err.to_string(), "missing value for template variable 'question'");
    }

    #[test]
    fn test_pipeline_error_names_stage() {
        let err = PipelineError::Llm {
            stage: Stage::Plan,
            source: LlmError::AuthenticationFailed,
        };
        assert_eq!(err.to_string(), "plan stage failed: authentication failed");
    }

    #[test]
    fn test_chain_error_display() {
        let err = ChainError::UnsatisfiedVariable {
            step: "answer".to_string(),
            variable: "answer".to_string(),
        };
        assert!(err.to_string().contains("no input or earlier step produces"));
    }

    #[test]
    fn test_credential_error_mentions_env_var() {
        let err = CredentialError::Missing {
            provider: "openai".to_string(),
            env_var: "OPENAI_API_KEY".to_string(),
        };
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }
}
