//! Sequential chaining of LLM stages over a shared variable pool.
//!
//! Each step reads named variables from the pool and writes its output back
//! under its output key, where later steps can read it. Memory context is
//! loaded once before the first step and the exchange is saved once after
//! the last, around the whole chain rather than per step.
//!
//! Wiring is checked in [`SequentialChain::new`]: a step that reads a
//! variable nothing produces is rejected before any model call is made.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{Instrument, debug, info_span};

use cove_types::error::{ChainError, PipelineError};
use cove_types::llm::{CompletionRequest, Message};
use cove_types::pipeline::{Stage, VerificationAnswer};

use crate::llm::box_provider::BoxLlmProvider;
use crate::memory::ConversationMemory;

use super::questions::split_verification_questions;
use super::template::PromptTemplate;
use super::{CompletionSettings, Variables};

/// Send one rendered prompt to the provider inside a `gen_ai.stage` span.
async fn complete_prompt(
    provider: &BoxLlmProvider,
    settings: &CompletionSettings,
    stage: Stage,
    prompt: String,
    temperature: f64,
) -> Result<String, PipelineError> {
    let request = CompletionRequest {
        model: settings.model.clone(),
        messages: vec![Message::user(prompt)],
        system: None,
        max_tokens: settings.max_tokens,
        temperature: Some(temperature),
        stop_sequences: None,
    };

    let span = info_span!(
        "gen_ai.stage",
        gen_ai.system = provider.name(),
        gen_ai.request.model = %request.model,
        gen_ai.request.max_tokens = request.max_tokens,
        gen_ai.request.temperature = temperature,
        cove.stage = %stage,
    );

    let response = provider
        .complete(&request)
        .instrument(span)
        .await
        .map_err(|source| PipelineError::Llm { stage, source })?;

    debug!(
        %stage,
        input_tokens = response.usage.input_tokens,
        output_tokens = response.usage.output_tokens,
        "Stage completed"
    );
    Ok(response.content)
}

/// One template-fill-then-complete stage.
#[derive(Debug, Clone)]
pub struct LlmChain {
    stage: Stage,
    prompt: PromptTemplate,
    /// Used instead of `prompt` when the memory variable is non-empty.
    context_prompt: Option<(PromptTemplate, String)>,
    /// Template variable -> pool key, for variables not named like their source.
    bindings: Vec<(String, String)>,
    output_key: String,
    temperature: Option<f64>,
}

impl LlmChain {
    pub fn new(stage: Stage, prompt: PromptTemplate, output_key: impl Into<String>) -> Self {
        Self {
            stage,
            prompt,
            context_prompt: None,
            bindings: Vec::new(),
            output_key: output_key.into(),
            temperature: None,
        }
    }

    /// Read template variable `variable` from pool key `source`.
    pub fn bind(mut self, variable: impl Into<String>, source: impl Into<String>) -> Self {
        self.bindings.push((variable.into(), source.into()));
        self
    }

    /// Prefer `prompt` whenever the pool holds non-empty `memory_key`.
    pub fn with_context_prompt(mut self, prompt: PromptTemplate, memory_key: impl Into<String>) -> Self {
        self.context_prompt = Some((prompt, memory_key.into()));
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    fn source_key<'a>(&'a self, variable: &'a str) -> &'a str {
        self.bindings
            .iter()
            .find(|(v, _)| v == variable)
            .map(|(_, source)| source.as_str())
            .unwrap_or(variable)
    }

    /// Pool keys this step reads.
    fn required_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .prompt
            .input_variables()
            .iter()
            .map(|v| self.source_key(v))
            .collect();
        if let Some((prompt, _)) = &self.context_prompt {
            keys.extend(prompt.input_variables().iter().map(|v| self.source_key(v)));
        }
        keys
    }

    /// Template variables resolved from the pool through the bindings.
    fn resolve(&self, prompt: &PromptTemplate, pool: &Variables) -> Variables {
        prompt
            .input_variables()
            .iter()
            .filter_map(|v| {
                pool.get(self.source_key(v))
                    .map(|value| (v.clone(), value.clone()))
            })
            .collect()
    }

    fn select_prompt(&self, pool: &Variables) -> &PromptTemplate {
        match &self.context_prompt {
            Some((prompt, memory_key))
                if pool.get(memory_key).is_some_and(|ctx| !ctx.is_empty()) =>
            {
                prompt
            }
            _ => &self.prompt,
        }
    }

    async fn run(
        &self,
        provider: &BoxLlmProvider,
        settings: &CompletionSettings,
        pool: &Variables,
    ) -> Result<String, PipelineError> {
        let prompt = self.select_prompt(pool);
        let rendered = prompt.format(&self.resolve(prompt, pool))?;
        let temperature = self.temperature.unwrap_or(settings.temperature);
        complete_prompt(provider, settings, self.stage, rendered, temperature).await
    }
}

/// Answers each planned verification question with its own call.
///
/// The plan is split into discrete questions and every question is answered
/// without seeing the draft or the other questions. The stage output is the
/// `Verification Question: q\n\nAnswer: a` blocks joined by blank lines.
#[derive(Debug, Clone)]
pub struct FactoredAnswerChain {
    prompt: PromptTemplate,
    question_variable: String,
    source_key: String,
    output_key: String,
}

impl FactoredAnswerChain {
    /// `prompt` must have exactly one input variable: the question.
    pub fn new(
        prompt: PromptTemplate,
        source_key: impl Into<String>,
        output_key: impl Into<String>,
    ) -> Result<Self, ChainError> {
        let question_variable = match prompt.input_variables() {
            [only] => only.clone(),
            _ => {
                return Err(ChainError::UnsatisfiedVariable {
                    step: Stage::Answer.to_string(),
                    variable: prompt.input_variables().join(", "),
                });
            }
        };
        Ok(Self {
            prompt,
            question_variable,
            source_key: source_key.into(),
            output_key: output_key.into(),
        })
    }

    async fn run(
        &self,
        provider: &BoxLlmProvider,
        settings: &CompletionSettings,
        pool: &Variables,
    ) -> Result<StepOutput, PipelineError> {
        let plan = pool
            .get(&self.source_key)
            .ok_or_else(|| ChainError::MissingInput(self.source_key.clone()))?;
        let questions = split_verification_questions(plan);
        debug!(count = questions.len(), "Answering verification questions");

        let mut verifications = Vec::with_capacity(questions.len());
        for question in questions {
            let mut vars = Variables::new();
            vars.insert(self.question_variable.clone(), question.clone());
            let rendered = self.prompt.format(&vars)?;
            let answer =
                complete_prompt(provider, settings, Stage::Answer, rendered, settings.temperature)
                    .await?;
            verifications.push(VerificationAnswer {
                question,
                answer: answer.trim().to_string(),
            });
        }

        let text = verifications
            .iter()
            .map(|v| format!("Verification Question: {}\n\nAnswer: {}", v.question, v.answer))
            .collect::<Vec<_>>()
            .join("\n\n");

        Ok(StepOutput {
            text,
            verifications,
        })
    }
}

/// A step in a [`SequentialChain`].
#[derive(Debug, Clone)]
pub enum Step {
    Llm(LlmChain),
    FactoredAnswer(FactoredAnswerChain),
}

/// What a step hands back to the chain.
#[derive(Debug, Clone, Default)]
pub struct StepOutput {
    pub text: String,
    pub verifications: Vec<VerificationAnswer>,
}

impl Step {
    pub fn stage(&self) -> Stage {
        match self {
            Step::Llm(chain) => chain.stage,
            Step::FactoredAnswer(_) => Stage::Answer,
        }
    }

    pub fn output_key(&self) -> &str {
        match self {
            Step::Llm(chain) => &chain.output_key,
            Step::FactoredAnswer(chain) => &chain.output_key,
        }
    }

    fn required_keys(&self) -> Vec<&str> {
        match self {
            Step::Llm(chain) => chain.required_keys(),
            Step::FactoredAnswer(chain) => vec![chain.source_key.as_str()],
        }
    }

    async fn run(
        &self,
        provider: &BoxLlmProvider,
        settings: &CompletionSettings,
        pool: &Variables,
    ) -> Result<StepOutput, PipelineError> {
        match self {
            Step::Llm(chain) => Ok(StepOutput {
                text: chain.run(provider, settings, pool).await?,
                verifications: Vec::new(),
            }),
            Step::FactoredAnswer(chain) => chain.run(provider, settings, pool).await,
        }
    }
}

impl From<LlmChain> for Step {
    fn from(chain: LlmChain) -> Self {
        Step::Llm(chain)
    }
}

impl From<FactoredAnswerChain> for Step {
    fn from(chain: FactoredAnswerChain) -> Self {
        Step::FactoredAnswer(chain)
    }
}

/// Everything a chain run produced.
#[derive(Debug, Clone, Default)]
pub struct ChainOutput {
    /// Inputs, memory context and every step output, by key.
    pub variables: Variables,
    pub verifications: Vec<VerificationAnswer>,
    /// Output of the last step.
    pub output: String,
}

impl ChainOutput {
    pub fn get(&self, key: &str) -> &str {
        self.variables.get(key).map(String::as_str).unwrap_or_default()
    }
}

/// Runs steps strictly in order, threading outputs through a shared pool.
pub struct SequentialChain<M> {
    steps: Vec<Step>,
    input_keys: Vec<String>,
    memory: M,
    provider: Arc<BoxLlmProvider>,
    settings: CompletionSettings,
}

impl<M: ConversationMemory> SequentialChain<M> {
    /// Build a chain, checking that every variable a step reads is produced
    /// by the inputs, the memory, or an earlier step.
    ///
    /// The first input key is the primary input: memory is loaded from it
    /// and saved with it.
    pub fn new(
        steps: Vec<Step>,
        input_keys: &[&str],
        memory: M,
        provider: Arc<BoxLlmProvider>,
        settings: CompletionSettings,
    ) -> Result<Self, ChainError> {
        if steps.is_empty() {
            return Err(ChainError::Empty);
        }
        if input_keys.is_empty() {
            return Err(ChainError::NoInputs);
        }

        let mut available: HashSet<String> = input_keys.iter().map(|k| k.to_string()).collect();
        available.insert(memory.memory_key().to_string());

        for step in &steps {
            if let Some(missing) = step
                .required_keys()
                .into_iter()
                .find(|key| !available.contains(*key))
            {
                return Err(ChainError::UnsatisfiedVariable {
                    step: step.stage().to_string(),
                    variable: missing.to_string(),
                });
            }
            if !available.insert(step.output_key().to_string()) {
                return Err(ChainError::DuplicateOutput(step.output_key().to_string()));
            }
        }

        Ok(Self {
            steps,
            input_keys: input_keys.iter().map(|k| k.to_string()).collect(),
            memory,
            provider,
            settings,
        })
    }

    pub fn memory(&self) -> &M {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut M {
        &mut self.memory
    }

    pub fn provider(&self) -> &BoxLlmProvider {
        &self.provider
    }

    pub fn settings(&self) -> &CompletionSettings {
        &self.settings
    }

    /// Load memory, run every step, then save `(primary input, final output)`.
    ///
    /// A failing step aborts the run; memory is only saved after the last
    /// step succeeds.
    pub async fn run(&mut self, inputs: &Variables) -> Result<ChainOutput, PipelineError> {
        for key in &self.input_keys {
            if !inputs.contains_key(key) {
                return Err(ChainError::MissingInput(key.clone()).into());
            }
        }
        let primary = inputs
            .get(&self.input_keys[0])
            .cloned()
            .unwrap_or_default();

        let context = self.memory.load(&primary).await?;
        let mut pool = inputs.clone();
        pool.insert(self.memory.memory_key().to_string(), context);

        let mut verifications = Vec::new();
        let mut output = String::new();
        for step in &self.steps {
            let result = step.run(&self.provider, &self.settings, &pool).await?;
            pool.insert(step.output_key().to_string(), result.text.clone());
            verifications.extend(result.verifications);
            output = result.text;
        }

        self.memory.save(&primary, &output).await?;

        Ok(ChainOutput {
            variables: pool,
            verifications,
            output,
        })
    }
}
