//! The four-stage Chain-of-Verification pipeline.
//!
//! draft -> plan verification questions -> answer them -> final verified
//! response, with entity memory loaded from the question before the draft
//! and saved after the final stage.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use cove_types::error::{ChainError, PipelineError};
use cove_types::pipeline::{AnswerMode, PipelineTurn, Stage};

use crate::llm::box_provider::BoxLlmProvider;
use crate::memory::{ConversationMemory, EntityMemory};

use super::chain::{FactoredAnswerChain, LlmChain, SequentialChain, Step};
use super::prompts::{self, QUESTION_KEY};
use super::{CompletionSettings, Variables};

pub struct ChainOfVerification {
    chain: SequentialChain<EntityMemory>,
    answer_mode: AnswerMode,
}

impl ChainOfVerification {
    /// Wire the four stages around `memory`.
    ///
    /// # Errors
    ///
    /// Fails if the memory key collides with the question or a stage output.
    pub fn new(
        provider: Arc<BoxLlmProvider>,
        memory: EntityMemory,
        settings: CompletionSettings,
        answer_mode: AnswerMode,
    ) -> Result<Self, PipelineError> {
        let memory_key = ConversationMemory::memory_key(&memory).to_string();
        if memory_key == QUESTION_KEY {
            return Err(ChainError::DuplicateOutput(memory_key).into());
        }

        let draft = LlmChain::new(Stage::Draft, prompts::draft()?, Stage::Draft.output_key())
            .with_context_prompt(prompts::draft_with_context(&memory_key)?, memory_key.as_str());

        let plan = LlmChain::new(Stage::Plan, prompts::plan()?, Stage::Plan.output_key())
            .bind("initial_response", Stage::Draft.output_key());

        let answer: Step = match answer_mode {
            AnswerMode::Factored => FactoredAnswerChain::new(
                prompts::answer()?,
                Stage::Plan.output_key(),
                Stage::Answer.output_key(),
            )?
            .into(),
            AnswerMode::Joint => LlmChain::new(
                Stage::Answer,
                prompts::joint_answer()?,
                Stage::Answer.output_key(),
            )
            .bind("verification_questions", Stage::Plan.output_key())
            .into(),
        };

        let finalize = LlmChain::new(
            Stage::Finalize,
            prompts::finalize()?,
            Stage::Finalize.output_key(),
        )
        .bind("verification_answers", Stage::Answer.output_key());

        let chain = SequentialChain::new(
            vec![draft.into(), plan.into(), answer, finalize.into()],
            &[QUESTION_KEY],
            memory,
            provider,
            settings,
        )?;

        Ok(Self { chain, answer_mode })
    }

    /// Run one turn for `question`.
    ///
    /// Any stage failure aborts the turn and leaves the memory untouched.
    pub async fn run(&mut self, question: &str) -> Result<PipelineTurn, PipelineError> {
        let id = Uuid::now_v7();
        let started_at = Utc::now();
        info!(
            turn_id = %id,
            provider = self.chain.provider().name(),
            answer_mode = %self.answer_mode,
            "Starting verification turn"
        );

        let mut inputs = Variables::new();
        inputs.insert(QUESTION_KEY.to_string(), question.to_string());
        let output = self.chain.run(&inputs).await?;

        let memory_key = ConversationMemory::memory_key(self.chain.memory());
        let turn = PipelineTurn {
            id,
            question: question.to_string(),
            memory_context: output.get(memory_key).to_string(),
            initial_response: output.get(Stage::Draft.output_key()).to_string(),
            verification_questions: output.get(Stage::Plan.output_key()).to_string(),
            verification_answers: output.get(Stage::Answer.output_key()).to_string(),
            verifications: output.verifications,
            final_response: output.output,
            started_at,
        };

        info!(
            turn_id = %id,
            verifications = turn.verifications.len(),
            remembered_entities = self.chain.memory().len(),
            "Verification turn completed"
        );
        Ok(turn)
    }

    pub fn memory(&self) -> &EntityMemory {
        self.chain.memory()
    }

    pub fn clear_memory(&mut self) {
        self.chain.memory_mut().clear();
    }

    pub fn answer_mode(&self) -> AnswerMode {
        self.answer_mode
    }
}
