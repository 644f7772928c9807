//! Stage prompt templates.
//!
//! Template variables name what they hold; `LlmChain::bind` maps them onto
//! the output keys of earlier stages.

use cove_types::error::TemplateError;

use super::template::PromptTemplate;

pub const QUESTION_KEY: &str = "question";

/// Stage 1, without prior entity context.
pub const DRAFT_TEMPLATE: &str = "Here is the {question}\n\nInitial Response:";

/// Stage 2.
pub const PLAN_TEMPLATE: &str = "{initial_response}\n\nPlan Verification Questions:";

/// Stage 3, factored: filled once per planned question.
pub const ANSWER_TEMPLATE: &str = "Verification Question: {verification_question}\n\nAnswer:";

/// Stage 3, joint: one call over the whole plan.
pub const JOINT_ANSWER_TEMPLATE: &str = "{verification_questions}\n\nAnswer each verification question above. For each one, restate it as \"Verification Question: ...\" followed by \"Answer: ...\".";

/// Stage 4.
pub const FINALIZE_TEMPLATE: &str = "{verification_answers}\n\nFinal Verified Response:";

pub fn draft() -> Result<PromptTemplate, TemplateError> {
    PromptTemplate::new(DRAFT_TEMPLATE, &[QUESTION_KEY])
}

/// Stage 1 with the memory context, exposed under `memory_key`.
pub fn draft_with_context(memory_key: &str) -> Result<PromptTemplate, TemplateError> {
    let template = format!("Relevant context:\n{{{memory_key}}}\n\n{DRAFT_TEMPLATE}");
    PromptTemplate::new(&template, &[memory_key, QUESTION_KEY])
}

pub fn plan() -> Result<PromptTemplate, TemplateError> {
    PromptTemplate::new(PLAN_TEMPLATE, &["initial_response"])
}

pub fn answer() -> Result<PromptTemplate, TemplateError> {
    PromptTemplate::new(ANSWER_TEMPLATE, &["verification_question"])
}

pub fn joint_answer() -> Result<PromptTemplate, TemplateError> {
    PromptTemplate::new(JOINT_ANSWER_TEMPLATE, &["verification_questions"])
}

pub fn finalize() -> Result<PromptTemplate, TemplateError> {
    PromptTemplate::new(FINALIZE_TEMPLATE, &["verification_answers"])
}
