//! Chain-of-Verification pipeline types.
//!
//! A [`PipelineTurn`] is the full record of one question passing through the
//! four stages. It only lives for one invocation; the entity memory is the
//! sole state that outlives it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// One of the four verification stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Draft,
    Plan,
    Answer,
    Finalize,
}

impl Stage {
    /// All stages in the order they run.
    pub const ALL: [Stage; 4] = [Stage::Draft, Stage::Plan, Stage::Answer, Stage::Finalize];

    /// Key under which the stage's output is placed in the chain's variable pool.
    pub fn output_key(&self) -> &'static str {
        match self {
            Stage::Draft => "output_initial_response",
            Stage::Plan => "output_verification_questions",
            Stage::Answer => "output_verification_responses",
            Stage::Finalize => "output_final_response",
        }
    }

    /// Human-readable heading used when printing intermediate stages.
    pub fn title(&self) -> &'static str {
        match self {
            Stage::Draft => "Initial Response",
            Stage::Plan => "Verification Questions",
            Stage::Answer => "Verification Answers",
            Stage::Finalize => "Final Verified Response",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Draft => write!(f, "draft"),
            Stage::Plan => write!(f, "plan"),
            Stage::Answer => write!(f, "answer"),
            Stage::Finalize => write!(f, "finalize"),
        }
    }
}

/// How the answer stage treats the planned verification questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    /// Split the plan into discrete questions and answer each with its own call.
    #[default]
    Factored,
    /// Answer the whole plan in a single call that restates each question.
    Joint,
}

impl fmt::Display for AnswerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerMode::Factored => write!(f, "factored"),
            AnswerMode::Joint => write!(f, "joint"),
        }
    }
}

impl FromStr for AnswerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "factored" => Ok(AnswerMode::Factored),
            "joint" => Ok(AnswerMode::Joint),
            other => Err(format!("invalid answer mode: '{other}'")),
        }
    }
}

/// A single verification question and the model's independent answer to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationAnswer {
    pub question: String,
    pub answer: String,
}

/// Record of one complete pipeline invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineTurn {
    pub id: Uuid,
    pub question: String,
    /// Prior entity context surfaced from memory before the draft stage.
    pub memory_context: String,
    pub initial_response: String,
    pub verification_questions: String,
    /// Per-question answers; only populated in [`AnswerMode::Factored`].
    pub verifications: Vec<VerificationAnswer>,
    pub verification_answers: String,
    pub final_response: String,
    pub started_at: DateTime<Utc>,
}

impl PipelineTurn {
    /// Output text of the given stage.
    pub fn stage_output(&self, stage: Stage) -> &str {
        match stage {
            Stage::Draft => &self.initial_response,
            Stage::Plan => &self.verification_questions,
            Stage::Answer => &self.verification_answers,
            Stage::Finalize => &self.final_response,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_output_keys_are_distinct() {
        let keys: std::collections::HashSet<_> = Stage::ALL.iter().map(|s| s.output_key()).collect();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(Stage::ALL[0], Stage::Draft);
        assert_eq!(Stage::ALL[3], Stage::Finalize);
    }

    #[test]
    fn test_answer_mode_roundtrip() {
        for mode in [AnswerMode::Factored, AnswerMode::Joint] {
            let parsed: AnswerMode = mode.to_string().parse().unwrap();
            assert_eq!(parsed, mode);
        }
        assert_eq!(AnswerMode::default(), AnswerMode::Factored);
    }

    #[test]
    fn test_stage_output_lookup() {
        let turn = PipelineTurn {
            id: Uuid::now_v7(),
            question: "q".to_string(),
            memory_context: String::new(),
            initial_response: "draft".to_string(),
            verification_questions: "plan".to_string(),
            verifications: vec![],
            verification_answers: "answers".to_string(),
            final_response: "final".to_string(),
            started_at: Utc::now(),
        };
        assert_eq!(turn.stage_output(Stage::Draft), "draft");
        assert_eq!(turn.stage_output(Stage::Plan), "plan");
        assert_eq!(turn.stage_output(Stage::Answer), "answers");
        assert_eq!(turn.stage_output(Stage::Finalize), "final");
    }
}
