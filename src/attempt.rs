//! Question attempts.
//!
//! A [`QuestionAttempt`] is the history of one student's work on one
//! question. Behaviours read it; only the driver appends to it.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::response::Response;
use crate::state::QuestionState;
use crate::step::Step;

/// Unique identifier for a question attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptId(Uuid);

impl AttemptId {
    /// Creates a new random attempt ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AttemptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One student's attempt at one question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAttempt {
    /// Unique identifier.
    pub id: AttemptId,

    /// The question being attempted.
    pub question_id: String,

    /// Name of the behaviour that drives this attempt.
    pub behaviour: String,

    /// Mark awarded for a fraction of 1.0.
    pub max_mark: f64,

    /// Latest summary of the student's response, for reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_summary: Option<String>,

    steps: Vec<Step>,
}

impl QuestionAttempt {
    /// Creates an attempt with no steps.
    #[must_use]
    pub fn new(
        id: AttemptId,
        question_id: impl Into<String>,
        behaviour: impl Into<String>,
        max_mark: f64,
    ) -> Self {
        Self {
            id,
            question_id: question_id.into(),
            behaviour: behaviour.into(),
            max_mark,
            response_summary: None,
            steps: Vec::new(),
        }
    }

    /// Current state: the state of the last step.
    #[must_use]
    pub fn state(&self) -> QuestionState {
        self.last_step()
            .map_or(QuestionState::NotStarted, |step| step.state)
    }

    /// True once the attempt has been finalized.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state().is_finished()
    }

    /// True while the response may still change.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.state().is_active()
    }

    /// Committed steps, oldest first.
    #[must_use]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Most recent committed step.
    #[must_use]
    pub fn last_step(&self) -> Option<&Step> {
        self.steps.last()
    }

    /// Response of the last committed step, or an empty response.
    #[must_use]
    pub fn last_response(&self) -> Response {
        self.last_step()
            .map(|step| step.response.clone())
            .unwrap_or_default()
    }

    /// Fraction of the most recent step that set one.
    #[must_use]
    pub fn fraction(&self) -> Option<f64> {
        self.steps.iter().rev().find_map(|step| step.fraction)
    }

    /// Mark earned so far, if the attempt has been graded.
    #[must_use]
    pub fn mark(&self) -> Option<f64> {
        self.fraction().map(|fraction| fraction * self.max_mark)
    }

    /// Side-channel variable from the most recent step that set it.
    #[must_use]
    pub fn last_qt_var(&self, name: &str) -> Option<&str> {
        self.steps.iter().rev().find_map(|step| step.qt_var(name))
    }

    pub(crate) fn push_step(&mut self, step: Step, response_summary: Option<String>) {
        self.steps.push(step);
        if let Some(summary) = response_summary {
            self.response_summary = Some(summary);
        }
    }
}
