//! Question behaviours.
//!
//! A behaviour is the strategy that decides how an attempt reacts to each
//! action. It never writes to the attempt: it annotates the pending step
//! and answers KEEP or DISCARD, and the driver does the rest.

mod deferred_feedback;
mod summary;

use serde::{Deserialize, Serialize};

use crate::attempt::QuestionAttempt;
use crate::error::BehaviourResult;
use crate::step::{PendingStep, Step};

pub use deferred_feedback::DeferredFeedbackBehaviour;
pub use summary::shorten_text;

/// Decision returned for a pending step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessOutcome {
    /// Drop the pending step; the attempt is unchanged.
    Discard,
    /// Commit the pending step with the state the behaviour set on it.
    Keep,
}

impl ProcessOutcome {
    /// True when the pending step should be committed.
    #[must_use]
    pub const fn is_keep(self) -> bool {
        matches!(self, Self::Keep)
    }
}

/// Behaviour configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviourConfig {
    /// Comments longer than this are cut in action summaries.
    pub comment_summary_max_chars: usize,
}

impl Default for BehaviourConfig {
    fn default() -> Self {
        Self {
            comment_summary_max_chars: 200,
        }
    }
}

impl BehaviourConfig {
    /// Parses a configuration from JSON; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns the parser error for malformed JSON.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Strategy that processes the actions of one kind of attempt.
///
/// # Contract
/// - `process_action` must leave the pending step with a defined state
///   whenever it returns `Keep`
/// - `summarise_action` is read-only
pub trait QuestionBehaviour: Send + Sync {
    /// Short stable identifier, stored on the attempt.
    fn name(&self) -> &'static str;

    /// Prepares the first step of a new attempt.
    fn init_first_step(&self, pending: &mut PendingStep);

    /// Decides what happens to a pending step.
    ///
    /// # Errors
    ///
    /// Returns `BehaviourError::InvalidState` if the attempt is in a state
    /// the behaviour cannot process actions in.
    fn process_action(
        &self,
        attempt: &QuestionAttempt,
        pending: &mut PendingStep,
    ) -> BehaviourResult<ProcessOutcome>;

    /// Describes a committed step for history views.
    fn summarise_action(&self, step: &Step) -> String;

    /// Lowest fraction this behaviour can award.
    fn min_fraction(&self) -> f64;

    /// Highest fraction this behaviour can award.
    fn max_fraction(&self) -> f64;

    /// Human-readable correct answer, if the question has one.
    fn right_answer_summary(&self) -> Option<String>;
}
