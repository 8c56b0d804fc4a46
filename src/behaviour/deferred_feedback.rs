//! Deferred feedback with grading side-channel variables.
//!
//! Students save responses freely until the attempt is finished; only then
//! is the last saved response graded. Question types may return extra
//! values from grading (test outcomes, diagnostics) and this behaviour
//! stores them on the finishing step so they survive with the attempt.
//!
//! Unlike plain deferred feedback, a saved response that is gradable but
//! not complete moves the attempt to `Invalid` rather than `Todo`, so the
//! student is warned before submitting.

use std::sync::Arc;

use super::summary::shorten_text;
use super::{BehaviourConfig, ProcessOutcome, QuestionBehaviour};
use crate::attempt::QuestionAttempt;
use crate::error::{BehaviourError, BehaviourResult};
use crate::question::{GradableQuestion, QuestionDefinition};
use crate::response::BehaviourVars;
use crate::state::QuestionState;
use crate::step::{PendingStep, Step};

/// Deferred-feedback behaviour for gradable question types.
///
/// # Example
/// ```rust,ignore
/// let behaviour = DeferredFeedbackBehaviour::attach(question)?;
/// let outcome = behaviour.process_action(&attempt, &mut pending)?;
/// ```
#[derive(Clone)]
pub struct DeferredFeedbackBehaviour {
    question: Arc<dyn GradableQuestion>,
    config: BehaviourConfig,
}

impl std::fmt::Debug for DeferredFeedbackBehaviour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeferredFeedbackBehaviour")
            .field("question_id", &self.question.id())
            .field("qtype", &self.question.qtype())
            .field("config", &self.config)
            .finish()
    }
}

impl DeferredFeedbackBehaviour {
    /// Identifier stored on attempts driven by this behaviour.
    pub const NAME: &'static str = "deferredfeedback_graphchecker";

    /// Attaches the behaviour to a question with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `BehaviourError::IncompatibleQuestion` if the question does
    /// not support grading.
    pub fn attach(question: Arc<dyn QuestionDefinition>) -> BehaviourResult<Self> {
        Self::with_config(question, BehaviourConfig::default())
    }

    /// Attaches the behaviour to a question.
    ///
    /// # Errors
    ///
    /// Returns `BehaviourError::IncompatibleQuestion` if the question does
    /// not support grading.
    pub fn with_config(
        question: Arc<dyn QuestionDefinition>,
        config: BehaviourConfig,
    ) -> BehaviourResult<Self> {
        let question_id = question.id().to_string();
        let qtype = question.qtype().to_string();

        let Some(question) = question.into_gradable() else {
            tracing::warn!(
                behaviour = Self::NAME,
                question_id = %question_id,
                qtype = %qtype,
                "rejecting question without grading support"
            );
            return Err(BehaviourError::IncompatibleQuestion {
                behaviour: Self::NAME,
                question_id,
                qtype,
            });
        };

        Ok(Self { question, config })
    }

    /// Returns true if this behaviour can drive the question.
    #[must_use]
    pub fn is_compatible_question(question: &Arc<dyn QuestionDefinition>) -> bool {
        Arc::clone(question).into_gradable().is_some()
    }

    /// The question this behaviour grades.
    #[must_use]
    pub fn question(&self) -> &Arc<dyn GradableQuestion> {
        &self.question
    }

    /// Configuration used for action summaries.
    #[must_use]
    pub const fn config(&self) -> &BehaviourConfig {
        &self.config
    }

    /// Handles a save: records the new response and classifies it.
    ///
    /// # Errors
    ///
    /// Returns `BehaviourError::InvalidState` if the attempt is neither
    /// finished nor active.
    pub fn process_save(
        &self,
        attempt: &QuestionAttempt,
        pending: &mut PendingStep,
    ) -> BehaviourResult<ProcessOutcome> {
        let state = attempt.state();
        if state.is_finished() {
            return Ok(ProcessOutcome::Discard);
        }
        Self::ensure_active(attempt)?;

        if self.is_same_response(attempt, pending) {
            tracing::debug!(attempt_id = %attempt.id, "discarding unchanged response");
            return Ok(ProcessOutcome::Discard);
        }

        let response = pending.response();
        let new_state = if self.question.is_complete_response(response) {
            QuestionState::Complete
        } else if self.question.is_gradable_response(response) {
            QuestionState::Invalid
        } else {
            QuestionState::Todo
        };
        pending.set_state(new_state);

        tracing::debug!(
            attempt_id = %attempt.id,
            from = %state,
            to = %new_state,
            "response saved"
        );
        Ok(ProcessOutcome::Keep)
    }

    /// Handles a finish: grades the last saved response.
    ///
    /// Side-channel variables with a blank name are skipped with a warning;
    /// the grade itself is still recorded.
    ///
    /// # Errors
    ///
    /// Always returns `Ok`; the signature matches the other actions.
    pub fn process_finish(
        &self,
        attempt: &QuestionAttempt,
        pending: &mut PendingStep,
    ) -> BehaviourResult<ProcessOutcome> {
        if attempt.is_finished() {
            return Ok(ProcessOutcome::Discard);
        }

        let response = attempt.last_response();
        if self.question.is_gradable_response(&response) {
            let grade = self.question.grade_response(&response);
            if let Some(extra) = grade.extra_vars() {
                for (name, value) in extra {
                    if let Err(err) = pending.set_qt_var(name.as_str(), value.as_str()) {
                        tracing::warn!(
                            attempt_id = %attempt.id,
                            question_id = %self.question.id(),
                            name = %name,
                            error = %err,
                            "skipping side-channel variable"
                        );
                    }
                }
            }
            pending.set_fraction(grade.fraction());
            pending.set_state(grade.state());

            tracing::info!(
                attempt_id = %attempt.id,
                question_id = %self.question.id(),
                fraction = ?grade.fraction(),
                state = %grade.state(),
                extra_vars = grade.extra_vars().map_or(0, |vars| vars.len()),
                "attempt graded"
            );
        } else {
            pending.set_state(QuestionState::GaveUp);
            tracing::info!(
                attempt_id = %attempt.id,
                "attempt finished without a gradable response"
            );
        }

        pending.set_new_response_summary(self.question.summarise_response(&response));
        pending.carry_response(response);
        Ok(ProcessOutcome::Keep)
    }

    /// Handles a comment: annotates the history without grading.
    ///
    /// # Errors
    ///
    /// Returns `BehaviourError::InvalidState` if the attempt is neither
    /// finished nor active.
    pub fn process_comment(
        &self,
        attempt: &QuestionAttempt,
        pending: &mut PendingStep,
    ) -> BehaviourResult<ProcessOutcome> {
        if attempt.is_finished() {
            return Ok(ProcessOutcome::Discard);
        }
        Self::ensure_active(attempt)?;

        pending.set_state(attempt.state());
        pending.carry_response(attempt.last_response());
        tracing::debug!(attempt_id = %attempt.id, "comment recorded");
        Ok(ProcessOutcome::Keep)
    }

    fn ensure_active(attempt: &QuestionAttempt) -> BehaviourResult<()> {
        let state = attempt.state();
        if state.is_active() {
            return Ok(());
        }
        tracing::warn!(attempt_id = %attempt.id, state = %state, "action on inactive attempt");
        Err(BehaviourError::InvalidState { state })
    }

    fn is_same_response(&self, attempt: &QuestionAttempt, pending: &PendingStep) -> bool {
        self.question
            .is_same_response(&attempt.last_response(), pending.response())
    }

    fn summarise_comment(&self, step: &Step) -> String {
        let comment = step
            .behaviour_vars
            .get(BehaviourVars::COMMENT)
            .unwrap_or_default();
        format!(
            "Commented: {}",
            shorten_text(comment, self.config.comment_summary_max_chars)
        )
    }

    fn summarise_save(&self, step: &Step) -> String {
        if step.response.is_empty() {
            return "Started".to_string();
        }
        format!("Saved: {}", self.question.summarise_response(&step.response))
    }
}

impl QuestionBehaviour for DeferredFeedbackBehaviour {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init_first_step(&self, pending: &mut PendingStep) {
        pending.set_state(QuestionState::Todo);
    }

    fn process_action(
        &self,
        attempt: &QuestionAttempt,
        pending: &mut PendingStep,
    ) -> BehaviourResult<ProcessOutcome> {
        if pending.has_behaviour_var(BehaviourVars::COMMENT) {
            self.process_comment(attempt, pending)
        } else if pending.has_behaviour_var(BehaviourVars::FINISH) {
            self.process_finish(attempt, pending)
        } else {
            self.process_save(attempt, pending)
        }
    }

    fn summarise_action(&self, step: &Step) -> String {
        if step.has_behaviour_var(BehaviourVars::COMMENT) {
            self.summarise_comment(step)
        } else if step.has_behaviour_var(BehaviourVars::FINISH) {
            "Attempt finished".to_string()
        } else {
            self.summarise_save(step)
        }
    }

    fn min_fraction(&self) -> f64 {
        self.question.min_fraction()
    }

    fn max_fraction(&self) -> f64 {
        self.question.max_fraction()
    }

    fn right_answer_summary(&self) -> Option<String> {
        self.question.right_answer_summary()
    }
}
