//! Attempt driver.
//!
//! This module provides a synchronous driver that applies student and
//! teacher actions to one question attempt through a pluggable behaviour.
//! The driver owns the attempt; the behaviour only decides.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::attempt::{AttemptId, QuestionAttempt};
use crate::behaviour::{ProcessOutcome, QuestionBehaviour};
use crate::error::BehaviourResult;
use crate::response::{BehaviourVars, Response};
use crate::step::PendingStep;

/// One action submitted against an attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submission {
    /// Response data sent with the action.
    pub response: Response,
    /// Control flags sent with the action.
    pub behaviour_vars: BehaviourVars,
    /// Submission time; `None` means now.
    pub timestamp: Option<DateTime<Utc>>,
}

impl Submission {
    /// A plain save of `response`.
    #[must_use]
    pub fn save(response: Response) -> Self {
        Self {
            response,
            ..Self::default()
        }
    }

    /// A request to finish the attempt.
    #[must_use]
    pub fn finish() -> Self {
        Self {
            behaviour_vars: BehaviourVars::finish(),
            ..Self::default()
        }
    }

    /// A comment on the attempt.
    #[must_use]
    pub fn comment(text: impl Into<String>) -> Self {
        Self {
            behaviour_vars: BehaviourVars::comment(text),
            ..Self::default()
        }
    }

    /// Sets the submission time.
    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    fn into_pending(self) -> PendingStep {
        let pending = PendingStep::new(self.response, self.behaviour_vars);
        match self.timestamp {
            Some(ts) => pending.at(ts),
            None => pending,
        }
    }
}

/// Drives one question attempt with one behaviour.
#[derive(Clone)]
pub struct AttemptDriver {
    attempt: QuestionAttempt,
    behaviour: Arc<dyn QuestionBehaviour>,
}

impl AttemptDriver {
    /// Starts a new attempt and records its first step.
    #[must_use]
    pub fn start(
        behaviour: Arc<dyn QuestionBehaviour>,
        id: AttemptId,
        question_id: impl Into<String>,
        max_mark: f64,
    ) -> Self {
        let mut attempt = QuestionAttempt::new(id, question_id, behaviour.name(), max_mark);
        let mut first = PendingStep::new(Response::new(), BehaviourVars::new());
        behaviour.init_first_step(&mut first);
        let (step, summary) = first.commit();
        attempt.push_step(step, summary);

        tracing::debug!(attempt_id = %id, behaviour = behaviour.name(), "attempt started");
        Self { attempt, behaviour }
    }

    /// Resumes an attempt loaded by the host.
    #[must_use]
    pub fn resume(behaviour: Arc<dyn QuestionBehaviour>, attempt: QuestionAttempt) -> Self {
        Self { attempt, behaviour }
    }

    /// Applies one action. The attempt changes only if the behaviour keeps
    /// the step.
    ///
    /// # Errors
    ///
    /// Propagates behaviour errors; the attempt is left unchanged.
    pub fn process_action(&mut self, submission: Submission) -> BehaviourResult<ProcessOutcome> {
        let mut pending = submission.into_pending();
        let outcome = self.behaviour.process_action(&self.attempt, &mut pending)?;

        match outcome {
            ProcessOutcome::Keep => {
                let (step, summary) = pending.commit();
                tracing::debug!(
                    attempt_id = %self.attempt.id,
                    step_id = %step.id,
                    state = %step.state,
                    "step kept"
                );
                self.attempt.push_step(step, summary);
            }
            ProcessOutcome::Discard => {
                tracing::debug!(attempt_id = %self.attempt.id, "step discarded");
            }
        }
        Ok(outcome)
    }

    /// Saves a response.
    ///
    /// # Errors
    ///
    /// See [`AttemptDriver::process_action`].
    pub fn save(&mut self, response: Response) -> BehaviourResult<ProcessOutcome> {
        self.process_action(Submission::save(response))
    }

    /// Finishes the attempt.
    ///
    /// # Errors
    ///
    /// See [`AttemptDriver::process_action`].
    pub fn finish(&mut self) -> BehaviourResult<ProcessOutcome> {
        self.process_action(Submission::finish())
    }

    /// Adds a comment.
    ///
    /// # Errors
    ///
    /// See [`AttemptDriver::process_action`].
    pub fn comment(&mut self, text: impl Into<String>) -> BehaviourResult<ProcessOutcome> {
        self.process_action(Submission::comment(text))
    }

    /// One summary line per committed step, oldest first.
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.attempt
            .steps()
            .iter()
            .map(|step| self.behaviour.summarise_action(step))
            .collect()
    }

    /// The attempt being driven.
    #[must_use]
    pub fn attempt(&self) -> &QuestionAttempt {
        &self.attempt
    }

    /// The behaviour deciding each action.
    #[must_use]
    pub fn behaviour(&self) -> &Arc<dyn QuestionBehaviour> {
        &self.behaviour
    }

    /// Mark earned so far, if the attempt has been graded.
    #[must_use]
    pub fn mark(&self) -> Option<f64> {
        self.attempt.mark()
    }

    /// Releases the attempt for the host to persist.
    #[must_use]
    pub fn into_attempt(self) -> QuestionAttempt {
        self.attempt
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::behaviour::DeferredFeedbackBehaviour;
    use crate::grade::GradeResult;
    use crate::question::{GradableQuestion, QuestionDefinition};
    use crate::state::QuestionState;

    struct Numeric;

    impl QuestionDefinition for Numeric {
        fn id(&self) -> &str {
            "numeric-1"
        }

        fn qtype(&self) -> &str {
            "numeric"
        }

        fn into_gradable(self: Arc<Self>) -> Option<Arc<dyn GradableQuestion>> {
            Some(self)
        }
    }

    impl GradableQuestion for Numeric {
        fn is_gradable_response(&self, response: &Response) -> bool {
            response.get("answer").is_some_and(|a| a.parse::<f64>().is_ok())
        }

        fn is_complete_response(&self, response: &Response) -> bool {
            self.is_gradable_response(response)
        }

        fn grade_response(&self, response: &Response) -> GradeResult {
            let right = response.get("answer") == Some("42");
            GradeResult::from_fraction(if right { 1.0 } else { 0.0 })
                .unwrap_or_else(|_| GradeResult::gave_up())
        }

        fn summarise_response(&self, response: &Response) -> String {
            response.get("answer").unwrap_or_default().to_string()
        }
    }

    fn driver() -> AttemptDriver {
        let behaviour = DeferredFeedbackBehaviour::attach(Arc::new(Numeric)).unwrap();
        AttemptDriver::start(Arc::new(behaviour), AttemptId::new(), "numeric-1", 2.0)
    }

    #[test]
    fn test_start_records_todo_step() {
        let driver = driver();
        assert_eq!(driver.attempt().steps().len(), 1);
        assert_eq!(driver.attempt().state(), QuestionState::Todo);
        assert_eq!(driver.attempt().behaviour, "deferredfeedback_graphchecker");
        assert_eq!(driver.history(), vec!["Started".to_string()]);
    }

    #[test]
    fn test_discard_leaves_history_unchanged() {
        let mut driver = driver();
        assert_eq!(
            driver.save(Response::new().with("answer", "41")).unwrap(),
            ProcessOutcome::Keep
        );
        assert_eq!(
            driver.save(Response::new().with("answer", "41")).unwrap(),
            ProcessOutcome::Discard
        );
        assert_eq!(driver.attempt().steps().len(), 2);
    }

    #[test]
    fn test_finish_sets_mark_and_summary() {
        let mut driver = driver();
        driver.save(Response::new().with("answer", "42")).unwrap();
        assert_eq!(driver.attempt().state(), QuestionState::Complete);

        assert_eq!(driver.finish().unwrap(), ProcessOutcome::Keep);
        assert_eq!(driver.attempt().state(), QuestionState::GradedRight);
        assert_eq!(driver.mark(), Some(2.0));
        assert_eq!(driver.attempt().response_summary.as_deref(), Some("42"));
        assert_eq!(driver.finish().unwrap(), ProcessOutcome::Discard);
    }

    #[test]
    fn test_submission_timestamp_is_kept() {
        let mut driver = driver();
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap();
        driver
            .process_action(Submission::save(Response::new().with("answer", "1")).at(ts))
            .unwrap();
        assert_eq!(driver.attempt().last_step().map(|s| s.timestamp), Some(ts));
    }

    #[test]
    fn test_resume_continues_history() {
        let mut driver = driver();
        driver.save(Response::new().with("answer", "7")).unwrap();
        let behaviour = Arc::clone(driver.behaviour());
        let attempt = driver.into_attempt();

        let mut resumed = AttemptDriver::resume(behaviour, attempt);
        assert_eq!(
            resumed.save(Response::new().with("answer", "7")).unwrap(),
            ProcessOutcome::Discard
        );
        assert_eq!(resumed.history().len(), 2);
    }
}
