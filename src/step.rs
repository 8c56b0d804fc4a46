//! Attempt steps.
//!
//! A [`PendingStep`] is what an action proposes. The behaviour annotates it
//! (state, fraction, side-channel variables) and the driver either commits
//! it as a [`Step`] or drops it.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::response::{BehaviourVars, Response};
use crate::state::QuestionState;

/// Unique identifier for a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(Uuid);

impl StepId {
    /// Creates a new random step ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for StepId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A committed step in an attempt's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Unique identifier.
    pub id: StepId,

    /// When the action was submitted.
    pub timestamp: DateTime<Utc>,

    /// State of the attempt after this step.
    pub state: QuestionState,

    /// Fraction awarded by this step, if it graded anything.
    pub fraction: Option<f64>,

    /// Response data submitted with the action.
    pub response: Response,

    /// Control flags submitted with the action.
    pub behaviour_vars: BehaviourVars,

    /// Side-channel variables written by the behaviour.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub qt_vars: BTreeMap<String, String>,
}

impl Step {
    /// True if the action carried the named control flag.
    #[must_use]
    pub fn has_behaviour_var(&self, name: &str) -> bool {
        self.behaviour_vars.has(name)
    }

    /// Side-channel variable stored on this step.
    #[must_use]
    pub fn qt_var(&self, name: &str) -> Option<&str> {
        self.qt_vars.get(name).map(String::as_str)
    }
}

/// A step proposed by an action, not yet part of the history.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingStep {
    id: StepId,
    timestamp: DateTime<Utc>,
    state: QuestionState,
    fraction: Option<f64>,
    response: Response,
    behaviour_vars: BehaviourVars,
    qt_vars: BTreeMap<String, String>,
    new_response_summary: Option<String>,
}

impl PendingStep {
    /// Creates a pending step in the `Unprocessed` state.
    #[must_use]
    pub fn new(response: Response, behaviour_vars: BehaviourVars) -> Self {
        Self {
            id: StepId::new(),
            timestamp: Utc::now(),
            state: QuestionState::Unprocessed,
            fraction: None,
            response,
            behaviour_vars,
            qt_vars: BTreeMap::new(),
            new_response_summary: None,
        }
    }

    /// Overrides the submission time.
    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Identifier the step keeps once committed.
    #[must_use]
    pub const fn id(&self) -> StepId {
        self.id
    }

    /// State set by the behaviour, `Unprocessed` until then.
    #[must_use]
    pub const fn state(&self) -> QuestionState {
        self.state
    }

    /// Fraction set by the behaviour, if any.
    #[must_use]
    pub const fn fraction(&self) -> Option<f64> {
        self.fraction
    }

    /// The submitted response.
    #[must_use]
    pub const fn response(&self) -> &Response {
        &self.response
    }

    /// Control flags submitted with the action.
    #[must_use]
    pub const fn behaviour_vars(&self) -> &BehaviourVars {
        &self.behaviour_vars
    }

    /// True if the action carried the named control flag.
    #[must_use]
    pub fn has_behaviour_var(&self, name: &str) -> bool {
        self.behaviour_vars.has(name)
    }

    /// Value of a control flag.
    #[must_use]
    pub fn behaviour_var(&self, name: &str) -> Option<&str> {
        self.behaviour_vars.get(name)
    }

    /// Side-channel variable set so far.
    #[must_use]
    pub fn qt_var(&self, name: &str) -> Option<&str> {
        self.qt_vars.get(name).map(String::as_str)
    }

    /// Summary to store on the attempt if the step is committed.
    #[must_use]
    pub fn new_response_summary(&self) -> Option<&str> {
        self.new_response_summary.as_deref()
    }

    /// Sets the state the attempt moves to.
    pub fn set_state(&mut self, state: QuestionState) {
        self.state = state;
    }

    /// Sets or clears the awarded fraction.
    pub fn set_fraction(&mut self, fraction: Option<f64>) {
        self.fraction = fraction;
    }

    /// Stores a side-channel variable, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::EmptyVariableName` for a blank name.
    pub fn set_qt_var(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyVariableName);
        }
        self.qt_vars.insert(name, value.into());
        Ok(())
    }

    /// Replaces the submitted data with a response carried forward from
    /// the attempt's history.
    pub fn carry_response(&mut self, response: Response) {
        self.response = response;
    }

    /// Replaces the attempt's response summary on commit.
    pub fn set_new_response_summary(&mut self, summary: impl Into<String>) {
        self.new_response_summary = Some(summary.into());
    }

    /// Converts into a committed step, returning the new response summary
    /// for the attempt alongside it.
    #[must_use]
    pub fn commit(self) -> (Step, Option<String>) {
        let step = Step {
            id: self.id,
            timestamp: self.timestamp,
            state: self.state,
            fraction: self.fraction,
            response: self.response,
            behaviour_vars: self.behaviour_vars,
            qt_vars: self.qt_vars,
        };
        (step, self.new_response_summary)
    }
}
