//! Grade results returned by gradable question types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::state::QuestionState;

/// Auxiliary values a question type wants stored alongside the attempt.
pub type ExtraVars = BTreeMap<String, String>;

/// Outcome of grading one response.
///
/// Besides the fraction and terminal state, a question type may return
/// extra named values (test outcomes, diagnostics) that the behaviour
/// copies verbatim into the step's side-channel variables.
///
/// # Examples
///
/// ```
/// use qbehaviour::{GradeResult, QuestionState};
///
/// let grade = GradeResult::new(0.5, QuestionState::GradedPartial)
///     .unwrap()
///     .with_extra_var("diagnostics", "partial-match");
/// assert_eq!(grade.fraction(), Some(0.5));
/// assert_eq!(grade.extra_vars().unwrap()["diagnostics"], "partial-match");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeResult {
    fraction: Option<f64>,
    state: QuestionState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    extra_vars: Option<ExtraVars>,
}

impl GradeResult {
    /// Creates a grade with an explicit terminal state.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the fraction is not finite or lies
    /// outside `[0, 1]`. The state is stored as reported by the question.
    pub fn new(fraction: f64, state: QuestionState) -> Result<Self, ValidationError> {
        Self::validate_fraction(fraction)?;
        Ok(Self {
            fraction: Some(fraction),
            state,
            extra_vars: None,
        })
    }

    /// Creates a grade whose state is derived from the fraction.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` if the fraction is not finite or lies
    /// outside `[0, 1]`.
    pub fn from_fraction(fraction: f64) -> Result<Self, ValidationError> {
        Self::validate_fraction(fraction)?;
        Ok(Self {
            fraction: Some(fraction),
            state: QuestionState::graded_state_for_fraction(fraction),
            extra_vars: None,
        })
    }

    /// A grade without a fraction, for a response the question refuses to score.
    #[must_use]
    pub const fn gave_up() -> Self {
        Self {
            fraction: None,
            state: QuestionState::GaveUp,
            extra_vars: None,
        }
    }

    /// Attaches one extra variable.
    #[must_use]
    pub fn with_extra_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_vars
            .get_or_insert_with(ExtraVars::new)
            .insert(name.into(), value.into());
        self
    }

    /// Replaces the extra variables.
    #[must_use]
    pub fn with_extra_vars(mut self, vars: ExtraVars) -> Self {
        self.extra_vars = Some(vars);
        self
    }

    /// Awarded fraction; `None` when the student gave up.
    #[must_use]
    pub const fn fraction(&self) -> Option<f64> {
        self.fraction
    }

    /// State reported by the question.
    #[must_use]
    pub const fn state(&self) -> QuestionState {
        self.state
    }

    /// Auxiliary variables to store on the finishing step.
    #[must_use]
    pub const fn extra_vars(&self) -> Option<&ExtraVars> {
        self.extra_vars.as_ref()
    }

    fn validate_fraction(fraction: f64) -> Result<(), ValidationError> {
        if !fraction.is_finite() {
            return Err(ValidationError::NonFiniteFraction { value: fraction });
        }
        if !(0.0..=1.0).contains(&fraction) {
            return Err(ValidationError::FractionOutOfRange { value: fraction });
        }
        Ok(())
    }
}
