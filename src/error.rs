//! Error types for question behaviours.
//!
//! Only contract and configuration problems are errors. Incomplete,
//! ungradable or abandoned answers are ordinary question states.

use thiserror::Error;

use crate::state::QuestionState;

/// Validation errors raised while constructing grading values.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// A fraction below 0 or above 1.
    #[error("Fraction {value} is out of range [0.0, 1.0]")]
    FractionOutOfRange {
        /// The rejected fraction.
        value: f64,
    },

    /// A NaN or infinite fraction.
    #[error("Fraction must be a finite number, got {value}")]
    NonFiniteFraction {
        /// The rejected fraction.
        value: f64,
    },

    /// A side-channel variable name that is blank.
    #[error("Variable name cannot be empty")]
    EmptyVariableName,
}

/// Top-level error type for behaviour processing.
#[derive(Debug, Error)]
pub enum BehaviourError {
    /// The host engine asked to process an action on an attempt that is
    /// neither active nor finished.
    #[error("Question is not active, cannot process actions (current state: {state})")]
    InvalidState {
        /// State of the attempt when the action arrived.
        state: QuestionState,
    },

    /// The behaviour was attached to a question that lacks the grading
    /// capability it relies on.
    #[error(
        "Behaviour '{behaviour}' cannot be used with question '{question_id}' of type '{qtype}'"
    )]
    IncompatibleQuestion {
        /// Name of the behaviour being attached.
        behaviour: &'static str,
        /// Identifier of the rejected question.
        question_id: String,
        /// Question type of the rejected question.
        qtype: String,
    },

    /// A grading value failed validation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl BehaviourError {
    /// Returns true if this is a contract violation by the host engine.
    #[must_use]
    pub const fn is_invalid_state(&self) -> bool {
        matches!(self, Self::InvalidState { .. })
    }

    /// Returns true if this is an attach-time configuration error.
    #[must_use]
    pub const fn is_incompatible_question(&self) -> bool {
        matches!(self, Self::IncompatibleQuestion { .. })
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type alias for behaviour operations.
pub type BehaviourResult<T> = Result<T, BehaviourError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_state_message() {
        let err = BehaviourError::InvalidState {
            state: QuestionState::NotStarted,
        };
        let msg = format!("{err}");
        assert!(msg.contains("not active"));
        assert!(msg.contains("notstarted"));
        assert!(err.is_invalid_state());
        assert!(!err.is_incompatible_question());
    }

    #[test]
    fn test_incompatible_question_message() {
        let err = BehaviourError::IncompatibleQuestion {
            behaviour: "deferredfeedback_graphchecker",
            question_id: "q-17".to_string(),
            qtype: "multichoice".to_string(),
        };
        let msg = format!("{err}");
        assert!(msg.contains("q-17"));
        assert!(msg.contains("multichoice"));
        assert!(err.is_incompatible_question());
    }

    #[test]
    fn test_validation_error_from() {
        let err: BehaviourError = ValidationError::FractionOutOfRange { value: 1.5 }.into();
        assert!(err.is_validation());
        assert!(format!("{err}").contains("1.5"));
    }

    #[test]
    fn test_non_finite_fraction_message() {
        let err = ValidationError::NonFiniteFraction { value: f64::INFINITY };
        assert!(format!("{err}").contains("finite"));
    }
}
