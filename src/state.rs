//! Question states.
//!
//! Every step of an attempt carries exactly one state from this closed
//! set. States fall into three groups: not yet active, active (the student
//! can still change the response), and finished.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fractions within this distance of 0 or 1 are treated as exactly wrong
/// or exactly right.
const FRACTION_TOLERANCE: f64 = 1e-7;

/// The state of a question attempt after a given step.
///
/// The `Man*` and `NeedsGrading`/`Finished` states are never produced by
/// the deferred-feedback behaviour. They are part of the set so that
/// attempts written by other host behaviours still deserialize.
///
/// # Examples
///
/// ```
/// use qbehaviour::QuestionState;
///
/// assert!(QuestionState::Invalid.is_active());
/// assert!(QuestionState::GaveUp.is_finished());
/// assert_eq!(QuestionState::graded_state_for_fraction(0.5), QuestionState::GradedPartial);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionState {
    /// The attempt exists but has no steps.
    #[default]
    NotStarted,
    /// The first step is being built.
    Unprocessed,
    /// Nothing usable has been submitted yet.
    Todo,
    /// A response was given but cannot be accepted as a final answer.
    Invalid,
    /// A complete response has been saved.
    Complete,
    /// Finished and waiting for a teacher to grade it.
    NeedsGrading,
    /// Finished without a grade.
    Finished,
    /// Finished without any usable response.
    GaveUp,
    /// Graded as wrong.
    GradedWrong,
    /// Graded as partially correct.
    GradedPartial,
    /// Graded as right.
    GradedRight,
    /// Finished, then commented on by a teacher.
    ManFinished,
    /// Gave up, then commented on by a teacher.
    ManGaveUp,
    /// Manually graded as wrong.
    #[serde(rename = "mangrwrong")]
    ManGradedWrong,
    /// Manually graded as partially correct.
    #[serde(rename = "mangrpartial")]
    ManGradedPartial,
    /// Manually graded as right.
    #[serde(rename = "mangrright")]
    ManGradedRight,
}

impl QuestionState {
    /// Every state, in lifecycle order.
    pub const ALL: [Self; 16] = [
        Self::NotStarted,
        Self::Unprocessed,
        Self::Todo,
        Self::Invalid,
        Self::Complete,
        Self::NeedsGrading,
        Self::Finished,
        Self::GaveUp,
        Self::GradedWrong,
        Self::GradedPartial,
        Self::GradedRight,
        Self::ManFinished,
        Self::ManGaveUp,
        Self::ManGradedWrong,
        Self::ManGradedPartial,
        Self::ManGradedRight,
    ];

    /// True while the student may still change the response.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Todo | Self::Invalid | Self::Complete)
    }

    /// True once the attempt has been finalized.
    #[must_use]
    pub const fn is_finished(self) -> bool {
        !matches!(
            self,
            Self::NotStarted | Self::Unprocessed | Self::Todo | Self::Invalid | Self::Complete
        )
    }

    /// True for states that carry a fraction.
    #[must_use]
    pub const fn is_graded(self) -> bool {
        matches!(
            self,
            Self::GradedWrong
                | Self::GradedPartial
                | Self::GradedRight
                | Self::ManGradedWrong
                | Self::ManGradedPartial
                | Self::ManGradedRight
        )
    }

    /// True for states reached by finishing without a usable response.
    #[must_use]
    pub const fn is_gave_up(self) -> bool {
        matches!(self, Self::GaveUp | Self::ManGaveUp)
    }

    /// Automatically graded state for a fraction.
    #[must_use]
    pub fn graded_state_for_fraction(fraction: f64) -> Self {
        if fraction < FRACTION_TOLERANCE {
            Self::GradedWrong
        } else if fraction > 1.0 - FRACTION_TOLERANCE {
            Self::GradedRight
        } else {
            Self::GradedPartial
        }
    }

    /// Stable lowercase name, as used in serialized steps.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::NotStarted => "notstarted",
            Self::Unprocessed => "unprocessed",
            Self::Todo => "todo",
            Self::Invalid => "invalid",
            Self::Complete => "complete",
            Self::NeedsGrading => "needsgrading",
            Self::Finished => "finished",
            Self::GaveUp => "gaveup",
            Self::GradedWrong => "gradedwrong",
            Self::GradedPartial => "gradedpartial",
            Self::GradedRight => "gradedright",
            Self::ManFinished => "manfinished",
            Self::ManGaveUp => "mangaveup",
            Self::ManGradedWrong => "mangrwrong",
            Self::ManGradedPartial => "mangrpartial",
            Self::ManGradedRight => "mangrright",
        }
    }
}

impl fmt::Display for QuestionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_and_finished_are_disjoint() {
        for state in QuestionState::ALL {
            assert!(
                !(state.is_active() && state.is_finished()),
                "{state} is both active and finished"
            );
        }
    }

    #[test]
    fn test_not_started_is_neither() {
        for state in [QuestionState::NotStarted, QuestionState::Unprocessed] {
            assert!(!state.is_active());
            assert!(!state.is_finished());
        }
    }

    #[test]
    fn test_graded_states_are_finished() {
        for state in QuestionState::ALL.into_iter().filter(|s| s.is_graded()) {
            assert!(state.is_finished());
        }
    }

    #[test]
    fn test_graded_state_for_fraction() {
        assert_eq!(QuestionState::graded_state_for_fraction(0.0), QuestionState::GradedWrong);
        assert_eq!(QuestionState::graded_state_for_fraction(0.3), QuestionState::GradedPartial);
        assert_eq!(QuestionState::graded_state_for_fraction(1.0), QuestionState::GradedRight);
        assert_eq!(
            QuestionState::graded_state_for_fraction(0.999_999_99),
            QuestionState::GradedRight
        );
    }

    #[test]
    fn test_default_is_not_started() {
        assert_eq!(QuestionState::default(), QuestionState::NotStarted);
    }

    #[test]
    fn test_display_matches_serde_name() {
        for state in QuestionState::ALL {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{state}\""));
        }
    }
}
