//! Question type contracts.
//!
//! These traits define what a behaviour may ask of a question:
//! - [`QuestionDefinition`] is implemented by every question type
//! - [`GradableQuestion`] is the capability a deferred-feedback behaviour
//!   needs to interpret and grade responses
//!
//! A question advertises the capability through
//! [`QuestionDefinition::into_gradable`]. Question types that do not
//! override it cannot be driven by behaviours that require grading.

use std::sync::Arc;

use crate::grade::GradeResult;
use crate::response::Response;

/// Storage-independent description of a question.
pub trait QuestionDefinition: Send + Sync {
    /// Stable identifier of the question.
    fn id(&self) -> &str;

    /// Name of the question type, e.g. `"graphchecker"`.
    fn qtype(&self) -> &str;

    /// Lowest fraction a response can earn.
    fn min_fraction(&self) -> f64 {
        0.0
    }

    /// Highest fraction a response can earn.
    fn max_fraction(&self) -> f64 {
        1.0
    }

    /// Human-readable description of a correct answer, when one exists.
    fn right_answer_summary(&self) -> Option<String> {
        None
    }

    /// Returns this question as a gradable question, if it supports grading.
    fn into_gradable(self: Arc<Self>) -> Option<Arc<dyn GradableQuestion>> {
        None
    }
}

/// Grading capability of a question type.
///
/// Implementations must be deterministic: the same response always gets
/// the same answers from every method.
pub trait GradableQuestion: QuestionDefinition {
    /// True if the response contains enough to be graded, even if the
    /// student has not filled in everything.
    fn is_gradable_response(&self, response: &Response) -> bool;

    /// True if the response answers every part of the question.
    fn is_complete_response(&self, response: &Response) -> bool;

    /// True if two responses should be treated as the same submission.
    fn is_same_response(&self, previous: &Response, current: &Response) -> bool {
        previous == current
    }

    /// Grades a gradable response.
    fn grade_response(&self, response: &Response) -> GradeResult;

    /// One-line summary of a response for reports and history.
    fn summarise_response(&self, response: &Response) -> String;
}
