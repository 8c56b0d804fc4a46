//! # qbehaviour - deferred feedback for gradable question types
//!
//! qbehaviour decides how a single question attempt moves through its
//! states as a student saves, comments on, or finishes it, and how a
//! question type's grading output is attached to the attempt.
//!
//! ## Core Concepts
//!
//! - **QuestionAttempt**: ordered history of steps for one question
//! - **PendingStep**: a step proposed by an action, annotated by the behaviour
//! - **QuestionBehaviour**: the strategy that keeps or discards each step
//! - **GradableQuestion**: the capability a question type provides to be graded
//! - **GradeResult**: fraction, state and side-channel variables from grading
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use qbehaviour::{AttemptDriver, AttemptId, DeferredFeedbackBehaviour, Response};
//!
//! let behaviour = DeferredFeedbackBehaviour::attach(question)?;
//! let mut driver = AttemptDriver::start(Arc::new(behaviour), AttemptId::new(), "q1", 1.0);
//!
//! driver.save(Response::new().with("answer", "{\"nodes\":[]}"))?;
//! driver.finish()?;
//! let outcome = driver.attempt().last_qt_var("_testoutcome");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod attempt;
pub mod behaviour;
pub mod engine;
pub mod error;
pub mod grade;
pub mod question;
pub mod response;
pub mod state;
pub mod step;

// Re-export primary types at crate root for convenience
pub use attempt::{AttemptId, QuestionAttempt};
pub use behaviour::{
    BehaviourConfig, DeferredFeedbackBehaviour, ProcessOutcome, QuestionBehaviour,
};
pub use engine::{AttemptDriver, Submission};
pub use error::{BehaviourError, BehaviourResult, ValidationError};
pub use grade::{ExtraVars, GradeResult};
pub use question::{GradableQuestion, QuestionDefinition};
pub use response::{BehaviourVars, Response};
pub use state::QuestionState;
pub use step::{PendingStep, Step, StepId};
