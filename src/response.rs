//! Submitted response data and behaviour variables.
//!
//! A [`Response`] is whatever the student typed or clicked, keyed by field
//! name. Behaviours never look inside it; only the question type does.
//! [`BehaviourVars`] are the control flags that travel with an action.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Submitted response data, field name to value.
///
/// # Examples
///
/// ```
/// use qbehaviour::Response;
///
/// let response = Response::new().with("answer", "42");
/// assert_eq!(response.get("answer"), Some("42"));
/// assert!(!response.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Response(BTreeMap<String, String>);

impl Response {
    /// Creates an empty response.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a field, replacing any previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Value of a field.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// True if the field was submitted, even with an empty value.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// True when nothing was submitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of submitted fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Response
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {value:?}")?;
        }
        write!(f, "}}")
    }
}

/// Named flags describing the intent of an action.
///
/// Presence matters more than value: a step with a `finish` variable is a
/// finish action whatever the value is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BehaviourVars(BTreeMap<String, String>);

impl BehaviourVars {
    /// Marks a teacher or student comment.
    pub const COMMENT: &'static str = "comment";
    /// Marks a request to finalize the attempt.
    pub const FINISH: &'static str = "finish";

    /// Creates an empty set, as sent by a plain save.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Variables for a finish action.
    #[must_use]
    pub fn finish() -> Self {
        Self::new().with(Self::FINISH, "1")
    }

    /// Variables for a comment action.
    #[must_use]
    pub fn comment(text: impl Into<String>) -> Self {
        Self::new().with(Self::COMMENT, text)
    }

    /// Adds a flag, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// True if the flag is present, whatever its value.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Value of a flag.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// True when the action carried no flags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
