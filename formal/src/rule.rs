//! Validation rules and the combinators that compose them.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

/// Outcome of validating a value: a validity flag and a human-readable message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Whether the value passed.
    pub valid: bool,
    /// Feedback for the user. Empty when there is nothing to report.
    pub message: String,
}

impl ValidationResult {
    /// A passing result with no message.
    pub fn pass() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    /// A failing result with the given message.
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }

    /// Check if the result passed.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Get the message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<(bool, String)> for ValidationResult {
    fn from((valid, message): (bool, String)) -> Self {
        Self { valid, message }
    }
}

type RuleFn = dyn Fn(&str) -> ValidationResult + Send + Sync;

/// A pure validation function over a field's string value.
///
/// Rules carry no state, so cloning one only bumps a reference count.
#[derive(Clone)]
pub struct Rule {
    f: Arc<RuleFn>,
}

impl Rule {
    /// Wrap a validation function.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> ValidationResult + Send + Sync + 'static,
    {
        Self { f: Arc::new(f) }
    }

    /// Run the rule against a value.
    pub fn apply(&self, value: &str) -> ValidationResult {
        (self.f)(value)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").finish_non_exhaustive()
    }
}

/// Description of a predicate-backed rule, consumed by [`make_rule`].
pub struct RuleSpec<P> {
    /// Checks a string and returns whether it satisfies the condition.
    pub predicate: P,
    /// Shown to the user when the rule fails.
    pub error_message: String,
    /// Check for the inverse of the predicate. `is_required` is `!is_empty`.
    pub invert: bool,
}

impl<P> RuleSpec<P>
where
    P: Fn(&str) -> bool + Send + Sync + 'static,
{
    /// Create a non-inverted spec.
    pub fn new(predicate: P, error_message: impl Into<String>) -> Self {
        Self {
            predicate,
            error_message: error_message.into(),
            invert: false,
        }
    }

    /// Flip the predicate.
    pub fn inverted(mut self) -> Self {
        self.invert = !self.invert;
        self
    }
}

/// Build a [`Rule`] from a boolean predicate and an error message.
///
/// The produced rule is valid when `predicate(value) != invert`. A valid
/// outcome carries an empty message; an invalid one carries the trimmed
/// error message.
pub fn make_rule<P>(spec: RuleSpec<P>) -> Rule
where
    P: Fn(&str) -> bool + Send + Sync + 'static,
{
    let RuleSpec {
        predicate,
        error_message,
        invert,
    } = spec;
    let error_message = error_message.trim().to_string();

    Rule::new(move |value| {
        let valid = predicate(value) != invert;
        if valid {
            ValidationResult::pass()
        } else {
            ValidationResult::fail(error_message.clone())
        }
    })
}

/// Apply every rule, in order, to a value.
pub fn apply_rules(rules: &[Rule], value: &str) -> Vec<ValidationResult> {
    rules.iter().map(|rule| rule.apply(value)).collect()
}

/// Fold rule outcomes into one result.
///
/// Validity is the conjunction of all outcomes. Non-empty messages are joined
/// with single spaces in the order given. An empty input is a pass.
pub fn combine<I>(results: I) -> ValidationResult
where
    I: IntoIterator<Item = ValidationResult>,
{
    results
        .into_iter()
        .fold(ValidationResult::pass(), |mut acc, next| {
            acc.valid = acc.valid && next.valid;
            if !next.message.is_empty() {
                if !acc.message.is_empty() {
                    acc.message.push(' ');
                }
                acc.message.push_str(&next.message);
            }
            acc
        })
}
