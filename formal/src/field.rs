//! Field records held by a [`FieldStore`](crate::FieldStore).

use crate::rule::{Rule, ValidationResult, apply_rules, combine};

/// Cached outcome of the last validation run on a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Validation {
    /// Not validated since creation or the last clear.
    #[default]
    Unvalidated,
    /// Validated; holds the outcome at that time.
    Validated(ValidationResult),
}

impl Validation {
    /// Get the cached result, if any.
    pub fn result(&self) -> Option<&ValidationResult> {
        match self {
            Self::Unvalidated => None,
            Self::Validated(result) => Some(result),
        }
    }

    /// Check if a result is cached.
    pub fn is_validated(&self) -> bool {
        matches!(self, Self::Validated(_))
    }
}

/// One named unit of form state.
///
/// Fields are immutable snapshots: the store replaces the whole record on
/// every change, so a `&Field` obtained before a mutation is stale after it.
#[derive(Debug, Clone)]
pub struct Field {
    value: String,
    rules: Vec<Rule>,
    touched: bool,
    validation: Validation,
}

impl Field {
    pub(crate) fn new(value: String, rules: Vec<Rule>) -> Self {
        Self {
            value,
            rules,
            touched: false,
            validation: Validation::Unvalidated,
        }
    }

    /// Current content.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Validation rules, in application order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Whether the field is guarded by at least one rule.
    pub fn has_rules(&self) -> bool {
        !self.rules.is_empty()
    }

    /// Whether the user has changed the field, or a submit forced it.
    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Cached validation state.
    pub fn validation(&self) -> &Validation {
        &self.validation
    }

    /// Apply every rule to the current value without caching.
    pub fn evaluate(&self) -> ValidationResult {
        if self.rules.is_empty() {
            return ValidationResult::pass();
        }
        combine(apply_rules(&self.rules, &self.value))
    }

    /// Valid when unguarded and never validated, or when the cached result passed.
    pub fn is_valid(&self) -> bool {
        match &self.validation {
            Validation::Unvalidated => self.rules.is_empty(),
            Validation::Validated(result) => result.valid,
        }
    }

    /// Message to display: the cached one, a live one once touched, else nothing.
    pub fn error(&self) -> String {
        match &self.validation {
            Validation::Validated(result) => result.message.clone(),
            Validation::Unvalidated if self.touched => self.evaluate().message,
            Validation::Unvalidated => String::new(),
        }
    }

    pub(crate) fn cleared(&self) -> Self {
        Self::new(String::new(), self.rules.clone())
    }

    pub(crate) fn with_value(&self, value: String) -> Self {
        Self {
            value,
            touched: true,
            ..self.clone()
        }
    }

    /// Touched copy caching a fresh result. Every validating path goes
    /// through here.
    pub(crate) fn validated(&self) -> Self {
        Self {
            touched: true,
            validation: Validation::Validated(self.evaluate()),
            ..self.clone()
        }
    }
}

/// Initial definition of a field, supplied at construction.
#[derive(Debug, Clone, Default)]
pub struct FieldInit {
    /// Starting value.
    pub value: String,
    /// Rules in application order. May be empty.
    pub rules: Vec<Rule>,
}

impl FieldInit {
    /// An unguarded field with the given starting value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            rules: Vec::new(),
        }
    }

    /// Append a rule.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Append several rules.
    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }
}

impl From<&str> for FieldInit {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FieldInit {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<FieldInit> for Field {
    fn from(init: FieldInit) -> Self {
        Field::new(init.value, init.rules)
    }
}
