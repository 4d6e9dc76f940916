//! The form-state container.

use std::fmt;
use std::mem;
use std::sync::Arc;

use indexmap::IndexMap;
use log::{debug, trace};
use serde::Serialize;

use crate::error::{FormError, Result};
use crate::field::{Field, FieldInit};
use crate::notify::{ChangeHook, ChangeKind, FieldChange, Pending};
use crate::rule::{Rule, ValidationResult};
use crate::values::{FormValues, ValuesOptions};

/// A field that currently has something to report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field key.
    pub key: String,
    /// Error message, as returned by [`FieldStore::errors_of`].
    pub message: String,
}

/// Keyed collection of form fields and the operations over them.
///
/// Fields are created at construction and never added or removed afterwards.
/// Iteration follows construction order.
///
/// # Example
///
/// ```
/// use formal::FieldStore;
/// use formal::validators::{is_required, is_valid_email};
///
/// let mut form = FieldStore::builder()
///     .field("email", "", [is_required(), is_valid_email()])
///     .field("nickname", "", [])
///     .build();
///
/// assert!(!form.is_valid());
///
/// form.handle_change("email")("wow@wow.com").unwrap();
/// assert_eq!(form.errors_of("email").unwrap(), "");
/// assert!(form.is_valid());
/// ```
pub struct FieldStore {
    fields: IndexMap<String, Field>,
    has_been_submitted: bool,
    on_change: Option<ChangeHook>,
    queue: Vec<FieldChange>,
    deferred: bool,
    revision: u64,
    dirty: bool,
}

impl FieldStore {
    /// Create a store from initial field definitions.
    pub fn new<K, V, I>(initial: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldInit>,
    {
        let fields: IndexMap<String, Field> = initial
            .into_iter()
            .map(|(key, init)| {
                let init: FieldInit = init.into();
                (key.into(), Field::from(init))
            })
            .collect();
        Self::from_fields(fields, None)
    }

    /// Start building a store.
    pub fn builder() -> FieldStoreBuilder {
        FieldStoreBuilder::new()
    }

    fn from_fields(fields: IndexMap<String, Field>, on_change: Option<ChangeHook>) -> Self {
        debug!("FieldStore: created with {} fields", fields.len());
        Self {
            fields,
            has_been_submitted: false,
            on_change,
            queue: Vec::new(),
            deferred: false,
            revision: 0,
            dirty: false,
        }
    }

    /// Install or replace the change hook.
    pub fn set_on_change<F>(&mut self, f: F)
    where
        F: Fn(&FieldChange) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(f));
    }

    /// Remove the change hook.
    pub fn clear_on_change(&mut self) {
        self.on_change = None;
    }

    // --- Lookup ---

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the store has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Check if a field exists.
    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Field keys in construction order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Snapshot of a field record.
    pub fn field(&self, key: &str) -> Option<&Field> {
        self.fields.get(key)
    }

    fn get(&self, key: &str) -> Result<&Field> {
        self.fields.get(key).ok_or_else(|| FormError::not_found(key))
    }

    // --- Submission flag ---

    /// Whether the consumer has marked the form as submitted.
    pub fn has_been_submitted(&self) -> bool {
        self.has_been_submitted
    }

    /// Set the submitted flag. No operation reads it.
    pub fn set_submitted(&mut self, submitted: bool) {
        self.has_been_submitted = submitted;
    }

    // --- Change tracking ---

    /// Number of field mutations since construction.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Check if any field changed since the last [`clear_dirty`](Self::clear_dirty).
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    /// Replace a field record and queue the change for the hook.
    fn commit(&mut self, key: &str, field: Field, kind: ChangeKind) {
        let Some(slot) = self.fields.get_mut(key) else {
            return;
        };
        *slot = field;
        self.revision += 1;
        self.dirty = true;
        trace!("FieldStore: {key} {kind:?} (revision {})", self.revision);

        if self.on_change.is_some() {
            self.queue.push(FieldChange {
                key: key.to_string(),
                kind,
                field: slot.clone(),
            });
        }
    }

    /// Hand queued changes to the hook. Called at the end of every mutating
    /// operation, unless a [`SharedForm`](crate::SharedForm) delivers them
    /// after releasing its lock.
    fn notify(&mut self) {
        if self.deferred {
            return;
        }
        if let Some(pending) = self.take_pending() {
            pending.deliver();
        }
    }

    pub(crate) fn defer_notifications(&mut self) {
        self.deferred = true;
    }

    pub(crate) fn take_pending(&mut self) -> Option<Pending> {
        let changes = mem::take(&mut self.queue);
        if changes.is_empty() {
            return None;
        }
        let hook = self.on_change.clone()?;
        Some(Pending::new(hook, changes))
    }

    // --- Clearing ---

    /// Reset a field to empty, untouched and unvalidated. Rules are kept.
    ///
    /// Clearing a missing key does nothing.
    pub fn clear_field(&mut self, key: &str) {
        self.clear_entry(key);
        self.notify();
    }

    /// Clear every field.
    pub fn clear_all_fields(&mut self) {
        debug!("FieldStore: clearing {} fields", self.fields.len());
        let keys: Vec<String> = self.fields.keys().cloned().collect();
        for key in &keys {
            self.clear_entry(key);
        }
        self.notify();
    }

    fn clear_entry(&mut self, key: &str) {
        let Some(cleared) = self.fields.get(key).map(Field::cleared) else {
            debug!("FieldStore: clear_field ignored missing key {key:?}");
            return;
        };
        self.commit(key, cleared, ChangeKind::Cleared);
    }

    // --- Reads ---

    /// Current value of a field.
    pub fn field_value(&self, key: &str) -> Result<&str> {
        self.get(key).map(Field::value)
    }

    /// Check a single field.
    ///
    /// A field with rules that has never been validated is invalid, so a
    /// fresh form with required fields reports invalid before any input.
    /// A missing key is invalid rather than an error.
    pub fn field_is_valid(&self, key: &str) -> bool {
        self.fields.get(key).is_some_and(Field::is_valid)
    }

    /// Check every field. An empty form is valid.
    pub fn is_valid(&self) -> bool {
        self.fields.values().all(Field::is_valid)
    }

    /// Apply all of a field's rules to its current value, without caching.
    pub fn get_field_validation_result(&self, key: &str) -> Result<ValidationResult> {
        self.get(key).map(Field::evaluate)
    }

    /// Error text for display.
    ///
    /// Prefers the cached result. A touched field without one is evaluated
    /// live; an untouched one reports nothing.
    pub fn errors_of(&self, key: &str) -> Result<String> {
        self.get(key).map(Field::error)
    }

    /// Every field with a non-empty error, in field order.
    pub fn errors(&self) -> Vec<FieldError> {
        self.fields
            .iter()
            .filter_map(|(key, field)| {
                let message = field.error();
                (!message.is_empty()).then(|| FieldError {
                    key: key.clone(),
                    message,
                })
            })
            .collect()
    }

    /// The first field with a non-empty error.
    pub fn first_error(&self) -> Option<FieldError> {
        self.errors().into_iter().next()
    }

    /// All values, in field order.
    pub fn values(&self) -> FormValues {
        self.values_with(&ValuesOptions::default())
    }

    /// All values, passed through the options' format transform.
    pub fn values_with(&self, options: &ValuesOptions) -> FormValues {
        self.fields
            .iter()
            .map(|(key, field)| (key.clone(), options.apply(field.value())))
            .collect()
    }

    // --- Validation ---

    /// Validate a field and cache the result.
    ///
    /// Untouched fields are skipped so errors are not shown before the user
    /// has interacted with them.
    pub fn validate_field(&mut self, key: &str) -> Result<()> {
        let field = self.get(key)?;
        if !field.is_touched() {
            trace!("FieldStore: skipping validation of untouched {key}");
            return Ok(());
        }
        let validated = field.validated();
        self.commit(key, validated, ChangeKind::Validated);
        self.notify();
        Ok(())
    }

    /// Touch and validate every field, surfacing all outstanding errors.
    ///
    /// Each field is marked touched and validated in a single record
    /// replacement, so it is reported once, as `Validated`.
    pub fn validate_all_fields(&mut self) {
        debug!("FieldStore: validating {} fields", self.fields.len());
        let keys: Vec<String> = self.fields.keys().cloned().collect();
        for key in &keys {
            let Some(validated) = self.fields.get(key).map(Field::validated) else {
                continue;
            };
            self.commit(key, validated, ChangeKind::Validated);
        }
        self.notify();
    }

    // --- Changes ---

    /// Set a field's value as user input.
    ///
    /// Marks the field touched and, when it has rules, revalidates it.
    /// Unguarded fields never get a cached result from a change.
    pub fn set_value(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let changed = self.get(key)?.with_value(value.into());
        let changed = if changed.has_rules() {
            changed.validated()
        } else {
            changed
        };
        self.commit(key, changed, ChangeKind::ValueChanged);
        self.notify();
        Ok(())
    }

    /// Setter bound to a field, for wiring into an input's change callback.
    ///
    /// ```
    /// # use formal::FieldStore;
    /// let mut form = FieldStore::new([("name", "")]);
    /// form.handle_change("name")("Matt Damon").unwrap();
    /// assert_eq!(form.field_value("name").unwrap(), "Matt Damon");
    /// ```
    pub fn handle_change<'a>(&'a mut self, key: &'a str) -> impl FnMut(&str) -> Result<()> + 'a {
        move |value: &str| self.set_value(key, value)
    }
}

impl Default for FieldStore {
    fn default() -> Self {
        Self::from_fields(IndexMap::new(), None)
    }
}

impl fmt::Debug for FieldStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldStore")
            .field("fields", &self.fields)
            .field("has_been_submitted", &self.has_been_submitted)
            .field("queued", &self.queue.len())
            .field("revision", &self.revision)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

/// Fluent builder for a [`FieldStore`].
///
/// # Example
///
/// ```
/// use formal::FieldStore;
/// use formal::validators::{is_required, min_length};
///
/// let form = FieldStore::builder()
///     .field("name", "", [is_required()])
///     .field("password", "", [is_required(), min_length(8, "Too short.")])
///     .on_change(|change| println!("{} {:?}", change.key, change.kind))
///     .build();
///
/// assert_eq!(form.len(), 2);
/// ```
#[derive(Default)]
pub struct FieldStoreBuilder {
    fields: IndexMap<String, Field>,
    on_change: Option<ChangeHook>,
}

impl FieldStoreBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. Redefining a key replaces it in its original position.
    pub fn field(
        self,
        key: impl Into<String>,
        value: impl Into<String>,
        rules: impl IntoIterator<Item = Rule>,
    ) -> Self {
        self.init(key, FieldInit::new(value).rules(rules))
    }

    /// Add a field from a prepared definition.
    pub fn init(mut self, key: impl Into<String>, init: impl Into<FieldInit>) -> Self {
        let init: FieldInit = init.into();
        self.fields.insert(key.into(), Field::from(init));
        self
    }

    /// Install a hook called after every field mutation.
    pub fn on_change<F>(mut self, f: F) -> Self
    where
        F: Fn(&FieldChange) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(f));
        self
    }

    /// Finish building.
    pub fn build(self) -> FieldStore {
        FieldStore::from_fields(self.fields, self.on_change)
    }
}
