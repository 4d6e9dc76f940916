//! Shared form handle for UI bindings.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::Result;
use crate::rule::ValidationResult;
use crate::store::{FieldError, FieldStore};
use crate::values::{FormValues, ValuesOptions};

/// Owning setter bound to one field of a [`SharedForm`].
pub type ChangeHandler = Box<dyn Fn(&str) -> Result<()> + Send + Sync>;

/// Cloneable, thread-safe handle to a [`FieldStore`].
///
/// Clones share the same store. Every call takes the lock for its own
/// duration only, so each operation sees a consistent snapshot.
///
/// # Example
///
/// ```
/// use formal::{FieldStore, SharedForm};
/// use formal::validators::is_required;
///
/// let form = SharedForm::new(FieldStore::builder().field("name", "", [is_required()]).build());
///
/// let on_input = form.handle_change("name");
/// on_input("Matt").unwrap();
///
/// assert!(form.is_valid());
/// ```
#[derive(Debug, Clone)]
pub struct SharedForm {
    inner: Arc<RwLock<FieldStore>>,
}

impl SharedForm {
    /// Wrap a store.
    ///
    /// The store's change hook is called after the lock is released, so a
    /// hook may read the form back through a clone of this handle.
    pub fn new(mut store: FieldStore) -> Self {
        store.defer_notifications();
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    // Every mutation replaces whole field records, so a poisoned lock never
    // holds a half-applied change.
    fn lock_read(&self) -> RwLockReadGuard<'_, FieldStore> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn lock_write(&self) -> RwLockWriteGuard<'_, FieldStore> {
        self.inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Run a closure against the store.
    pub fn read<R>(&self, f: impl FnOnce(&FieldStore) -> R) -> R {
        f(&*self.lock_read())
    }

    /// Run a closure against the store mutably, then deliver its changes.
    pub fn write<R>(&self, f: impl FnOnce(&mut FieldStore) -> R) -> R {
        let (result, pending) = {
            let mut store = self.lock_write();
            let result = f(&mut *store);
            (result, store.take_pending())
        };
        if let Some(pending) = pending {
            pending.deliver();
        }
        result
    }

    /// Get a clone of a field's value.
    pub fn field_value(&self, key: &str) -> Result<String> {
        self.lock_read().field_value(key).map(str::to_string)
    }

    /// Error text for display. See [`FieldStore::errors_of`].
    pub fn errors_of(&self, key: &str) -> Result<String> {
        self.lock_read().errors_of(key)
    }

    /// Check a single field. Missing keys are invalid.
    pub fn field_is_valid(&self, key: &str) -> bool {
        self.lock_read().field_is_valid(key)
    }

    /// Check every field.
    pub fn is_valid(&self) -> bool {
        self.lock_read().is_valid()
    }

    /// Evaluate a field's rules without caching.
    pub fn get_field_validation_result(&self, key: &str) -> Result<ValidationResult> {
        self.lock_read().get_field_validation_result(key)
    }

    /// Every field with a non-empty error.
    pub fn errors(&self) -> Vec<FieldError> {
        self.lock_read().errors()
    }

    /// All values, in field order.
    pub fn values(&self) -> FormValues {
        self.lock_read().values()
    }

    /// All values, passed through the options' format transform.
    pub fn values_with(&self, options: &ValuesOptions) -> FormValues {
        self.lock_read().values_with(options)
    }

    /// Whether the form was marked submitted.
    pub fn has_been_submitted(&self) -> bool {
        self.lock_read().has_been_submitted()
    }

    /// Set the submitted flag.
    pub fn set_submitted(&self, submitted: bool) {
        self.write(|store| store.set_submitted(submitted));
    }

    /// Reset a field. Missing keys are ignored.
    pub fn clear_field(&self, key: &str) {
        self.write(|store| store.clear_field(key));
    }

    /// Reset every field.
    pub fn clear_all_fields(&self) {
        self.write(FieldStore::clear_all_fields);
    }

    /// Validate a touched field and cache the result.
    pub fn validate_field(&self, key: &str) -> Result<()> {
        self.write(|store| store.validate_field(key))
    }

    /// Touch and validate every field.
    pub fn validate_all_fields(&self) {
        self.write(FieldStore::validate_all_fields);
    }

    /// Set a field's value as user input.
    pub fn set_value(&self, key: &str, value: impl Into<String>) -> Result<()> {
        self.write(|store| store.set_value(key, value))
    }

    /// Setter bound to a field that owns its handle, for storing in a callback.
    ///
    /// The key is checked on each call, not here.
    pub fn handle_change(&self, key: impl Into<String>) -> ChangeHandler {
        let form = self.clone();
        let key = key.into();
        Box::new(move |value: &str| form.set_value(&key, value))
    }
}

impl From<FieldStore> for SharedForm {
    fn from(store: FieldStore) -> Self {
        Self::new(store)
    }
}
