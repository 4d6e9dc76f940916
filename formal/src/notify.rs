//! Change notification for reactive consumers.
//!
//! Changes are queued while an operation runs and handed to the hook once it
//! has finished, so observers only ever see the post-operation snapshot.

use std::sync::Arc;

use crate::field::Field;

/// What happened to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Reset to empty, untouched and unvalidated.
    Cleared,
    /// Value replaced through a change handler. Guarded fields arrive
    /// already revalidated.
    ValueChanged,
    /// A validation result was cached.
    Validated,
}

/// A single field mutation.
#[derive(Debug, Clone)]
pub struct FieldChange {
    /// Key of the mutated field.
    pub key: String,
    /// Kind of mutation.
    pub kind: ChangeKind,
    /// The field record after the operation.
    pub field: Field,
}

/// Hook invoked after every mutating operation, once per changed field.
pub type ChangeHook = Arc<dyn Fn(&FieldChange) + Send + Sync>;

/// Changes waiting for delivery, with the hook to deliver them to.
pub(crate) struct Pending {
    hook: ChangeHook,
    changes: Vec<FieldChange>,
}

impl Pending {
    pub(crate) fn new(hook: ChangeHook, changes: Vec<FieldChange>) -> Self {
        Self { hook, changes }
    }

    /// Call the hook for each queued change, in order.
    pub(crate) fn deliver(self) {
        for change in &self.changes {
            (self.hook)(change);
        }
    }
}
