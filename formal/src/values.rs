//! Reading field values out of a form.

use std::fmt;

use indexmap::IndexMap;

/// Field values keyed by field name, in field order.
pub type FormValues = IndexMap<String, String>;

type FormatFn = dyn Fn(&str) -> String + Send + Sync;

/// Options for [`FieldStore::values_with`](crate::FieldStore::values_with).
#[derive(Default)]
pub struct ValuesOptions {
    format: Option<Box<FormatFn>>,
}

impl ValuesOptions {
    /// Options with no transform.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transform each value on the way out. Field state is not changed.
    pub fn format<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.format = Some(Box::new(f));
        self
    }

    pub(crate) fn apply(&self, value: &str) -> String {
        match &self.format {
            Some(format) => format(value),
            None => value.to_string(),
        }
    }
}

impl fmt::Debug for ValuesOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValuesOptions")
            .field("format", &self.format.is_some())
            .finish()
    }
}
