//! Reactive form-state container.
//!
//! A [`FieldStore`] holds named fields, each with a string value and an ordered
//! list of [`Rule`]s. It tracks which fields the user has touched, caches
//! validation results, and derives per-field and whole-form validity plus the
//! error text to show next to each input.
//!
//! # Example
//!
//! ```
//! use formal::prelude::*;
//! use formal::validators::{is_required, is_valid_email};
//!
//! let mut form = FieldStore::builder()
//!     .field("email", "", [is_required(), is_valid_email()])
//!     .field("name", "", [is_required()])
//!     .build();
//!
//! form.handle_change("email")("wow").unwrap();
//! assert_eq!(form.errors_of("email").unwrap(), "Must be a valid email address.");
//! assert_eq!(form.errors_of("name").unwrap(), "");
//!
//! // Submitting surfaces errors on fields the user never touched.
//! form.validate_all_fields();
//! assert_eq!(form.errors_of("name").unwrap(), "Field is required.");
//! assert!(!form.is_valid());
//! ```

pub mod error;
pub mod field;
pub mod notify;
pub mod rule;
pub mod shared;
pub mod store;
pub mod validators;
pub mod values;

pub use error::{FormError, Result};
pub use field::{Field, FieldInit, Validation};
pub use notify::{ChangeHook, ChangeKind, FieldChange};
pub use rule::{Rule, RuleSpec, ValidationResult, make_rule};
pub use shared::{ChangeHandler, SharedForm};
pub use store::{FieldError, FieldStore, FieldStoreBuilder};
pub use values::{FormValues, ValuesOptions};

pub mod prelude {
    pub use crate::error::{FormError, Result};
    pub use crate::field::{FieldInit, Validation};
    pub use crate::notify::{ChangeKind, FieldChange};
    pub use crate::rule::{Rule, RuleSpec, ValidationResult, make_rule};
    pub use crate::shared::SharedForm;
    pub use crate::store::{FieldStore, FieldStoreBuilder};
    pub use crate::values::ValuesOptions;
}
