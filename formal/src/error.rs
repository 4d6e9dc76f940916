//! Error types

/// Errors raised by per-field operations on a form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// The requested field does not exist in the form.
    #[error("Field '{key}' does not exist")]
    NotFound { key: String },
}

impl FormError {
    /// Creates a new missing field error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    /// Returns the key the failed operation was called with.
    pub fn key(&self) -> &str {
        match self {
            Self::NotFound { key } => key,
        }
    }
}

/// Result type for form operations.
pub type Result<T> = std::result::Result<T, FormError>;
