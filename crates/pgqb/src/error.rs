//! Error types for pgqb

use thiserror::Error;

/// Result type alias for pgqb operations
pub type QbResult<T> = Result<T, QbError>;

/// Error types for building and rendering statements.
///
/// Both variants describe misuse of the builder API. They are raised while
/// rendering and are never produced by the values being rendered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QbError {
    /// A node is missing a field it needs in order to render.
    #[error("Malformed statement: {0}")]
    Malformed(String),

    /// Builder methods were called in an order that cannot be rendered.
    #[error("Sequencing error: {0}")]
    Sequence(String),
}

impl QbError {
    /// Create a malformed-structure error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Create a sequencing error
    pub fn sequence(message: impl Into<String>) -> Self {
        Self::Sequence(message.into())
    }

    /// Check if this is a malformed-structure error
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::Malformed(_))
    }

    /// Check if this is a sequencing error
    pub fn is_sequence(&self) -> bool {
        matches!(self, Self::Sequence(_))
    }
}
