//! Error taxonomy for layout and reconciliation operations.
//!
//! Errors stay local to the box or listener that produced them. Nothing in
//! this crate treats a failure as fatal to the whole process.

use taffy::{NodeId, TaffyError};

/// Convenience result type used across spark-motion.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A layout node was used after it was removed from the engine.
    #[error("layout node {0:?} used after removal")]
    StaleNode(NodeId),

    /// The same child node was inserted twice.
    #[error("layout node {0:?} is already a child")]
    DuplicateChild(NodeId),

    /// A constraint value does not fit the property's schema.
    #[error("invalid value for `{property}`: {reason}")]
    InvalidConstraint {
        property: &'static str,
        reason: String,
    },

    /// The layout engine rejected an operation.
    #[error("layout engine error: {0}")]
    Engine(String),
}

impl Error {
    /// Build an [`Error::InvalidConstraint`] value.
    pub fn invalid(property: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConstraint {
            property,
            reason: reason.into(),
        }
    }

    /// True for the fail-fast stale handle case.
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleNode(_))
    }
}

impl From<TaffyError> for Error {
    fn from(err: TaffyError) -> Self {
        Self::Engine(err.to_string())
    }
}
