//! Error types for the core library.

use crate::node::Pnid;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
///
/// Lookups never produce these; a miss is an empty `Option` or an empty
/// spare set. Every variant leaves the registry exactly as it was before the
/// failing call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// pnid outside `[0, max)`
    #[error("Invalid pnid {pnid}: should be >= 0 and < {max}")]
    InvalidPnid { pnid: Pnid, max: usize },

    /// Slot already holds a live record
    #[error("pnid {0} is already in use")]
    PnidInUse(Pnid),

    /// Mutation addressed at an empty slot
    #[error("No node registered at pnid {0}")]
    NodeNotFound(Pnid),

    /// Hostname empty or too long
    #[error("Invalid node name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// A target is already backed by another spare and overlaps are rejected
    #[error("pnid {target} is already backed by spare pnid {owner}")]
    SpareConflict { target: Pnid, owner: Pnid },

    /// Caller broke a precondition; the request is unrecoverable as issued
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Registry configuration rejected
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn invalid_name<N: Into<String>, R: Into<String>>(name: N, reason: R) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn invariant<T: Into<String>>(msg: T) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        Self::Config(msg.into())
    }

    /// True for errors that indicate a buggy configuration input rather than a
    /// lookup miss or range slip.
    pub fn is_configuration_bug(&self) -> bool {
        matches!(
            self,
            Error::PnidInUse(_)
                | Error::InvalidName { .. }
                | Error::SpareConflict { .. }
                | Error::InvariantViolation(_)
        )
    }
}
