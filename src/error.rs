//! Error types reported by the pool.
//!
//! Running out of instances is not among them: a capped, exhausted pool simply
//! returns `None` from `acquire`.

use thiserror::Error;

/// Invalid construction input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// No factory was supplied, so the pool could never grow.
    #[error("pool factory is missing")]
    MissingFactory,

    /// No container was supplied to file idle instances under.
    #[error("pool container is missing")]
    MissingContainer,
}

impl PoolError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            PoolError::MissingFactory => "pool_missing_factory",
            PoolError::MissingContainer => "pool_missing_container",
        }
    }
}

/// A release the pool refused. These are logged and otherwise ignored.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseError {
    /// The pool was cleaned up or dropped since the ticket was issued.
    #[error("pool is closed")]
    PoolClosed,

    /// The instance handed back is not the one the ticket was issued for.
    #[error("instance does not belong to slot {slot}")]
    Mismatch {
        /// Roster slot named by the ticket.
        slot: usize,
    },
}

impl ReleaseError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            ReleaseError::PoolClosed => "release_pool_closed",
            ReleaseError::Mismatch { .. } => "release_mismatch",
        }
    }
}
