//! Multi-round and multi-step procedures.
//!
//! An [`ExtendedCheck`] accumulates successes over several rounds toward a
//! threshold. A [`ChainedCheck`] walks an ordered list of independent steps,
//! each with its own retry policy. Both are plain mutable state owned by one
//! in-flight procedure; they hold no generator and roll nothing themselves.

pub mod chained;
pub mod extended;

pub use chained::{ChainStep, ChainedCheck, ChainedStatus, RetryPolicy};
pub use extended::{ExtendedCheck, ExtendedStatus, FUMBLE_LIMIT};

use serde::{Deserialize, Serialize};

/// The status of either kind of procedure, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProcedureStatus {
    /// Status of an extended check.
    Extended(ExtendedStatus),
    /// Status of a chained check.
    Chained(ChainedStatus),
}

impl std::fmt::Display for ProcedureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extended(status) => write!(f, "{status}"),
            Self::Chained(status) => write!(f, "{status}"),
        }
    }
}
