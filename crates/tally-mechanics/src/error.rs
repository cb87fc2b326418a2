//! Error types for the resolution engine.
//!
//! Every variant here is a defect in the calling code or in loaded
//! configuration. Bad dice are never errors: fumbles, ties and catastrophic
//! procedure failures are ordinary result values.

use crate::procedure::ProcedureStatus;

/// Errors that can occur during mechanics operations.
#[derive(Debug, thiserror::Error)]
pub enum MechError {
    /// A dice pool was asked to roll a negative number of dice.
    #[error("invalid pool size: {0}")]
    InvalidPoolSize(i64),

    /// A die with a face count the engine does not support.
    #[error("unsupported die: d{0} (expected d4, d6, d8 or d10)")]
    UnsupportedDie(u32),

    /// A cooperative check was resolved with no participants.
    #[error("cooperative check needs at least one participant")]
    NoParticipants,

    /// An assisted check named a primary outside the participant list.
    #[error("primary participant {index} out of range ({participants} participants)")]
    InvalidPrimary {
        /// The requested primary index.
        index: usize,
        /// How many participants were supplied.
        participants: usize,
    },

    /// A multi-round or multi-step procedure was driven past its end.
    #[error("procedure already finished with status {0}")]
    TerminalProcedure(ProcedureStatus),

    /// A modifier tag could not be parsed.
    #[error("invalid modifier: {0}")]
    InvalidModifier(String),

    /// Configuration values break an engine invariant.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Reading a configuration file failed.
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration document is not valid JSON for the expected shape.
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience result type for mechanics operations.
pub type MechResult<T> = Result<T, MechError>;
