//! Extended checks: successes accumulated over a limited number of rounds.

use serde::{Deserialize, Serialize};

use super::ProcedureStatus;
use crate::error::{MechError, MechResult};
use crate::resolution::CheckResult;

/// Consecutive fumbles that end an extended check catastrophically.
pub const FUMBLE_LIMIT: u32 = 3;

/// Lifecycle of an extended check.
///
/// Only moves forward. The last four states are terminal; a new attempt
/// needs a new [`ExtendedCheck`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ExtendedStatus {
    /// No round has been rolled yet.
    #[default]
    NotStarted,
    /// At least one round rolled, still short of the threshold.
    InProgress,
    /// The threshold was reached.
    Succeeded,
    /// Rounds ran out before the threshold.
    Failed,
    /// Too many fumbles in a row.
    CatastrophicFailure,
    /// The caller gave up.
    Abandoned,
}

impl ExtendedStatus {
    /// Returns true if no further rounds may be applied.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Succeeded | Self::Failed | Self::CatastrophicFailure | Self::Abandoned
        )
    }
}

impl std::fmt::Display for ExtendedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotStarted => write!(f, "Not Started"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Succeeded => write!(f, "Succeeded"),
            Self::Failed => write!(f, "Failed"),
            Self::CatastrophicFailure => write!(f, "Catastrophic Failure"),
            Self::Abandoned => write!(f, "Abandoned"),
        }
    }
}

/// State of one extended check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedCheck {
    accumulated_successes: u32,
    target_threshold: u32,
    rounds_used: u32,
    max_rounds: u32,
    consecutive_fumbles: u32,
    status: ExtendedStatus,
}

impl ExtendedCheck {
    /// Start tracking a procedure that needs `target_threshold` successes
    /// within `max_rounds` rounds. Both must be positive.
    pub fn new(target_threshold: u32, max_rounds: u32) -> MechResult<Self> {
        if target_threshold == 0 {
            return Err(MechError::InvalidConfig(
                "extended check target must be positive".to_string(),
            ));
        }
        if max_rounds == 0 {
            return Err(MechError::InvalidConfig(
                "extended check needs at least one round".to_string(),
            ));
        }
        Ok(Self {
            accumulated_successes: 0,
            target_threshold,
            rounds_used: 0,
            max_rounds,
            consecutive_fumbles: 0,
            status: ExtendedStatus::NotStarted,
        })
    }

    /// Current status.
    pub fn status(&self) -> ExtendedStatus {
        self.status
    }

    /// Returns true if the procedure has finished.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Successes banked so far.
    pub fn accumulated_successes(&self) -> u32 {
        self.accumulated_successes
    }

    /// Successes needed to succeed.
    pub fn target_threshold(&self) -> u32 {
        self.target_threshold
    }

    /// Rounds applied so far.
    pub fn rounds_used(&self) -> u32 {
        self.rounds_used
    }

    /// Round limit.
    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Rounds left before the limit.
    pub fn rounds_remaining(&self) -> u32 {
        self.max_rounds.saturating_sub(self.rounds_used)
    }

    /// Fumbles in a row ending with the latest round.
    pub fn consecutive_fumbles(&self) -> u32 {
        self.consecutive_fumbles
    }

    /// Fraction of the threshold reached (0.0 to 1.0).
    pub fn progress(&self) -> f64 {
        (f64::from(self.accumulated_successes) / f64::from(self.target_threshold)).min(1.0)
    }

    /// Apply one round's result and return the new status.
    ///
    /// A fumble adds nothing and extends the fumble streak; reaching
    /// [`FUMBLE_LIMIT`] ends the procedure catastrophically no matter how
    /// many rounds or successes remain. Otherwise the streak resets and the
    /// round's successes are banked. The threshold is checked before the
    /// round limit.
    pub fn advance_round(&mut self, round: &CheckResult) -> MechResult<ExtendedStatus> {
        self.ensure_open()?;
        let previous = self.status;

        self.rounds_used += 1;
        if round.is_fumble {
            self.consecutive_fumbles += 1;
            if self.consecutive_fumbles >= FUMBLE_LIMIT {
                self.status = ExtendedStatus::CatastrophicFailure;
                self.log_transition(previous);
                return Ok(self.status);
            }
        } else {
            self.consecutive_fumbles = 0;
            self.accumulated_successes = self
                .accumulated_successes
                .saturating_add(round.net_successes);
        }

        self.status = if self.accumulated_successes >= self.target_threshold {
            ExtendedStatus::Succeeded
        } else if self.rounds_used >= self.max_rounds {
            ExtendedStatus::Failed
        } else {
            ExtendedStatus::InProgress
        };
        self.log_transition(previous);
        Ok(self.status)
    }

    /// Give up on the procedure.
    pub fn abandon(&mut self) -> MechResult<ExtendedStatus> {
        self.ensure_open()?;
        let previous = self.status;
        self.status = ExtendedStatus::Abandoned;
        self.log_transition(previous);
        Ok(self.status)
    }

    fn ensure_open(&self) -> MechResult<()> {
        if self.status.is_terminal() {
            tracing::warn!(status = %self.status, "extended check already finished");
            return Err(MechError::TerminalProcedure(ProcedureStatus::Extended(
                self.status,
            )));
        }
        Ok(())
    }

    fn log_transition(&self, previous: ExtendedStatus) {
        tracing::debug!(
            from = %previous,
            to = %self.status,
            accumulated = self.accumulated_successes,
            target = self.target_threshold,
            round = self.rounds_used,
            max_rounds = self.max_rounds,
            fumbles = self.consecutive_fumbles,
            "extended check advanced"
        );
    }
}

impl std::fmt::Display for ExtendedCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {}/{} successes, round {}/{}",
            self.status,
            self.accumulated_successes,
            self.target_threshold,
            self.rounds_used,
            self.max_rounds
        )
    }
}
