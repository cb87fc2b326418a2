//! Outcome classification and multi-roll resolvers.
//!
//! [`classify`] turns one counted roll and a DC into a [`CheckResult`].
//! The contested and cooperative resolvers run the same pipeline several
//! times and combine the results by their own rules.

pub mod contested;
pub mod cooperative;

pub use contested::{ContestedOutcome, ContestedResult, resolve_contested};
pub use cooperative::{CooperationMode, resolve_cooperative};

use serde::{Deserialize, Serialize};

use crate::dice::RollResult;
use crate::error::{MechError, MechResult};

/// The tier a check lands in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CheckOutcome {
    /// A fumble: no successes and at least one botch.
    CatastrophicFailure,
    /// Fewer successes than the DC.
    Failure,
    /// Met the DC exactly.
    MarginalSuccess,
    /// Beat the DC by less than the exceptional band.
    Success,
    /// Beat the DC by at least the exceptional band.
    ExceptionalSuccess,
    /// Beat the DC by at least the critical band.
    CriticalSuccess,
}

impl CheckOutcome {
    /// Returns true for every tier at or above the DC.
    pub fn is_success(self) -> bool {
        self >= Self::MarginalSuccess
    }
}

impl std::fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CatastrophicFailure => write!(f, "Catastrophic Failure"),
            Self::Failure => write!(f, "Failure"),
            Self::MarginalSuccess => write!(f, "Marginal Success"),
            Self::Success => write!(f, "Success"),
            Self::ExceptionalSuccess => write!(f, "Exceptional Success"),
            Self::CriticalSuccess => write!(f, "Critical Success"),
        }
    }
}

/// Margin thresholds above the bare success line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MarginBands {
    /// Smallest margin that counts as exceptional.
    pub exceptional: u32,
    /// Smallest margin that counts as critical.
    pub critical: u32,
}

impl Default for MarginBands {
    fn default() -> Self {
        Self {
            exceptional: 5,
            critical: 10,
        }
    }
}

impl MarginBands {
    /// Create a band pair. Call [`validate`](Self::validate) before use if the
    /// values come from content.
    pub fn new(exceptional: u32, critical: u32) -> Self {
        Self {
            exceptional,
            critical,
        }
    }

    /// Bands must be positive and strictly increasing.
    pub fn validate(&self) -> MechResult<()> {
        if self.exceptional == 0 || self.exceptional >= self.critical {
            return Err(MechError::InvalidConfig(format!(
                "margin bands must satisfy 0 < exceptional ({}) < critical ({})",
                self.exceptional, self.critical
            )));
        }
        Ok(())
    }

    /// The non-fumble tier for a margin.
    pub fn tier(&self, margin: i64) -> CheckOutcome {
        if margin < 0 {
            CheckOutcome::Failure
        } else if margin == 0 {
            CheckOutcome::MarginalSuccess
        } else if margin < i64::from(self.exceptional) {
            CheckOutcome::Success
        } else if margin < i64::from(self.critical) {
            CheckOutcome::ExceptionalSuccess
        } else {
            CheckOutcome::CriticalSuccess
        }
    }
}

/// The classified result of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// The outcome tier.
    pub outcome: CheckOutcome,
    /// Successes counted on the kept roll.
    pub net_successes: u32,
    /// Net successes minus DC.
    pub margin: i64,
    /// True when the roll fumbled.
    pub is_fumble: bool,
}

impl CheckResult {
    /// Returns true if the check met its DC without fumbling.
    pub fn is_success(&self) -> bool {
        self.outcome.is_success()
    }
}

impl std::fmt::Display for CheckResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} successes, margin {:+})",
            self.outcome, self.net_successes, self.margin
        )
    }
}

/// Classify a roll against a DC using the default margin bands.
pub fn classify(roll: &RollResult, dc: u32) -> CheckResult {
    classify_with(roll, dc, &MarginBands::default())
}

/// Classify a roll against a DC.
///
/// A fumble is reported as [`CheckOutcome::CatastrophicFailure`] whatever the
/// DC, including DC 0. Otherwise the margin picks the tier.
pub fn classify_with(roll: &RollResult, dc: u32, bands: &MarginBands) -> CheckResult {
    let margin = i64::from(roll.net_successes) - i64::from(dc);
    let is_fumble = roll.is_fumble();
    let outcome = if is_fumble {
        CheckOutcome::CatastrophicFailure
    } else {
        bands.tier(margin)
    };
    tracing::debug!(
        net_successes = roll.net_successes,
        botches = roll.botches,
        dc,
        margin,
        %outcome,
        "classified roll"
    );
    CheckResult {
        outcome,
        net_successes: roll.net_successes,
        margin,
        is_fumble,
    }
}
