//! Contested checks: initiator against defender.
//!
//! Fumbles are settled before successes are compared. A fumbling side can
//! still show more successes than a clean one on paper, so the order of the
//! rules below matters.

use serde::{Deserialize, Serialize};

use super::CheckResult;

/// The relative outcome of a contest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContestedOutcome {
    /// The initiator scored more successes.
    InitiatorWins,
    /// The defender scored more successes.
    DefenderWins,
    /// Equal successes, nobody fumbled. The caller decides how much the
    /// initiator's edge is worth.
    Tie,
    /// Both sides fumbled.
    BothFumble,
    /// Only the initiator fumbled.
    InitiatorFumble,
    /// Only the defender fumbled.
    DefenderFumble,
}

impl std::fmt::Display for ContestedOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InitiatorWins => write!(f, "Initiator Wins"),
            Self::DefenderWins => write!(f, "Defender Wins"),
            Self::Tie => write!(f, "Tie"),
            Self::BothFumble => write!(f, "Both Fumble"),
            Self::InitiatorFumble => write!(f, "Initiator Fumble"),
            Self::DefenderFumble => write!(f, "Defender Fumble"),
        }
    }
}

/// The result of a contest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContestedResult {
    /// Who came out ahead.
    pub outcome: ContestedOutcome,
    /// How far ahead. For a one-sided fumble this is the other side's
    /// successes; for a tie or double fumble it is zero.
    pub margin: u32,
}

impl std::fmt::Display for ContestedResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (margin {})", self.outcome, self.margin)
    }
}

/// Compare two check results.
///
/// First matching rule wins:
/// 1. both fumble,
/// 2. initiator fumbles,
/// 3. defender fumbles,
/// 4. more successes wins by the difference,
/// 5. otherwise a tie.
pub fn resolve_contested(initiator: &CheckResult, defender: &CheckResult) -> ContestedResult {
    let (outcome, margin) = match (initiator.is_fumble, defender.is_fumble) {
        (true, true) => (ContestedOutcome::BothFumble, 0),
        (true, false) => (ContestedOutcome::InitiatorFumble, defender.net_successes),
        (false, true) => (ContestedOutcome::DefenderFumble, initiator.net_successes),
        (false, false) => {
            let margin = initiator.net_successes.abs_diff(defender.net_successes);
            let outcome = match initiator.net_successes.cmp(&defender.net_successes) {
                std::cmp::Ordering::Greater => ContestedOutcome::InitiatorWins,
                std::cmp::Ordering::Less => ContestedOutcome::DefenderWins,
                std::cmp::Ordering::Equal => ContestedOutcome::Tie,
            };
            (outcome, margin)
        }
    };
    tracing::debug!(
        initiator = initiator.net_successes,
        defender = defender.net_successes,
        %outcome,
        margin,
        "resolved contest"
    );
    ContestedResult { outcome, margin }
}
