//! Cooperative checks: several participants, one result.

use serde::{Deserialize, Serialize};

use crate::check::ResolvedPool;
use crate::config::ResolutionConfig;
use crate::dice::{DieSource, RollResult};
use crate::error::{MechError, MechResult};

/// Net successes a helper needs to lend the primary one die.
pub const ASSIST_THRESHOLD: u32 = 2;

/// How participants' rolls combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CooperationMode {
    /// Only the participant with the smallest pool rolls.
    WeakestLink,
    /// Everyone rolls; the best single roll counts.
    BestAttempt,
    /// Everyone rolls; successes and botches are summed.
    Combined,
    /// One primary rolls. Every helper rolls first, and each helper with
    /// at least [`ASSIST_THRESHOLD`] successes adds a die to the primary.
    Assisted {
        /// Index of the primary participant.
        primary: usize,
    },
}

impl std::fmt::Display for CooperationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WeakestLink => write!(f, "weakest link"),
            Self::BestAttempt => write!(f, "best attempt"),
            Self::Combined => write!(f, "combined"),
            Self::Assisted { primary } => write!(f, "assisted (primary {primary})"),
        }
    }
}

/// Roll a cooperative check and return the single roll to classify.
///
/// Participants roll in list order, each with their own advantage state.
/// Ties in weakest-link and best-attempt go to the earlier participant.
pub fn resolve_cooperative<D: DieSource + ?Sized>(
    mode: CooperationMode,
    participants: &[ResolvedPool],
    config: &ResolutionConfig,
    source: &mut D,
) -> MechResult<RollResult> {
    if participants.is_empty() {
        return Err(MechError::NoParticipants);
    }

    let result = match mode {
        CooperationMode::WeakestLink => {
            let weakest = participants
                .iter()
                .reduce(|min, p| if p.pool_size < min.pool_size { p } else { min })
                .ok_or(MechError::NoParticipants)?;
            roll_one(weakest, config, source)
        }
        CooperationMode::BestAttempt => participants
            .iter()
            .map(|p| roll_one(p, config, source))
            .reduce(|best, r| {
                if r.net_successes > best.net_successes {
                    r
                } else {
                    best
                }
            })
            .ok_or(MechError::NoParticipants)?,
        CooperationMode::Combined => {
            let mut combined = RollResult::default();
            for p in participants {
                combined.absorb(roll_one(p, config, source));
            }
            combined
        }
        CooperationMode::Assisted { primary } => {
            let lead = participants
                .get(primary)
                .ok_or(MechError::InvalidPrimary {
                    index: primary,
                    participants: participants.len(),
                })?;
            let mut assists = 0;
            for (i, helper) in participants.iter().enumerate() {
                if i == primary {
                    continue;
                }
                let help = roll_one(helper, config, source);
                if help.net_successes >= ASSIST_THRESHOLD {
                    assists += 1;
                }
            }
            let boosted = ResolvedPool {
                pool_size: lead.pool_size.saturating_add(assists),
                ..*lead
            };
            tracing::debug!(assists, pool = %boosted, "assisted primary pool");
            roll_one(&boosted, config, source)
        }
    };

    tracing::debug!(
        %mode,
        participants = participants.len(),
        net_successes = result.net_successes,
        botches = result.botches,
        "resolved cooperative roll"
    );
    Ok(result)
}

fn roll_one<D: DieSource + ?Sized>(
    pool: &ResolvedPool,
    config: &ResolutionConfig,
    source: &mut D,
) -> RollResult {
    pool.dice().roll(pool.advantage, config, source)
}
