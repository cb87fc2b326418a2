//! Dice pool construction and rolling.

use serde::{Deserialize, Serialize};

use super::roll::{DieFace, RollResult};
use super::{AdvantageState, DieSize, DieSource};
use crate::config::ResolutionConfig;
use crate::error::{MechError, MechResult};

/// A number of same-sized dice to be rolled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DicePool {
    /// The die size every die in the pool shares.
    pub die: DieSize,
    /// How many dice are rolled.
    pub size: u32,
}

/// Both trials of a pool roll, for audit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolRoll {
    /// The trial that counts.
    pub kept: RollResult,
    /// The other trial when the pool was rolled twice.
    pub discarded: Option<RollResult>,
}

impl DicePool {
    /// Create a pool of `size` dice of the given type.
    pub fn new(die: DieSize, size: u32) -> Self {
        Self { die, size }
    }

    /// Create a pool from unchecked numbers, rejecting negative sizes and
    /// unsupported dice.
    pub fn from_raw(size: i64, sides: u32) -> MechResult<Self> {
        let die = DieSize::from_sides(sides)?;
        let size = u32::try_from(size).map_err(|_| MechError::InvalidPoolSize(size))?;
        Ok(Self { die, size })
    }

    /// Returns how many dice are in the pool.
    pub fn count(&self) -> u32 {
        self.size
    }

    /// Returns true if the pool has no dice.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Roll every die once and count the result.
    ///
    /// An empty pool draws nothing from `source` and yields zero successes
    /// and zero botches.
    pub fn roll_once<D: DieSource + ?Sized>(
        &self,
        config: &ResolutionConfig,
        source: &mut D,
    ) -> RollResult {
        let faces = (0..self.size)
            .map(|_| DieFace {
                die: self.die,
                value: source.roll_die(self.die),
            })
            .collect();
        let result = RollResult::from_faces(faces, config);
        tracing::trace!(pool = %self, faces = %result, "rolled pool");
        result
    }

    /// Roll the pool under an advantage state, keeping both trials.
    ///
    /// Advantage keeps the trial with more successes, disadvantage the one
    /// with fewer. On a tie the first trial is kept.
    pub fn roll_traced<D: DieSource + ?Sized>(
        &self,
        advantage: AdvantageState,
        config: &ResolutionConfig,
        source: &mut D,
    ) -> PoolRoll {
        let first = self.roll_once(config, source);
        if !advantage.rolls_twice() {
            return PoolRoll {
                kept: first,
                discarded: None,
            };
        }

        let second = self.roll_once(config, source);
        let second_wins = match advantage {
            AdvantageState::Advantage => second.net_successes > first.net_successes,
            AdvantageState::Disadvantage => second.net_successes < first.net_successes,
            AdvantageState::Normal => false,
        };
        let (kept, discarded) = if second_wins {
            (second, first)
        } else {
            (first, second)
        };
        PoolRoll {
            kept,
            discarded: Some(discarded),
        }
    }

    /// Roll the pool under an advantage state and return the kept trial.
    pub fn roll<D: DieSource + ?Sized>(
        &self,
        advantage: AdvantageState,
        config: &ResolutionConfig,
        source: &mut D,
    ) -> RollResult {
        self.roll_traced(advantage, config, source).kept
    }
}

impl std::fmt::Display for DicePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.size, self.die)
    }
}

/// Roll `pool_size` dice with `sides` faces.
///
/// This is the unchecked entry point: a negative size or an unsupported die
/// is reported as an error instead of being clamped.
pub fn roll<D: DieSource + ?Sized>(
    pool_size: i64,
    sides: u32,
    advantage: AdvantageState,
    config: &ResolutionConfig,
    source: &mut D,
) -> MechResult<RollResult> {
    let pool = DicePool::from_raw(pool_size, sides)?;
    Ok(pool.roll(advantage, config, source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedFaces;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn empty_pool() {
        let pool = DicePool::new(DieSize::D10, 0);
        assert!(pool.is_empty());
        let mut source = ScriptedFaces::empty();
        let result = pool.roll(
            AdvantageState::Advantage,
            &ResolutionConfig::default(),
            &mut source,
        );
        assert_eq!(result, RollResult::default());
    }

    #[test]
    fn roll_produces_valid_values() {
        let mut rng = StdRng::seed_from_u64(42);
        let pool = DicePool::new(DieSize::D6, 10);
        let result = pool.roll(AdvantageState::Normal, &ResolutionConfig::default(), &mut rng);
        assert_eq!(result.count(), 10);
        for face in &result.faces {
            assert!((1..=6).contains(&face.value));
        }
    }

    #[test]
    fn roll_deterministic_with_seed() {
        let pool = DicePool::new(DieSize::D10, 6);
        let cfg = ResolutionConfig::default();
        let mut rng1 = StdRng::seed_from_u64(99);
        let mut rng2 = StdRng::seed_from_u64(99);
        let r1 = pool.roll(AdvantageState::Advantage, &cfg, &mut rng1);
        let r2 = pool.roll(AdvantageState::Advantage, &cfg, &mut rng2);
        assert_eq!(r1, r2);
    }

    #[test]
    fn advantage_keeps_higher_trial() {
        let pool = DicePool::new(DieSize::D10, 2);
        let cfg = ResolutionConfig::default();
        let mut source = ScriptedFaces::new([2, 3, 8, 9]);
        let traced = pool.roll_traced(AdvantageState::Advantage, &cfg, &mut source);
        assert_eq!(traced.kept.net_successes, 2);
        assert_eq!(traced.discarded.map(|r| r.net_successes), Some(0));
    }

    #[test]
    fn advantage_tie_keeps_first() {
        let pool = DicePool::new(DieSize::D10, 1);
        let cfg = ResolutionConfig::default();
        let mut source = ScriptedFaces::new([8, 9]);
        let traced = pool.roll_traced(AdvantageState::Advantage, &cfg, &mut source);
        assert_eq!(traced.kept.faces[0].value, 8);
    }

    #[test]
    fn disadvantage_keeps_lower_trial() {
        let pool = DicePool::new(DieSize::D10, 2);
        let cfg = ResolutionConfig::default();
        let mut source = ScriptedFaces::new([8, 9, 1, 3]);
        let result = pool.roll(AdvantageState::Disadvantage, &cfg, &mut source);
        assert_eq!(result.net_successes, 0);
        assert_eq!(result.botches, 1);
    }

    #[test]
    fn normal_rolls_once() {
        let pool = DicePool::new(DieSize::D10, 2);
        let mut source = ScriptedFaces::new([8, 9, 1, 3]);
        let traced = pool.roll_traced(
            AdvantageState::Normal,
            &ResolutionConfig::default(),
            &mut source,
        );
        assert!(traced.discarded.is_none());
        assert_eq!(source.remaining(), 2);
    }

    #[test]
    fn raw_roll_rejects_negative_pool() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = roll(
            -1,
            10,
            AdvantageState::Normal,
            &ResolutionConfig::default(),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, MechError::InvalidPoolSize(-1)));
    }

    #[test]
    fn raw_roll_rejects_unsupported_die() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = roll(
            3,
            12,
            AdvantageState::Normal,
            &ResolutionConfig::default(),
            &mut rng,
        )
        .unwrap_err();
        assert!(matches!(err, MechError::UnsupportedDie(12)));
    }

    #[test]
    fn display() {
        assert_eq!(DicePool::new(DieSize::D10, 7).to_string(), "7d10");
    }
}
