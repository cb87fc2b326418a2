//! Dice types, pools, and rolling.
//!
//! Pools are made of same-sized dice (d4 through d10). Successes are counted
//! per die, never summed. Randomness is always injected through a
//! [`DieSource`], so the pool itself holds no generator state.

pub mod pool;
pub mod roll;

pub use pool::{DicePool, PoolRoll, roll};
pub use roll::{DieFace, RollResult};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};

/// A die size supported by the resolution engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum DieSize {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die. Resolution rolls use this size.
    #[default]
    D10,
}

impl DieSize {
    /// All supported sizes, smallest first.
    pub const ALL: [DieSize; 4] = [Self::D4, Self::D6, Self::D8, Self::D10];

    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
        }
    }

    /// Look up a die size by face count.
    pub fn from_sides(sides: u32) -> MechResult<Self> {
        match sides {
            4 => Ok(Self::D4),
            6 => Ok(Self::D6),
            8 => Ok(Self::D8),
            10 => Ok(Self::D10),
            other => Err(MechError::UnsupportedDie(other)),
        }
    }

    /// Parse a die from a string like "d10" or "D6".
    pub fn from_str_tag(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let sides = s.strip_prefix('d')?.parse::<u32>().ok()?;
        Self::from_sides(sides).ok()
    }
}

impl TryFrom<u32> for DieSize {
    type Error = MechError;

    fn try_from(sides: u32) -> MechResult<Self> {
        Self::from_sides(sides)
    }
}

impl From<DieSize> for u32 {
    fn from(die: DieSize) -> u32 {
        die.sides()
    }
}

impl std::fmt::Display for DieSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

/// Whether a roll is taken once, or twice keeping the better or worse trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AdvantageState {
    /// Roll once.
    #[default]
    Normal,
    /// Roll twice, keep the trial with more successes.
    Advantage,
    /// Roll twice, keep the trial with fewer successes.
    Disadvantage,
}

impl AdvantageState {
    /// Merge two advantage sources. Advantage and disadvantage cancel out.
    pub fn combine(self, other: AdvantageState) -> AdvantageState {
        match (self, other) {
            (Self::Normal, x) | (x, Self::Normal) => x,
            (Self::Advantage, Self::Disadvantage) | (Self::Disadvantage, Self::Advantage) => {
                Self::Normal
            }
            (Self::Advantage, Self::Advantage) => Self::Advantage,
            (Self::Disadvantage, Self::Disadvantage) => Self::Disadvantage,
        }
    }

    /// Returns true if this state rolls the pool twice.
    pub fn rolls_twice(self) -> bool {
        !matches!(self, Self::Normal)
    }
}

impl std::fmt::Display for AdvantageState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Normal => write!(f, "normal"),
            Self::Advantage => write!(f, "advantage"),
            Self::Disadvantage => write!(f, "disadvantage"),
        }
    }
}

/// A source of die faces.
///
/// Implemented for every [`rand::Rng`], and by
/// [`ScriptedFaces`](crate::testing::ScriptedFaces) for exact rolls in tests.
pub trait DieSource {
    /// Produce one face in `1..=die.sides()`.
    fn roll_die(&mut self, die: DieSize) -> u32;
}

impl<R: Rng + ?Sized> DieSource for R {
    fn roll_die(&mut self, die: DieSize) -> u32 {
        self.random_range(1..=die.sides())
    }
}
