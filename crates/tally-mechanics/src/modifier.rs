//! Typed check modifiers.
//!
//! A modifier shifts the dice pool, the DC, or both. Its category records
//! where it came from; its duration records who keeps re-supplying it. Every
//! category stacks additively, so neither tag affects arithmetic.

use serde::{Deserialize, Serialize};

use crate::error::{MechError, MechResult};

/// The subsystem a modifier originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierCategory {
    /// Gear, tools and weapons.
    Equipment,
    /// Circumstances of the attempt (rushing, careful preparation).
    Situational,
    /// Weather, lighting, terrain.
    Environment,
    /// Properties of the thing or creature acted upon.
    Target,
    /// Disposition, reputation and standing.
    Social,
}

impl ModifierCategory {
    /// Parse a category from its lower-case tag.
    pub fn from_str_tag(s: &str) -> MechResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "equipment" => Ok(Self::Equipment),
            "situational" => Ok(Self::Situational),
            "environment" => Ok(Self::Environment),
            "target" => Ok(Self::Target),
            "social" => Ok(Self::Social),
            other => Err(MechError::InvalidModifier(format!(
                "unknown category '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for ModifierCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Equipment => write!(f, "equipment"),
            Self::Situational => write!(f, "situational"),
            Self::Environment => write!(f, "environment"),
            Self::Target => write!(f, "target"),
            Self::Social => write!(f, "social"),
        }
    }
}

/// How long a modifier stays in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierDuration {
    /// Applies to one check, then it is spent.
    #[default]
    Instant,
    /// Lasts until the current round ends.
    Round,
    /// Lasts until the current scene ends.
    Scene,
    /// Lasts until removed explicitly.
    Persistent,
}

impl ModifierDuration {
    /// Parse a duration from its lower-case tag.
    pub fn from_str_tag(s: &str) -> MechResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "instant" => Ok(Self::Instant),
            "round" => Ok(Self::Round),
            "scene" => Ok(Self::Scene),
            "persistent" => Ok(Self::Persistent),
            other => Err(MechError::InvalidModifier(format!(
                "unknown duration '{other}'"
            ))),
        }
    }
}

impl std::fmt::Display for ModifierDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Instant => write!(f, "instant"),
            Self::Round => write!(f, "round"),
            Self::Scene => write!(f, "scene"),
            Self::Persistent => write!(f, "persistent"),
        }
    }
}

/// A single adjustment to a check's pool and DC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    /// Where the modifier comes from.
    pub category: ModifierCategory,
    /// Dice added to (or removed from) the pool.
    pub dice_delta: i32,
    /// Successes added to (or removed from) the DC.
    pub dc_delta: i32,
    /// How long the modifier lasts.
    #[serde(default)]
    pub duration: ModifierDuration,
    /// Free-form provenance label, e.g. "masterwork lockpicks".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Modifier {
    /// Create a modifier with both deltas.
    pub fn new(
        category: ModifierCategory,
        dice_delta: i32,
        dc_delta: i32,
        duration: ModifierDuration,
    ) -> Self {
        Self {
            category,
            dice_delta,
            dc_delta,
            duration,
            source: None,
        }
    }

    /// An instant modifier that only changes the pool.
    pub fn dice(category: ModifierCategory, delta: i32) -> Self {
        Self::new(category, delta, 0, ModifierDuration::Instant)
    }

    /// An instant modifier that only changes the DC.
    pub fn dc(category: ModifierCategory, delta: i32) -> Self {
        Self::new(category, 0, delta, ModifierDuration::Instant)
    }

    /// Attach a provenance label.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Change the duration.
    pub fn with_duration(mut self, duration: ModifierDuration) -> Self {
        self.duration = duration;
        self
    }

    /// Parse a modifier from `category:dice:dc[:duration]`.
    ///
    /// Deltas may carry an explicit sign: `equipment:+2:0`,
    /// `environment:0:+1:scene`, `social:-1:0`.
    pub fn parse(s: &str) -> MechResult<Self> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        let (category, dice, dc, duration) = match parts.as_slice() {
            [category, dice, dc] => (*category, *dice, *dc, None),
            [category, dice, dc, duration] => (*category, *dice, *dc, Some(*duration)),
            _ => {
                return Err(MechError::InvalidModifier(format!(
                    "expected category:dice:dc[:duration], got '{s}'"
                )));
            }
        };

        let category = ModifierCategory::from_str_tag(category)?;
        let dice_delta = parse_delta(dice)?;
        let dc_delta = parse_delta(dc)?;
        let duration = match duration {
            Some(tag) => ModifierDuration::from_str_tag(tag)?,
            None => ModifierDuration::Instant,
        };

        Ok(Self::new(category, dice_delta, dc_delta, duration))
    }
}

impl std::fmt::Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{:+}:{:+}:{}",
            self.category, self.dice_delta, self.dc_delta, self.duration
        )?;
        if let Some(ref source) = self.source {
            write!(f, " ({source})")?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Modifier {
    type Err = MechError;

    fn from_str(s: &str) -> MechResult<Self> {
        Self::parse(s)
    }
}

fn parse_delta(s: &str) -> MechResult<i32> {
    let s = s.trim();
    let invalid = || MechError::InvalidModifier(format!("invalid delta '{s}'"));
    let digits = match s.strip_prefix('+') {
        Some(rest) if rest.starts_with(['+', '-']) => return Err(invalid()),
        Some(rest) => rest,
        None => s,
    };
    digits.parse::<i32>().map_err(|_| invalid())
}
