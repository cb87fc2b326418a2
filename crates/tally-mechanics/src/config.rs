//! Rule-set configuration for check resolution and sessions.
//!
//! Content supplies these values as JSON. Anything missing falls back to the
//! defaults below; unknown keys are rejected so typos don't silently vanish.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::check::RngContext;
use crate::dice::DieSize;
use crate::error::{MechError, MechResult};
use crate::resolution::MarginBands;

/// Minimum face that scores a success, per die size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SuccessThresholds {
    /// Threshold on a d4.
    pub d4: u32,
    /// Threshold on a d6.
    pub d6: u32,
    /// Threshold on a d8.
    pub d8: u32,
    /// Threshold on a d10.
    pub d10: u32,
}

impl Default for SuccessThresholds {
    fn default() -> Self {
        Self {
            d4: 4,
            d6: 5,
            d8: 6,
            d10: 7,
        }
    }
}

impl SuccessThresholds {
    /// Threshold for the given die size.
    pub fn for_die(&self, die: DieSize) -> u32 {
        match die {
            DieSize::D4 => self.d4,
            DieSize::D6 => self.d6,
            DieSize::D8 => self.d8,
            DieSize::D10 => self.d10,
        }
    }

    fn slot_mut(&mut self, die: DieSize) -> &mut u32 {
        match die {
            DieSize::D4 => &mut self.d4,
            DieSize::D6 => &mut self.d6,
            DieSize::D8 => &mut self.d8,
            DieSize::D10 => &mut self.d10,
        }
    }
}

/// The constants a success-counting rule set fixes for every check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolutionConfig {
    /// Success threshold per die size.
    pub thresholds: SuccessThresholds,
    /// The face that counts as a botch.
    pub botch_face: u32,
    /// Margin bands used by the outcome classifier.
    pub bands: MarginBands,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            thresholds: SuccessThresholds::default(),
            botch_face: 1,
            bands: MarginBands::default(),
        }
    }
}

impl ResolutionConfig {
    /// Set the success threshold for one die size.
    pub fn with_threshold(mut self, die: DieSize, threshold: u32) -> Self {
        *self.thresholds.slot_mut(die) = threshold;
        self
    }

    /// Set the botch face.
    pub fn with_botch_face(mut self, face: u32) -> Self {
        self.botch_face = face;
        self
    }

    /// Set the margin bands.
    pub fn with_bands(mut self, bands: MarginBands) -> Self {
        self.bands = bands;
        self
    }

    /// Returns true if `face` on `die` scores a success.
    pub fn is_success(&self, die: DieSize, face: u32) -> bool {
        face >= self.thresholds.for_die(die)
    }

    /// Returns true if `face` counts as a botch.
    pub fn is_botch(&self, face: u32) -> bool {
        face == self.botch_face
    }

    /// Check that every value respects the engine's invariants.
    pub fn validate(&self) -> MechResult<()> {
        for die in DieSize::ALL {
            let threshold = self.thresholds.for_die(die);
            if !(2..=die.sides()).contains(&threshold) {
                return Err(MechError::InvalidConfig(format!(
                    "{die} threshold {threshold} must be between 2 and {}",
                    die.sides()
                )));
            }
            if self.botch_face >= threshold {
                return Err(MechError::InvalidConfig(format!(
                    "botch face {} must be below the {die} threshold {threshold}",
                    self.botch_face
                )));
            }
        }
        if self.botch_face == 0 {
            return Err(MechError::InvalidConfig(
                "botch face must be at least 1".to_string(),
            ));
        }
        self.bands.validate()
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> MechResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        tracing::debug!(?config, "loaded resolution config");
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_path(path: &Path) -> MechResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Configuration for a check session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    /// Seed for locked sessions.
    pub seed: u64,
    /// How the session's generator is seeded.
    pub context: RngContext,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            context: RngContext::Locked,
        }
    }
}

impl SessionConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the RNG policy.
    pub fn with_context(mut self, context: RngContext) -> Self {
        self.context = context;
        self
    }
}
