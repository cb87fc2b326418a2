//! Check requests and the single-check pipeline.
//!
//! A [`CheckRequest`] is built fresh per attempt by whichever subsystem wants
//! a roll. [`aggregate`] reduces it to a [`ResolvedPool`], the dice pool rolls
//! it, and the classifier turns the faces into a
//! [`CheckResult`](crate::resolution::CheckResult).

pub mod aggregate;

pub use aggregate::{ResolvedPool, aggregate};

use serde::{Deserialize, Serialize};

use crate::config::ResolutionConfig;
use crate::dice::{AdvantageState, DieSize, DieSource, PoolRoll};
use crate::modifier::Modifier;
use crate::resolution::{CheckResult, classify_with};

/// How the random source behind a check is seeded.
///
/// The engine never owns a generator; this tag tells the session layer which
/// policy governs the one it passes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RngContext {
    /// Seed fixed for the whole logical session (combat, crafting).
    #[default]
    Locked,
    /// Seed re-derived every time game state loads (exploration, dialogue).
    Fresh,
}

impl std::fmt::Display for RngContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Locked => write!(f, "locked"),
            Self::Fresh => write!(f, "fresh"),
        }
    }
}

/// A request to perform one check.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckRequest {
    /// Dice from the base attribute.
    pub base_pool: u32,
    /// Die size for the pool.
    pub die: DieSize,
    /// Successes required before modifiers.
    pub base_dc: u32,
    /// Skill rank; each rank adds one die.
    #[serde(default)]
    pub skill_rank: u32,
    /// Advantage state for this roll.
    #[serde(default)]
    pub advantage: AdvantageState,
    /// Modifiers from every contributing subsystem, in issue order.
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    /// Seeding policy of the random source this check is rolled with.
    #[serde(default)]
    pub rng_context: RngContext,
}

impl CheckRequest {
    /// Create a request with no skill, modifiers or advantage.
    pub fn new(base_pool: u32, die: DieSize, base_dc: u32) -> Self {
        Self {
            base_pool,
            die,
            base_dc,
            ..Self::default()
        }
    }

    /// Set the skill rank.
    pub fn with_skill_rank(mut self, rank: u32) -> Self {
        self.skill_rank = rank;
        self
    }

    /// Set the advantage state.
    pub fn with_advantage(mut self, advantage: AdvantageState) -> Self {
        self.advantage = advantage;
        self
    }

    /// Append one modifier.
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Append several modifiers, keeping their order.
    pub fn with_modifiers(mut self, modifiers: impl IntoIterator<Item = Modifier>) -> Self {
        self.modifiers.extend(modifiers);
        self
    }

    /// Set the RNG policy tag.
    pub fn with_context(mut self, context: RngContext) -> Self {
        self.rng_context = context;
        self
    }
}

/// Everything one check produced, for audit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRecord {
    /// The pool and DC that were rolled.
    pub pool: ResolvedPool,
    /// The kept trial and, under advantage, the discarded one.
    pub roll: PoolRoll,
    /// The classified result.
    pub result: CheckResult,
}

/// Resolve a request end to end, keeping the audit trail.
pub fn resolve_check_traced<D: DieSource + ?Sized>(
    request: &CheckRequest,
    config: &ResolutionConfig,
    source: &mut D,
) -> CheckRecord {
    let pool = aggregate(request);
    resolve_pool_traced(&pool, config, source)
}

/// Roll and classify an already-resolved pool, keeping the audit trail.
pub fn resolve_pool_traced<D: DieSource + ?Sized>(
    pool: &ResolvedPool,
    config: &ResolutionConfig,
    source: &mut D,
) -> CheckRecord {
    let roll = pool.dice().roll_traced(pool.advantage, config, source);
    let result = classify_with(&roll.kept, pool.dc, &config.bands);
    CheckRecord {
        pool: *pool,
        roll,
        result,
    }
}

/// Resolve a request end to end.
pub fn resolve_check<D: DieSource + ?Sized>(
    request: &CheckRequest,
    config: &ResolutionConfig,
    source: &mut D,
) -> CheckResult {
    resolve_check_traced(request, config, source).result
}
