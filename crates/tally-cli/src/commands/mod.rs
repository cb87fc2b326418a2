pub mod chain;
pub mod check;
pub mod contest;
pub mod coop;
pub mod extended;

use std::path::Path;

use colored::{ColoredString, Colorize};
use serde::Serialize;

use tally_mechanics::{
    AdvantageState, CheckOutcome, CheckRequest, CheckSession, DieSize, Modifier,
    ResolutionConfig, SessionConfig, aggregate,
};

/// Largest pool the CLI will roll, before or after modifiers.
pub const MAX_DICE: i64 = 1_000;

/// Largest round limit for `extended`.
pub const MAX_ROUNDS: i64 = 1_000;

/// Options every command shares.
pub struct Context {
    pub seed: u64,
    pub rules: ResolutionConfig,
    pub json: bool,
}

impl Context {
    /// Load the rule set, from `config` if given.
    pub fn load(seed: u64, config: Option<&Path>, json: bool) -> Result<Self, String> {
        let rules = match config {
            Some(path) => ResolutionConfig::from_path(path)
                .map_err(|e| format!("failed to load {}: {e}", path.display()))?,
            None => ResolutionConfig::default(),
        };
        Ok(Self { seed, rules, json })
    }

    /// A locked session seeded from `--seed`.
    pub fn session(&self) -> Result<CheckSession, String> {
        CheckSession::new(SessionConfig::default().with_seed(self.seed), self.rules)
            .map_err(|e| e.to_string())
    }
}

/// A pool as given on the command line.
pub struct PoolOptions {
    pub pool: u32,
    pub die: String,
    pub skill: u32,
    pub dc: u32,
    pub mods: Vec<String>,
    pub advantage: bool,
    pub disadvantage: bool,
}

impl PoolOptions {
    /// Build the check request these options describe.
    pub fn request(&self) -> Result<CheckRequest, String> {
        let die = parse_die(&self.die)?;
        let modifiers = self
            .mods
            .iter()
            .map(|tag| Modifier::parse(tag).map_err(|e| e.to_string()))
            .collect::<Result<Vec<_>, _>>()?;
        let advantage = match (self.advantage, self.disadvantage) {
            (true, false) => AdvantageState::Advantage,
            (false, true) => AdvantageState::Disadvantage,
            _ => AdvantageState::Normal,
        };
        let request = CheckRequest::new(self.pool, die, self.dc)
            .with_skill_rank(self.skill)
            .with_advantage(advantage)
            .with_modifiers(modifiers);
        let resolved = aggregate(&request);
        if i64::from(resolved.pool_size) > MAX_DICE {
            return Err(format!(
                "pool of {} dice is too large (at most {MAX_DICE})",
                resolved.pool_size
            ));
        }
        Ok(request)
    }
}

pub fn parse_die(s: &str) -> Result<DieSize, String> {
    DieSize::from_str_tag(s).ok_or_else(|| format!("unknown die '{s}' (expected d4, d6, d8 or d10)"))
}

pub fn outcome_label(outcome: CheckOutcome) -> ColoredString {
    let text = outcome.to_string();
    match outcome {
        CheckOutcome::CriticalSuccess => text.green().bold(),
        CheckOutcome::ExceptionalSuccess | CheckOutcome::Success => text.green(),
        CheckOutcome::MarginalSuccess => text.yellow(),
        CheckOutcome::Failure => text.red(),
        CheckOutcome::CatastrophicFailure => text.red().bold(),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), String> {
    let text = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(())
}

/// Kept faces joined for display, e.g. `9 7 3 1`.
pub fn faces(roll: &tally_mechanics::RollResult) -> String {
    if roll.faces.is_empty() {
        return "--".to_string();
    }
    roll.faces
        .iter()
        .map(|f| f.value.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
