//! Check sessions.
//!
//! A `CheckSession` is the host-side owner of everything the resolution
//! functions refuse to own: the random generator and its seeding policy,
//! modifiers that outlive a single check, and an audit log of what was
//! rolled. One session belongs to one logical activity (a fight, a crafting
//! job, a conversation); share it across threads only behind your own lock.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::check::{CheckRecord, CheckRequest, ResolvedPool, RngContext, aggregate};
use crate::check::{resolve_check_traced, resolve_pool_traced};
use crate::config::{ResolutionConfig, SessionConfig};
use crate::dice::RollResult;
use crate::error::{MechError, MechResult};
use crate::modifier::{Modifier, ModifierDuration};
use crate::procedure::{
    ChainedCheck, ChainedStatus, ExtendedCheck, ExtendedStatus, ProcedureStatus,
};
use crate::resolution::{
    CheckResult, ContestedResult, CooperationMode, classify_with, resolve_contested,
    resolve_cooperative,
};

/// One entry in a session's audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogEntry {
    /// A single check.
    Check(CheckRecord),
    /// A contest between two checks.
    Contest {
        /// The initiator's check.
        initiator: CheckRecord,
        /// The defender's check.
        defender: CheckRecord,
        /// How the contest came out.
        result: ContestedResult,
    },
    /// A cooperative check.
    Cooperative {
        /// How the participants combined.
        mode: CooperationMode,
        /// Every participant's resolved pool.
        participants: Vec<ResolvedPool>,
        /// The combined roll that was classified.
        roll: RollResult,
        /// The classified result.
        result: CheckResult,
    },
}

/// Owns one generator and the standing modifiers of a logical session.
#[derive(Debug)]
pub struct CheckSession {
    config: SessionConfig,
    rules: ResolutionConfig,
    rng: StdRng,
    loads: u32,
    standing: Vec<Modifier>,
    log: Vec<LogEntry>,
}

impl CheckSession {
    /// Create a session. The rule set is validated first.
    pub fn new(config: SessionConfig, rules: ResolutionConfig) -> MechResult<Self> {
        rules.validate()?;
        let rng = match config.context {
            RngContext::Locked => StdRng::seed_from_u64(config.seed),
            RngContext::Fresh => StdRng::from_os_rng(),
        };
        tracing::debug!(context = %config.context, seed = config.seed, "check session opened");
        Ok(Self {
            config,
            rules,
            rng,
            loads: 0,
            standing: Vec::new(),
            log: Vec::new(),
        })
    }

    /// A locked session with default rules.
    pub fn locked(seed: u64) -> Self {
        Self {
            config: SessionConfig::default().with_seed(seed),
            rules: ResolutionConfig::default(),
            rng: StdRng::seed_from_u64(seed),
            loads: 0,
            standing: Vec::new(),
            log: Vec::new(),
        }
    }

    /// The session's RNG policy.
    pub fn context(&self) -> RngContext {
        self.config.context
    }

    /// The rule set checks are resolved under.
    pub fn rules(&self) -> &ResolutionConfig {
        &self.rules
    }

    /// How many times game state has been loaded into this session.
    pub fn loads(&self) -> u32 {
        self.loads
    }

    /// Notify the session that game state was (re)loaded.
    ///
    /// Fresh sessions re-derive their generator; locked sessions keep theirs.
    pub fn on_state_loaded(&mut self) {
        self.loads += 1;
        if self.config.context == RngContext::Fresh {
            self.rng = StdRng::from_os_rng();
        }
        tracing::debug!(context = %self.config.context, loads = self.loads, "state loaded");
    }

    /// Register a modifier that applies to every check until it expires.
    ///
    /// Instant modifiers belong on a single request and are ignored here;
    /// returns whether the modifier was kept.
    pub fn add_standing_modifier(&mut self, modifier: Modifier) -> bool {
        if modifier.duration == ModifierDuration::Instant {
            tracing::debug!(%modifier, "ignoring instant standing modifier");
            return false;
        }
        self.standing.push(modifier);
        true
    }

    /// Modifiers currently in force.
    pub fn standing_modifiers(&self) -> &[Modifier] {
        &self.standing
    }

    /// End the round: round modifiers expire.
    pub fn end_round(&mut self) {
        self.standing.retain(|m| m.duration != ModifierDuration::Round);
    }

    /// End the scene: round and scene modifiers expire.
    pub fn end_scene(&mut self) {
        self.standing.retain(|m| m.duration == ModifierDuration::Persistent);
    }

    /// Drop every standing modifier, persistent ones included.
    pub fn clear_standing_modifiers(&mut self) {
        self.standing.clear();
    }

    /// The audit log.
    pub fn log(&self) -> &[LogEntry] {
        &self.log
    }

    /// Empty the audit log.
    pub fn clear_log(&mut self) {
        self.log.clear();
    }

    /// Resolve one check with the standing modifiers applied.
    pub fn check(&mut self, request: &CheckRequest) -> CheckResult {
        let record = self.roll_request(request);
        let result = record.result;
        self.log.push(LogEntry::Check(record));
        result
    }

    /// Resolve a contest. Standing modifiers apply to both sides.
    pub fn contest(
        &mut self,
        initiator: &CheckRequest,
        defender: &CheckRequest,
    ) -> ContestedResult {
        let initiator = self.roll_request(initiator);
        let defender = self.roll_request(defender);
        let result = resolve_contested(&initiator.result, &defender.result);
        self.log.push(LogEntry::Contest {
            initiator,
            defender,
            result,
        });
        result
    }

    /// Resolve a cooperative check against `dc`.
    ///
    /// Each participant's request is aggregated with the standing modifiers;
    /// the participants' own DCs are not used.
    pub fn cooperate(
        &mut self,
        mode: CooperationMode,
        participants: &[CheckRequest],
        dc: u32,
    ) -> MechResult<CheckResult> {
        let pools: Vec<ResolvedPool> = participants
            .iter()
            .map(|request| aggregate(&self.with_standing(request)))
            .collect();
        let roll = resolve_cooperative(mode, &pools, &self.rules, &mut self.rng)?;
        let result = classify_with(&roll, dc, &self.rules.bands);
        self.log.push(LogEntry::Cooperative {
            mode,
            participants: pools,
            roll,
            result,
        });
        Ok(result)
    }

    /// Roll one round of an extended check and apply it.
    ///
    /// A finished procedure is rejected before anything is rolled.
    pub fn extended_round(
        &mut self,
        procedure: &mut ExtendedCheck,
        request: &CheckRequest,
    ) -> MechResult<ExtendedStatus> {
        if procedure.is_terminal() {
            return Err(MechError::TerminalProcedure(ProcedureStatus::Extended(
                procedure.status(),
            )));
        }
        let result = self.check(request);
        procedure.advance_round(&result)
    }

    /// Roll the current step of a chained check and apply it.
    ///
    /// A finished chain is rejected before anything is rolled.
    pub fn chained_step(
        &mut self,
        chain: &mut ChainedCheck,
        request: &CheckRequest,
    ) -> MechResult<ChainedStatus> {
        if chain.status().is_terminal() {
            return Err(MechError::TerminalProcedure(ProcedureStatus::Chained(
                chain.status(),
            )));
        }
        let result = self.check(request);
        chain.record(&result)
    }

    fn with_standing(&self, request: &CheckRequest) -> CheckRequest {
        if request.rng_context != self.config.context {
            tracing::debug!(
                requested = %request.rng_context,
                session = %self.config.context,
                "request context differs from session; using session generator"
            );
        }
        request.clone().with_modifiers(self.standing.iter().cloned())
    }

    fn roll_request(&mut self, request: &CheckRequest) -> CheckRecord {
        let request = self.with_standing(request);
        resolve_check_traced(&request, &self.rules, &mut self.rng)
    }

    /// Roll an already-resolved pool through the session generator.
    pub fn roll_pool(&mut self, pool: &ResolvedPool) -> CheckResult {
        let record = resolve_pool_traced(pool, &self.rules, &mut self.rng);
        let result = record.result;
        self.log.push(LogEntry::Check(record));
        result
    }
}
