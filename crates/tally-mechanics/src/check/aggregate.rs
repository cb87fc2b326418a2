//! Modifier aggregation: reduce a request to the pool and DC actually rolled.

use serde::{Deserialize, Serialize};

use super::CheckRequest;
use crate::dice::{AdvantageState, DicePool, DieSize};

/// The normalized pool and DC for one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolvedPool {
    /// Dice to roll, floored at zero.
    pub pool_size: u32,
    /// Die size for every die in the pool.
    pub die: DieSize,
    /// Net successes required, floored at zero.
    pub dc: u32,
    /// Advantage state carried over from the request.
    pub advantage: AdvantageState,
}

impl ResolvedPool {
    /// A pool with no advantage.
    pub fn new(pool_size: u32, die: DieSize, dc: u32) -> Self {
        Self {
            pool_size,
            die,
            dc,
            advantage: AdvantageState::Normal,
        }
    }

    /// Change the advantage state.
    pub fn with_advantage(mut self, advantage: AdvantageState) -> Self {
        self.advantage = advantage;
        self
    }

    /// The dice pool to roll.
    pub fn dice(&self) -> DicePool {
        DicePool::new(self.die, self.pool_size)
    }
}

impl std::fmt::Display for ResolvedPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{} vs DC {}", self.pool_size, self.die, self.dc)?;
        if self.advantage.rolls_twice() {
            write!(f, " ({})", self.advantage)?;
        }
        Ok(())
    }
}

/// Reduce a request's base values and modifiers to a [`ResolvedPool`].
///
/// Every category stacks additively. Each skill rank adds one die.
/// Negative totals floor at zero; they are never passed on.
pub fn aggregate(request: &CheckRequest) -> ResolvedPool {
    let dice_total: i64 = request
        .modifiers
        .iter()
        .map(|m| i64::from(m.dice_delta))
        .sum();
    let dc_total: i64 = request
        .modifiers
        .iter()
        .map(|m| i64::from(m.dc_delta))
        .sum();

    let raw_pool = i64::from(request.base_pool) + i64::from(request.skill_rank) + dice_total;
    let raw_dc = i64::from(request.base_dc) + dc_total;

    let pool = ResolvedPool {
        pool_size: floor_to_u32(raw_pool),
        die: request.die,
        dc: floor_to_u32(raw_dc),
        advantage: request.advantage,
    };
    tracing::debug!(
        raw_pool,
        raw_dc,
        modifiers = request.modifiers.len(),
        %pool,
        "aggregated check request"
    );
    pool
}

fn floor_to_u32(n: i64) -> u32 {
    u32::try_from(n.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::{Modifier, ModifierCategory, ModifierDuration};

    #[test]
    fn base_values_pass_through() {
        let request = CheckRequest::new(4, DieSize::D10, 2);
        let pool = aggregate(&request);
        assert_eq!(pool, ResolvedPool::new(4, DieSize::D10, 2));
    }

    #[test]
    fn skill_rank_adds_dice() {
        let request = CheckRequest::new(3, DieSize::D10, 2).with_skill_rank(2);
        assert_eq!(aggregate(&request).pool_size, 5);
    }

    #[test]
    fn all_categories_stack() {
        let request = CheckRequest::new(2, DieSize::D10, 1)
            .with_modifier(Modifier::dice(ModifierCategory::Equipment, 1))
            .with_modifier(Modifier::dice(ModifierCategory::Situational, 1))
            .with_modifier(Modifier::dice(ModifierCategory::Environment, -1))
            .with_modifier(Modifier::dice(ModifierCategory::Target, 2))
            .with_modifier(Modifier::new(
                ModifierCategory::Social,
                1,
                2,
                ModifierDuration::Scene,
            ));
        let pool = aggregate(&request);
        assert_eq!(pool.pool_size, 6);
        assert_eq!(pool.dc, 3);
    }

    #[test]
    fn negative_totals_floor_at_zero() {
        let request = CheckRequest::new(2, DieSize::D10, 1)
            .with_modifier(Modifier::new(
                ModifierCategory::Environment,
                -10,
                -10,
                ModifierDuration::Instant,
            ));
        let pool = aggregate(&request);
        assert_eq!(pool.pool_size, 0);
        assert_eq!(pool.dc, 0);
    }

    #[test]
    fn advantage_and_die_carried() {
        let request = CheckRequest::new(1, DieSize::D6, 0).with_advantage(AdvantageState::Advantage);
        let pool = aggregate(&request);
        assert_eq!(pool.die, DieSize::D6);
        assert_eq!(pool.advantage, AdvantageState::Advantage);
        assert_eq!(pool.to_string(), "1d6 vs DC 0 (advantage)");
    }

    #[test]
    fn end_to_end_example_pool() {
        let request = CheckRequest::new(5, DieSize::D10, 3)
            .with_modifier(Modifier::dice(ModifierCategory::Equipment, 2))
            .with_modifier(Modifier::dc(ModifierCategory::Environment, 1));
        let pool = aggregate(&request);
        assert_eq!(pool.pool_size, 7);
        assert_eq!(pool.dc, 4);
    }

    #[test]
    fn aggregation_is_order_independent() {
        let a = Modifier::dice(ModifierCategory::Equipment, 3);
        let b = Modifier::new(ModifierCategory::Target, -2, 1, ModifierDuration::Round);
        let c = Modifier::dc(ModifierCategory::Social, -4);
        let forward = CheckRequest::new(1, DieSize::D10, 2)
            .with_modifiers([a.clone(), b.clone(), c.clone()]);
        let backward = CheckRequest::new(1, DieSize::D10, 2).with_modifiers([c, b, a]);
        assert_eq!(aggregate(&forward), aggregate(&backward));
    }
}
