//! Property tests for the resolution pipeline.

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use tally_mechanics::procedure::FUMBLE_LIMIT;
use tally_mechanics::testing::ScriptedFaces;
use tally_mechanics::{
    AdvantageState, CheckOutcome, CheckRequest, ContestedOutcome, CooperationMode, DieSize,
    ExtendedCheck, ExtendedStatus, MarginBands, Modifier, ModifierCategory, ModifierDuration,
    ResolutionConfig, ResolvedPool, RollResult, aggregate, classify, resolve_check,
    resolve_contested, resolve_cooperative,
};

fn category() -> impl Strategy<Value = ModifierCategory> {
    prop_oneof![
        Just(ModifierCategory::Equipment),
        Just(ModifierCategory::Situational),
        Just(ModifierCategory::Environment),
        Just(ModifierCategory::Target),
        Just(ModifierCategory::Social),
    ]
}

fn modifier() -> impl Strategy<Value = Modifier> {
    (category(), -20i32..20, -20i32..20)
        .prop_map(|(cat, dice, dc)| Modifier::new(cat, dice, dc, ModifierDuration::Instant))
}

fn die() -> impl Strategy<Value = DieSize> {
    prop_oneof![
        Just(DieSize::D4),
        Just(DieSize::D6),
        Just(DieSize::D8),
        Just(DieSize::D10),
    ]
}

fn request() -> impl Strategy<Value = CheckRequest> {
    (
        0u32..12,
        die(),
        0u32..12,
        0u32..5,
        prop::collection::vec(modifier(), 0..6),
    )
        .prop_map(|(pool, die, dc, rank, mods)| {
            CheckRequest::new(pool, die, dc)
                .with_skill_rank(rank)
                .with_modifiers(mods)
        })
}

proptest! {
    #[test]
    fn classify_is_deterministic(net in 0u32..30, botches in 0u32..10, dc in 0u32..30) {
        let roll = RollResult::from_counts(net, botches);
        prop_assert_eq!(classify(&roll, dc), classify(&roll, dc));
    }

    #[test]
    fn seeded_checks_repeat(req in request(), seed in any::<u64>()) {
        let cfg = ResolutionConfig::default();
        let a = resolve_check(&req, &cfg, &mut StdRng::seed_from_u64(seed));
        let b = resolve_check(&req, &cfg, &mut StdRng::seed_from_u64(seed));
        prop_assert_eq!(a, b);
    }

    #[test]
    fn more_dice_never_shrinks_pool(req in request(), index in any::<prop::sample::Index>(), bump in 1i32..5) {
        let before = aggregate(&req);
        let mut bumped = req.clone();
        if bumped.modifiers.is_empty() {
            bumped.modifiers.push(Modifier::dice(ModifierCategory::Situational, bump));
        } else {
            let i = index.index(bumped.modifiers.len());
            bumped.modifiers[i].dice_delta += bump;
        }
        let after = aggregate(&bumped);
        prop_assert!(after.pool_size >= before.pool_size);
        prop_assert_eq!(after.dc, before.dc);
    }

    #[test]
    fn higher_dc_delta_never_lowers_dc(req in request(), index in any::<prop::sample::Index>(), bump in 1i32..5) {
        let before = aggregate(&req);
        let mut bumped = req.clone();
        if bumped.modifiers.is_empty() {
            bumped.modifiers.push(Modifier::dc(ModifierCategory::Target, bump));
        } else {
            let i = index.index(bumped.modifiers.len());
            bumped.modifiers[i].dc_delta += bump;
        }
        let after = aggregate(&bumped);
        prop_assert!(after.dc >= before.dc);
        prop_assert_eq!(after.pool_size, before.pool_size);
    }

    #[test]
    fn aggregate_floors_at_zero(pool in 0u32..5, dc in 0u32..5, penalty in 10i32..1000) {
        let req = CheckRequest::new(pool, DieSize::D6, dc)
            .with_modifier(Modifier::new(ModifierCategory::Environment, -penalty, -penalty, ModifierDuration::Instant));
        let resolved = aggregate(&req);
        prop_assert_eq!(resolved.pool_size, 0);
        prop_assert_eq!(resolved.dc, 0);
    }

    #[test]
    fn aggregate_ignores_modifier_order(req in request()) {
        let mut reversed = req.clone();
        reversed.modifiers.reverse();
        prop_assert_eq!(aggregate(&req), aggregate(&reversed));
    }

    #[test]
    fn fumble_beats_any_dc(botches in 1u32..10, dc in 0u32..30) {
        let result = classify(&RollResult::from_counts(0, botches), dc);
        prop_assert_eq!(result.outcome, CheckOutcome::CatastrophicFailure);
        prop_assert!(result.is_fumble);
    }

    #[test]
    fn bands_are_contiguous(margin in -100i64..100) {
        let outcome = MarginBands::default().tier(margin);
        let expected = match margin {
            m if m < 0 => CheckOutcome::Failure,
            0 => CheckOutcome::MarginalSuccess,
            1..=4 => CheckOutcome::Success,
            5..=9 => CheckOutcome::ExceptionalSuccess,
            _ => CheckOutcome::CriticalSuccess,
        };
        prop_assert_eq!(outcome, expected);
        prop_assert_ne!(outcome, CheckOutcome::CatastrophicFailure);
    }

    #[test]
    fn tier_is_monotonic_in_margin(a in -50i64..50, b in -50i64..50) {
        let bands = MarginBands::default();
        if a <= b {
            prop_assert!(bands.tier(a) <= bands.tier(b));
        }
    }

    #[test]
    fn double_fumble_is_never_a_tie(a in 1u32..5, b in 1u32..5, dc_a in 0u32..5, dc_b in 0u32..5) {
        let initiator = classify(&RollResult::from_counts(0, a), dc_a);
        let defender = classify(&RollResult::from_counts(0, b), dc_b);
        let contest = resolve_contested(&initiator, &defender);
        prop_assert_eq!(contest.outcome, ContestedOutcome::BothFumble);
        prop_assert_eq!(contest.margin, 0);
    }

    #[test]
    fn contest_margin_is_difference(a in 0u32..20, b in 0u32..20) {
        let initiator = classify(&RollResult::from_counts(a, 0), 0);
        let defender = classify(&RollResult::from_counts(b, 0), 0);
        let contest = resolve_contested(&initiator, &defender);
        prop_assert_eq!(contest.margin, a.abs_diff(b));
        let expected = match a.cmp(&b) {
            std::cmp::Ordering::Greater => ContestedOutcome::InitiatorWins,
            std::cmp::Ordering::Less => ContestedOutcome::DefenderWins,
            std::cmp::Ordering::Equal => ContestedOutcome::Tie,
        };
        prop_assert_eq!(contest.outcome, expected);
    }

    #[test]
    fn advantage_never_worse_than_disadvantage(req in request(), seed in any::<u64>()) {
        let cfg = ResolutionConfig::default();
        let pool = aggregate(&req);
        let adv = pool.dice().roll(AdvantageState::Advantage, &cfg, &mut StdRng::seed_from_u64(seed));
        let dis = pool.dice().roll(AdvantageState::Disadvantage, &cfg, &mut StdRng::seed_from_u64(seed));
        prop_assert!(adv.net_successes >= dis.net_successes);
    }

    #[test]
    fn successes_never_exceed_pool(req in request(), seed in any::<u64>()) {
        let cfg = ResolutionConfig::default();
        let pool = aggregate(&req);
        let roll = pool.dice().roll(req.advantage, &cfg, &mut StdRng::seed_from_u64(seed));
        prop_assert!(roll.net_successes + roll.botches <= pool.pool_size);
        prop_assert_eq!(roll.count(), pool.pool_size as usize);
    }

    #[test]
    fn three_fumbles_end_extended_check(early in prop::collection::vec(0u32..4, 0..2)) {
        let mut check = ExtendedCheck::new(10, 5).unwrap();
        for net in &early {
            check.advance_round(&classify(&RollResult::from_counts(*net, 0), 0)).unwrap();
        }
        let fumble = classify(&RollResult::from_counts(0, 1), 0);
        let mut status = check.status();
        for _ in 0..FUMBLE_LIMIT {
            status = check.advance_round(&fumble).unwrap();
        }
        prop_assert_eq!(status, ExtendedStatus::CatastrophicFailure);
        prop_assert!(check.advance_round(&fumble).is_err());
    }

    #[test]
    fn combined_mode_never_fewer_successes_than_best(
        sizes in prop::collection::vec(0u32..6, 1..5),
        seed in any::<u64>(),
    ) {
        let cfg = ResolutionConfig::default();
        let pools: Vec<ResolvedPool> = sizes.iter().map(|&n| ResolvedPool::new(n, DieSize::D8, 2)).collect();
        let combined = resolve_cooperative(CooperationMode::Combined, &pools, &cfg, &mut StdRng::seed_from_u64(seed)).unwrap();
        let best = resolve_cooperative(CooperationMode::BestAttempt, &pools, &cfg, &mut StdRng::seed_from_u64(seed)).unwrap();
        prop_assert!(combined.net_successes >= best.net_successes);
    }
}

#[test]
fn end_to_end_scenario() {
    let request = CheckRequest::new(5, DieSize::D10, 3)
        .with_modifier(Modifier::dice(ModifierCategory::Equipment, 2))
        .with_modifier(Modifier::dc(ModifierCategory::Environment, 1));
    let pool = aggregate(&request);
    assert_eq!(pool.pool_size, 7);
    assert_eq!(pool.dc, 4);

    let mut source = ScriptedFaces::new([10, 9, 8, 7, 7, 8, 4]);
    let result = resolve_check(&request, &ResolutionConfig::default(), &mut source);
    assert_eq!(result.net_successes, 6);
    assert_eq!(result.margin, 2);
    assert_eq!(result.outcome, CheckOutcome::Success);
    assert!(!result.is_fumble);
}

#[test]
fn empty_pool_against_dc_fails_without_fumbling() {
    let mut source = ScriptedFaces::empty();
    let request = CheckRequest::new(0, DieSize::D10, 2);
    let result = resolve_check(&request, &ResolutionConfig::default(), &mut source);
    assert_eq!(result.outcome, CheckOutcome::Failure);
    assert!(!result.is_fumble);
}

#[test]
fn empty_pool_at_dc_zero_succeeds() {
    let mut source = ScriptedFaces::empty();
    let request = CheckRequest::new(2, DieSize::D10, 0)
        .with_modifier(Modifier::dice(ModifierCategory::Situational, -5));
    let result = resolve_check(&request, &ResolutionConfig::default(), &mut source);
    assert_eq!(result.outcome, CheckOutcome::MarginalSuccess);
}

#[test]
fn cooperative_scenarios() {
    let cfg = ResolutionConfig::default();
    let pool = |n| ResolvedPool::new(n, DieSize::D10, 3);

    let mut source = ScriptedFaces::new([8]);
    let weakest = resolve_cooperative(
        CooperationMode::WeakestLink,
        &[pool(3), pool(5), pool(1)],
        &cfg,
        &mut source,
    )
    .unwrap();
    assert_eq!(weakest.count(), 1);

    let mut source = ScriptedFaces::new([7, 8, 2, 9, 10, 3]);
    let combined =
        resolve_cooperative(CooperationMode::Combined, &[pool(3), pool(3)], &cfg, &mut source)
            .unwrap();
    assert_eq!(combined.net_successes, 4);

    let mut source = ScriptedFaces::new([7, 8, 9, 2, 2, 2, 2, 2]);
    let assisted = resolve_cooperative(
        CooperationMode::Assisted { primary: 1 },
        &[pool(3), pool(4)],
        &cfg,
        &mut source,
    )
    .unwrap();
    assert_eq!(assisted.count(), 5);

    let mut source = ScriptedFaces::new([7, 2, 3, 9, 10, 7, 9, 9, 9, 3]);
    let best = resolve_cooperative(
        CooperationMode::BestAttempt,
        &[pool(3), pool(4), pool(3)],
        &cfg,
        &mut source,
    )
    .unwrap();
    assert_eq!(best.net_successes, 4);
}
