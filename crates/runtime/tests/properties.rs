//! Rule properties and worked examples, checked against the public core API.

use combat_core::combat::{
    DamageInputs, FleeCheck, check_with_rolls, flee_modifier, pursuit_modifier, scaled_cost,
    variance_span,
};
use combat_core::skills::normalize;
use combat_core::state::StatusEffects;
use combat_core::{
    ActionKind, CombatConfig, CombatEnv, Combatant, CorpseData, CorpseDecayManager, DamageType,
    DeathHandler, EntityId, Location, LocationId, PcgRng, Skill, SkillSet, SkillWeight,
    StatusEffect, StatusEffectEngine, StatusEffectKind, Tick, TurnScheduler, WorldSnapshot,
    action_cost, calculate_damage, effective_level,
};

const CELLAR: LocationId = LocationId(1);

#[test]
fn reenqueue_keeps_one_entry_with_latest_time() {
    let mut scheduler = TurnScheduler::new();
    scheduler.enqueue(EntityId(1), Tick(30));
    scheduler.enqueue(EntityId(1), Tick(10));
    scheduler.enqueue(EntityId(1), Tick(20));

    assert_eq!(scheduler.len(), 1);
    assert_eq!(scheduler.ready_at(EntityId(1)), Some(Tick(20)));
}

#[test]
fn dequeue_never_early_never_skips() {
    let mut scheduler = TurnScheduler::new();
    scheduler.enqueue(EntityId(1), Tick(5));
    scheduler.enqueue(EntityId(2), Tick(3));
    scheduler.enqueue(EntityId(3), Tick(9));

    assert_eq!(scheduler.dequeue(Tick(2)), None);

    let ready: Vec<_> = std::iter::from_fn(|| scheduler.dequeue(Tick(5)))
        .map(|turn| turn.actor)
        .collect();
    assert_eq!(ready, vec![EntityId(2), EntityId(1)]);
    assert_eq!(scheduler.peek().map(|turn| turn.actor), Some(EntityId(3)));
}

#[test]
fn equal_readiness_leaves_in_insertion_order() {
    let mut scheduler = TurnScheduler::new();
    for id in [7, 3, 5] {
        scheduler.enqueue(EntityId(id), Tick(4));
    }

    let order: Vec<_> = std::iter::from_fn(|| scheduler.dequeue(Tick(4)))
        .map(|turn| turn.actor.0)
        .collect();
    assert_eq!(order, vec![7, 3, 5]);
}

#[test]
fn cost_is_non_increasing_in_speed_and_floored() {
    let config = CombatConfig::default();
    for kind in [ActionKind::Melee, ActionKind::Spell, ActionKind::Social] {
        let mut previous = u64::MAX;
        for speed in 0..200 {
            let cost = action_cost(kind, speed, &config);
            assert!(cost <= previous, "{kind} cost rose at speed {speed}");
            assert!(cost >= 2);
            previous = cost;
        }
    }
    assert_eq!(scaled_cost(1, 0, 2), 2);
}

#[test]
fn damage_never_below_one() {
    let inputs = DamageInputs {
        base: 3,
        skill_modifier: 0,
        item_bonus: -2,
        resistance_level: 40,
        damage_type: DamageType::Fire,
    };
    let span = variance_span(&inputs, 20) as i32;

    for variance in -span..=span {
        assert!(calculate_damage(&inputs, variance).final_damage >= 1);
    }
    assert_eq!(calculate_damage(&inputs, -50).final_damage, 1);
}

#[test]
fn weights_sum_to_one() {
    let weights = normalize(vec![
        SkillWeight::new(Skill::FireMagic, 3.0),
        SkillWeight::new(Skill::Agility, 0.25),
        SkillWeight::new(Skill::Strength, 1.0),
    ]);
    let total: f64 = weights.iter().map(|w| w.weight).sum();
    assert!((total - 1.0).abs() < 1e-9);
}

#[test]
fn tied_flee_roll_is_intercepted() {
    let check = check_with_rolls(14, &[(EntityId(5), 9), (EntityId(6), 14)]);
    assert_eq!(
        check,
        FleeCheck::Intercepted {
            flee_roll: 14,
            max_pursuit_roll: 14,
            interceptor: EntityId(6),
        }
    );
    assert_eq!(check_with_rolls(3, &[]), FleeCheck::Unopposed);
}

#[test]
fn stacking_and_replacement() {
    let mut effects = StatusEffects::empty();
    let poison = StatusEffect::new(StatusEffectKind::Poisoned, 2, 5, EntityId(9));
    StatusEffectEngine::apply(&mut effects, poison).unwrap();
    let second = StatusEffectEngine::apply(&mut effects, poison).unwrap();
    assert!(second.was_stacked);
    assert_eq!(effects.count(StatusEffectKind::Poisoned), 2);

    let stun = StatusEffect::new(StatusEffectKind::Stunned, 1, 2, EntityId(9));
    let first = StatusEffectEngine::apply(&mut effects, stun).unwrap();
    let again = StatusEffectEngine::apply(&mut effects, stun).unwrap();
    assert!(!first.was_replaced);
    assert!(again.was_replaced);
    assert_eq!(effects.count(StatusEffectKind::Stunned), 1);
}

#[test]
fn death_swaps_actor_for_exactly_one_corpse() {
    let config = CombatConfig::default();
    let mut world = WorldSnapshot::new(3).with_location(Location::new(CELLAR, "Cellar"));
    world
        .spawn(Combatant::npc(EntityId(20), "Rat", 6).with_health(0), CELLAR)
        .unwrap();

    let outcome = DeathHandler::new(CombatEnv::with_defaults(&config))
        .handle_death(&mut world, EntityId(20))
        .unwrap();

    assert_eq!(outcome.location, CELLAR);
    assert!(world.actor(EntityId(20)).is_none());
    assert!(world.actors_in(CELLAR).next().is_none());
    assert_eq!(world.corpses_at(CELLAR).len(), 1);
    assert_eq!(world.corpses_at(CELLAR)[0].owner, EntityId(20));
}

// ===== worked examples =====

#[test]
fn example_speed_ten_halves_melee_cost() {
    assert_eq!(action_cost(ActionKind::Melee, 10, &CombatConfig::default()), 3);
}

#[test]
fn example_effective_level() {
    let weights = [
        SkillWeight::new(Skill::SwordFighting, 0.7),
        SkillWeight::new(Skill::Strength, 0.3),
    ];
    let skills = SkillSet::new().with(Skill::SwordFighting, 10).with(Skill::Strength, 4);
    assert_eq!(effective_level(&weights, &skills), 8);
}

#[test]
fn example_damage_breakdown() {
    let inputs = DamageInputs {
        base: 10,
        skill_modifier: 8,
        item_bonus: 0,
        resistance_level: 6,
        damage_type: DamageType::Physical,
    };
    let result = calculate_damage(&inputs, -2);
    assert_eq!(result.resistance_reduction, 3);
    assert_eq!(result.final_damage, 13);
}

#[test]
fn example_flee_beats_single_pursuer() {
    let runner = SkillSet::new().with(Skill::Agility, 10);
    let hound = SkillSet::new().with(Skill::Pursuit, 5);
    assert_eq!(flee_modifier(&runner), 6);
    assert_eq!(pursuit_modifier(&hound), 5);

    // d20 of 9 + 6 against d20 of 8 + 5.
    assert_eq!(
        check_with_rolls(9 + 6, &[(EntityId(30), 8 + 5)]),
        FleeCheck::Escaped {
            flee_roll: 15,
            max_pursuit_roll: 13,
        }
    );
}

#[test]
fn example_corpse_gone_after_cumulative_decay() {
    let config = CombatConfig::default();
    let rng = PcgRng;
    let mut room = Location::new(CELLAR, "Cellar");
    room.corpses.push(CorpseData::new(EntityId(90), "Spider", CELLAR, 100));
    let mut world = WorldSnapshot::new(11).with_location(room);
    let decay = CorpseDecayManager::new(&config, &rng);

    assert!(decay.tick(&mut world, 60).is_empty());
    assert_eq!(world.corpses_at(CELLAR).len(), 1);
    assert_eq!(decay.tick(&mut world, 41).len(), 1);
    assert!(world.corpses_at(CELLAR).is_empty());
}
