//! End-to-end flows through `CombatRuntime`.

use std::sync::Arc;
use std::time::Duration;

use combat_content::LootTableRegistry;
use combat_core::{
    ClassificationSource, CombatEvent, Combatant, EntityId, FleeResult, ItemStack, Location,
    LocationId, LootEntry, LootTable, PersistenceError, ProposedWeight, RecordingSink, Skill,
    SkillRepository, SkillSet, WorldSnapshot,
};
use combat_runtime::{
    CombatRuntime, InMemoryDispositionRepo, InMemorySkillRepo, RuntimeBuilder, RuntimeConfig,
    ScriptedClassifier,
};

const HALL: LocationId = LocationId(1);
const YARD: LocationId = LocationId(2);
const OGRE: EntityId = EntityId(50);
const HOUND: EntityId = EntityId(51);
const HERMIT: EntityId = EntityId(52);

const SWING: &str = "slash the ogre with my sword";

fn hall() -> WorldSnapshot {
    let mut world = WorldSnapshot::new(99)
        .with_location(Location::new(HALL, "Hall").with_exit("out", YARD))
        .with_location(Location::new(YARD, "Yard"));
    world
        .spawn(
            Combatant::player(EntityId::PLAYER, "Knight", 500)
                .with_skills(SkillSet::new().with(Skill::SwordFighting, 6).with(Skill::Agility, 4))
                .with_inventory(vec![ItemStack::new("ration", 2)], 7),
            HALL,
        )
        .unwrap();
    world
        .spawn(
            Combatant::npc(OGRE, "Ogre", 500).with_weapon("club").with_disposition(0),
            HALL,
        )
        .unwrap();
    world
        .spawn(
            Combatant::npc(HOUND, "Hound", 20)
                .with_weapon("bite")
                .with_skills(SkillSet::new().with(Skill::Pursuit, 4)),
            HALL,
        )
        .unwrap();
    world
        .spawn(Combatant::npc(HERMIT, "Hermit", 10).with_disposition(40), YARD)
        .unwrap();
    world
}

fn builder() -> RuntimeBuilder {
    CombatRuntime::builder()
        .config(RuntimeConfig::default().with_seed(99))
        .world(hall())
        .without_tracing()
}

struct OfflineSkills;

impl SkillRepository for OfflineSkills {
    fn load(&self, _: EntityId) -> Result<Option<SkillSet>, PersistenceError> {
        Err(PersistenceError::Unavailable("skill store offline".into()))
    }

    fn save(&self, _: EntityId, _: &SkillSet) -> Result<(), PersistenceError> {
        Err(PersistenceError::Unavailable("skill store offline".into()))
    }
}

#[tokio::test]
async fn unknown_skills_fall_back_to_keywords() {
    let classifier = ScriptedClassifier::new()
        .with_answer(SWING, vec![ProposedWeight::new("Basket Weaving", 1.0)]);
    let runtime = builder().classifier(Arc::new(classifier)).build().unwrap();

    let report = runtime.process_attack(EntityId::PLAYER, OGRE, SWING).await;

    let classification = report.classification.expect("attack was resolved");
    assert_eq!(classification.source, ClassificationSource::Keyword);
    assert_eq!(classification.discarded, vec!["Basket Weaving".to_string()]);
    assert!(!classification.weights.is_empty());
}

#[tokio::test]
async fn valid_proposal_is_normalized_and_used() {
    let classifier = ScriptedClassifier::new().with_answer(
        SWING,
        vec![ProposedWeight::new("Sword Fighting", 2.0), ProposedWeight::new("Strength", 2.0)],
    );
    let runtime = builder().classifier(Arc::new(classifier)).build().unwrap();

    let report = runtime.process_attack(EntityId::PLAYER, OGRE, SWING).await;

    let classification = report.classification.expect("attack was resolved");
    assert_eq!(classification.source, ClassificationSource::External);
    let total: f64 = classification.weights.iter().map(|w| w.weight).sum();
    assert!((total - 1.0).abs() < 1e-9);
    assert!(classification.weights.iter().all(|w| (w.weight - 0.5).abs() < 1e-9));
}

#[tokio::test]
async fn slow_classifier_is_abandoned() {
    let classifier = ScriptedClassifier::new()
        .with_answer(SWING, vec![ProposedWeight::new("Sword Fighting", 1.0)])
        .with_delay(Duration::from_millis(500));
    let config = RuntimeConfig {
        classifier_timeout: Duration::from_millis(20),
        ..RuntimeConfig::default()
    };
    let runtime = builder().config(config).classifier(Arc::new(classifier)).build().unwrap();

    let report = runtime.process_attack(EntityId::PLAYER, OGRE, SWING).await;

    assert_eq!(
        report.classification.map(|c| c.source),
        Some(ClassificationSource::Keyword)
    );
}

#[tokio::test]
async fn player_command_spends_its_cost_as_world_time() {
    let runtime = builder().build().unwrap();

    let outcome = runtime.player_attack(EntityId::PLAYER, OGRE, SWING).await;

    assert_eq!(outcome.report.cost, 5);
    assert_eq!(outcome.world.to.0 - outcome.world.from.0, 5);
    assert_eq!(runtime.snapshot().await.clock.0, 5);
}

#[tokio::test]
async fn attacked_npc_turns_hostile_and_strikes_back() {
    let runtime = builder().build().unwrap();

    let outcome = runtime.player_attack(EntityId::PLAYER, OGRE, SWING).await;

    let world = runtime.snapshot().await;
    assert_eq!(world.actor(OGRE).map(|ogre| ogre.disposition), Some(-100));
    let ogre_turns: Vec<_> = outcome.world.turns.iter().filter(|t| t.actor == OGRE).collect();
    assert_eq!(ogre_turns.len(), 1);
    let retaliation = ogre_turns[0].attack.as_ref().expect("ogre attacked");
    assert_eq!(retaliation.defender, EntityId::PLAYER);
    assert!(retaliation.rolls.is_some());
    assert!(world.scheduler.contains(OGRE));
}

#[tokio::test]
async fn calm_npcs_leave_the_schedule() {
    let dispositions = Arc::new(InMemoryDispositionRepo::new());
    let runtime = builder()
        .disposition_repository(dispositions.clone())
        .build()
        .unwrap();

    let hostile = runtime.trigger_hostility(OGRE).await.unwrap();
    assert!(hostile.scheduled);
    assert_eq!(dispositions.get(OGRE), Some(-100));

    let calm = runtime.de_escalate(OGRE, 10).await.unwrap();
    assert!(calm.unscheduled);
    assert_eq!(calm.disposition, 10);
    assert_eq!(dispositions.get(OGRE), Some(10));
    assert!(!runtime.snapshot().await.scheduler.contains(OGRE));

    // Never lowers.
    let again = runtime.de_escalate(OGRE, -80).await.unwrap();
    assert_eq!(again.disposition, 10);
}

#[tokio::test]
async fn group_hostility_reports_each_actor() {
    let runtime = builder().build().unwrap();

    let results = runtime
        .trigger_group_hostility(&[OGRE, EntityId::PLAYER, EntityId(404)])
        .await;

    assert_eq!(results.len(), 3);
    assert!(results[0].1.is_ok());
    assert!(results[1].1.is_err());
    assert!(results[2].1.is_err());
}

#[tokio::test]
async fn stored_state_is_loaded() {
    let stored = SkillSet::new().with(Skill::SwordFighting, 9);
    let skills = Arc::new(InMemorySkillRepo::new().with_skills(EntityId::PLAYER, stored));
    let dispositions = Arc::new(InMemoryDispositionRepo::new().with_disposition(HERMIT, -100));
    let mut world = hall();
    if let Some(knight) = world.actor_mut(EntityId::PLAYER) {
        knight.skills = SkillSet::new();
    }
    let runtime = builder()
        .world(world)
        .skill_repository(skills)
        .disposition_repository(dispositions)
        .build()
        .unwrap();

    let hermit = runtime.inspect(|world| world.actor(HERMIT).map(|h| h.disposition)).await;
    assert_eq!(hermit, Some(-100));

    // Empty skill sets hydrate on the first attack.
    runtime.process_attack(EntityId::PLAYER, OGRE, SWING).await;
    let sword = runtime
        .inspect(|world| {
            world
                .actor(EntityId::PLAYER)
                .map(|p| p.skills.level(Skill::SwordFighting))
        })
        .await;
    assert_eq!(sword, Some(9));
}

#[tokio::test]
async fn persistence_failures_are_warnings() {
    let recorder = Arc::new(RecordingSink::new());
    let mut world = hall();
    if let Some(knight) = world.actor_mut(EntityId::PLAYER) {
        knight.skills = SkillSet::new();
    }
    let runtime = CombatRuntime::builder()
        .world(world)
        .without_tracing()
        .event_sink(recorder.clone())
        .skill_repository(Arc::new(OfflineSkills))
        .build()
        .unwrap();

    let report = runtime.process_attack(EntityId::PLAYER, OGRE, SWING).await;

    assert!(report.rolls.is_some());
    assert!(recorder.events().iter().any(|event| matches!(
        event,
        CombatEvent::PersistenceFailed {
            operation: "load_skills",
            ..
        }
    )));
}

#[tokio::test]
async fn lethal_hit_leaves_looted_corpse() {
    let loot = LootTableRegistry::new().with_table(
        LootTable::new("hound", 1)
            .with_entry(LootEntry::new("hound_fang", 1, 1, 1))
            .with_gold(1, 1),
    );
    let mut world = hall();
    if let Some(hound) = world.actor_mut(HOUND) {
        *hound = hound.clone().with_loot_table("hound").with_health(1);
    }
    let runtime = builder().world(world).loot(Arc::new(loot)).build().unwrap();

    let mut death = None;
    for _ in 0..20 {
        let report = runtime
            .process_attack(EntityId::PLAYER, HOUND, "stab the hound with a dagger")
            .await;
        if report.defender_died() {
            death = report.death;
            break;
        }
    }
    let death = death.expect("a one-health hound dies to the first hit");
    assert_eq!(death.location, HALL);
    assert!(death.corpse_items.iter().any(|stack| stack.item_id == "hound_fang"));

    let (items, gold) = runtime.loot_corpse(HALL, HOUND).await.unwrap();
    assert_eq!(gold, 1);
    assert_eq!(items.len(), 1);
    assert!(runtime.inspect(|world| world.corpses_at(HALL)[0].is_looted()).await);
}

#[tokio::test]
async fn flee_without_pursuers_moves_the_player() {
    let runtime = builder().build().unwrap();

    let outcome = runtime.player_flee(EntityId::PLAYER, &[], "out").await;

    assert_eq!(
        outcome.report.result,
        FleeResult::Success {
            flee_roll: None,
            max_pursuit_roll: None,
            destination: YARD,
        }
    );
    assert_eq!(outcome.report.result.free_attacks(), 0);
    assert_eq!(runtime.inspect(|world| world.location_of(EntityId::PLAYER)).await, Some(YARD));
}

#[tokio::test]
async fn flee_from_hound_follows_the_rolls() {
    let runtime = builder().build().unwrap();

    let report = runtime.process_flee(EntityId::PLAYER, &[HOUND], "out").await;
    let location = runtime.inspect(|world| world.location_of(EntityId::PLAYER)).await;

    match report.result {
        FleeResult::Success { .. } => assert_eq!(location, Some(YARD)),
        FleeResult::Failure { interceptor, .. } => {
            assert_eq!(interceptor, HOUND);
            assert_eq!(location, Some(HALL));
            assert!(report.free_attack.is_some());
        }
        FleeResult::Error(err) => panic!("unexpected flee error: {err}"),
    }
}

#[tokio::test]
async fn events_reach_subscribers() {
    let runtime = builder().build().unwrap();
    let mut events = runtime.subscribe_events();

    runtime.trigger_hostility(OGRE).await.unwrap();

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }
    assert!(seen.contains(&CombatEvent::HostilityTriggered {
        actor: OGRE,
        scheduled: true,
    }));
}

#[tokio::test]
async fn concurrent_commands_are_serialized() {
    let runtime = Arc::new(builder().build().unwrap());

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let runtime = Arc::clone(&runtime);
            tokio::spawn(async move { runtime.process_attack(EntityId::PLAYER, OGRE, SWING).await })
        })
        .collect();
    for task in tasks {
        assert!(task.await.unwrap().rolls.is_some());
    }

    assert_eq!(runtime.snapshot().await.nonce, 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn player_commands_drain_before_the_next_command() {
    let recorder = Arc::new(RecordingSink::new());
    let classifier = ScriptedClassifier::new()
        .with_answer(SWING, vec![ProposedWeight::new("Sword Fighting", 1.0)])
        .with_delay(Duration::from_millis(5));
    let runtime = Arc::new(
        builder()
            .classifier(Arc::new(classifier))
            .event_sink(recorder.clone())
            .build()
            .unwrap(),
    );

    let tasks: Vec<_> = (0..6)
        .map(|_| {
            let runtime = Arc::clone(&runtime);
            tokio::spawn(async move { runtime.player_attack(EntityId::PLAYER, OGRE, SWING).await })
        })
        .collect();
    let mut windows = Vec::new();
    for task in tasks {
        let outcome = task.await.unwrap();
        assert_eq!(outcome.report.cost, 5);
        assert_eq!(outcome.world.turns.iter().filter(|t| t.actor == OGRE).count(), 1);
        windows.push((outcome.world.from.0, outcome.world.to.0));
    }

    windows.sort_unstable();
    let expected: Vec<_> = (0..6).map(|i| (i * 5, i * 5 + 5)).collect();
    assert_eq!(windows, expected);
    assert_eq!(runtime.snapshot().await.clock.0, 30);

    // Every player swing is followed by the ogre's turn before the next swing.
    let mut ogre_acted = true;
    for event in recorder.events() {
        match event {
            CombatEvent::AttackResolved {
                attacker: EntityId::PLAYER,
                ..
            } => {
                assert!(ogre_acted, "player attacked again before the world caught up");
                ogre_acted = false;
            }
            CombatEvent::TurnTaken { actor: OGRE, .. } => ogre_acted = true,
            _ => {}
        }
    }
    assert!(ogre_acted);
}
