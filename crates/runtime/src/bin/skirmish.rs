//! Scripted skirmish against the combat runtime.
//!
//! A wanderer fights a goblin in a guard room, loots it, then runs from a
//! wolf. Set `RUST_LOG=debug` to see every roll.
//!
//! ```bash
//! COMBAT_SEED=42 cargo run -p combat-runtime --bin skirmish
//! ```

use std::sync::Arc;

use anyhow::Result;
use combat_content::ContentFactory;
use combat_core::{
    AttackResult, Combatant, EntityId, FleeResult, ItemStack, Location, LocationId, Skill, SkillSet,
    WorldSnapshot,
};
use combat_runtime::{
    CombatRuntime, InMemoryDispositionRepo, InMemorySkillRepo, RuntimeConfig,
    logging::setup_logging,
};

const GUARD_ROOM: LocationId = LocationId(1);
const STAIRS: LocationId = LocationId(2);
const GOBLIN: EntityId = EntityId(10);
const WOLF: EntityId = EntityId(11);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging()?;

    let config = RuntimeConfig::from_env()?;
    tracing::info!("Starting skirmish: seed={}", config.game_seed);

    let mut builder = CombatRuntime::builder()
        .config(config.clone())
        .world(build_world(config.game_seed)?)
        .skill_repository(Arc::new(InMemorySkillRepo::new()))
        .disposition_repository(Arc::new(InMemoryDispositionRepo::new()));
    if config.loot_path.is_none() {
        builder = builder.loot(Arc::new(ContentFactory::bundled().load_loot()?));
    }
    let runtime = builder.build()?;

    runtime.trigger_hostility(WOLF).await?;

    for round in 1..=12 {
        let outcome = runtime
            .player_attack(EntityId::PLAYER, GOBLIN, "slash the goblin with my sword")
            .await;
        match &outcome.report.result {
            AttackResult::Hit { damage, critical, .. } => tracing::info!(
                "Round {round}: hit for {}{}",
                damage.final_damage,
                if *critical { " (critical)" } else { "" }
            ),
            AttackResult::Miss { was_dodged } => {
                tracing::info!("Round {round}: miss (dodged: {was_dodged})")
            }
            AttackResult::Failure(failure) => {
                tracing::warn!("Round {round}: cannot attack: {failure}");
                break;
            }
        }
        if outcome.world.player_died() {
            tracing::info!("The wanderer has fallen");
            return Ok(());
        }
        if outcome.report.defender_died() {
            break;
        }
    }

    if let Ok((items, gold)) = runtime.loot_corpse(GUARD_ROOM, GOBLIN).await {
        let names: Vec<_> = items
            .iter()
            .map(|stack| format!("{}x{}", stack.quantity, stack.item_id))
            .collect();
        tracing::info!("Looted goblin: {} gold, items [{}]", gold, names.join(", "));
    }

    let flight = runtime.player_flee(EntityId::PLAYER, &[WOLF], "up").await;
    match &flight.report.result {
        FleeResult::Success { destination, .. } => {
            tracing::info!("Escaped to location {destination}")
        }
        FleeResult::Failure { free_attack, .. } => {
            tracing::info!("The wolf cuts off the escape: {:?}", free_attack)
        }
        FleeResult::Error(err) => tracing::warn!("Flee failed: {err}"),
    }

    let report = runtime.advance_world_time(500).await;
    tracing::info!(
        "Waited until t={}: {} npc turns, {} corpses decayed",
        report.to,
        report.turns.len(),
        report.decayed.len()
    );

    let world = runtime.snapshot().await;
    if let Some(player) = world.actor(EntityId::PLAYER) {
        tracing::info!(
            "Wanderer ends with {}/{} health; sword fighting {}",
            player.health.current,
            player.health.maximum,
            player.skills.level(Skill::SwordFighting)
        );
    }

    Ok(())
}

fn build_world(seed: u64) -> Result<WorldSnapshot> {
    let mut world = WorldSnapshot::new(seed)
        .with_location(Location::new(GUARD_ROOM, "Guard Room").with_exit("up", STAIRS))
        .with_location(Location::new(STAIRS, "Stairwell").with_exit("down", GUARD_ROOM));

    world.spawn(
        Combatant::player(EntityId::PLAYER, "Wanderer", 60)
            .with_weapon("sword")
            .with_item_bonus(2)
            .with_skills(
                SkillSet::new()
                    .with(Skill::SwordFighting, 8)
                    .with(Skill::Strength, 5)
                    .with(Skill::Agility, 6)
                    .with(Skill::Escape, 3),
            )
            .with_inventory(vec![ItemStack::new("torch", 1)], 12),
        GUARD_ROOM,
    )?;
    world.spawn(
        Combatant::npc(GOBLIN, "Goblin", 28)
            .with_weapon("dagger")
            .with_loot_table("goblin")
            .with_skills(SkillSet::new().with(Skill::DaggerFighting, 3).with(Skill::Agility, 4)),
        GUARD_ROOM,
    )?;
    world.spawn(
        Combatant::npc(WOLF, "Wolf", 40)
            .with_weapon("bite")
            .with_loot_table("wolf")
            .with_skills(SkillSet::new().with(Skill::UnarmedCombat, 4).with(Skill::Pursuit, 6)),
        GUARD_ROOM,
    )?;

    Ok(world)
}
