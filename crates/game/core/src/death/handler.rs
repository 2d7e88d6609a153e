//! Turns defeated combatants into corpses.

use super::loot::{LootDrop, roll_loot};
use crate::env::{CombatEnv, LootTier};
use crate::error::{CombatError, ErrorSeverity};
use crate::events::CombatEvent;
use crate::state::{Combatant, CorpseData, EntityId, ItemStack, LocationId, WorldSnapshot};

/// What happened when a combatant died.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeathOutcome {
    pub actor: EntityId,
    pub location: LocationId,
    /// Loot tier for NPCs; players have none.
    pub tier: Option<LootTier>,
    pub corpse_items: Vec<ItemStack>,
    pub corpse_gold: u32,
    pub decay: u64,
    /// The removed player, for an external respawn or permadeath flow.
    pub player: Option<Combatant>,
}

impl DeathOutcome {
    pub fn is_player(&self) -> bool {
        self.player.is_some()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DeathError {
    #[error("actor {0} not found")]
    ActorNotFound(EntityId),

    #[error("actor {0} has no location")]
    NotPlaced(EntityId),

    #[error("actor {0} is still alive")]
    StillAlive(EntityId),

    #[error("location {0} missing from snapshot")]
    LocationMissing(LocationId),

    #[error("no corpse of {owner} at {location}")]
    CorpseNotFound { owner: EntityId, location: LocationId },
}

impl CombatError for DeathError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotPlaced(_) | Self::LocationMissing(_) => ErrorSeverity::Internal,
            Self::ActorNotFound(_) | Self::StillAlive(_) | Self::CorpseNotFound { .. } => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::ActorNotFound(_) => "DEATH_ACTOR_NOT_FOUND",
            Self::NotPlaced(_) => "DEATH_NOT_PLACED",
            Self::StillAlive(_) => "DEATH_STILL_ALIVE",
            Self::LocationMissing(_) => "DEATH_LOCATION_MISSING",
            Self::CorpseNotFound { .. } => "DEATH_CORPSE_NOT_FOUND",
        }
    }
}

/// Replaces dead combatants with corpses.
#[derive(Clone, Copy, Debug)]
pub struct DeathHandler<'a> {
    env: CombatEnv<'a>,
}

impl<'a> DeathHandler<'a> {
    pub fn new(env: CombatEnv<'a>) -> Self {
        Self { env }
    }

    /// Removes a dead actor from the world and leaves exactly one corpse in
    /// its location.
    ///
    /// NPC corpses hold rolled loot plus whatever the NPC carried. Player
    /// corpses hold the player's belongings and decay on the slower player
    /// clock. Nobody is respawned here.
    pub fn handle_death(
        &self,
        world: &mut WorldSnapshot,
        actor: EntityId,
    ) -> Result<DeathOutcome, DeathError> {
        let combatant = world.actor(actor).ok_or(DeathError::ActorNotFound(actor))?;
        if combatant.is_alive() {
            return Err(DeathError::StillAlive(actor));
        }
        let location = world.location_of(actor).ok_or(DeathError::NotPlaced(actor))?;
        if world.location(location).is_none() {
            return Err(DeathError::LocationMissing(location));
        }

        let (mut combatant, _) = world
            .remove_actor(actor)
            .ok_or(DeathError::ActorNotFound(actor))?;
        let config = self.env.config();

        let (tier, decay, mut drop) = if combatant.is_player() {
            (None, config.player_corpse_decay, LootDrop::default())
        } else {
            let tier = LootTier::from_max_health(combatant.health.maximum);
            let drop = self.roll_npc_loot(world, &combatant, tier);
            (Some(tier), config.corpse_decay.for_tier(tier), drop)
        };
        drop.items.append(&mut combatant.inventory);
        drop.gold = drop.gold.saturating_add(std::mem::take(&mut combatant.gold));

        let mut corpse = CorpseData::new(actor, combatant.name.clone(), location, decay)
            .with_contents(drop.items.clone(), drop.gold);
        corpse.from_player = combatant.is_player();

        world
            .location_mut(location)
            .ok_or(DeathError::LocationMissing(location))?
            .corpses
            .push(corpse);

        self.env.events().emit(CombatEvent::Death {
            actor,
            location,
            was_player: combatant.is_player(),
        });

        Ok(DeathOutcome {
            actor,
            location,
            tier,
            corpse_items: drop.items,
            corpse_gold: drop.gold,
            decay,
            player: combatant.is_player().then_some(combatant),
        })
    }

    fn roll_npc_loot(
        &self,
        world: &WorldSnapshot,
        combatant: &Combatant,
        tier: LootTier,
    ) -> LootDrop {
        let table = self
            .env
            .loot()
            .zip(combatant.loot_table.as_deref())
            .and_then(|(oracle, id)| oracle.table(id));

        match table {
            Some(table) => roll_loot(
                table,
                tier,
                self.env.rng(),
                world.game_seed,
                world.nonce,
                combatant.id,
            ),
            None => {
                if combatant.loot_table.is_some() {
                    self.env.events().emit(CombatEvent::LootUnavailable {
                        actor: combatant.id,
                        table: combatant.loot_table.clone(),
                    });
                }
                LootDrop::default()
            }
        }
    }
}

/// Takes everything from a corpse and marks it looted.
pub fn loot_corpse(
    world: &mut WorldSnapshot,
    location: LocationId,
    owner: EntityId,
) -> Result<(Vec<ItemStack>, u32), DeathError> {
    world
        .location_mut(location)
        .and_then(|room| room.corpse_mut(owner))
        .map(CorpseData::take_contents)
        .ok_or(DeathError::CorpseNotFound { owner, location })
}
