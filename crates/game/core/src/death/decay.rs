//! Corpse aging and removal.
//!
//! Expired corpses are removed permanently. Each carried item (and the gold
//! pile) independently has `corpse_scatter_chance` percent to land on the
//! location floor first; everything else is destroyed with the corpse.

use crate::config::CombatConfig;
use crate::env::{RngOracle, RollContext, compute_seed};
use crate::state::{CorpseData, EntityId, LocationId, WorldSnapshot};

/// A corpse that expired during a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecayedCorpse {
    pub owner: EntityId,
    pub location: LocationId,
    /// Item stacks moved to the floor.
    pub scattered: usize,
    /// Item stacks destroyed with the corpse.
    pub destroyed: usize,
    pub gold_scattered: u32,
}

/// Ages every corpse in the world.
#[derive(Clone, Copy)]
pub struct CorpseDecayManager<'a> {
    config: &'a CombatConfig,
    rng: &'a dyn RngOracle,
}

impl<'a> CorpseDecayManager<'a> {
    pub fn new(config: &'a CombatConfig, rng: &'a dyn RngOracle) -> Self {
        Self { config, rng }
    }

    /// Decrements every decay timer by `elapsed` and removes the corpses
    /// that reach zero. Scatter rolls are seeded by the world clock.
    pub fn tick(&self, world: &mut WorldSnapshot, elapsed: u64) -> Vec<DecayedCorpse> {
        if elapsed == 0 {
            return Vec::new();
        }

        let game_seed = world.game_seed;
        let clock = world.clock.0;
        let mut decayed = Vec::new();

        for room in world.locations_mut() {
            for corpse in &mut room.corpses {
                corpse.decay_remaining = corpse.decay_remaining.saturating_sub(elapsed);
            }
            if !room.corpses.iter().any(CorpseData::is_expired) {
                continue;
            }

            let (expired, kept): (Vec<_>, Vec<_>) =
                std::mem::take(&mut room.corpses).into_iter().partition(CorpseData::is_expired);
            room.corpses = kept;

            for corpse in expired {
                let mut report = DecayedCorpse {
                    owner: corpse.owner,
                    location: room.id,
                    scattered: 0,
                    destroyed: 0,
                    gold_scattered: 0,
                };
                let seed = |index: u32| {
                    compute_seed(game_seed, clock, corpse.owner.0, RollContext::Scatter(index))
                };
                let chance = self.config.corpse_scatter_chance;

                for (index, stack) in corpse.items.iter().enumerate() {
                    if self.rng.percent_chance(seed(index as u32), chance) {
                        room.floor.push(stack.clone());
                        report.scattered += 1;
                    } else {
                        report.destroyed += 1;
                    }
                }
                let gold_seed = seed(corpse.items.len() as u32);
                if corpse.gold > 0 && self.rng.percent_chance(gold_seed, chance) {
                    room.floor_gold = room.floor_gold.saturating_add(corpse.gold);
                    report.gold_scattered = corpse.gold;
                }

                decayed.push(report);
            }
        }

        decayed
    }
}

impl std::fmt::Debug for CorpseDecayManager<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CorpseDecayManager")
            .field("scatter_chance", &self.config.corpse_scatter_chance)
            .finish_non_exhaustive()
    }
}
