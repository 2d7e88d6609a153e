//! Loot generation from weighted tables.

use crate::env::{LootTable, LootTier, RngOracle, RollContext, compute_seed};
use crate::state::{EntityId, ItemStack};

/// Items and gold rolled for one corpse.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LootDrop {
    pub items: Vec<ItemStack>,
    pub gold: u32,
}

/// Rolls a loot table for a combatant of the given tier.
///
/// The table is rolled `rolls + tier.bonus_rolls()` times over the entries
/// the tier qualifies for; duplicate drops merge into one stack. Gold is
/// rolled once in `[gold_min, gold_max]` and scaled by the tier multiplier.
pub fn roll_loot(
    table: &LootTable,
    tier: LootTier,
    rng: &dyn RngOracle,
    game_seed: u64,
    nonce: u64,
    owner: EntityId,
) -> LootDrop {
    let seed = |context| compute_seed(game_seed, nonce, owner.0, context);

    let eligible: Vec<_> = table
        .entries
        .iter()
        .filter(|entry| entry.weight > 0 && entry.min_tier <= tier)
        .collect();
    let total_weight = eligible
        .iter()
        .fold(0u32, |total, entry| total.saturating_add(entry.weight));

    let mut items: Vec<ItemStack> = Vec::new();
    if total_weight > 0 {
        for roll in 0..table.rolls.saturating_add(tier.bonus_rolls()) {
            let mut pick = rng.range(seed(RollContext::LootEntry(roll)), 0, total_weight - 1);
            let Some(entry) = eligible.iter().find(|entry| {
                if pick < entry.weight {
                    true
                } else {
                    pick -= entry.weight;
                    false
                }
            }) else {
                continue;
            };

            let quantity = rng.range(
                seed(RollContext::LootQuantity(roll)),
                entry.min_quantity,
                entry.max_quantity.max(entry.min_quantity),
            );
            if quantity == 0 {
                continue;
            }

            match items.iter_mut().find(|stack| stack.item_id == entry.item_id) {
                Some(stack) => stack.quantity = stack.quantity.saturating_add(quantity),
                None => items.push(
                    ItemStack::new(entry.item_id.clone(), quantity).with_quality(tier.quality()),
                ),
            }
        }
    }

    let gold = rng
        .range(seed(RollContext::Gold), table.gold_min, table.gold_max.max(table.gold_min))
        .saturating_mul(tier.gold_multiplier());

    LootDrop { items, gold }
}
