//! Death, loot and corpse lifecycle.
//!
//! A combatant at zero health is replaced by exactly one
//! [`CorpseData`](crate::state::CorpseData) in its location; the corpse ages on world time
//! and is removed for good once its timer runs out.

pub mod decay;
pub mod handler;
pub mod loot;

pub use decay::{CorpseDecayManager, DecayedCorpse};
pub use handler::{DeathError, DeathHandler, DeathOutcome, loot_corpse};
pub use loot::{LootDrop, roll_loot};
