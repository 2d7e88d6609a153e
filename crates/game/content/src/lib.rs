//! Data-driven combat content and loaders.
//!
//! This crate houses the static data the combat core consumes through its
//! oracles:
//! - Loot tables (data-driven via RON), served by [`LootTableRegistry`]
//! - Combat tuning (data-driven via TOML)
//!
//! Content is read once at startup and never appears in world state.

pub mod registry;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use registry::LootTableRegistry;

#[cfg(feature = "loaders")]
pub use loaders::{ConfigLoader, ContentFactory, LootCatalog, LootTableLoader};
