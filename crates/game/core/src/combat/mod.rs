//! Combat resolution.
//!
//! Pure functions take their dice as arguments (`resolve_with_rolls`,
//! `check_with_rolls`); the resolver structs draw those dice from the
//! [`RngOracle`](crate::env::RngOracle) with per-roll seeds.
//!
//! # Core Functions
//!
//! - `action_cost`: speed-scaled time cost of an action
//! - `opposed_check`: accuracy vs evasion
//! - `calculate_damage`: damage breakdown with the floor of 1
//! - `resolve_with_rolls`: opposed check + damage into an [`AttackResult`]
//! - `check_with_rolls`: flee roll vs pursuit rolls

pub mod cost;
pub mod damage;
pub mod flee;
pub mod hit;
pub mod resolver;
pub mod result;
pub mod weapons;

pub use cost::{ActionKind, action_cost, actor_cost, scaled_cost};
pub use damage::{
    DamageInputs, DamageResult, DamageType, calculate_damage, roll_variance, variance_span,
};
pub use flee::{
    FleeCheck, FleeError, FleeResolver, FleeResult, check_with_rolls, flee_modifier,
    pursuit_modifier,
};
pub use hit::{HitOutcome, guaranteed_check, opposed_check};
pub use resolver::{AttackContext, AttackResolver, AttackRolls, resolve_with_rolls};
pub use result::{AttackFailure, AttackResult};
pub use weapons::{OnHitEffect, UNARMED, WeaponProfile};
