//! Public runtime API surface.
//!
//! This module gathers the types exposed to consumers of the runtime crate so
//! other layers can stay focused on orchestration.

pub mod errors;
pub mod providers;

pub use errors::{ClassifierError, Result, RuntimeError};
pub use providers::{ScriptedClassifier, SkillClassifierProvider, TimedClassifier};
