//! Runtime orchestration for the combat core.
//!
//! This crate wires the synchronous rules in `combat-core` to the outside
//! world: one async mutex around the world snapshot, the optional external
//! skill classifier behind a timeout, in-memory repositories, and event
//! delivery through `tracing` and a broadcast bus. Consumers build a
//! [`CombatRuntime`] and drive it with player commands.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the classifier port and runtime errors
//! - [`events`] routes core events to logs and subscribers
//! - [`repository`] provides in-memory persistence adapters
//! - [`config`] and [`logging`] cover process setup
pub mod api;
pub mod config;
pub mod events;
pub mod logging;
pub mod repository;
pub mod runtime;

pub use api::{
    ClassifierError, Result, RuntimeError, ScriptedClassifier, SkillClassifierProvider,
    TimedClassifier,
};
pub use config::RuntimeConfig;
pub use events::{EventBus, SinkSet, TracingEventSink};
pub use repository::{InMemoryDispositionRepo, InMemorySkillRepo};
pub use runtime::{CombatRuntime, CommandOutcome, RuntimeBuilder};
