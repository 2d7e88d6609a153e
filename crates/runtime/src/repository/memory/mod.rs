//! In-memory repositories for tests and local runs.

mod dispositions;
mod skills;

pub use dispositions::InMemoryDispositionRepo;
pub use skills::InMemorySkillRepo;
