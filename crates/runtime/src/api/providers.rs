//! Asynchronous abstraction for the external skill classifier.
//!
//! Runtime users plug in a [`SkillClassifierProvider`] (a language model, a
//! remote service, a scripted fixture). The runtime only ever calls it through
//! [`TimedClassifier`], which bounds the wait and turns every failure into
//! "no proposal" so the core's keyword table takes over.
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use combat_core::{ProposedWeight, SkillSet};

use super::errors::ClassifierError;

/// Trait for mapping free-form action text to weighted skill names.
///
/// Answers are untrusted: names outside the skill catalog and non-positive
/// weights are dropped by the core before use.
#[async_trait]
pub trait SkillClassifierProvider: Send + Sync {
    async fn classify(
        &self,
        action_text: &str,
        actor_skills: &SkillSet,
    ) -> Result<Vec<ProposedWeight>, ClassifierError>;
}

/// Answers from a fixed table keyed by lower-cased action text.
///
/// Useful for tests and demos; unknown text yields an empty proposal.
#[derive(Clone, Debug, Default)]
pub struct ScriptedClassifier {
    answers: HashMap<String, Vec<ProposedWeight>>,
    delay: Option<Duration>,
}

impl ScriptedClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_answer(mut self, action_text: &str, weights: Vec<ProposedWeight>) -> Self {
        self.answers.insert(action_text.to_lowercase(), weights);
        self
    }

    /// Sleeps before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl SkillClassifierProvider for ScriptedClassifier {
    async fn classify(
        &self,
        action_text: &str,
        _actor_skills: &SkillSet,
    ) -> Result<Vec<ProposedWeight>, ClassifierError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(self
            .answers
            .get(&action_text.to_lowercase())
            .cloned()
            .unwrap_or_default())
    }
}

/// A provider behind a mandatory timeout.
#[derive(Clone)]
pub struct TimedClassifier {
    provider: Arc<dyn SkillClassifierProvider>,
    timeout: Duration,
}

impl TimedClassifier {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(750);

    pub fn new(provider: Arc<dyn SkillClassifierProvider>, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Asks the provider for a proposal.
    ///
    /// Returns `None` on timeout, provider error or an empty answer.
    pub async fn propose(
        &self,
        action_text: &str,
        actor_skills: &SkillSet,
    ) -> Option<Vec<ProposedWeight>> {
        let request = self.provider.classify(action_text, actor_skills);
        match tokio::time::timeout(self.timeout, request).await {
            Ok(Ok(proposal)) if !proposal.is_empty() => Some(proposal),
            Ok(Ok(_)) => {
                tracing::debug!(action = action_text, "classifier returned no skills");
                None
            }
            Ok(Err(err)) => {
                tracing::debug!(action = action_text, error = %err, "classifier failed");
                None
            }
            Err(_) => {
                tracing::debug!(
                    action = action_text,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "classifier timed out"
                );
                None
            }
        }
    }
}

impl std::fmt::Debug for TimedClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimedClassifier")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
