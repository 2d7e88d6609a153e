//! Skills: the catalog, per-actor levels, and action classification.

pub mod catalog;
pub mod classifier;
pub mod weights;

pub use catalog::{Skill, SkillSet};
pub use classifier::{
    Classification, ClassificationSource, ProposedWeight, classify, keyword_weights,
};
pub use weights::{SkillWeight, dominant_skill, effective_level, normalize, total_weight};

/// Lowercase alphabetic words of an action description.
pub(crate) fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphabetic())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::tokenize;

    #[test]
    fn tokenize_splits_on_punctuation() {
        assert_eq!(
            tokenize("Stab the orc, with my DAGGER!"),
            vec!["stab", "the", "orc", "with", "my", "dagger"]
        );
    }
}
