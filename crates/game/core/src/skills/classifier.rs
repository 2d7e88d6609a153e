//! Maps a free-form action description to weighted skills.
//!
//! The external classifier is optional and untrusted: its proposal is
//! validated against the skill catalog and thrown away on any defect. The
//! keyword table below is always available and always deterministic.

use super::catalog::{Skill, SkillSet};
use super::tokenize;
use super::weights::{SkillWeight, normalize};

/// A raw `(name, weight)` pair as returned by an external classifier.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProposedWeight {
    pub skill: String,
    pub weight: f64,
}

impl ProposedWeight {
    pub fn new(skill: impl Into<String>, weight: f64) -> Self {
        Self {
            skill: skill.into(),
            weight,
        }
    }
}

/// Where a classification came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClassificationSource {
    /// Validated proposal from the external classifier.
    External,
    /// Deterministic keyword table.
    Keyword,
}

/// Normalized skill weights plus their origin.
#[derive(Clone, Debug, PartialEq)]
pub struct Classification {
    pub weights: Vec<SkillWeight>,
    pub source: ClassificationSource,
    /// Proposal entries dropped because the catalog does not know them.
    pub discarded: Vec<String>,
}

impl Classification {
    /// An empty classification means no skill applies to the action.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

struct KeywordRule {
    keywords: &'static [&'static str],
    weights: &'static [(Skill, f64)],
}

const KEYWORD_TABLE: &[KeywordRule] = &[
    KeywordRule {
        keywords: &["sword", "longsword", "shortsword", "blade", "sabre", "saber", "rapier"],
        weights: &[(Skill::SwordFighting, 0.7), (Skill::Strength, 0.3)],
    },
    KeywordRule {
        keywords: &["axe", "hatchet", "battleaxe"],
        weights: &[(Skill::AxeFighting, 0.6), (Skill::Strength, 0.4)],
    },
    KeywordRule {
        keywords: &["dagger", "knife", "stab", "shiv"],
        weights: &[(Skill::DaggerFighting, 0.6), (Skill::Agility, 0.4)],
    },
    KeywordRule {
        keywords: &["mace", "club", "hammer", "warhammer", "cudgel", "staff"],
        weights: &[(Skill::BluntWeapons, 0.6), (Skill::Strength, 0.4)],
    },
    KeywordRule {
        keywords: &["spear", "halberd", "pike", "lance", "trident"],
        weights: &[
            (Skill::Polearms, 0.6),
            (Skill::Strength, 0.2),
            (Skill::Agility, 0.2),
        ],
    },
    KeywordRule {
        keywords: &["bow", "arrow", "crossbow", "shoot", "sling"],
        weights: &[(Skill::Archery, 0.7), (Skill::Agility, 0.3)],
    },
    KeywordRule {
        keywords: &["fire", "fireball", "firebolt", "flame", "flames", "burn", "inferno"],
        weights: &[(Skill::FireMagic, 0.8), (Skill::ArcaneMagic, 0.2)],
    },
    KeywordRule {
        keywords: &["ice", "frost", "freeze", "blizzard", "icicle"],
        weights: &[(Skill::IceMagic, 0.8), (Skill::ArcaneMagic, 0.2)],
    },
    KeywordRule {
        keywords: &["lightning", "shock", "thunder", "spark", "bolt"],
        weights: &[(Skill::LightningMagic, 0.8), (Skill::ArcaneMagic, 0.2)],
    },
    KeywordRule {
        keywords: &["poison", "venom", "toxin", "acid"],
        weights: &[
            (Skill::Alchemy, 0.6),
            (Skill::ArcaneMagic, 0.2),
            (Skill::Agility, 0.2),
        ],
    },
    KeywordRule {
        keywords: &["arcane", "magic", "missile", "spell"],
        weights: &[(Skill::ArcaneMagic, 0.8), (Skill::Agility, 0.2)],
    },
];

const UNARMED_DEFAULT: &[(Skill, f64)] = &[(Skill::UnarmedCombat, 0.6), (Skill::Strength, 0.4)];

/// Classifies an action into normalized skill weights.
///
/// A valid `proposal` wins; anything else falls back to the keyword table.
/// When several keyword rules match, the rule whose primary skill the actor
/// has trained highest is used (table order breaks ties).
pub fn classify(
    action_text: &str,
    actor_skills: &SkillSet,
    proposal: Option<&[ProposedWeight]>,
) -> Classification {
    let mut discarded = Vec::new();
    if let Some(proposal) = proposal {
        let validated = validate_proposal(proposal, &mut discarded);
        if !validated.is_empty() {
            return Classification {
                weights: validated,
                source: ClassificationSource::External,
                discarded,
            };
        }
    }

    Classification {
        weights: keyword_weights(action_text, actor_skills),
        source: ClassificationSource::Keyword,
        discarded,
    }
}

/// Filters a proposal down to catalog skills and normalizes it.
fn validate_proposal(proposal: &[ProposedWeight], discarded: &mut Vec<String>) -> Vec<SkillWeight> {
    let known = proposal.iter().filter_map(|entry| match Skill::from_name(&entry.skill) {
        Some(skill) => Some(SkillWeight::new(skill, entry.weight)),
        None => {
            discarded.push(entry.skill.clone());
            None
        }
    });
    normalize(known.collect::<Vec<_>>())
}

/// Deterministic keyword fallback. Never returns an empty list.
pub fn keyword_weights(action_text: &str, actor_skills: &SkillSet) -> Vec<SkillWeight> {
    let tokens = tokenize(action_text);

    let mut best: Option<&KeywordRule> = None;
    for rule in KEYWORD_TABLE {
        if !rule.keywords.iter().any(|kw| tokens.iter().any(|t| t == kw)) {
            continue;
        }
        best = match best {
            Some(current)
                if primary_level(current, actor_skills) >= primary_level(rule, actor_skills) =>
            {
                Some(current)
            }
            _ => Some(rule),
        };
    }

    let weights = best.map_or(UNARMED_DEFAULT, |rule| rule.weights);
    normalize(weights.iter().map(|(skill, weight)| SkillWeight::new(*skill, *weight)))
}

fn primary_level(rule: &KeywordRule, skills: &SkillSet) -> u32 {
    rule.weights
        .first()
        .map_or(0, |(skill, _)| skills.level(*skill))
}
