use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::{ExtractError, ExtractResult};
use crate::schema::{ParticipantType, RelationType};

const BUILTIN_VOCABULARY: &str = include_str!("../data/vocabulary.json");

/// Recognition vocabulary driving every extraction stage.
///
/// The matching engines only see this table, so a custom or synthetic
/// vocabulary can be loaded with [`Vocabulary::from_path`] or
/// [`Vocabulary::from_json`] without touching code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vocabulary {
    /// Words a participant name can never span (connector verbs, particles).
    #[serde(default)]
    pub delimiters: Vec<String>,
    pub families: Vec<PatternFamily>,
    #[serde(default)]
    pub roles: Vec<RoleRule>,
    #[serde(default)]
    pub default_roles: BTreeMap<ParticipantType, String>,
    #[serde(default)]
    pub relations: Vec<RelationRule>,
    #[serde(default)]
    pub strength_keywords: StrengthKeywords,
}

/// One family of recognition patterns, yielding one participant type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternFamily {
    pub name: String,
    pub participant_type: ParticipantType,
    /// Base importance weight for participants found by this family.
    #[serde(default)]
    pub base_weight: u32,
    #[serde(default = "default_max_prefix_chars")]
    pub max_prefix_chars: usize,
    /// A name is up to `max_prefix_chars` characters followed by one of these.
    #[serde(default)]
    pub suffixes: Vec<String>,
    /// Standalone terms matched verbatim.
    #[serde(default)]
    pub known_terms: Vec<String>,
    #[serde(default)]
    pub strong_indicators: Vec<String>,
    #[serde(default)]
    pub indicator_bonus: f64,
    #[serde(default)]
    pub known_term_bonus: f64,
    /// A match immediately followed by one of these is rejected.
    #[serde(default)]
    pub blocked_followers: Vec<String>,
}

fn default_max_prefix_chars() -> usize {
    8
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRule {
    pub participant_type: ParticipantType,
    pub token: String,
    pub role: String,
}

/// "subject connector object [closer]" construction for one relation type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelationRule {
    pub relation_type: RelationType,
    pub connectors: Vec<String>,
    #[serde(default)]
    pub closers: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrengthKeywords {
    #[serde(default)]
    pub strong: Vec<String>,
    #[serde(default)]
    pub medium: Vec<String>,
    #[serde(default)]
    pub weak: Vec<String>,
}

impl Vocabulary {
    /// The vocabulary shipped with the crate.
    pub fn builtin() -> ExtractResult<Self> {
        Self::from_json(BUILTIN_VOCABULARY)
    }

    pub fn from_json(json: &str) -> ExtractResult<Self> {
        let vocabulary: Vocabulary = serde_json::from_str(json)?;
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    pub fn from_path(path: &Path) -> ExtractResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let vocabulary = Self::from_json(&json)?;

        tracing::info!(
            path = %path.display(),
            families = vocabulary.families.len(),
            relation_rules = vocabulary.relations.len(),
            "Loaded vocabulary"
        );

        Ok(vocabulary)
    }

    pub fn validate(&self) -> ExtractResult<()> {
        if self.families.is_empty() {
            return Err(ExtractError::Vocabulary("no pattern families defined".into()));
        }

        for family in &self.families {
            if family.suffixes.is_empty() && family.known_terms.is_empty() {
                return Err(ExtractError::Vocabulary(format!(
                    "family '{}' has neither suffixes nor known terms",
                    family.name
                )));
            }
            if family.max_prefix_chars == 0 && !family.suffixes.is_empty() {
                return Err(ExtractError::Vocabulary(format!(
                    "family '{}' allows no characters before its suffixes",
                    family.name
                )));
            }
            for bonus in [family.indicator_bonus, family.known_term_bonus] {
                if !(0.0..=1.0).contains(&bonus) {
                    return Err(ExtractError::Vocabulary(format!(
                        "family '{}' has a bonus outside [0, 1]: {}",
                        family.name, bonus
                    )));
                }
            }
            if family
                .suffixes
                .iter()
                .chain(&family.known_terms)
                .any(|term| term.is_empty())
            {
                return Err(ExtractError::Vocabulary(format!(
                    "family '{}' contains an empty term",
                    family.name
                )));
            }
        }

        for rule in &self.relations {
            if rule.connectors.iter().all(|c| c.is_empty()) {
                return Err(ExtractError::Vocabulary(format!(
                    "{} rule has no connectors",
                    rule.relation_type
                )));
            }
        }

        Ok(())
    }

    pub fn default_role(&self, participant_type: ParticipantType) -> &str {
        self.default_roles
            .get(&participant_type)
            .map(String::as_str)
            .unwrap_or_else(|| participant_type.as_str())
    }
}
