use std::collections::{HashMap, HashSet};

use ingest::{char_len, char_offset};

use crate::patterns::Candidate;
use crate::schema::{Importance, Participant, ParticipantType};
use crate::vocabulary::{RoleRule, Vocabulary};

const FREQUENCY_BONUS_CAP: u32 = 3;
const EARLY_POSITION_RATIO: f64 = 0.3;

/// Turns candidates into canonical participants with role and importance.
pub struct ParticipantBuilder {
    roles: Vec<RoleRule>,
    default_roles: HashMap<ParticipantType, String>,
    base_weights: HashMap<String, u32>,
}

impl ParticipantBuilder {
    pub fn new(vocabulary: &Vocabulary) -> Self {
        let default_roles = ParticipantType::ALL
            .iter()
            .map(|t| (*t, vocabulary.default_role(*t).to_string()))
            .collect();

        let base_weights = vocabulary
            .families
            .iter()
            .map(|f| (f.name.clone(), f.base_weight))
            .collect();

        Self {
            roles: vocabulary.roles.clone(),
            default_roles,
            base_weights,
        }
    }

    /// Build participants from candidates found in `text` (the preprocessed
    /// form the candidates were matched against).
    pub fn build(&self, candidates: &[Candidate], text: &str) -> Vec<Participant> {
        let mut seen = HashSet::new();
        let mut participants = Vec::new();

        for candidate in candidates {
            let role = self.infer_role(&candidate.text, candidate.participant_type);
            let score = self.importance_score(candidate, text);

            let participant = Participant::new(
                candidate.text.clone(),
                candidate.participant_type,
                role,
                Importance::from_score(score),
                candidate.offset,
                candidate.confidence,
            );

            if seen.insert(participant.id.clone()) {
                participants.push(participant);
            }
        }

        tracing::debug!(
            candidates = candidates.len(),
            participants = participants.len(),
            "Built participants"
        );

        participants
    }

    /// First role rule of the matching type whose token occurs in the name.
    pub fn infer_role(&self, name: &str, participant_type: ParticipantType) -> String {
        self.roles
            .iter()
            .find(|rule| rule.participant_type == participant_type && name.contains(rule.token.as_str()))
            .map(|rule| rule.role.clone())
            .or_else(|| self.default_roles.get(&participant_type).cloned())
            .unwrap_or_else(|| participant_type.as_str().to_string())
    }

    /// Base weight of the family, plus occurrence count (capped), plus one
    /// when the name first appears in the leading 30% of the text.
    pub fn importance_score(&self, candidate: &Candidate, text: &str) -> u32 {
        let base = self.base_weights.get(&candidate.family).copied().unwrap_or(0);

        let occurrences = text.matches(candidate.text.as_str()).count() as u32;
        let frequency = occurrences.min(FREQUENCY_BONUS_CAP);

        let total = char_len(text);
        let first = text
            .find(candidate.text.as_str())
            .map(|byte| char_offset(text, byte))
            .unwrap_or(candidate.offset);
        let early = if total > 0 && (first as f64) < EARLY_POSITION_RATIO * total as f64 {
            1
        } else {
            0
        };

        base + frequency + early
    }
}
