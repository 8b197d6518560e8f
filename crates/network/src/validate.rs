use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;

use extract::{Participant, Relation, RelationType};

/// How many entries were dropped before analysis, and why.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationDiagnostics {
    /// Wrong shape, missing type, null, empty id or name.
    pub malformed_participants: usize,
    pub duplicate_participants: usize,
    /// Wrong shape, missing type, null, empty endpoint or self-loop.
    pub malformed_relations: usize,
    /// An endpoint that is not among the participants.
    pub dangling_relations: usize,
    pub duplicate_relations: usize,
}

impl ValidationDiagnostics {
    pub fn dropped_relations(&self) -> usize {
        self.malformed_relations + self.dangling_relations + self.duplicate_relations
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidatedInput {
    pub participants: Vec<Participant>,
    pub relations: Vec<Relation>,
    pub diagnostics: ValidationDiagnostics,
}

/// Decode loosely shaped JSON entries, counting the ones that do not parse,
/// then validate the rest.
pub fn validate_values(participants: &[Value], relations: &[Value]) -> ValidatedInput {
    let mut diagnostics = ValidationDiagnostics::default();

    let typed_participants: Vec<Participant> = participants
        .iter()
        .filter_map(|value| match Participant::deserialize(value) {
            Ok(participant) => Some(participant),
            Err(e) => {
                tracing::trace!(error = %e, "Dropping malformed participant");
                diagnostics.malformed_participants += 1;
                None
            }
        })
        .collect();

    let typed_relations: Vec<Relation> = relations
        .iter()
        .filter_map(|value| match Relation::deserialize(value) {
            Ok(relation) => Some(relation),
            Err(e) => {
                tracing::trace!(error = %e, "Dropping malformed relation");
                diagnostics.malformed_relations += 1;
                None
            }
        })
        .collect();

    let mut validated = validate(typed_participants, typed_relations);
    validated.diagnostics.malformed_participants += diagnostics.malformed_participants;
    validated.diagnostics.malformed_relations += diagnostics.malformed_relations;
    validated
}

/// Deduplicate participants by id and keep only relations whose endpoints
/// are distinct known participants. First occurrence wins throughout.
pub fn validate(participants: Vec<Participant>, relations: Vec<Relation>) -> ValidatedInput {
    let mut diagnostics = ValidationDiagnostics::default();

    let mut ids: HashSet<String> = HashSet::new();
    let mut kept_participants = Vec::with_capacity(participants.len());
    for participant in participants {
        if participant.id.trim().is_empty() || participant.name.trim().is_empty() {
            diagnostics.malformed_participants += 1;
            continue;
        }
        if !ids.insert(participant.id.clone()) {
            diagnostics.duplicate_participants += 1;
            continue;
        }
        kept_participants.push(participant);
    }

    let mut seen: HashSet<(String, String, RelationType)> = HashSet::new();
    let mut kept_relations = Vec::with_capacity(relations.len());
    for relation in relations {
        if relation.from_id.is_empty() || relation.to_id.is_empty() || relation.from_id == relation.to_id {
            diagnostics.malformed_relations += 1;
            continue;
        }
        if !ids.contains(&relation.from_id) || !ids.contains(&relation.to_id) {
            diagnostics.dangling_relations += 1;
            continue;
        }
        if !seen.insert((relation.from_id.clone(), relation.to_id.clone(), relation.relation_type)) {
            diagnostics.duplicate_relations += 1;
            continue;
        }
        kept_relations.push(relation);
    }

    if diagnostics != ValidationDiagnostics::default() {
        tracing::debug!(?diagnostics, "Dropped invalid network input");
    }

    ValidatedInput {
        participants: kept_participants,
        relations: kept_relations,
        diagnostics,
    }
}
