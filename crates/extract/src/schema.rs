use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::normalizer::normalize_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantType {
    Individual,
    Organization,
    Artifact,
    Concept,
}

impl ParticipantType {
    pub const ALL: [ParticipantType; 4] = [
        ParticipantType::Organization,
        ParticipantType::Individual,
        ParticipantType::Artifact,
        ParticipantType::Concept,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantType::Individual => "individual",
            ParticipantType::Organization => "organization",
            ParticipantType::Artifact => "artifact",
            ParticipantType::Concept => "concept",
        }
    }
}

impl fmt::Display for ParticipantType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    High,
    Medium,
    #[default]
    Low,
}

impl Importance {
    /// Score thresholds: 4 and above is high, 2..=3 medium, anything else low.
    pub fn from_score(score: u32) -> Self {
        match score {
            s if s >= 4 => Importance::High,
            2..=3 => Importance::Medium,
            _ => Importance::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Importance::High => "high",
            Importance::Medium => "medium",
            Importance::Low => "low",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationType {
    Cooperation,
    Competition,
    Supervision,
    Influence,
    Dependency,
}

impl RelationType {
    pub const ALL: [RelationType; 5] = [
        RelationType::Supervision,
        RelationType::Cooperation,
        RelationType::Competition,
        RelationType::Influence,
        RelationType::Dependency,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationType::Cooperation => "cooperation",
            RelationType::Competition => "competition",
            RelationType::Supervision => "supervision",
            RelationType::Influence => "influence",
            RelationType::Dependency => "dependency",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Strong,
    Medium,
    #[default]
    Weak,
}

/// Build a participant id: `<type>_<normalized name>`.
pub fn participant_id(participant_type: ParticipantType, name: &str) -> String {
    format!("{}_{}", participant_type.as_str(), normalize_name(name))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub participant_type: ParticipantType,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub importance: Importance,
    /// Character offset of the first match in the preprocessed text.
    #[serde(default)]
    pub source_offset: usize,
    #[serde(default = "default_confidence")]
    pub confidence: f64,
}

fn default_confidence() -> f64 {
    0.5
}

impl Participant {
    pub fn new(
        name: impl Into<String>,
        participant_type: ParticipantType,
        role: impl Into<String>,
        importance: Importance,
        source_offset: usize,
        confidence: f64,
    ) -> Self {
        let name = name.into();
        Self {
            id: participant_id(participant_type, &name),
            name,
            participant_type,
            role: role.into(),
            importance,
            source_offset,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relation {
    pub from_id: String,
    pub to_id: String,
    #[serde(rename = "type")]
    pub relation_type: RelationType,
    #[serde(default)]
    pub strength: Strength,
    #[serde(default)]
    pub description: String,
}

impl Relation {
    pub fn new(
        from_id: impl Into<String>,
        to_id: impl Into<String>,
        relation_type: RelationType,
        strength: Strength,
        description: impl Into<String>,
    ) -> Self {
        Self {
            from_id: from_id.into(),
            to_id: to_id.into(),
            relation_type,
            strength,
            description: description.into(),
        }
    }
}

/// Counts gathered while extracting, carried into the summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractionDiagnostics {
    pub unresolved_relations: usize,
    pub self_relations: usize,
    pub text_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub participant_count: usize,
    pub relation_count: usize,
    pub by_type: BTreeMap<ParticipantType, usize>,
    pub unresolved_relations: usize,
    pub self_relations: usize,
    pub text_length: usize,
}

/// Output of one extraction pass. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    participants: Vec<Participant>,
    relations: Vec<Relation>,
    summary: AnalysisSummary,
}

impl AnalysisResult {
    pub fn new(
        participants: Vec<Participant>,
        relations: Vec<Relation>,
        diagnostics: ExtractionDiagnostics,
    ) -> Self {
        let mut by_type = BTreeMap::new();
        for participant in &participants {
            *by_type.entry(participant.participant_type).or_insert(0) += 1;
        }

        let summary = AnalysisSummary {
            participant_count: participants.len(),
            relation_count: relations.len(),
            by_type,
            unresolved_relations: diagnostics.unresolved_relations,
            self_relations: diagnostics.self_relations,
            text_length: diagnostics.text_length,
        };

        Self {
            participants,
            relations,
            summary,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), Vec::new(), ExtractionDiagnostics::default())
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    pub fn summary(&self) -> &AnalysisSummary {
        &self.summary
    }

    pub fn into_parts(self) -> (Vec<Participant>, Vec<Relation>) {
        (self.participants, self.relations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_id_uses_type_and_normalized_name() {
        let p = Participant::new("华为公司", ParticipantType::Organization, "enterprise", Importance::High, 6, 1.4);
        assert_eq!(p.id, "organization_华为公司");
        assert_eq!(p.confidence, 1.0);
    }

    #[test]
    fn test_importance_thresholds() {
        assert_eq!(Importance::from_score(0), Importance::Low);
        assert_eq!(Importance::from_score(1), Importance::Low);
        assert_eq!(Importance::from_score(2), Importance::Medium);
        assert_eq!(Importance::from_score(3), Importance::Medium);
        assert_eq!(Importance::from_score(4), Importance::High);
        assert_eq!(Importance::from_score(9), Importance::High);
    }

    #[test]
    fn test_wire_format() {
        let relation = Relation::new("a", "b", RelationType::Supervision, Strength::Strong, "a监管b");
        let json = serde_json::to_value(&relation).unwrap();
        assert_eq!(json["fromId"], "a");
        assert_eq!(json["type"], "supervision");
        assert_eq!(json["strength"], "strong");

        let participant: Participant = serde_json::from_value(serde_json::json!({
            "id": "individual_张三", "name": "张三", "type": "individual"
        }))
        .unwrap();
        assert_eq!(participant.importance, Importance::Low);
        assert_eq!(participant.confidence, 0.5);
    }

    #[test]
    fn test_summary_counts_types() {
        let participants = vec![
            Participant::new("环保部门", ParticipantType::Organization, "", Importance::High, 0, 0.9),
            Participant::new("华为公司", ParticipantType::Organization, "", Importance::High, 6, 1.0),
            Participant::new("人工智能", ParticipantType::Artifact, "", Importance::Low, 12, 0.8),
        ];
        let result = AnalysisResult::new(
            participants,
            Vec::new(),
            ExtractionDiagnostics { unresolved_relations: 2, self_relations: 0, text_length: 16 },
        );

        let summary = result.summary();
        assert_eq!(summary.participant_count, 3);
        assert_eq!(summary.by_type[&ParticipantType::Organization], 2);
        assert_eq!(summary.by_type[&ParticipantType::Artifact], 1);
        assert_eq!(summary.unresolved_relations, 2);
    }
}
