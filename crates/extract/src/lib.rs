pub mod error;
pub mod normalizer;
pub mod participants;
pub mod patterns;
pub mod relations;
pub mod schema;
pub mod vocabulary;

pub use error::{ExtractError, ExtractResult};
pub use normalizer::normalize_name;
pub use participants::ParticipantBuilder;
pub use patterns::{Candidate, PatternExtractor};
pub use relations::{RelationExtraction, RelationExtractor};
pub use schema::{
    AnalysisResult, AnalysisSummary, ExtractionDiagnostics, Importance, Participant,
    ParticipantType, Relation, RelationType, Strength, participant_id,
};
pub use vocabulary::Vocabulary;

use ingest::{char_len, preprocess};

/// Runs preprocessing, pattern matching, participant building and relation
/// extraction over one text block.
pub struct Extractor {
    patterns: PatternExtractor,
    builder: ParticipantBuilder,
    relations: RelationExtractor,
}

impl Extractor {
    pub fn new(vocabulary: &Vocabulary) -> ExtractResult<Self> {
        Ok(Self {
            patterns: PatternExtractor::new(vocabulary)?,
            builder: ParticipantBuilder::new(vocabulary),
            relations: RelationExtractor::new(vocabulary)?,
        })
    }

    pub fn with_builtin_vocabulary() -> ExtractResult<Self> {
        Self::new(&Vocabulary::builtin()?)
    }

    /// Candidates for the preprocessed form of `raw_text`.
    pub fn candidates(&self, raw_text: &str) -> Vec<Candidate> {
        self.patterns.extract(&preprocess(raw_text))
    }

    /// Extract participants and relations from a text block.
    ///
    /// Entities are matched on the preprocessed text; relations on the raw
    /// text, where punctuation still marks clause boundaries. No match is a
    /// valid, empty result.
    pub fn extract(&self, raw_text: &str) -> AnalysisResult {
        let text = preprocess(raw_text);
        if text.is_empty() {
            return AnalysisResult::empty();
        }

        let candidates = self.patterns.extract(&text);
        let participants = self.builder.build(&candidates, &text);
        let extraction = self.relations.extract(raw_text, &participants);

        let diagnostics = ExtractionDiagnostics {
            unresolved_relations: extraction.unresolved,
            self_relations: extraction.self_relations,
            text_length: char_len(&text),
        };

        tracing::info!(
            participants = participants.len(),
            relations = extraction.relations.len(),
            unresolved = extraction.unresolved,
            "Extraction complete"
        );

        AnalysisResult::new(participants, extraction.relations, diagnostics)
    }
}

/// Check the `text` field of a request body. An empty string is valid;
/// absent, null or non-string values are not.
pub fn validate_text(value: Option<&serde_json::Value>) -> ExtractResult<&str> {
    match value {
        Some(serde_json::Value::String(text)) => Ok(text.as_str()),
        Some(serde_json::Value::Null) | None => {
            Err(ExtractError::Validation("text is required".into()))
        }
        Some(other) => Err(ExtractError::Validation(format!(
            "text must be a string, got {}",
            json_kind(other)
        ))),
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
