use regex::Regex;
use std::collections::{HashMap, HashSet};

use crate::error::ExtractResult;
use crate::patterns::alternation;
use crate::schema::{Participant, Relation, RelationType, Strength};
use crate::vocabulary::{StrengthKeywords, Vocabulary};

/// Anything but whitespace and clause punctuation.
const CLAUSE_CHAR: &str = r#"[^\s。，、；：！？,.;:!?“”"（）()《》]"#;
const MAX_SPAN_CHARS: usize = 30;

struct CompiledRule {
    relation_type: RelationType,
    regex: Regex,
}

/// Relations found in one pass, plus what was dropped along the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationExtraction {
    pub relations: Vec<Relation>,
    pub unresolved: usize,
    pub self_relations: usize,
}

pub struct RelationExtractor {
    rules: Vec<CompiledRule>,
    strength: StrengthKeywords,
}

impl RelationExtractor {
    pub fn new(vocabulary: &Vocabulary) -> ExtractResult<Self> {
        let mut rules = Vec::with_capacity(vocabulary.relations.len());

        for rule in &vocabulary.relations {
            let connectors = alternation(&rule.connectors);
            let pattern = if rule.closers.is_empty() {
                format!(
                    "(?P<subject>{c}{{1,{n}}}?)(?P<connector>{conn})(?P<object>{c}{{1,{n}}})",
                    c = CLAUSE_CHAR,
                    n = MAX_SPAN_CHARS,
                    conn = connectors,
                )
            } else {
                format!(
                    "(?P<subject>{c}{{1,{n}}}?)(?P<connector>{conn})(?P<object>{c}{{1,{n}}}?)(?P<closer>{close})",
                    c = CLAUSE_CHAR,
                    n = MAX_SPAN_CHARS,
                    conn = connectors,
                    close = alternation(&rule.closers),
                )
            };

            rules.push(CompiledRule {
                relation_type: rule.relation_type,
                regex: Regex::new(&pattern)?,
            });
        }

        Ok(Self {
            rules,
            strength: vocabulary.strength_keywords.clone(),
        })
    }

    /// Match every rule against the raw text and resolve both sides to
    /// participants. Unresolved and self-referencing matches are dropped and
    /// counted; every connector occurrence is tried once per rule.
    pub fn extract(&self, raw_text: &str, participants: &[Participant]) -> RelationExtraction {
        let names = NameIndex::new(participants);
        let mut seen = HashSet::new();
        let mut extraction = RelationExtraction::default();

        for rule in &self.rules {
            // resume right after each connector, so an object span that runs
            // into the next construction ("甲监管乙并领导丙") does not hide it
            let mut pos = 0;
            while let Some(caps) = rule.regex.captures_at(raw_text, pos) {
                let (Some(subject), Some(connector), Some(object)) =
                    (caps.name("subject"), caps.name("connector"), caps.name("object"))
                else {
                    break;
                };
                pos = connector.end();

                let from = names.resolve_subject(subject.as_str());
                let to = names.resolve_object(object.as_str());
                let (Some(from), Some(to)) = (from, to) else {
                    tracing::trace!(
                        subject = subject.as_str(),
                        object = object.as_str(),
                        relation = %rule.relation_type,
                        "Unresolved relation endpoint"
                    );
                    extraction.unresolved += 1;
                    continue;
                };

                if from == to {
                    extraction.self_relations += 1;
                    continue;
                }

                if !seen.insert((from.to_string(), to.to_string(), rule.relation_type)) {
                    continue;
                }

                let mut connective = connector.as_str().to_string();
                if let Some(closer) = caps.name("closer") {
                    connective.push_str(closer.as_str());
                }

                extraction.relations.push(Relation::new(
                    from,
                    to,
                    rule.relation_type,
                    self.strength_for(&connective),
                    &caps[0],
                ));
            }
        }

        tracing::debug!(
            relations = extraction.relations.len(),
            unresolved = extraction.unresolved,
            self_relations = extraction.self_relations,
            "Relation extraction complete"
        );

        extraction
    }

    /// Strong keywords are checked first, then medium, then weak.
    pub fn strength_for(&self, connective: &str) -> Strength {
        let contains_any = |words: &[String]| {
            words
                .iter()
                .any(|w| !w.is_empty() && connective.contains(w.as_str()))
        };

        if contains_any(self.strength.strong.as_slice()) {
            Strength::Strong
        } else if contains_any(self.strength.medium.as_slice()) {
            Strength::Medium
        } else {
            Strength::Weak
        }
    }
}

/// Name lookup over one extraction pass.
struct NameIndex<'a> {
    exact: HashMap<&'a str, &'a str>,
    /// (name, id), longest names first.
    by_length: Vec<(&'a str, &'a str)>,
}

impl<'a> NameIndex<'a> {
    fn new(participants: &'a [Participant]) -> Self {
        let mut exact = HashMap::new();
        for p in participants {
            exact.entry(p.name.as_str()).or_insert(p.id.as_str());
        }

        let mut by_length: Vec<(&str, &str)> = participants
            .iter()
            .map(|p| (p.name.as_str(), p.id.as_str()))
            .collect();
        by_length.sort_by_key(|(name, _)| std::cmp::Reverse(name.chars().count()));

        Self { exact, by_length }
    }

    /// Exact name, else the longest name the span ends with, else the name
    /// occurring last in the span.
    fn resolve_subject(&self, span: &str) -> Option<&'a str> {
        if let Some(id) = self.exact.get(span) {
            return Some(*id);
        }
        if let Some((_, id)) = self
            .by_length
            .iter()
            .find(|(name, _)| !name.is_empty() && span.ends_with(name))
        {
            return Some(*id);
        }

        let mut best: Option<(usize, &'a str)> = None;
        for (name, id) in self.by_length.iter().filter(|(name, _)| !name.is_empty()) {
            if let Some(at) = span.rfind(name) {
                // longer names come first and keep ties
                if best.is_none_or(|(best_at, _)| at > best_at) {
                    best = Some((at, *id));
                }
            }
        }
        best.map(|(_, id)| id)
    }

    /// Exact name, else the longest name the span starts with, else the name
    /// occurring first in the span.
    fn resolve_object(&self, span: &str) -> Option<&'a str> {
        if let Some(id) = self.exact.get(span) {
            return Some(*id);
        }
        if let Some((_, id)) = self
            .by_length
            .iter()
            .find(|(name, _)| !name.is_empty() && span.starts_with(name))
        {
            return Some(*id);
        }

        let mut best: Option<(usize, &'a str)> = None;
        for (name, id) in self.by_length.iter().filter(|(name, _)| !name.is_empty()) {
            if let Some(at) = span.find(name) {
                if best.is_none_or(|(best_at, _)| at < best_at) {
                    best = Some((at, *id));
                }
            }
        }
        best.map(|(_, id)| id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Importance, ParticipantType};

    fn org(name: &str) -> Participant {
        Participant::new(name, ParticipantType::Organization, "", Importance::Medium, 0, 0.8)
    }

    fn extractor() -> RelationExtractor {
        RelationExtractor::new(&Vocabulary::builtin().unwrap()).unwrap()
    }

    #[test]
    fn test_supervision_is_strong() {
        let participants = vec![org("环保部门"), org("华为公司")];
        let extraction = extractor().extract("环保部门监管华为公司", &participants);

        assert_eq!(extraction.relations.len(), 1);
        let relation = &extraction.relations[0];
        assert_eq!(relation.from_id, "organization_环保部门");
        assert_eq!(relation.to_id, "organization_华为公司");
        assert_eq!(relation.relation_type, RelationType::Supervision);
        assert_eq!(relation.strength, Strength::Strong);
        assert_eq!(relation.description, "环保部门监管华为公司");
    }

    #[test]
    fn test_cooperation_requires_closer() {
        let participants = vec![org("华为"), org("腾讯")];
        let extraction = extractor().extract("华为与腾讯合作，华为和腾讯竞争。", &participants);

        let types: Vec<(RelationType, Strength)> = extraction
            .relations
            .iter()
            .map(|r| (r.relation_type, r.strength))
            .collect();
        assert_eq!(
            types,
            [
                (RelationType::Cooperation, Strength::Medium),
                (RelationType::Competition, Strength::Medium)
            ]
        );
    }

    #[test]
    fn test_spans_resolve_by_boundary_names() {
        let participants = vec![org("环保部门"), org("华为公司"), org("腾讯公司")];
        let extraction = extractor().extract("今年环保部门监管华为公司的数据业务", &participants);

        assert_eq!(extraction.relations.len(), 1);
        assert_eq!(extraction.relations[0].to_id, "organization_华为公司");
    }

    #[test]
    fn test_unresolved_and_self_relations_are_counted() {
        let participants = vec![org("华为公司")];
        let extraction = extractor().extract("某机构监管华为公司。华为公司依赖华为公司", &participants);

        assert!(extraction.relations.is_empty());
        assert_eq!(extraction.unresolved, 1);
        assert_eq!(extraction.self_relations, 1);
    }

    #[test]
    fn test_chained_constructions_in_one_clause() {
        let participants = vec![org("环保部门"), org("华为公司"), org("腾讯公司")];
        let extraction = extractor().extract("环保部门监管华为公司并领导腾讯公司", &participants);

        let pairs: Vec<(&str, &str)> = extraction
            .relations
            .iter()
            .map(|r| (r.from_id.as_str(), r.to_id.as_str()))
            .collect();
        assert_eq!(
            pairs,
            [
                ("organization_环保部门", "organization_华为公司"),
                ("organization_华为公司", "organization_腾讯公司")
            ]
        );
        assert_eq!(extraction.relations[1].strength, Strength::Strong);
        assert_eq!(extraction.unresolved, 0);
    }

    #[test]
    fn test_chained_unresolved_sides_are_each_counted() {
        let participants = vec![org("华为公司")];
        let extraction = extractor().extract("某机构监管华为公司并领导某单位", &participants);

        assert!(extraction.relations.is_empty());
        assert_eq!(extraction.unresolved, 2);
    }

    #[test]
    fn test_duplicates_keep_first() {
        let participants = vec![org("环保部门"), org("华为公司")];
        let extraction = extractor().extract("环保部门监管华为公司；环保部门监督华为公司", &participants);

        assert_eq!(extraction.relations.len(), 1);
        assert_eq!(extraction.relations[0].description, "环保部门监管华为公司");
    }

    #[test]
    fn test_dependency_is_weak() {
        let participants = vec![org("小米"), org("芯片企业")];
        let extraction = extractor().extract("小米依赖芯片企业", &participants);

        assert_eq!(extraction.relations[0].relation_type, RelationType::Dependency);
        assert_eq!(extraction.relations[0].strength, Strength::Weak);
    }

    #[test]
    fn test_strength_table_order() {
        let extractor = extractor();
        assert_eq!(extractor.strength_for("领导"), Strength::Strong);
        assert_eq!(extractor.strength_for("指导"), Strength::Medium);
        assert_eq!(extractor.strength_for("依托"), Strength::Weak);
        assert_eq!(extractor.strength_for("接触"), Strength::Weak);
    }
}
