use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;

use ingest::{char_len, char_offset};

use crate::error::ExtractResult;
use crate::schema::ParticipantType;
use crate::vocabulary::{PatternFamily, Vocabulary};

/// Characters a participant name can be built from.
pub(crate) const NAME_CHAR: &str = r"[\p{Han}A-Za-z0-9]";

const BASE_CONFIDENCE: f64 = 0.5;
const LENGTH_BONUS: f64 = 0.1;
const LENGTH_BONUS_MIN_CHARS: usize = 4;

/// A typed, scored match before deduplication into participants.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub text: String,
    #[serde(rename = "type")]
    pub participant_type: ParticipantType,
    pub family: String,
    /// Character offset in the preprocessed text.
    pub offset: usize,
    pub confidence: f64,
}

struct CompiledFamily {
    family: PatternFamily,
    regex: Regex,
}

pub struct PatternExtractor {
    families: Vec<CompiledFamily>,
    segmenter: Regex,
}

impl PatternExtractor {
    pub fn new(vocabulary: &Vocabulary) -> ExtractResult<Self> {
        vocabulary.validate()?;

        let mut families = Vec::with_capacity(vocabulary.families.len());
        for family in &vocabulary.families {
            let regex = Regex::new(&family_pattern(family))?;
            families.push(CompiledFamily {
                family: family.clone(),
                regex,
            });
        }

        let known_terms: Vec<String> = vocabulary
            .families
            .iter()
            .flat_map(|f| f.known_terms.iter().cloned())
            .collect();
        let segmenter = Regex::new(&segmenter_pattern(&known_terms, &vocabulary.delimiters))?;

        Ok(Self {
            families,
            segmenter,
        })
    }

    /// Scan preprocessed text family by family, left to right.
    ///
    /// Candidates are unique per (text, type); the first occurrence wins, so
    /// the order is family order then match order.
    pub fn extract(&self, text: &str) -> Vec<Candidate> {
        let segments = self.segments(text);
        let mut seen: HashSet<(String, ParticipantType)> = HashSet::new();
        let mut candidates = Vec::new();

        for compiled in &self.families {
            let family = &compiled.family;

            for &(start, end) in &segments {
                for m in compiled.regex.find_iter(&text[start..end]) {
                    let matched = m.as_str();
                    if char_len(matched) <= 1 {
                        continue;
                    }

                    let follow = &text[start + m.end()..];
                    if family
                        .blocked_followers
                        .iter()
                        .any(|f| !f.is_empty() && follow.starts_with(f.as_str()))
                    {
                        continue;
                    }

                    if !seen.insert((matched.to_string(), family.participant_type)) {
                        continue;
                    }

                    candidates.push(Candidate {
                        text: matched.to_string(),
                        participant_type: family.participant_type,
                        family: family.name.clone(),
                        offset: char_offset(text, start + m.start()),
                        confidence: confidence(family, matched),
                    });
                }
            }
        }

        tracing::debug!(
            segments = segments.len(),
            candidates = candidates.len(),
            "Pattern extraction complete"
        );

        candidates
    }

    /// Byte ranges between whitespace and delimiter words. Known terms are
    /// matched first so a delimiter inside one (和 in 碳中和) does not split it.
    fn segments(&self, text: &str) -> Vec<(usize, usize)> {
        let mut segments = Vec::new();
        let mut cursor = 0;

        for caps in self.segmenter.captures_iter(text) {
            if caps.name("term").is_some() {
                continue;
            }
            let Some(m) = caps.get(0) else {
                continue;
            };
            if m.start() > cursor {
                segments.push((cursor, m.start()));
            }
            cursor = m.end();
        }
        if cursor < text.len() {
            segments.push((cursor, text.len()));
        }

        segments
    }
}

fn confidence(family: &PatternFamily, matched: &str) -> f64 {
    let mut score = BASE_CONFIDENCE;

    if family
        .strong_indicators
        .iter()
        .any(|i| !i.is_empty() && matched.contains(i.as_str()))
    {
        score += family.indicator_bonus;
    }
    if family.known_terms.iter().any(|t| matched.contains(t.as_str())) {
        score += family.known_term_bonus;
    }
    if char_len(matched) >= LENGTH_BONUS_MIN_CHARS {
        score += LENGTH_BONUS;
    }

    score.min(1.0)
}

fn family_pattern(family: &PatternFamily) -> String {
    let mut branches = Vec::new();

    if !family.suffixes.is_empty() {
        branches.push(format!(
            "{}{{1,{}}}(?:{})",
            NAME_CHAR,
            family.max_prefix_chars,
            alternation(&family.suffixes)
        ));
    }
    if !family.known_terms.is_empty() {
        branches.push(format!("(?:{})", alternation(&family.known_terms)));
    }

    branches.join("|")
}

fn segmenter_pattern(known_terms: &[String], delimiters: &[String]) -> String {
    let mut branches = Vec::new();

    let terms = alternation(known_terms);
    if !terms.is_empty() {
        branches.push(format!("(?P<term>{})", terms));
    }
    branches.push(r"\s+".to_string());

    let words = alternation(delimiters);
    if !words.is_empty() {
        branches.push(words);
    }

    branches.join("|")
}

/// Escaped alternation, longest terms first so a longer suffix wins over its
/// own tail (委员会 before 委).
pub(crate) fn alternation(terms: &[String]) -> String {
    let mut sorted: Vec<&String> = terms.iter().filter(|t| !t.is_empty()).collect();
    sorted.sort_by_key(|t| std::cmp::Reverse(t.chars().count()));

    sorted
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|")
}
