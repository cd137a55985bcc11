use crate::matching::{LemmaMode, form_matches, lemma_matches, pos_matches};
use crate::{AnalysisRecord, AnnotationRecord, Error, Result};

/// Per-field verdict for one (gold, candidate) pair.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    schemars::JsonSchema,
)]
pub struct MatchVector {
    #[serde(rename = "root_match")]
    pub lemma: bool,
    #[serde(rename = "pos_match")]
    pub pos: bool,
    #[serde(rename = "form_match")]
    pub form: bool,
}

impl MatchVector {
    pub fn new(lemma: bool, pos: bool, form: bool) -> Self {
        Self { lemma, pos, form }
    }

    pub fn is_full(&self) -> bool {
        self.lemma && self.pos && self.form
    }

    /// Number of matching fields.
    pub fn count(&self) -> usize {
        [self.lemma, self.pos, self.form]
            .into_iter()
            .filter(|matched| *matched)
            .count()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlignmentResult {
    /// One vector per candidate, in candidate order.
    pub matches: Vec<MatchVector>,
    pub has_full_match: bool,
}

/// Compares the gold annotation of a word with its candidate analyses.
pub trait Comparator {
    fn compare(
        &self,
        gold: &[AnnotationRecord],
        candidates: &[AnalysisRecord],
    ) -> Result<AlignmentResult>;
}

/// The default comparison policy, see [`align`].
#[derive(Clone, Copy, Debug, Default)]
pub struct RecordAligner;

impl Comparator for RecordAligner {
    fn compare(
        &self,
        gold: &[AnnotationRecord],
        candidates: &[AnalysisRecord],
    ) -> Result<AlignmentResult> {
        align(gold, candidates)
    }
}

/// Matches every candidate against the single gold annotation.
///
/// When a candidate agrees on part of speech and form but not on the lemma,
/// the lemma is compared again ignoring compound segment markers.
pub fn align(gold: &[AnnotationRecord], candidates: &[AnalysisRecord]) -> Result<AlignmentResult> {
    let [gold] = gold else {
        return Err(Error::AmbiguousGold(gold.len()));
    };

    let matches = candidates
        .iter()
        .map(|candidate| {
            let pos = pos_matches(gold, candidate);
            let form = form_matches(gold, candidate)?;
            let lemma = lemma_matches(gold, candidate, LemmaMode::Standard)
                || (pos
                    && form
                    && lemma_matches(gold, candidate, LemmaMode::IgnoreCompoundSegments));
            Ok(MatchVector::new(lemma, pos, form))
        })
        .collect::<Result<Vec<_>>>()?;

    let has_full_match = matches.iter().any(MatchVector::is_full);
    Ok(AlignmentResult {
        matches,
        has_full_match,
    })
}
