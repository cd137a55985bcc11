//! Per-document diff between the gold layer and the analyzer layer.
//!
//! Only words without a fully matching candidate end up in the diff; every
//! word still contributes to the summary counters.

use std::collections::BTreeMap;

use crate::align::{Comparator, MatchVector, RecordAligner};
use crate::error::{Error, Result};
use crate::{AnalysisLayer, AnalysisRecord, AnnotationRecord, Features, GoldLayer, PartOfSpeech};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiffOptions {
    /// Count mismatching words per [`MismatchCategory`].
    pub count_mismatch_details: bool,
    /// Keep the compared lemma and root on every mismatch record.
    pub show_lemmas: bool,
    /// Keep the compared tags.
    pub show_postags: bool,
    /// Keep the gold features and the analyzer form.
    pub show_forms: bool,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            count_mismatch_details: true,
            show_lemmas: true,
            show_postags: true,
            show_forms: true,
        }
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    serde::Serialize,
    serde::Deserialize,
    schemars::JsonSchema,
)]
pub enum MismatchCategory {
    ProperNoun,
    Punctuation,
    Symbol,
    Other,
}

impl MismatchCategory {
    pub const ALL: [MismatchCategory; 4] = [
        MismatchCategory::ProperNoun,
        MismatchCategory::Punctuation,
        MismatchCategory::Symbol,
        MismatchCategory::Other,
    ];

    pub fn of(tag: PartOfSpeech) -> Self {
        match tag {
            PartOfSpeech::Propn => MismatchCategory::ProperNoun,
            PartOfSpeech::Punct => MismatchCategory::Punctuation,
            PartOfSpeech::Sym => MismatchCategory::Symbol,
            _ => MismatchCategory::Other,
        }
    }
}

/// A value from the gold side next to its analyzer counterpart.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
pub struct Compared<G, A = G> {
    pub gold: G,
    pub analysis: A,
}

/// How one candidate of a mismatching word compares with the gold record.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
pub struct MismatchRecord {
    /// Index of the candidate among the word's analyses.
    pub candidate: usize,
    #[serde(flatten)]
    pub matches: MatchVector,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lemma: Option<Compared<String>>,
    /// Gold side is `<coarse>_<fine>`, e.g. `S_PROPN`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<Compared<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub form: Option<Compared<Features, String>>,
}

/// A word none of whose candidates fully matched.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
pub struct WordDiff {
    pub index: usize,
    pub text: String,
    pub fine_tag: PartOfSpeech,
    pub mismatches: Vec<MismatchRecord>,
}

impl WordDiff {
    /// The candidate with the most matching fields. Ties go to the later
    /// candidate.
    pub fn best_candidate(&self) -> Option<&MismatchRecord> {
        self.mismatches
            .iter()
            .max_by_key(|record| record.matches.count())
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    schemars::JsonSchema,
)]
pub struct TagCount {
    pub words: usize,
    /// Words with more than one candidate analysis.
    pub ambiguous: usize,
}

#[derive(
    Clone,
    Debug,
    Default,
    PartialEq,
    serde::Serialize,
    serde::Deserialize,
    schemars::JsonSchema,
)]
pub struct DocumentDiffSummary {
    pub words_total: usize,
    pub matching_words: usize,
    pub mismatching_words: usize,
    pub ambiguous_words: usize,
    pub avg_candidates_per_word: f64,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub mismatching_by_category: BTreeMap<MismatchCategory, usize>,
    /// Word and ambiguity counts per universal tag.
    #[serde(default)]
    pub tag_counts: BTreeMap<PartOfSpeech, TagCount>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
pub struct DocumentDiff {
    pub document: String,
    pub words: Vec<WordDiff>,
    pub summary: DocumentDiffSummary,
}

pub struct DiffBuilder<C = RecordAligner> {
    comparator: C,
    options: DiffOptions,
}

impl Default for DiffBuilder<RecordAligner> {
    fn default() -> Self {
        Self::new(RecordAligner, DiffOptions::default())
    }
}

impl<C: Comparator> DiffBuilder<C> {
    pub fn new(comparator: C, options: DiffOptions) -> Self {
        Self {
            comparator,
            options,
        }
    }

    pub fn options(&self) -> &DiffOptions {
        &self.options
    }

    /// Compares two layers of the same document word by word.
    pub fn build(&self, gold: &GoldLayer, analysis: &AnalysisLayer) -> Result<DocumentDiff> {
        if gold.document != analysis.document {
            return Err(Error::DocumentMismatch {
                gold: gold.document.clone(),
                analysis: analysis.document.clone(),
            });
        }
        if gold.words.len() != analysis.words.len() {
            return Err(Error::LayerLengthMismatch {
                gold: gold.words.len(),
                analysis: analysis.words.len(),
            });
        }

        let mut words = Vec::new();
        let mut summary = DocumentDiffSummary::default();
        if self.options.count_mismatch_details {
            summary.mismatching_by_category = MismatchCategory::ALL
                .into_iter()
                .map(|category| (category, 0))
                .collect();
        }
        let mut candidates_total = 0;

        for (index, (gold_word, candidates)) in gold.words.iter().zip(&analysis.words).enumerate() {
            let wrap = |source: Error| Error::Word {
                document: gold.document.clone(),
                index,
                text: gold_word.surface_text.clone(),
                source: Box::new(source),
            };
            if candidates.is_empty() {
                return Err(wrap(Error::NoCandidates));
            }
            let alignment = self
                .comparator
                .compare(std::slice::from_ref(gold_word), candidates)
                .map_err(wrap)?;
            if alignment.matches.len() != candidates.len() {
                return Err(wrap(Error::CandidateCountMismatch {
                    candidates: candidates.len(),
                    vectors: alignment.matches.len(),
                }));
            }

            summary.words_total += 1;
            candidates_total += candidates.len();
            let tag_count = summary.tag_counts.entry(gold_word.fine_tag).or_default();
            tag_count.words += 1;
            if candidates.len() > 1 {
                summary.ambiguous_words += 1;
                tag_count.ambiguous += 1;
            }

            if alignment.has_full_match {
                summary.matching_words += 1;
                continue;
            }

            let mismatches = alignment
                .matches
                .iter()
                .zip(candidates)
                .enumerate()
                .map(|(candidate_index, (matches, candidate))| {
                    self.mismatch_record(gold_word, candidate_index, *matches, candidate)
                })
                .collect();
            words.push(WordDiff {
                index,
                text: gold_word.surface_text.clone(),
                fine_tag: gold_word.fine_tag,
                mismatches,
            });
            if self.options.count_mismatch_details {
                *summary
                    .mismatching_by_category
                    .entry(MismatchCategory::of(gold_word.fine_tag))
                    .or_default() += 1;
            }
        }

        summary.mismatching_words = summary.words_total - summary.matching_words;
        if summary.words_total > 0 {
            summary.avg_candidates_per_word = candidates_total as f64 / summary.words_total as f64;
        }

        log::debug!(
            "{}: {} of {} words without a full match",
            gold.document,
            summary.mismatching_words,
            summary.words_total
        );

        Ok(DocumentDiff {
            document: gold.document.clone(),
            words,
            summary,
        })
    }

    fn mismatch_record(
        &self,
        gold: &AnnotationRecord,
        candidate_index: usize,
        matches: MatchVector,
        candidate: &AnalysisRecord,
    ) -> MismatchRecord {
        MismatchRecord {
            candidate: candidate_index,
            matches,
            lemma: self.options.show_lemmas.then(|| Compared {
                gold: gold.lemma.clone(),
                analysis: candidate.root.clone(),
            }),
            pos: self.options.show_postags.then(|| Compared {
                gold: gold.tag_pair(),
                analysis: candidate.part_of_speech.clone(),
            }),
            form: self.options.show_forms.then(|| Compared {
                gold: gold.features.clone(),
                analysis: candidate.form.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::align::AlignmentResult;
    use crate::ErrorKind;

    fn noun(text: &str, fine_tag: PartOfSpeech) -> AnnotationRecord {
        AnnotationRecord::new(text, text, "S", fine_tag)
            .with_feature("Number", "Sing")
            .with_feature("Case", "Nom")
    }

    fn layers(words: Vec<(AnnotationRecord, Vec<AnalysisRecord>)>) -> (GoldLayer, AnalysisLayer) {
        let (gold, analysis): (Vec<_>, Vec<_>) = words.into_iter().unzip();
        (
            GoldLayer {
                document: "doc".to_string(),
                words: gold,
            },
            AnalysisLayer {
                document: "doc".to_string(),
                words: analysis,
            },
        )
    }

    #[test]
    fn test_summary_counts() {
        let (gold, analysis) = layers(vec![
            (
                noun("maja", PartOfSpeech::Noun),
                vec![AnalysisRecord::new("maja", "S", "sg n")],
            ),
            (
                noun("Kalev", PartOfSpeech::Propn),
                vec![
                    AnalysisRecord::new("kalev", "S", "sg n"),
                    AnalysisRecord::new("kale", "S", "sg g"),
                ],
            ),
            (
                noun("tool", PartOfSpeech::Noun),
                vec![
                    AnalysisRecord::new("tool", "S", "sg g"),
                    AnalysisRecord::new("tool", "S", "sg n"),
                ],
            ),
        ]);
        let diff = DiffBuilder::default().build(&gold, &analysis).unwrap();
        let summary = &diff.summary;
        assert_eq!(summary.words_total, 3);
        assert_eq!(summary.matching_words, 2);
        assert_eq!(summary.mismatching_words, 1);
        assert_eq!(summary.ambiguous_words, 2);
        assert!((summary.avg_candidates_per_word - 5.0 / 3.0).abs() < 1e-9);
        assert_eq!(summary.mismatching_by_category[&MismatchCategory::ProperNoun], 1);
        assert_eq!(summary.mismatching_by_category[&MismatchCategory::Other], 0);
        assert_eq!(
            summary.tag_counts[&PartOfSpeech::Noun],
            TagCount {
                words: 2,
                ambiguous: 1
            }
        );

        assert_eq!(diff.words.len(), 1);
        let word = &diff.words[0];
        assert_eq!(word.index, 1);
        assert_eq!(word.text, "Kalev");
        assert_eq!(word.mismatches.len(), 2);
        assert_eq!(word.mismatches[0].matches, MatchVector::new(false, true, true));
        assert_eq!(
            word.mismatches[0].pos,
            Some(Compared {
                gold: "S_PROPN".to_string(),
                analysis: "S".to_string()
            })
        );
    }

    #[test]
    fn test_hidden_fields_and_disabled_categories() {
        let (gold, analysis) = layers(vec![(
            noun("maja", PartOfSpeech::Noun),
            vec![AnalysisRecord::new("maja", "S", "pl n")],
        )]);
        let options = DiffOptions {
            count_mismatch_details: false,
            show_lemmas: false,
            show_postags: true,
            show_forms: false,
        };
        let diff = DiffBuilder::new(RecordAligner, options)
            .build(&gold, &analysis)
            .unwrap();
        let record = &diff.words[0].mismatches[0];
        assert!(record.lemma.is_none());
        assert!(record.pos.is_some());
        assert!(record.form.is_none());
        assert!(diff.summary.mismatching_by_category.is_empty());
    }

    #[test]
    fn test_layer_shape_errors() {
        let (gold, mut analysis) = layers(vec![(
            noun("maja", PartOfSpeech::Noun),
            vec![AnalysisRecord::new("maja", "S", "sg n")],
        )]);
        analysis.words.push(vec![AnalysisRecord::new("ja", "J", "")]);
        let error = DiffBuilder::default().build(&gold, &analysis).unwrap_err();
        assert!(matches!(
            error,
            Error::LayerLengthMismatch {
                gold: 1,
                analysis: 2
            }
        ));

        analysis.words.pop();
        analysis.document = "other".to_string();
        let error = DiffBuilder::default().build(&gold, &analysis).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InputShape);
    }

    #[test]
    fn test_word_without_candidates_is_reported_with_position() {
        let (gold, analysis) = layers(vec![
            (
                noun("maja", PartOfSpeech::Noun),
                vec![AnalysisRecord::new("maja", "S", "sg n")],
            ),
            (noun("tool", PartOfSpeech::Noun), vec![]),
        ]);
        let error = DiffBuilder::default().build(&gold, &analysis).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InputShape);
        match error {
            Error::Word {
                document,
                index,
                text,
                source,
            } => {
                assert_eq!(document, "doc");
                assert_eq!(index, 1);
                assert_eq!(text, "tool");
                assert!(matches!(*source, Error::NoCandidates));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    struct LemmaOnly;

    impl Comparator for LemmaOnly {
        fn compare(
            &self,
            gold: &[AnnotationRecord],
            candidates: &[AnalysisRecord],
        ) -> Result<AlignmentResult> {
            let matches: Vec<MatchVector> = candidates
                .iter()
                .map(|candidate| MatchVector::new(candidate.root == gold[0].lemma, true, true))
                .collect();
            let has_full_match = matches.iter().any(MatchVector::is_full);
            Ok(AlignmentResult {
                matches,
                has_full_match,
            })
        }
    }

    #[test]
    fn test_custom_comparator() {
        let (gold, analysis) = layers(vec![(
            noun("maja", PartOfSpeech::Noun),
            vec![AnalysisRecord::new("maja", "V", "b")],
        )]);
        let diff = DiffBuilder::new(LemmaOnly, DiffOptions::default())
            .build(&gold, &analysis)
            .unwrap();
        assert!(diff.words.is_empty());
        assert_eq!(diff.summary.matching_words, 1);
    }

    struct FirstCandidateOnly;

    impl Comparator for FirstCandidateOnly {
        fn compare(
            &self,
            _gold: &[AnnotationRecord],
            _candidates: &[AnalysisRecord],
        ) -> Result<AlignmentResult> {
            Ok(AlignmentResult {
                matches: vec![MatchVector::new(true, true, false)],
                has_full_match: false,
            })
        }
    }

    #[test]
    fn test_comparator_must_cover_every_candidate() {
        let (gold, analysis) = layers(vec![(
            noun("tool", PartOfSpeech::Noun),
            vec![
                AnalysisRecord::new("tool", "S", "sg g"),
                AnalysisRecord::new("tool", "S", "sg p"),
            ],
        )]);
        let error = DiffBuilder::new(FirstCandidateOnly, DiffOptions::default())
            .build(&gold, &analysis)
            .unwrap_err();
        assert_eq!(error.kind(), ErrorKind::InputShape);
        let Error::Word { index, source, .. } = error else {
            panic!("expected a word error, got {error:?}");
        };
        assert_eq!(index, 0);
        assert!(matches!(
            *source,
            Error::CandidateCountMismatch {
                candidates: 2,
                vectors: 1
            }
        ));
    }

    #[test]
    fn test_best_candidate_prefers_later_on_ties() {
        let record = |candidate, matches| MismatchRecord {
            candidate,
            matches,
            lemma: None,
            pos: None,
            form: None,
        };
        let word = WordDiff {
            index: 0,
            text: "x".to_string(),
            fine_tag: PartOfSpeech::Noun,
            mismatches: vec![
                record(0, MatchVector::new(true, true, false)),
                record(1, MatchVector::new(false, false, false)),
                record(2, MatchVector::new(false, true, true)),
            ],
        };
        assert_eq!(word.best_candidate().unwrap().candidate, 2);
    }
}
