//! Corpus-level mismatch statistics over per-document diffs.

use std::collections::{BTreeMap, BTreeSet};

use parse_display::{Display, FromStr};
use rustc_hash::FxHashMap;

use crate::PartOfSpeech;
use crate::align::MatchVector;
use crate::diff::DocumentDiff;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Display,
    FromStr,
    serde::Serialize,
    serde::Deserialize,
    schemars::JsonSchema,
)]
#[display(style = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum LabelStyle {
    /// `(+) ROOT | (-) POSTAG | (-) FORM`
    #[default]
    Ascii,
    /// `ROOT+ POSTAG− FORM−`
    Compact,
}

/// Which fields the best candidate of a mismatching word got right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MismatchPattern(pub MatchVector);

impl MismatchPattern {
    pub fn label(&self, style: LabelStyle) -> String {
        let fields = [
            ("ROOT", self.0.lemma),
            ("POSTAG", self.0.pos),
            ("FORM", self.0.form),
        ];
        match style {
            LabelStyle::Ascii => fields
                .iter()
                .map(|(name, matched)| format!("({}) {name}", if *matched { '+' } else { '-' }))
                .collect::<Vec<_>>()
                .join(" | "),
            LabelStyle::Compact => fields
                .iter()
                .map(|(name, matched)| format!("{name}{}", if *matched { '+' } else { '\u{2212}' }))
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AggregateOptions {
    /// Words whose gold universal tag is listed here are left out of every total.
    pub exclude_tags: BTreeSet<PartOfSpeech>,
    pub label_style: LabelStyle,
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
pub struct CorpusStatistics {
    pub documents: usize,
    pub words_total: usize,
    pub mismatches_total: usize,
    /// Mismatching words per best-candidate pattern label.
    pub mismatches_statistics: BTreeMap<String, usize>,
    /// Share of `mismatches_total` per pattern label.
    pub mismatches_statistics_percent: BTreeMap<String, f64>,
    pub ambiguous_total: usize,
    /// Mean of the per-document averages.
    pub avg_analyses_per_word: f64,
    pub mismatches_percent: f64,
    pub ambiguous_words_percent: f64,
    pub excluded_tags: BTreeSet<PartOfSpeech>,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round2(part as f64 * 100.0 / whole as f64)
    }
}

/// Summarizes the diffs of a whole corpus.
///
/// Each mismatching word is counted once, under the pattern of the candidate
/// with the most matching fields.
pub fn aggregate<'a>(
    diffs: impl IntoIterator<Item = &'a DocumentDiff>,
    options: &AggregateOptions,
) -> CorpusStatistics {
    if !options.exclude_tags.is_empty() {
        log::info!(
            "leaving out words tagged {}",
            options
                .exclude_tags
                .iter()
                .map(|pos| format!("{pos} ({})", pos.tag()))
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let mut patterns: FxHashMap<MismatchPattern, usize> = FxHashMap::default();
    let mut stats = CorpusStatistics {
        excluded_tags: options.exclude_tags.clone(),
        ..Default::default()
    };
    let mut averages_total = 0.0;

    for diff in diffs {
        stats.documents += 1;
        averages_total += diff.summary.avg_candidates_per_word;

        let (excluded_words, excluded_ambiguous) = diff
            .summary
            .tag_counts
            .iter()
            .filter(|(tag, _)| options.exclude_tags.contains(*tag))
            .fold((0, 0), |(words, ambiguous), (_, count)| {
                (words + count.words, ambiguous + count.ambiguous)
            });
        stats.words_total += diff.summary.words_total.saturating_sub(excluded_words);
        stats.ambiguous_total += diff.summary.ambiguous_words.saturating_sub(excluded_ambiguous);

        for word in &diff.words {
            if options.exclude_tags.contains(&word.fine_tag) {
                continue;
            }
            let Some(best) = word.best_candidate() else {
                continue;
            };
            *patterns.entry(MismatchPattern(best.matches)).or_default() += 1;
            stats.mismatches_total += 1;
        }
    }

    if stats.documents > 0 {
        stats.avg_analyses_per_word = round2(averages_total / stats.documents as f64);
    }
    for (pattern, count) in patterns {
        let label = pattern.label(options.label_style);
        stats
            .mismatches_statistics_percent
            .insert(label.clone(), percent(count, stats.mismatches_total));
        stats.mismatches_statistics.insert(label, count);
    }
    stats.mismatches_percent = percent(stats.mismatches_total, stats.words_total);
    stats.ambiguous_words_percent = percent(stats.ambiguous_total, stats.words_total);
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::{DocumentDiffSummary, MismatchRecord, TagCount, WordDiff};

    fn word(index: usize, fine_tag: PartOfSpeech, vectors: &[MatchVector]) -> WordDiff {
        WordDiff {
            index,
            text: format!("w{index}"),
            fine_tag,
            mismatches: vectors
                .iter()
                .enumerate()
                .map(|(candidate, matches)| MismatchRecord {
                    candidate,
                    matches: *matches,
                    lemma: None,
                    pos: None,
                    form: None,
                })
                .collect(),
        }
    }

    fn diff(
        words: Vec<WordDiff>,
        words_total: usize,
        tag_counts: &[(PartOfSpeech, usize, usize)],
        avg: f64,
    ) -> DocumentDiff {
        DocumentDiff {
            document: "doc".to_string(),
            summary: DocumentDiffSummary {
                words_total,
                matching_words: words_total - words.len(),
                mismatching_words: words.len(),
                ambiguous_words: tag_counts.iter().map(|(_, _, ambiguous)| ambiguous).sum(),
                avg_candidates_per_word: avg,
                mismatching_by_category: BTreeMap::new(),
                tag_counts: tag_counts
                    .iter()
                    .map(|(tag, words, ambiguous)| {
                        (
                            *tag,
                            TagCount {
                                words: *words,
                                ambiguous: *ambiguous,
                            },
                        )
                    })
                    .collect(),
            },
            words,
        }
    }

    #[test]
    fn test_labels() {
        let pattern = MismatchPattern(MatchVector::new(true, false, false));
        assert_eq!(pattern.label(LabelStyle::Ascii), "(+) ROOT | (-) POSTAG | (-) FORM");
        assert_eq!(pattern.label(LabelStyle::Compact), "ROOT+ POSTAG\u{2212} FORM\u{2212}");
        assert_eq!("compact".parse::<LabelStyle>().unwrap(), LabelStyle::Compact);
    }

    #[test]
    fn test_best_candidate_pattern_and_percentages() {
        let diffs = [diff(
            vec![
                word(
                    2,
                    PartOfSpeech::Noun,
                    &[MatchVector::new(true, true, false), MatchVector::new(true, false, true)],
                ),
                word(5, PartOfSpeech::Propn, &[MatchVector::new(true, true, false)]),
            ],
            10,
            &[(PartOfSpeech::Noun, 7, 2), (PartOfSpeech::Propn, 3, 1)],
            1.4,
        )];
        let stats = aggregate(&diffs, &AggregateOptions::default());
        assert_eq!(stats.documents, 1);
        assert_eq!(stats.words_total, 10);
        assert_eq!(stats.mismatches_total, 2);
        assert_eq!(stats.ambiguous_total, 3);
        assert_eq!(stats.mismatches_percent, 20.0);
        assert_eq!(stats.ambiguous_words_percent, 30.0);
        // Equal counts: the later candidate wins
        assert_eq!(stats.mismatches_statistics["(+) ROOT | (-) POSTAG | (+) FORM"], 1);
        assert_eq!(stats.mismatches_statistics["(+) ROOT | (+) POSTAG | (-) FORM"], 1);
        let shares: f64 = stats.mismatches_statistics_percent.values().sum();
        assert!((shares - 100.0).abs() < 0.01 * stats.mismatches_statistics.len() as f64);
    }

    #[test]
    fn test_excluded_tags_leave_every_total() {
        let diffs = [diff(
            vec![
                word(0, PartOfSpeech::Punct, &[MatchVector::new(true, false, true)]),
                word(1, PartOfSpeech::Noun, &[MatchVector::new(false, true, true)]),
            ],
            8,
            &[(PartOfSpeech::Punct, 3, 1), (PartOfSpeech::Noun, 5, 1)],
            1.25,
        )];
        let options = AggregateOptions {
            exclude_tags: BTreeSet::from([PartOfSpeech::Punct]),
            label_style: LabelStyle::Ascii,
        };
        let filtered = aggregate(&diffs, &options);
        let unfiltered = aggregate(&diffs, &AggregateOptions::default());
        assert_eq!(filtered.words_total, 5);
        assert_eq!(filtered.mismatches_total, 1);
        assert_eq!(filtered.ambiguous_total, 1);
        assert!(filtered.mismatches_total <= unfiltered.mismatches_total);
        assert_eq!(filtered.excluded_tags, options.exclude_tags);
        assert_eq!(filtered.avg_analyses_per_word, unfiltered.avg_analyses_per_word);
    }

    #[test]
    fn test_macro_average_and_empty_corpus() {
        let diffs = [
            diff(vec![], 4, &[(PartOfSpeech::Noun, 4, 0)], 1.0),
            diff(vec![], 6, &[(PartOfSpeech::Noun, 6, 3)], 1.555),
        ];
        let stats = aggregate(&diffs, &AggregateOptions::default());
        assert_eq!(stats.avg_analyses_per_word, 1.28);
        assert_eq!(stats.mismatches_percent, 0.0);

        let empty = aggregate(std::iter::empty(), &AggregateOptions::default());
        assert_eq!(empty.documents, 0);
        assert_eq!(empty.mismatches_percent, 0.0);
        assert_eq!(empty.ambiguous_words_percent, 0.0);
        assert_eq!(empty.avg_analyses_per_word, 0.0);
    }
}
