use crate::{AnalysisRecord, AnnotationRecord};

/// How much compound notation to ignore when comparing lemmas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LemmaMode {
    /// Ignore `=` boundaries, and the analyzer's `+` joins when needed.
    #[default]
    Standard,
    /// Additionally ignore `_` compound segment markers on both sides.
    IgnoreCompoundSegments,
}

/// Compares the gold lemma with the analyzer root.
pub fn lemma_matches(gold: &AnnotationRecord, candidate: &AnalysisRecord, mode: LemmaMode) -> bool {
    let mut gold_lemma = gold.lemma.replace('=', "");
    let mut root = candidate.root.replace('=', "");
    if mode == LemmaMode::IgnoreCompoundSegments {
        gold_lemma = gold_lemma.replace('_', "");
        root = root.replace('_', "");
    }
    if gold_lemma == root {
        return true;
    }
    // A lone "+" is a real token, not a join marker
    root.contains('+')
        && root.chars().any(char::is_alphanumeric)
        && gold_lemma == root.replace('+', "")
}
