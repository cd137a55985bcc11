use crate::{AnalysisRecord, AnnotationRecord, PartOfSpeech};

/// One cross-tagset correspondence: a gold annotation matching every
/// constraint that is set corresponds to the analyzer tag `analyzer`.
#[derive(Debug, Clone, Copy)]
pub struct PosRule {
    pub coarse: Option<&'static str>,
    pub fine: Option<PartOfSpeech>,
    pub feature: Option<(&'static str, &'static str)>,
    pub analyzer: &'static str,
}

impl PosRule {
    const fn new(
        coarse: Option<&'static str>,
        fine: Option<PartOfSpeech>,
        analyzer: &'static str,
    ) -> Self {
        Self {
            coarse,
            fine,
            feature: None,
            analyzer,
        }
    }

    const fn with_feature(mut self, name: &'static str, value: &'static str) -> Self {
        self.feature = Some((name, value));
        self
    }

    pub fn applies_to(&self, gold: &AnnotationRecord) -> bool {
        self.coarse.is_none_or(|coarse| gold.coarse_tag == coarse)
            && self.fine.is_none_or(|fine| gold.fine_tag == fine)
            && self
                .feature
                .is_none_or(|(name, value)| gold.feature(name) == Some(value))
    }
}

/// Correspondences that differ from plain legacy-tag equality. Rules sharing
/// an analyzer tag must never apply to the same gold annotation.
pub static POS_RULES: &[PosRule] = &[
    // Proper nouns
    PosRule::new(Some("S"), Some(PartOfSpeech::Propn), "H"),
    // Adjectives by degree
    PosRule::new(Some("A"), Some(PartOfSpeech::Adj), "A").with_feature("Degree", "Pos"),
    PosRule::new(Some("A"), Some(PartOfSpeech::Adj), "C").with_feature("Degree", "Cmp"),
    PosRule::new(Some("A"), Some(PartOfSpeech::Adj), "U").with_feature("Degree", "Sup"),
    // Determiners realized as adjectives
    PosRule::new(Some("A"), Some(PartOfSpeech::Det), "A"),
    // Participles and other indeclinable adjectives
    PosRule::new(None, Some(PartOfSpeech::Adj), "G"),
    // Numerals
    PosRule::new(None, Some(PartOfSpeech::Num), "N").with_feature("NumType", "Card"),
    PosRule::new(None, Some(PartOfSpeech::Num), "O").with_feature("NumType", "Ord"),
    // Adverbs
    PosRule::new(Some("D"), None, "X"),
    // Interjections (I is a subtype of B)
    PosRule::new(Some("B"), None, "I"),
    // Emoticons
    PosRule::new(Some("E"), None, "Z"),
    // Symbols following a quantity phrase
    PosRule::new(Some("nominal"), Some(PartOfSpeech::Sym), "Z"),
];

/// Compares the gold part of speech with the analyzer's single-letter tag.
pub fn pos_matches(gold: &AnnotationRecord, candidate: &AnalysisRecord) -> bool {
    POS_RULES
        .iter()
        .any(|rule| rule.analyzer == candidate.part_of_speech && rule.applies_to(gold))
        || gold.coarse_tag == candidate.part_of_speech
}
