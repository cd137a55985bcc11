pub mod align;
pub mod corrections;
pub mod diff;
pub mod error;
pub mod features;
pub mod matching;
pub mod stats;

use std::collections::BTreeMap;

pub use align::{AlignmentResult, Comparator, MatchVector, RecordAligner, align};
pub use corrections::{CorrectionResult, GoldCorrector, correct_layer};
pub use diff::{
    Compared, DiffBuilder, DiffOptions, DocumentDiff, DocumentDiffSummary, MismatchCategory,
    MismatchRecord, TagCount, WordDiff,
};
pub use error::{Error, ErrorKind, Result};
pub use stats::{AggregateOptions, CorpusStatistics, LabelStyle, MismatchPattern, aggregate};

/// Feature name to value, e.g. `Case` -> `Gen`.
pub type Features = BTreeMap<String, String>;

#[derive(
    Clone,
    Debug,
    serde::Serialize,
    serde::Deserialize,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Copy,
    schemars::JsonSchema,
)]
pub enum PartOfSpeech {
    #[serde(rename = "ADJ")]
    Adj, // adjective
    #[serde(rename = "ADP")]
    Adp, // adposition
    #[serde(rename = "ADV")]
    Adv, // adverb
    #[serde(rename = "AUX")]
    Aux, // auxiliary
    #[serde(rename = "CCONJ")]
    Cconj, // coordinating conjunction
    #[serde(rename = "DET")]
    Det, // determiner
    #[serde(rename = "INTJ")]
    Intj, // interjection
    #[serde(rename = "NOUN")]
    Noun, // noun
    #[serde(rename = "NUM")]
    Num, // numeral
    #[serde(rename = "PART")]
    Part, // particle
    #[serde(rename = "PRON")]
    Pron, // pronoun
    #[serde(rename = "PROPN")]
    Propn, // proper noun
    #[serde(rename = "PUNCT")]
    Punct, // punctuation
    #[serde(rename = "SCONJ")]
    Sconj, // subordinating conjunction
    #[serde(rename = "SYM")]
    Sym, // symbol
    #[serde(rename = "VERB")]
    Verb, // verb
    #[serde(rename = "SPACE")]
    Space, // space
    #[serde(rename = "X")]
    X, // other
}

impl PartOfSpeech {
    pub const ALL: [PartOfSpeech; 18] = [
        PartOfSpeech::Adj,
        PartOfSpeech::Adp,
        PartOfSpeech::Adv,
        PartOfSpeech::Aux,
        PartOfSpeech::Cconj,
        PartOfSpeech::Det,
        PartOfSpeech::Intj,
        PartOfSpeech::Noun,
        PartOfSpeech::Num,
        PartOfSpeech::Part,
        PartOfSpeech::Pron,
        PartOfSpeech::Propn,
        PartOfSpeech::Punct,
        PartOfSpeech::Sconj,
        PartOfSpeech::Sym,
        PartOfSpeech::Verb,
        PartOfSpeech::Space,
        PartOfSpeech::X,
    ];

    /// The universal tag as it is written in the treebank.
    pub fn tag(&self) -> &'static str {
        match self {
            PartOfSpeech::Adj => "ADJ",
            PartOfSpeech::Adp => "ADP",
            PartOfSpeech::Adv => "ADV",
            PartOfSpeech::Aux => "AUX",
            PartOfSpeech::Cconj => "CCONJ",
            PartOfSpeech::Det => "DET",
            PartOfSpeech::Intj => "INTJ",
            PartOfSpeech::Noun => "NOUN",
            PartOfSpeech::Num => "NUM",
            PartOfSpeech::Part => "PART",
            PartOfSpeech::Pron => "PRON",
            PartOfSpeech::Propn => "PROPN",
            PartOfSpeech::Punct => "PUNCT",
            PartOfSpeech::Sconj => "SCONJ",
            PartOfSpeech::Sym => "SYM",
            PartOfSpeech::Verb => "VERB",
            PartOfSpeech::Space => "SPACE",
            PartOfSpeech::X => "X",
        }
    }
}

/// Readable word-class name, as printed in logs and reports.
impl std::fmt::Display for PartOfSpeech {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PartOfSpeech::Adj => "adjective",
            PartOfSpeech::Adp => "adposition",
            PartOfSpeech::Adv => "adverb",
            PartOfSpeech::Aux => "auxiliary",
            PartOfSpeech::Cconj => "coordinating conjunction",
            PartOfSpeech::Det => "determiner",
            PartOfSpeech::Intj => "interjection",
            PartOfSpeech::Noun => "noun",
            PartOfSpeech::Num => "numeral",
            PartOfSpeech::Part => "particle",
            PartOfSpeech::Pron => "pronoun",
            PartOfSpeech::Propn => "proper noun",
            PartOfSpeech::Punct => "punctuation",
            PartOfSpeech::Sconj => "subordinating conjunction",
            PartOfSpeech::Sym => "symbol",
            PartOfSpeech::Verb => "verb",
            PartOfSpeech::Space => "space",
            PartOfSpeech::X => "unclassified word",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown universal part-of-speech tag: {0:?}")]
pub struct UnknownTag(pub String);

impl std::str::FromStr for PartOfSpeech {
    type Err = UnknownTag;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        PartOfSpeech::ALL
            .into_iter()
            .find(|pos| pos.tag().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}

/// A manually verified treebank annotation of one word.
///
/// `coarse_tag` is the legacy (pre-UD) tag, e.g. `S`, `V`, `A`; `fine_tag`
/// is the universal tag.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, schemars::JsonSchema)]
pub struct AnnotationRecord {
    pub lemma: String,
    pub coarse_tag: String,
    pub fine_tag: PartOfSpeech,
    #[serde(default, deserialize_with = "null_as_empty")]
    #[schemars(with = "Features")]
    pub features: Features,
    pub surface_text: String,
    /// Set once the gold corrector has processed the record.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub corrected: bool,
}

impl AnnotationRecord {
    pub fn new(
        surface_text: impl Into<String>,
        lemma: impl Into<String>,
        coarse_tag: impl Into<String>,
        fine_tag: PartOfSpeech,
    ) -> Self {
        Self {
            lemma: lemma.into(),
            coarse_tag: coarse_tag.into(),
            fine_tag,
            features: Features::new(),
            surface_text: surface_text.into(),
            corrected: false,
        }
    }

    pub fn with_feature(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.features.insert(name.into(), value.into());
        self
    }

    pub fn feature(&self, name: &str) -> Option<&str> {
        self.features.get(name).map(String::as_str)
    }

    pub fn has_feature(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    /// Both tags joined the way diff records show them, e.g. `S_PROPN`.
    pub fn tag_pair(&self) -> String {
        format!("{}_{}", self.coarse_tag, self.fine_tag.tag())
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Features, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    Ok(Option::<Features>::deserialize(deserializer)?.unwrap_or_default())
}

/// One candidate produced by the automatic morphological analyzer.
///
/// `form` is the analyzer's space-joined form string (`"sg g"`, `"b"`); an
/// empty string means the analyzer marks no inflection.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, schemars::JsonSchema)]
pub struct AnalysisRecord {
    pub root: String,
    pub part_of_speech: String,
    #[serde(default)]
    pub form: String,
}

impl AnalysisRecord {
    pub fn new(
        root: impl Into<String>,
        part_of_speech: impl Into<String>,
        form: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            part_of_speech: part_of_speech.into(),
            form: form.into(),
        }
    }
}

/// The gold annotations of one document, one record per word.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, schemars::JsonSchema)]
pub struct GoldLayer {
    pub document: String,
    pub words: Vec<AnnotationRecord>,
}

/// The analyzer output for one document: every word has its candidates.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq, schemars::JsonSchema)]
pub struct AnalysisLayer {
    pub document: String,
    pub words: Vec<Vec<AnalysisRecord>>,
}
