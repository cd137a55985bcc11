/// Broad class of a fatal condition.
///
/// None of these are retried: they mean the corpus, the gold annotation or
/// the rule tables are not what the matchers were written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Gold and analyzer layers do not line up.
    InputShape,
    /// A gold annotation combines features that should never co-occur.
    DomainInvariant,
    /// A rule table has no entry for a value found in the corpus.
    Configuration,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("expected exactly one gold analysis per word, got {0}")]
    AmbiguousGold(usize),

    #[error("word has no candidate analyses")]
    NoCandidates,

    #[error("comparator returned {vectors} match vectors for {candidates} candidates")]
    CandidateCountMismatch { candidates: usize, vectors: usize },

    #[error("layers have unequal lengths: {gold} gold words vs {analysis} analysed words")]
    LayerLengthMismatch { gold: usize, analysis: usize },

    #[error("layers belong to different documents: {gold:?} vs {analysis:?}")]
    DocumentMismatch { gold: String, analysis: String },

    #[error("verb {lemma:?} carries both Case={case} and Number={number}")]
    VerbWithCaseAndNumber {
        lemma: String,
        case: String,
        number: String,
    },

    #[error("case {case:?} of {lemma:?} has no analyzer counterpart")]
    UnknownCase { lemma: String, case: String },

    #[error("gold record with lemma {lemma:?} has no surface text")]
    MissingSurfaceText { lemma: String },

    #[error("{document}, word {index} ({text:?}): {source}")]
    Word {
        document: String,
        index: usize,
        text: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::AmbiguousGold(_)
            | Error::NoCandidates
            | Error::CandidateCountMismatch { .. }
            | Error::LayerLengthMismatch { .. }
            | Error::DocumentMismatch { .. } => ErrorKind::InputShape,
            Error::VerbWithCaseAndNumber { .. } => ErrorKind::DomainInvariant,
            Error::UnknownCase { .. } | Error::MissingSurfaceText { .. } => {
                ErrorKind::Configuration
            }
            Error::Word { source, .. } => source.kind(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_error_keeps_inner_kind() {
        let error = Error::Word {
            document: "doc1".to_string(),
            index: 4,
            text: "jooksis".to_string(),
            source: Box::new(Error::VerbWithCaseAndNumber {
                lemma: "jooks".to_string(),
                case: "Ine".to_string(),
                number: "Sing".to_string(),
            }),
        };
        assert_eq!(error.kind(), ErrorKind::DomainInvariant);
        assert!(error.to_string().starts_with("doc1, word 4 (\"jooksis\")"));
    }
}
