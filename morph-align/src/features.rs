//! Universal Dependencies morphological features consulted by the matchers.
//!
//! Values are spelled as in the treebank (`Case=Gen`, `Person=3`), so every
//! enum derives `Display`/`FromStr` with those spellings.

use crate::Features;
use parse_display::{Display, FromStr};

pub trait FeatureSet: Sized + std::str::FromStr {
    fn name() -> &'static str;

    /// Reads the feature from a record's feature map. A value outside the
    /// vocabulary reads as absent.
    fn read(features: &Features) -> Option<Self> {
        features.get(Self::name())?.parse().ok()
    }
}

/// Number is an inflectional feature of nouns and of the words agreeing with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromStr)]
pub enum Number {
    Sing,
    Plur,
}

impl Number {
    /// Number as the analyzer writes it at the start of a nominal form.
    pub fn analyzer_code(&self) -> &'static str {
        match self {
            Number::Sing => "sg",
            Number::Plur => "pl",
        }
    }
}

/// Case of nominals. Supine verb forms reuse a handful of the values
/// (Ill, Ine, Ela, Tra, Abe).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromStr)]
pub enum Case {
    Nom,
    Gen,
    Par,
    Ill,
    Ine,
    Ela,
    All,
    Ade,
    Abl,
    Tra,
    Ter,
    Ess,
    Abe,
    Com,
}

impl Case {
    /// Case as the analyzer writes it at the end of a nominal form.
    pub fn analyzer_code(&self) -> &'static str {
        match self {
            Case::Nom => "n",
            Case::Gen => "g",
            Case::Par => "p",
            Case::Ill => "ill",
            Case::Ine => "in",
            Case::Ela => "el",
            Case::All => "all",
            Case::Ade => "ad",
            Case::Abl => "abl",
            Case::Tra => "tr",
            Case::Ter => "ter",
            Case::Ess => "es",
            Case::Abe => "ab",
            Case::Com => "kom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromStr)]
pub enum VerbForm {
    Fin,
    Inf,
    Part,
    Sup,
    Conv,
}

/// Mood subclassifies finite verb forms. `Qot` is the quotative (reported speech).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromStr)]
pub enum Mood {
    Ind,
    Imp,
    Cnd,
    Qot,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromStr)]
pub enum Tense {
    Pres,
    Past,
}

/// Active vs. passive; the passive here is the impersonal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromStr)]
pub enum Voice {
    Act,
    Pass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromStr)]
pub enum Person {
    #[display("1")]
    First,
    #[display("2")]
    Second,
    #[display("3")]
    Third,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromStr)]
pub enum Polarity {
    Pos,
    Neg,
}

/// Marks the form of the main verb that follows a negation word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromStr)]
pub enum Connegative {
    Yes,
}

/// Degree of comparison of adjectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromStr)]
pub enum Degree {
    Pos,
    Cmp,
    Sup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromStr)]
pub enum NumType {
    Card,
    Ord,
}

/// How a numeral is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, FromStr)]
pub enum NumForm {
    Digit,
    Word,
    Roman,
}

macro_rules! feature_name {
    ($($feature:ident),* $(,)?) => {
        $(
            impl FeatureSet for $feature {
                fn name() -> &'static str {
                    stringify!($feature)
                }
            }
        )*
    };
}

feature_name!(
    Number,
    Case,
    VerbForm,
    Mood,
    Tense,
    Voice,
    Person,
    Polarity,
    Connegative,
    Degree,
    NumType,
    NumForm,
);
