use crate::features::{
    Case, Connegative, FeatureSet, Mood, Number, Person, Polarity, Tense, VerbForm, Voice,
};
use crate::{AnalysisRecord, AnnotationRecord, Error, PartOfSpeech, Result};
use Slot::{Absent, Is};

/// Analyzer form written when the analyzer could not decide the inflection.
const UNKNOWN_FORM: &str = "?";

/// Compares the gold features with the analyzer's form string.
///
/// Returns an error only when the gold annotation itself is inconsistent or
/// carries a case the correspondence table does not know.
pub fn form_matches(gold: &AnnotationRecord, candidate: &AnalysisRecord) -> Result<bool> {
    if gold.coarse_tag == "V" {
        if let (Some(case), Some(number)) = (gold.feature("Case"), gold.feature("Number")) {
            return Err(Error::VerbWithCaseAndNumber {
                lemma: gold.lemma.clone(),
                case: case.to_string(),
                number: number.to_string(),
            });
        }
    }

    if let (Some(number), Some(case)) = (gold.feature("Number"), gold.feature("Case")) {
        return nominal_form_matches(gold, candidate, number, case);
    }

    if UNINFLECTED_RULES.iter().any(|rule| rule.accepts(gold, candidate))
        || is_abessive_supine_adjective(gold, candidate)
    {
        return Ok(true);
    }

    if candidate.form.is_empty() && gold.features.is_empty() {
        return Ok(true);
    }

    if gold.coarse_tag == "V" && candidate.part_of_speech == "V" {
        return Ok(VERB_PATTERNS
            .iter()
            .any(|pattern| pattern.accepts(gold, &candidate.form)));
    }

    Ok(false)
}

fn nominal_form_matches(
    gold: &AnnotationRecord,
    candidate: &AnalysisRecord,
    number: &str,
    case: &str,
) -> Result<bool> {
    let form = candidate.form.as_str();
    let number_code = number
        .parse::<Number>()
        .map_or(number, |number| number.analyzer_code());
    let case = case.parse::<Case>().map_err(|_| Error::UnknownCase {
        lemma: gold.lemma.clone(),
        case: case.to_string(),
    })?;

    let mut number_match = form.starts_with(&format!("{number_code} "));
    let mut case_match = form.ends_with(&format!(" {}", case.analyzer_code()));

    // The analyzer writes the long illative ("majja" vs "majasse") as an
    // unmarked singular ending in "adt"
    if case == Case::Ill && !case_match {
        case_match = form.ends_with("adt");
        number_match = number_code == Number::Sing.analyzer_code();
    }

    // Numerals written in digits may stay unmarked in the nominative singular
    if is_numeral(&gold.coarse_tag)
        && is_numeral(&candidate.part_of_speech)
        && is_unmarked(form)
        && gold.feature("NumForm") == Some("Digit")
        && case == Case::Nom
        && number == "Sing"
    {
        return Ok(true);
    }

    Ok(number_match && case_match)
}

fn is_numeral(tag: &str) -> bool {
    matches!(tag, "N" | "O")
}

fn is_unmarked(form: &str) -> bool {
    form.is_empty() || form == UNKNOWN_FORM
}

/// A word class the analyzer does not inflect. An empty form matches when the
/// gold record has neither Number nor Case.
struct UninflectedRule {
    gold: &'static [&'static str],
    fine: Option<PartOfSpeech>,
    feature: Option<(&'static str, &'static str)>,
    analyzer: &'static [&'static str],
    /// Also accept the analyzer's "?" form.
    accepts_unknown: bool,
}

const UNINFLECTED: UninflectedRule = UninflectedRule {
    gold: &[],
    fine: None,
    feature: None,
    analyzer: &[],
    accepts_unknown: false,
};

impl UninflectedRule {
    fn accepts(&self, gold: &AnnotationRecord, candidate: &AnalysisRecord) -> bool {
        let form_ok = if self.accepts_unknown {
            is_unmarked(&candidate.form)
        } else {
            candidate.form.is_empty()
        };
        form_ok
            && self.gold.contains(&gold.coarse_tag.as_str())
            && self.analyzer.contains(&candidate.part_of_speech.as_str())
            && self.fine.is_none_or(|fine| gold.fine_tag == fine)
            && self
                .feature
                .is_none_or(|(name, value)| gold.feature(name) == Some(value))
            && !gold.has_feature("Number")
            && !gold.has_feature("Case")
    }
}

static UNINFLECTED_RULES: &[UninflectedRule] = &[
    // Adjectives
    UninflectedRule {
        gold: &["A"],
        feature: Some(("Degree", "Pos")),
        analyzer: &["A"],
        ..UNINFLECTED
    },
    UninflectedRule {
        gold: &["A"],
        fine: Some(PartOfSpeech::Det),
        analyzer: &["A"],
        ..UNINFLECTED
    },
    UninflectedRule {
        gold: &["G"],
        analyzer: &["G"],
        ..UNINFLECTED
    },
    // Adverbs, adpositions, conjunctions, punctuation
    UninflectedRule {
        gold: &["D"],
        analyzer: &["D"],
        ..UNINFLECTED
    },
    UninflectedRule {
        gold: &["K"],
        analyzer: &["K"],
        ..UNINFLECTED
    },
    UninflectedRule {
        gold: &["J"],
        analyzer: &["J"],
        ..UNINFLECTED
    },
    UninflectedRule {
        gold: &["X"],
        analyzer: &["X"],
        ..UNINFLECTED
    },
    UninflectedRule {
        gold: &["Z"],
        analyzer: &["Z"],
        ..UNINFLECTED
    },
    UninflectedRule {
        gold: &["nominal"],
        fine: Some(PartOfSpeech::Sym),
        analyzer: &["Z"],
        ..UNINFLECTED
    },
    // Particles, interjections, emoticons
    UninflectedRule {
        gold: &["I", "B"],
        analyzer: &["I", "B"],
        ..UNINFLECTED
    },
    UninflectedRule {
        gold: &["E"],
        analyzer: &["Z", "E"],
        ..UNINFLECTED
    },
    // Abbreviations and numerals may have no case information
    UninflectedRule {
        gold: &["Y"],
        analyzer: &["Y"],
        accepts_unknown: true,
        ..UNINFLECTED
    },
    UninflectedRule {
        gold: &["N", "O"],
        analyzer: &["N", "O"],
        accepts_unknown: true,
        ..UNINFLECTED
    },
];

/// Positive adjectives derived from the abessive supine ("lugemata") carry
/// the verbal features but no inflection on the analyzer side.
fn is_abessive_supine_adjective(gold: &AnnotationRecord, candidate: &AnalysisRecord) -> bool {
    gold.coarse_tag == "A"
        && gold.feature("Degree") == Some("Pos")
        && candidate.part_of_speech == "A"
        && VerbForm::read(&gold.features) == Some(VerbForm::Sup)
        && Case::read(&gold.features) == Some(Case::Abe)
        && candidate.form.is_empty()
        && candidate.root.ends_with("mata")
}

/// Constraint on one gold feature.
#[derive(Debug, Clone, Copy)]
enum Slot<T> {
    Any,
    Absent,
    Is(T),
}

impl<T: FeatureSet + PartialEq + Copy> Slot<T> {
    fn admits(&self, gold: &AnnotationRecord) -> bool {
        match self {
            Slot::Any => true,
            Slot::Absent => !gold.has_feature(T::name()),
            Slot::Is(value) => T::read(&gold.features) == Some(*value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stance {
    Any,
    /// `Polarity=Neg` or `Connegative=Yes`.
    Negative,
    Affirmative,
}

/// One cell of the verb correspondence table.
#[derive(Debug, Clone, Copy)]
struct VerbPattern {
    stance: Stance,
    auxiliary: bool,
    verb_form: Slot<VerbForm>,
    mood: Slot<Mood>,
    tense: Slot<Tense>,
    voice: Slot<Voice>,
    person: Slot<Person>,
    number: Slot<Number>,
    case: Slot<Case>,
    forms: &'static [&'static str],
}

const ANY: VerbPattern = VerbPattern {
    stance: Stance::Any,
    auxiliary: false,
    verb_form: Slot::Any,
    mood: Slot::Any,
    tense: Slot::Any,
    voice: Slot::Any,
    person: Slot::Any,
    number: Slot::Any,
    case: Slot::Any,
    forms: &[],
};

impl VerbPattern {
    fn accepts(&self, gold: &AnnotationRecord, form: &str) -> bool {
        let negative = Polarity::read(&gold.features) == Some(Polarity::Neg)
            || Connegative::read(&gold.features) == Some(Connegative::Yes);
        let stance_ok = match self.stance {
            Stance::Any => true,
            Stance::Negative => negative,
            Stance::Affirmative => !negative,
        };
        stance_ok
            && (!self.auxiliary || gold.fine_tag == PartOfSpeech::Aux)
            && self.forms.contains(&form)
            && self.verb_form.admits(gold)
            && self.mood.admits(gold)
            && self.tense.admits(gold)
            && self.voice.admits(gold)
            && self.person.admits(gold)
            && self.number.admits(gold)
            && self.case.admits(gold)
    }
}

const NEGATIVE: VerbPattern = VerbPattern {
    stance: Stance::Negative,
    ..ANY
};

const AFFIRMATIVE_INDICATIVE: VerbPattern = VerbPattern {
    stance: Stance::Affirmative,
    mood: Is(Mood::Ind),
    ..ANY
};

const AFFIRMATIVE_IMPERATIVE: VerbPattern = VerbPattern {
    stance: Stance::Affirmative,
    mood: Is(Mood::Imp),
    tense: Is(Tense::Pres),
    voice: Is(Voice::Act),
    ..ANY
};

const AFFIRMATIVE_CONDITIONAL: VerbPattern = VerbPattern {
    stance: Stance::Affirmative,
    mood: Is(Mood::Cnd),
    voice: Is(Voice::Act),
    ..ANY
};

static VERB_PATTERNS: &[VerbPattern] = &[
    // Non-finite forms
    VerbPattern {
        verb_form: Is(VerbForm::Inf),
        forms: &["da"],
        ..ANY
    },
    VerbPattern {
        verb_form: Is(VerbForm::Sup),
        voice: Is(Voice::Act),
        case: Is(Case::Ill),
        forms: &["ma"],
        ..ANY
    },
    VerbPattern {
        verb_form: Is(VerbForm::Sup),
        voice: Is(Voice::Act),
        case: Is(Case::Ine),
        forms: &["mas"],
        ..ANY
    },
    VerbPattern {
        verb_form: Is(VerbForm::Sup),
        voice: Is(Voice::Act),
        case: Is(Case::Ela),
        forms: &["mast"],
        ..ANY
    },
    VerbPattern {
        verb_form: Is(VerbForm::Sup),
        voice: Is(Voice::Act),
        case: Is(Case::Tra),
        forms: &["maks"],
        ..ANY
    },
    VerbPattern {
        verb_form: Is(VerbForm::Sup),
        voice: Is(Voice::Act),
        case: Is(Case::Abe),
        forms: &["mata"],
        ..ANY
    },
    VerbPattern {
        verb_form: Is(VerbForm::Sup),
        voice: Is(Voice::Pass),
        forms: &["tama"],
        ..ANY
    },
    VerbPattern {
        verb_form: Is(VerbForm::Part),
        tense: Is(Tense::Past),
        voice: Is(Voice::Act),
        forms: &["nud"],
        ..ANY
    },
    VerbPattern {
        verb_form: Is(VerbForm::Part),
        tense: Is(Tense::Past),
        voice: Is(Voice::Pass),
        forms: &["tud"],
        ..ANY
    },
    VerbPattern {
        verb_form: Is(VerbForm::Conv),
        forms: &["des"],
        ..ANY
    },
    // Negation
    VerbPattern {
        auxiliary: true,
        forms: &["neg"],
        ..NEGATIVE
    },
    VerbPattern {
        voice: Is(Voice::Act),
        mood: Is(Mood::Ind),
        tense: Is(Tense::Pres),
        forms: &["o", "neg o"],
        ..NEGATIVE
    },
    VerbPattern {
        voice: Is(Voice::Act),
        mood: Is(Mood::Imp),
        tense: Is(Tense::Pres),
        person: Is(Person::Second),
        number: Is(Number::Sing),
        forms: &["o"],
        ..NEGATIVE
    },
    VerbPattern {
        voice: Is(Voice::Act),
        mood: Is(Mood::Imp),
        tense: Is(Tense::Pres),
        person: Is(Person::Second),
        number: Is(Number::Plur),
        forms: &["neg ge"],
        ..NEGATIVE
    },
    VerbPattern {
        voice: Is(Voice::Act),
        mood: Is(Mood::Imp),
        tense: Is(Tense::Pres),
        person: Is(Person::Third),
        number: Is(Number::Plur),
        forms: &["neg gu"],
        ..NEGATIVE
    },
    VerbPattern {
        voice: Is(Voice::Act),
        mood: Is(Mood::Ind),
        tense: Is(Tense::Past),
        forms: &["nud", "neg nud"],
        ..NEGATIVE
    },
    VerbPattern {
        voice: Is(Voice::Act),
        mood: Is(Mood::Cnd),
        tense: Is(Tense::Pres),
        forms: &["neg ks", "ks"],
        ..NEGATIVE
    },
    VerbPattern {
        voice: Is(Voice::Pass),
        mood: Is(Mood::Ind),
        tense: Is(Tense::Pres),
        forms: &["ta"],
        ..NEGATIVE
    },
    // Indicative
    VerbPattern {
        tense: Is(Tense::Pres),
        person: Is(Person::First),
        number: Is(Number::Sing),
        forms: &["n"],
        ..AFFIRMATIVE_INDICATIVE
    },
    VerbPattern {
        tense: Is(Tense::Pres),
        person: Is(Person::First),
        number: Is(Number::Plur),
        forms: &["me"],
        ..AFFIRMATIVE_INDICATIVE
    },
    VerbPattern {
        tense: Is(Tense::Pres),
        person: Is(Person::Second),
        number: Is(Number::Sing),
        forms: &["d"],
        ..AFFIRMATIVE_INDICATIVE
    },
    VerbPattern {
        tense: Is(Tense::Pres),
        person: Is(Person::Second),
        number: Is(Number::Plur),
        forms: &["te"],
        ..AFFIRMATIVE_INDICATIVE
    },
    VerbPattern {
        tense: Is(Tense::Pres),
        person: Is(Person::Third),
        number: Is(Number::Sing),
        forms: &["b"],
        ..AFFIRMATIVE_INDICATIVE
    },
    VerbPattern {
        tense: Is(Tense::Pres),
        person: Is(Person::Third),
        number: Is(Number::Plur),
        forms: &["vad"],
        ..AFFIRMATIVE_INDICATIVE
    },
    VerbPattern {
        tense: Is(Tense::Pres),
        voice: Is(Voice::Pass),
        person: Absent,
        forms: &["takse"],
        ..AFFIRMATIVE_INDICATIVE
    },
    VerbPattern {
        tense: Is(Tense::Past),
        person: Is(Person::First),
        number: Is(Number::Sing),
        forms: &["sin"],
        ..AFFIRMATIVE_INDICATIVE
    },
    VerbPattern {
        tense: Is(Tense::Past),
        person: Is(Person::First),
        number: Is(Number::Plur),
        forms: &["sime"],
        ..AFFIRMATIVE_INDICATIVE
    },
    VerbPattern {
        tense: Is(Tense::Past),
        person: Is(Person::Second),
        number: Is(Number::Sing),
        forms: &["sid"],
        ..AFFIRMATIVE_INDICATIVE
    },
    VerbPattern {
        tense: Is(Tense::Past),
        person: Is(Person::Second),
        number: Is(Number::Plur),
        forms: &["site"],
        ..AFFIRMATIVE_INDICATIVE
    },
    VerbPattern {
        tense: Is(Tense::Past),
        person: Is(Person::Third),
        number: Is(Number::Sing),
        forms: &["s"],
        ..AFFIRMATIVE_INDICATIVE
    },
    VerbPattern {
        tense: Is(Tense::Past),
        person: Is(Person::Third),
        number: Is(Number::Plur),
        forms: &["sid"],
        ..AFFIRMATIVE_INDICATIVE
    },
    VerbPattern {
        tense: Is(Tense::Past),
        voice: Is(Voice::Pass),
        person: Absent,
        forms: &["ti"],
        ..AFFIRMATIVE_INDICATIVE
    },
    // Imperative
    VerbPattern {
        person: Absent,
        number: Is(Number::Sing),
        forms: &["gu"],
        ..AFFIRMATIVE_IMPERATIVE
    },
    VerbPattern {
        person: Is(Person::Second),
        number: Is(Number::Sing),
        forms: &["o"],
        ..AFFIRMATIVE_IMPERATIVE
    },
    VerbPattern {
        person: Is(Person::Third),
        number: Is(Number::Sing),
        forms: &["gu"],
        ..AFFIRMATIVE_IMPERATIVE
    },
    VerbPattern {
        person: Is(Person::First),
        number: Is(Number::Plur),
        forms: &["gem"],
        ..AFFIRMATIVE_IMPERATIVE
    },
    VerbPattern {
        person: Is(Person::Second),
        number: Is(Number::Plur),
        forms: &["ge"],
        ..AFFIRMATIVE_IMPERATIVE
    },
    VerbPattern {
        person: Is(Person::Third),
        number: Is(Number::Plur),
        forms: &["gu"],
        ..AFFIRMATIVE_IMPERATIVE
    },
    // Quotative
    VerbPattern {
        stance: Stance::Affirmative,
        mood: Is(Mood::Qot),
        tense: Is(Tense::Pres),
        voice: Is(Voice::Act),
        forms: &["vat"],
        ..ANY
    },
    VerbPattern {
        stance: Stance::Affirmative,
        mood: Is(Mood::Qot),
        tense: Is(Tense::Pres),
        voice: Is(Voice::Pass),
        forms: &["tavat"],
        ..ANY
    },
    // Conditional, present
    VerbPattern {
        tense: Is(Tense::Pres),
        person: Is(Person::First),
        number: Is(Number::Sing),
        forms: &["ksin", "ks"],
        ..AFFIRMATIVE_CONDITIONAL
    },
    VerbPattern {
        tense: Is(Tense::Pres),
        person: Is(Person::Second),
        number: Is(Number::Sing),
        forms: &["ksid", "ks"],
        ..AFFIRMATIVE_CONDITIONAL
    },
    VerbPattern {
        tense: Is(Tense::Pres),
        person: Is(Person::Third),
        number: Is(Number::Sing),
        forms: &["ks"],
        ..AFFIRMATIVE_CONDITIONAL
    },
    VerbPattern {
        tense: Is(Tense::Pres),
        person: Is(Person::First),
        number: Is(Number::Plur),
        forms: &["ksime", "ks"],
        ..AFFIRMATIVE_CONDITIONAL
    },
    VerbPattern {
        tense: Is(Tense::Pres),
        person: Is(Person::Second),
        number: Is(Number::Plur),
        forms: &["ksite", "ks"],
        ..AFFIRMATIVE_CONDITIONAL
    },
    VerbPattern {
        tense: Is(Tense::Pres),
        person: Is(Person::Third),
        number: Is(Number::Plur),
        forms: &["ksid", "ks"],
        ..AFFIRMATIVE_CONDITIONAL
    },
    VerbPattern {
        tense: Is(Tense::Pres),
        person: Absent,
        forms: &["ks"],
        ..AFFIRMATIVE_CONDITIONAL
    },
    // Conditional, past
    VerbPattern {
        tense: Is(Tense::Past),
        person: Is(Person::First),
        number: Is(Number::Sing),
        forms: &["nuksin", "nuks"],
        ..AFFIRMATIVE_CONDITIONAL
    },
    VerbPattern {
        tense: Is(Tense::Past),
        person: Is(Person::Second),
        number: Is(Number::Sing),
        forms: &["nuksid", "nuks"],
        ..AFFIRMATIVE_CONDITIONAL
    },
    VerbPattern {
        tense: Is(Tense::Past),
        person: Is(Person::Third),
        number: Is(Number::Sing),
        forms: &["nuks"],
        ..AFFIRMATIVE_CONDITIONAL
    },
    VerbPattern {
        tense: Is(Tense::Past),
        person: Is(Person::First),
        number: Is(Number::Plur),
        forms: &["nuksime", "nuks"],
        ..AFFIRMATIVE_CONDITIONAL
    },
    VerbPattern {
        tense: Is(Tense::Past),
        person: Is(Person::Second),
        number: Is(Number::Plur),
        forms: &["nuksite", "nuks"],
        ..AFFIRMATIVE_CONDITIONAL
    },
    VerbPattern {
        tense: Is(Tense::Past),
        person: Is(Person::Third),
        number: Is(Number::Plur),
        forms: &["nuksid", "nuks"],
        ..AFFIRMATIVE_CONDITIONAL
    },
    // Conditional impersonal, either polarity
    VerbPattern {
        mood: Is(Mood::Cnd),
        tense: Is(Tense::Pres),
        voice: Is(Voice::Pass),
        person: Absent,
        number: Absent,
        forms: &["taks"],
        ..ANY
    },
];
