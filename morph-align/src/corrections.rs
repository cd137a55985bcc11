//! Post-corrections applied to gold annotations before they are compared
//! with the analyzer.
//!
//! The treebank and the analyzer follow different notation conventions in a
//! few places (verb citation forms, digit-written ordinals), and a handful of
//! treebank tokens carry known annotation mistakes. Both would otherwise show
//! up as mismatches that say nothing about the analyzer.

use crate::error::{Error, Result};
use crate::features::{Case, FeatureSet, NumForm, NumType, Number};
use crate::{AnnotationRecord, GoldLayer, PartOfSpeech};

/// Citation-form endings of verb lemmas; the analyzer lists bare stems.
const VERB_LEMMA_ENDINGS: &[&str] = &["ma", "nud", "tud", "dud"];

/// Result of correcting one record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrectionResult {
    /// Whether any corrections were made
    pub corrected: bool,
    /// Description of what was corrected (if anything)
    pub corrections: Vec<String>,
}

impl CorrectionResult {
    fn record(&mut self, description: String) {
        self.corrected = true;
        self.corrections.push(description);
    }
}

/// A hand-written fix for one known token of the treebank.
///
/// The fix fires only when the surface text matches exactly and `guard`
/// accepts the record, so homographs with a different analysis are left alone.
pub struct LexicalFix {
    pub surface: &'static str,
    pub guard: fn(&AnnotationRecord) -> bool,
    pub apply: fn(&mut AnnotationRecord),
    pub description: &'static str,
}

fn feature_is(record: &AnnotationRecord, name: &str, value: &str) -> bool {
    record.feature(name) == Some(value)
}

fn set_feature(record: &mut AnnotationRecord, name: &str, value: &str) {
    record.features.insert(name.to_string(), value.to_string());
}

fn is_singular(record: &AnnotationRecord) -> bool {
    Number::read(&record.features) == Some(Number::Sing)
}

fn pluralize(record: &mut AnnotationRecord) {
    set_feature(record, Number::name(), "Plur");
}

pub static LEXICAL_FIXES: &[LexicalFix] = &[
    // Case and number annotation errors
    LexicalFix {
        surface: "Rääkimata",
        guard: |r| Case::read(&r.features) == Some(Case::Abl),
        apply: |r| set_feature(r, Case::name(), "Abe"),
        description: "case Abl -> Abe",
    },
    LexicalFix {
        surface: "saaksid",
        guard: |r| r.coarse_tag == "V" && !r.has_feature("Person"),
        apply: |r| set_feature(r, "Person", "3"),
        description: "added Person=3",
    },
    LexicalFix {
        surface: "sattusid",
        guard: |r| r.coarse_tag == "V" && is_singular(r),
        apply: pluralize,
        description: "number Sing -> Plur",
    },
    LexicalFix {
        surface: "omadega",
        guard: |r| r.coarse_tag == "P" && feature_is(r, "Case", "Gen") && is_singular(r),
        apply: |r| {
            set_feature(r, Case::name(), "Com");
            pluralize(r);
        },
        description: "Gen Sing -> Com Plur",
    },
    LexicalFix {
        surface: "omad",
        guard: |r| r.coarse_tag == "P" && is_singular(r),
        apply: pluralize,
        description: "number Sing -> Plur",
    },
    LexicalFix {
        surface: "omade",
        guard: |r| r.coarse_tag == "P" && is_singular(r),
        apply: pluralize,
        description: "number Sing -> Plur",
    },
    LexicalFix {
        surface: "omi",
        guard: |r| r.coarse_tag == "P" && is_singular(r),
        apply: pluralize,
        description: "number Sing -> Plur",
    },
    LexicalFix {
        surface: "närvi",
        guard: |r| {
            r.coarse_tag == "S"
                && is_singular(r)
                && feature_is(r, "Case", "Ill")
                && r.lemma == "närvi"
        },
        apply: |r| r.lemma = "närv".to_string(),
        description: "lemma närvi -> närv",
    },
    // Compound lemmas that lost their segmentation
    LexicalFix {
        surface: "osanikeringi",
        guard: |r| r.lemma == "osanik",
        apply: |r| r.lemma = "osanik+e_ring".to_string(),
        description: "lemma osanik -> osanik+e_ring",
    },
    LexicalFix {
        surface: "paksukstegev",
        guard: |r| r.lemma == "paksu",
        apply: |r| r.lemma = "paksu+ks_tegev".to_string(),
        description: "lemma paksu -> paksu+ks_tegev",
    },
    LexicalFix {
        surface: "omal-käel-üritajatega",
        guard: |r| r.lemma == "omal-käe",
        apply: |r| r.lemma = "oma+l-käe+l-üritaja".to_string(),
        description: "lemma omal-käe -> oma+l-käe+l-üritaja",
    },
    LexicalFix {
        surface: "arvete-lehele",
        guard: |r| r.lemma == "arve",
        apply: |r| r.lemma = "arve+te-leht".to_string(),
        description: "lemma arve -> arve+te-leht",
    },
    LexicalFix {
        surface: "noortekonverents",
        guard: |r| r.lemma == "noor",
        apply: |r| r.lemma = "noor+te_konverents".to_string(),
        description: "lemma noor -> noor+te_konverents",
    },
    LexicalFix {
        surface: "müügiletulek",
        guard: |r| r.lemma == "müügi",
        apply: |r| r.lemma = "müügi+le_tulek".to_string(),
        description: "lemma müügi -> müügi+le_tulek",
    },
    LexicalFix {
        surface: "isikukoodilepinguga",
        guard: |r| r.lemma == "isikukoodi",
        apply: |r| r.lemma = "isiku_koodi_leping".to_string(),
        description: "lemma isikukoodi -> isiku_koodi_leping",
    },
    LexicalFix {
        surface: "naiseksolemisega",
        guard: |r| r.lemma == "naiseks_olemine",
        apply: |r| r.lemma = "naise+ks_olemine".to_string(),
        description: "lemma naiseks_olemine -> naise+ks_olemine",
    },
    // Broken lemmas
    LexicalFix {
        surface: "suhet-peret",
        guard: |r| r.lemma == "suhe-pere",
        apply: |r| r.lemma = "suhe+t-pere".to_string(),
        description: "lemma suhe-pere -> suhe+t-pere",
    },
    LexicalFix {
        surface: "ja/või",
        guard: |r| r.lemma == "või",
        apply: |r| r.lemma = "ja/või".to_string(),
        description: "lemma või -> ja/või",
    },
    LexicalFix {
        surface: "lennuga",
        guard: |r| r.coarse_tag == "S" && r.lemma == "lennuga",
        apply: |r| r.lemma = "lend".to_string(),
        description: "lemma lennuga -> lend",
    },
];

/// Applies the gold post-corrections in a fixed order: verb lemma endings,
/// then ordinal retagging, then the lexical table.
pub struct GoldCorrector {
    lexical_fixes: &'static [LexicalFix],
}

impl Default for GoldCorrector {
    fn default() -> Self {
        Self {
            lexical_fixes: LEXICAL_FIXES,
        }
    }
}

impl GoldCorrector {
    pub fn with_lexical_fixes(lexical_fixes: &'static [LexicalFix]) -> Self {
        Self { lexical_fixes }
    }

    /// Corrects `record` in place. A record that has already been through
    /// the corrector is left untouched.
    pub fn correct(&self, record: &mut AnnotationRecord) -> Result<CorrectionResult> {
        if record.surface_text.is_empty() {
            return Err(Error::MissingSurfaceText {
                lemma: record.lemma.clone(),
            });
        }
        let mut result = CorrectionResult::default();
        if record.corrected {
            return Ok(result);
        }

        if record.coarse_tag == "V" {
            if let Some(stem) = strip_verb_ending(&record.lemma) {
                result.record(format!("verb lemma {} -> {stem}", record.lemma));
                record.lemma = stem.to_string();
            }
        }

        // Ordinals written with digits ended up as adjectives; the same error
        // also occurs without the NumForm marker.
        if record.coarse_tag == "N"
            && record.fine_tag == PartOfSpeech::Adj
            && NumType::read(&record.features) == Some(NumType::Ord)
            && matches!(
                (record.feature("NumForm"), NumForm::read(&record.features)),
                (None, _) | (_, Some(NumForm::Digit))
            )
        {
            record.coarse_tag = "O".to_string();
            record.fine_tag = PartOfSpeech::Num;
            result.record("ordinal N_ADJ -> O_NUM".to_string());
        }

        for fix in self.lexical_fixes {
            if fix.surface == record.surface_text && (fix.guard)(record) {
                (fix.apply)(record);
                result.record(fix.description.to_string());
            }
        }

        for correction in &result.corrections {
            log::debug!("corrected {:?}: {correction}", record.surface_text);
        }
        record.corrected = true;
        Ok(result)
    }

    /// Returns a corrected copy of `record`.
    pub fn corrected_copy(&self, record: &AnnotationRecord) -> Result<AnnotationRecord> {
        let mut record = record.clone();
        self.correct(&mut record)?;
        Ok(record)
    }
}

fn strip_verb_ending(lemma: &str) -> Option<&str> {
    VERB_LEMMA_ENDINGS
        .iter()
        .filter_map(|ending| lemma.strip_suffix(ending))
        .find(|stem| !stem.is_empty())
}

/// Corrects every record of a gold layer, returning how many changed.
pub fn correct_layer(corrector: &GoldCorrector, layer: &mut GoldLayer) -> Result<usize> {
    let mut changed = 0;
    for record in &mut layer.words {
        if corrector.correct(record)?.corrected {
            changed += 1;
        }
    }
    Ok(changed)
}
