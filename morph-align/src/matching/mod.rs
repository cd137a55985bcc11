//! Field matchers: each decides whether one field of a gold annotation and
//! one analyzer candidate denote the same thing, across the two tagsets.

mod form;
mod lemma;
mod pos;

pub use form::form_matches;
pub use lemma::{LemmaMode, lemma_matches};
pub use pos::{POS_RULES, PosRule, pos_matches};
