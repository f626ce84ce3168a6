use serde::{Deserialize, Serialize};

use crate::session::Slot;

/// A word that was typed wrong, next to what was typed in its place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mistake {
    pub word: String,
    pub typed: String,
}

impl Mistake {
    pub fn new(word: impl Into<String>, typed: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            typed: typed.into(),
        }
    }
}

/// Collect the mistyped words of `reference` given the parallel `typed`
/// slots.
///
/// Words are delimited by spaces and newlines; a word counts once no
/// matter how often it was retyped. Untyped slots show up as `_` in the
/// typed form, or are left out entirely in reader mode. Only the common
/// prefix of the two slices is looked at.
pub fn extract_mistakes(reference: &[char], typed: &[Slot], reader_mode: bool) -> Vec<Mistake> {
    let mut mistakes = Vec::new();
    let mut word = String::new();
    let mut typed_word = String::new();
    let mut mismatched = false;

    for (&expected, &slot) in reference.iter().zip(typed) {
        if expected == ' ' || expected == '\n' {
            if mismatched && !typed_word.is_empty() {
                mistakes.push(Mistake::new(word.as_str(), typed_word.as_str()));
            }
            word.clear();
            typed_word.clear();
            mismatched = false;
            continue;
        }

        if !slot.matches(expected) {
            mismatched = true;
        }

        word.push(expected);
        match slot {
            Slot::Typed(c) => typed_word.push(c),
            Slot::Untyped if !reader_mode => typed_word.push('_'),
            Slot::Untyped => {}
        }
    }

    if mismatched {
        mistakes.push(Mistake::new(word, typed_word));
    }

    mistakes
}
