use std::time::{Duration, Instant};

use crate::mistakes::{extract_mistakes, Mistake};
use crate::session::SessionState;

/// Characters per word when converting a character rate to words per minute.
pub const CHARS_PER_WORD: u32 = 5;

/// Counts for the typed prefix of a segment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Statistics {
    pub errors: usize,
    pub correct: usize,
    pub mistakes: Vec<Mistake>,
    /// Zero when the clock has not started.
    pub duration: Duration,
}

/// Compare everything before the cursor against the reference. Newlines are
/// never counted.
pub fn calculate(state: &SessionState, reader_mode: bool, now: Instant) -> Statistics {
    let cursor = state.cursor.min(state.len());
    let reference = &state.reference[..cursor];
    let typed = &state.typed[..cursor];

    let (correct, errors) = reference
        .iter()
        .zip(typed)
        .filter(|(expected, _)| **expected != '\n')
        .fold((0, 0), |(correct, errors), (expected, slot)| {
            if slot.matches(*expected) {
                (correct + 1, errors)
            } else {
                (correct, errors + 1)
            }
        });

    Statistics {
        errors,
        correct,
        mistakes: extract_mistakes(reference, typed, reader_mode),
        duration: state.elapsed(now),
    }
}

/// Correct characters per minute, or 0 when no time has passed.
pub fn cpm(correct: usize, duration: Duration) -> u32 {
    let minutes = duration.as_secs_f64() / 60.0;
    if minutes <= 0.0 {
        return 0;
    }
    (correct as f64 / minutes) as u32
}

pub fn wpm(correct: usize, duration: Duration) -> u32 {
    cpm(correct, duration) / CHARS_PER_WORD
}

/// Percentage of typed characters that were right; 0 when nothing was typed.
pub fn accuracy(correct: usize, errors: usize) -> f64 {
    let total = correct + errors;
    if total == 0 {
        return 0.0;
    }
    correct as f64 / total as f64 * 100.0
}
