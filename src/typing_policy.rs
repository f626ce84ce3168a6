//! Cursor movement and buffer edits driven by user input.
//!
//! All positions are rune indices. Newlines are never typed: the cursor
//! hops over them in both directions.

use crate::session::{SessionConfig, SessionState, Slot};

/// An edit requested by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edit {
    Write(char),
    SkipWord,
    Backspace,
    DeleteWord,
}

fn is_boundary(c: char) -> bool {
    c == ' ' || c == '\n'
}

/// Store `c` at the cursor and advance. Ignored once the segment is done.
pub fn write(state: &mut SessionState, c: char) {
    if state.is_complete() {
        return;
    }

    state.typed[state.cursor] = Slot::Typed(c);
    state.cursor += 1;
    state.skip_newlines();
}

/// Jump to the start of the next word, leaving the rest of the current one
/// untyped. Outside reader mode this does nothing at the very start of a
/// word, so a stray confirm cannot throw away a whole word.
pub fn skip_word(state: &mut SessionState, reader_mode: bool) {
    if state.is_complete() {
        return;
    }

    let reference = &state.reference;
    let mut cursor = state.cursor;

    if !reader_mode && cursor > 0 && reference[cursor - 1] == ' ' && reference[cursor] != ' ' {
        return;
    }

    while cursor < reference.len() && !is_boundary(reference[cursor]) {
        state.typed[cursor] = Slot::Untyped;
        cursor += 1;
    }

    if cursor < reference.len() {
        state.typed[cursor] = Slot::Typed(reference[cursor]);
        cursor += 1;
    }

    state.cursor = cursor;
    state.skip_newlines();
}

/// Erase the character before the cursor.
pub fn backspace(state: &mut SessionState) {
    if state.cursor == 0 {
        return;
    }

    let mut cursor = state.cursor - 1;
    while cursor > 0 && state.reference[cursor] == '\n' {
        cursor -= 1;
    }

    state.cursor = cursor;
    state.clear_from(cursor);
    // only reachable when the text starts with newlines
    state.skip_newlines();
}

/// Erase back to the start of the previous word.
pub fn delete_word(state: &mut SessionState) {
    if state.cursor == 0 {
        return;
    }

    let reference = &state.reference;
    let mut cursor = state.cursor - 1;

    while cursor > 0 && is_boundary(reference[cursor]) {
        cursor -= 1;
    }

    if is_boundary(reference[cursor]) {
        // nothing but whitespace before the cursor
        cursor = 0;
    } else {
        while cursor > 0 && !is_boundary(reference[cursor - 1]) {
            cursor -= 1;
        }
        if cursor > 0 {
            state.typed[cursor - 1] = Slot::Typed(reference[cursor - 1]);
        }
    }

    state.cursor = cursor;
    state.clear_from(cursor);
    state.skip_newlines();
}

/// Apply `edit`, honouring the session options.
pub fn apply(state: &mut SessionState, edit: Edit, config: &SessionConfig) {
    match edit {
        Edit::Write(c) => write(state, c),
        Edit::SkipWord if !config.no_skip => skip_word(state, config.reader_mode),
        Edit::Backspace if !config.disable_backspace => backspace(state),
        Edit::DeleteWord if !config.disable_backspace => delete_word(state),
        Edit::SkipWord | Edit::Backspace | Edit::DeleteWord => {}
    }
}
