use std::time::{Duration, Instant};

/// Default interval of the redraw ticker.
pub const TICK_INTERVAL: Duration = Duration::from_millis(500);

/// Options for a run of the typer. Built once by the caller and never
/// mutated while a test is running.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Skipped text is not shown as typed placeholders and confirm may skip
    /// from any position.
    pub reader_mode: bool,
    pub show_wpm: bool,
    pub disable_backspace: bool,
    /// Confirm never skips ahead.
    pub no_skip: bool,
    /// Total time allowed for one test, measured from the first keystroke.
    pub time_limit: Option<Duration>,
    pub tick_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reader_mode: false,
            show_wpm: false,
            disable_backspace: false,
            no_skip: false,
            time_limit: None,
            tick_interval: TICK_INTERVAL,
        }
    }
}

/// One position of the typed buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Slot {
    /// Nothing was typed here (not reached yet, or skipped over).
    #[default]
    Untyped,
    Typed(char),
}

impl Slot {
    pub fn char(self) -> Option<char> {
        match self {
            Slot::Untyped => None,
            Slot::Typed(c) => Some(c),
        }
    }

    pub fn matches(self, expected: char) -> bool {
        self == Slot::Typed(expected)
    }
}

/// Buffers and cursor of the segment currently being typed.
///
/// `typed` always has the same length as `reference`. Slots before `cursor`
/// hold whatever happened there; slots at or after it are `Untyped`, except
/// newline slots which are filled from the start since newlines are never
/// typed by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub reference: Vec<char>,
    pub typed: Vec<Slot>,
    pub cursor: usize,
    pub started_at: Option<Instant>,
}

impl SessionState {
    pub fn new(text: &str) -> Self {
        let reference: Vec<char> = text.chars().collect();
        let typed = reference
            .iter()
            .map(|&c| if c == '\n' { Slot::Typed(c) } else { Slot::Untyped })
            .collect();

        let mut state = Self {
            reference,
            typed,
            cursor: 0,
            started_at: None,
        };
        state.skip_newlines();
        state
    }

    pub fn len(&self) -> usize {
        self.reference.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reference.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.reference.len()
    }

    pub fn has_started(&self) -> bool {
        self.started_at.is_some()
    }

    /// Start the clock unless it is already running.
    pub fn start(&mut self, now: Instant) {
        self.started_at.get_or_insert(now);
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        self.started_at
            .map_or(Duration::ZERO, |started| now.saturating_duration_since(started))
    }

    pub fn expected(&self) -> Option<char> {
        self.reference.get(self.cursor).copied()
    }

    /// Move the cursor forward over newline positions.
    pub(crate) fn skip_newlines(&mut self) {
        while self.reference.get(self.cursor) == Some(&'\n') {
            self.cursor += 1;
        }
    }

    /// Forget everything typed from `from` onwards.
    pub(crate) fn clear_from(&mut self, from: usize) {
        for (slot, &c) in self.typed[from..].iter_mut().zip(&self.reference[from..]) {
            if c != '\n' {
                *slot = Slot::Untyped;
            }
        }
    }
}
