pub mod report;

use std::time::{Duration, Instant};

use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Modifier, Style},
    widgets::Widget,
};

use crate::config::Theme;
use crate::session::{SessionState, Slot};
use crate::stats;
use crate::text::{dimensions, Dimensions};

/// Grid rows per line of text; the second row shows mistyped characters.
pub const LINE_SPACING: i32 = 2;

/// Below this much elapsed time the live WPM readout is meaningless.
const WPM_MIN_ELAPSED: Duration = Duration::from_millis(10);

/// Which upcoming words get highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Highlight {
    #[default]
    Both,
    CurrentOnly,
    NextOnly,
    Off,
}

impl Highlight {
    pub fn from_flags(no_highlight: bool, current_only: bool, next_only: bool) -> Self {
        match (no_highlight, current_only, next_only) {
            (true, _, _) | (false, true, true) => Highlight::Off,
            (false, true, false) => Highlight::CurrentOnly,
            (false, false, true) => Highlight::NextOnly,
            (false, false, false) => Highlight::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Styles {
    pub default: Style,
    pub correct: Style,
    pub incorrect: Style,
    pub incorrect_space: Style,
    pub current_word: Style,
    pub next_word: Style,
}

impl Styles {
    pub fn new(theme: &Theme, bold: bool, highlight: Highlight) -> Self {
        let default = Style::default().fg(theme.foreground).bg(theme.background);

        let mut correct = default.fg(theme.highlight);
        if bold {
            correct = correct.add_modifier(Modifier::BOLD);
        }

        let current_word = default.fg(theme.highlight2);
        let next_word = default.fg(theme.highlight3);
        let (current_word, next_word) = match highlight {
            Highlight::Both => (current_word, next_word),
            // the current word takes over the next-word colour
            Highlight::CurrentOnly => (next_word, default),
            Highlight::NextOnly => (default, next_word),
            Highlight::Off => (default, default),
        };

        Self {
            default,
            correct,
            incorrect: default.fg(theme.error),
            incorrect_space: default.bg(theme.error),
            current_word,
            next_word,
        }
    }
}

/// Where a block of text sits on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLayout {
    /// Column of the first character of each line; negative when the text
    /// is wider than the area.
    pub x: i32,
    pub y: i32,
    pub dims: Dimensions,
}

impl TextLayout {
    /// Center `text` in `area`, leaving room for the row under each line.
    pub fn centered(text: &str, area: Rect) -> Self {
        let dims = dimensions(text);
        let x = (i32::from(area.width) - dims.cols as i32) / 2;
        let y = ((i32::from(area.height) - dims.rows as i32 * LINE_SPACING) / 2).max(0);

        Self {
            x: i32::from(area.x) + x,
            y: i32::from(area.y) + y,
            dims,
        }
    }

    fn cols(&self) -> i32 {
        self.dims.cols as i32
    }

    /// First grid row below the text block.
    fn bottom(&self) -> i32 {
        self.y + self.dims.rows as i32 * LINE_SPACING
    }
}

/// Set one cell, ignoring positions outside `area`.
pub(crate) fn put(buf: &mut Buffer, area: Rect, x: i32, y: i32, c: char, style: Style) {
    let (Ok(x), Ok(y)) = (u16::try_from(x), u16::try_from(y)) else {
        return;
    };
    if !area.contains(Position { x, y }) {
        return;
    }
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(c).set_style(style);
    }
}

/// Draw possibly multi-line text starting at `(x, y)`; every line starts at
/// column `x`.
pub(crate) fn draw_str(buf: &mut Buffer, area: Rect, x: i32, y: i32, text: &str, style: Style) {
    let (mut cx, mut cy) = (x, y);
    for c in text.chars() {
        if c == '\n' {
            cy += 1;
            cx = x;
        } else {
            put(buf, area, cx, cy, c, style);
            cx += 1;
        }
    }
}

/// The typing screen for one segment.
pub struct TypingView<'a> {
    pub state: &'a SessionState,
    pub layout: TextLayout,
    pub attribution: &'a str,
    /// Time allowed for this segment, counted from the session start.
    pub time_limit: Option<Duration>,
    pub show_wpm: bool,
    pub reader_mode: bool,
    pub styles: &'a Styles,
    pub now: Instant,
}

impl TypingView<'_> {
    /// Grid position of every non-newline character.
    fn positions(&self) -> impl Iterator<Item = (usize, char, i32, i32)> + '_ {
        let (mut x, mut y) = (self.layout.x, self.layout.y);
        self.state
            .reference
            .iter()
            .enumerate()
            .filter_map(move |(i, &c)| {
                if c == '\n' {
                    x = self.layout.x;
                    y += LINE_SPACING;
                    return None;
                }
                let pos = (i, c, x, y);
                x += 1;
                Some(pos)
            })
    }

    /// Where the terminal cursor belongs, if it is on screen.
    pub fn cursor(&self, area: Rect) -> Option<Position> {
        let (_, _, x, y) = self.positions().find(|(i, ..)| *i == self.state.cursor)?;
        let pos = Position {
            x: u16::try_from(x).ok()?,
            y: u16::try_from(y).ok()?,
        };
        area.contains(pos).then_some(pos)
    }

    /// Style of the character at `index`, given how many word boundaries
    /// lie between it and the cursor.
    fn style_at(&self, index: usize, c: char, words_ahead: Option<usize>) -> Style {
        let styles = self.styles;
        if index >= self.state.cursor {
            return match words_ahead {
                _ if c == ' ' => styles.default,
                Some(0) => styles.current_word,
                Some(1) => styles.next_word,
                _ => styles.default,
            };
        }

        if self.state.typed[index].matches(c) {
            styles.correct
        } else if c == ' ' {
            styles.incorrect_space
        } else {
            styles.incorrect
        }
    }

    fn render_text(&self, area: Rect, buf: &mut Buffer) {
        let cursor = self.state.cursor;
        let (mut x, mut y) = (self.layout.x, self.layout.y);
        // word boundaries crossed since the cursor, once it has been passed
        let mut words_ahead: Option<usize> = None;

        for (i, &c) in self.state.reference.iter().enumerate() {
            if c == '\n' {
                x = self.layout.x;
                y += LINE_SPACING;
                if let Some(words) = words_ahead.as_mut() {
                    *words += 1;
                }
                continue;
            }
            if i == cursor {
                words_ahead = Some(0);
            }

            let style = self.style_at(i, c, words_ahead);
            if c == ' ' {
                if let Some(words) = words_ahead.as_mut() {
                    *words += 1;
                }
            }

            put(buf, area, x, y, c, style);
            if let Slot::Typed(typed) = self.state.typed[i] {
                if typed != c {
                    put(buf, area, x, y + 1, typed, style);
                }
            }
            x += 1;
        }
    }

    fn render_overlays(&self, area: Rect, buf: &mut Buffer) {
        let layout = &self.layout;
        let style = self.styles.default;

        let attribution = dimensions(self.attribution);
        draw_str(
            buf,
            area,
            layout.x + layout.cols() - attribution.cols as i32,
            layout.bottom() + 1,
            self.attribution,
            style,
        );

        if let (Some(limit), Some(_)) = (self.time_limit, self.state.started_at) {
            let remaining = limit.saturating_sub(self.state.elapsed(self.now));
            let x = layout.x + layout.cols() / 2;
            let y = layout.bottom() + attribution.rows as i32 + 1;
            draw_str(buf, area, x, y, "      ", style);
            draw_str(buf, area, x, y, &(remaining.as_secs() + 1).to_string(), style);
        }

        if self.show_wpm && self.state.has_started() {
            let current = stats::calculate(self.state, self.reader_mode, self.now);
            if current.duration > WPM_MIN_ELAPSED {
                let wpm = stats::wpm(current.correct, current.duration);
                draw_str(
                    buf,
                    area,
                    layout.x + layout.cols() / 2 - 4,
                    layout.y - 2,
                    &format!("WPM: {wpm:<10}"),
                    style,
                );
            }
        }
    }
}

impl Widget for &TypingView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, self.styles.default);
        self.render_text(area, buf);
        self.render_overlays(area, buf);
    }
}
