//! Plain text helpers: measuring, splitting into paragraphs and wrapping.
//!
//! Everything here counts `char`s, never bytes. The typing grid gives every
//! rune exactly one cell, so these counts are also screen columns.

use itertools::Itertools;

/// Size of a block of text on the typing grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Dimensions {
    /// Length of the longest line, in runes.
    pub cols: usize,
    /// Number of lines.
    pub rows: usize,
}

/// Measure multi-line text. The empty string has no rows; any other string
/// has one more row than it has newlines.
pub fn dimensions(text: &str) -> Dimensions {
    if text.is_empty() {
        return Dimensions::default();
    }

    let mut dims = Dimensions { cols: 0, rows: 1 };
    let mut line_len = 0;
    for c in text.chars() {
        if c == '\n' {
            dims.rows += 1;
            dims.cols = dims.cols.max(line_len);
            line_len = 0;
        } else {
            line_len += 1;
        }
    }
    dims.cols = dims.cols.max(line_len);
    dims
}

/// Split text into paragraphs separated by one or more blank lines.
pub fn paragraphs(text: &str) -> Vec<String> {
    let text = text.replace('\r', "");
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.trim_matches('\n').split('\n') {
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() || paragraphs.is_empty() {
        paragraphs.push(current.join("\n"));
    }

    paragraphs
}

/// Wrap text so that no line grows past `width` runes where a space allows
/// it. Existing newlines are treated as spaces; a word longer than `width`
/// is left on its own line.
pub fn word_wrap(text: &str, width: usize) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    let mut last_space: Option<usize> = None;
    let mut line_len = 0;

    for i in 0..chars.len() {
        line_len += 1;

        if chars[i] == '\n' {
            chars[i] = ' ';
        }
        if chars[i] == ' ' {
            last_space = Some(i);
        }

        if line_len > width {
            if let Some(sp) = last_space {
                chars[sp] = '\n';
            }
            line_len = i - last_space.unwrap_or(0);
        }
    }

    chars.into_iter().collect()
}

/// Normalise whitespace and wrap to `width`. Every line break is preceded by
/// a space so the gap between the last word of a line and the first word of
/// the next is still something the user types.
pub fn reflow(text: &str, width: usize) -> String {
    let collapsed = text.split_whitespace().join(" ");
    word_wrap(&collapsed, width).replace('\n', " \n")
}

/// Width to reflow to on a screen `screen_width` columns wide.
pub fn reflow_width(max_line_length: usize, screen_width: usize) -> usize {
    if max_line_length > screen_width {
        screen_width.saturating_sub(8).max(1)
    } else {
        max_line_length
    }
}
