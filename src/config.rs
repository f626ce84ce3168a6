use ratatui::style::Color;
use std::collections::HashMap;

use crate::error::{TtError, TtResult};
use crate::resources::{read_resource, ResourceKind};

/// Parse `key: value` lines. Lines without a colon are ignored and values
/// are trimmed of surrounding spaces.
pub fn parse_config(text: &str) -> HashMap<String, String> {
    text.lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.to_string(), value.trim_matches(' ').to_string()))
        .collect()
}

/// Parse a `#rrggbb` colour.
pub fn parse_hex_color(value: &str) -> TtResult<Color> {
    let invalid = || TtError::InvalidColor(value.to_string());

    let hex = value
        .strip_prefix('#')
        .filter(|hex| hex.len() == 6 && hex.is_ascii())
        .ok_or_else(invalid)?;

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).map_err(|_| invalid());
    Ok(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Colours of a typing theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub background: Color,
    pub foreground: Color,
    /// Correctly typed text.
    pub highlight: Color,
    /// Current word.
    pub highlight2: Color,
    /// Next word.
    pub highlight3: Color,
    pub error: Color,
}

impl Default for Theme {
    /// The terminal's own colours, used with `--notheme`.
    fn default() -> Self {
        Self {
            background: Color::Reset,
            foreground: Color::Reset,
            highlight: Color::White,
            highlight2: Color::Green,
            highlight3: Color::Green,
            error: Color::Red,
        }
    }
}

impl Theme {
    /// Load a theme by name or path, see [`read_resource`].
    pub fn load(name: &str) -> TtResult<Self> {
        let bytes =
            read_resource(ResourceKind::Themes, name)?.ok_or_else(|| TtError::InvalidTheme(name.to_string()))?;
        Self::from_config(&parse_config(&String::from_utf8_lossy(&bytes)))
    }

    pub fn from_config(config: &HashMap<String, String>) -> TtResult<Self> {
        let color = |key: &str| {
            config
                .get(key)
                .and_then(|value| parse_hex_color(value).ok())
                .ok_or_else(|| TtError::ThemeColor { key: key.to_string() })
        };

        Ok(Self {
            background: color("bgcol")?,
            foreground: color("fgcol")?,
            highlight: color("hicol")?,
            highlight2: color("hicol2")?,
            highlight3: color("hicol3")?,
            error: color("errcol")?,
        })
    }
}
