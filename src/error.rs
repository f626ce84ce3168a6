use std::path::PathBuf;

use thiserror::Error;

use crate::resources::ResourceKind;

pub type TtResult<T> = Result<T, TtError>;

#[derive(Debug, Error)]
pub enum TtError {
    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),

    #[error("json failure: {0}")]
    Json(#[from] serde_json::Error),

    #[error("csv failure: {0}")]
    Csv(#[from] csv::Error),

    #[error("{name} does not appear to be a valid {kind} resource, try '--list {kind}' for a list of built in {kind}.")]
    UnknownResource { kind: ResourceKind, name: String },

    #[error("{0} does not appear to be a valid theme, try '--list themes' for a list of built in themes.")]
    InvalidTheme(String),

    #[error("{key} is not defined and/or a valid hex colour.")]
    ThemeColor { key: String },

    #[error("{0} is not a valid hex color")]
    InvalidColor(String),

    #[error("Failed to read {}: {source}", .path.display())]
    ReadSource {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("word list `{0}` contains no words")]
    EmptyWordList(String),
}
