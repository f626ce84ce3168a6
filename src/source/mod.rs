//! Producers of the text to type.
//!
//! A source hands out batches of [`Segment`]s. One batch is one test: its
//! segments are typed back to back and scored together.

pub mod data;
pub mod file;
pub mod quotes;
pub mod words;

pub use data::{DataMode, DataSource};
pub use file::FileSource;
pub use quotes::QuoteSource;
pub use words::WordSource;

use serde::{Deserialize, Serialize};

use crate::error::TtResult;

/// A unit of text typed in one go, such as a paragraph or a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    #[serde(default)]
    pub attribution: String,
    /// Position within the source, negative when the source has no order.
    #[serde(default, rename = "paragraph_index")]
    pub index: i64,
}

impl Segment {
    pub fn new(text: impl Into<String>, attribution: impl Into<String>, index: i64) -> Self {
        Self {
            text: text.into(),
            attribution: attribution.into(),
            index,
        }
    }
}

pub trait SegmentSource {
    /// The next test to run, or `None` once the source is exhausted.
    fn next_batch(&mut self) -> TtResult<Option<Vec<Segment>>>;

    /// Extra line for the report describing where the last batch came from.
    fn info(&self) -> Option<String> {
        None
    }
}

impl<S: SegmentSource + ?Sized> SegmentSource for Box<S> {
    fn next_batch(&mut self) -> TtResult<Option<Vec<Segment>>> {
        (**self).next_batch()
    }

    fn info(&self) -> Option<String> {
        (**self).info()
    }
}
