use super::{Segment, SegmentSource};
use crate::error::TtResult;
use crate::text::paragraphs;

/// How text read from standard input is cut into tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataMode {
    /// Every paragraph, typed back to back as one test, forever.
    #[default]
    Paragraphs,
    /// The input verbatim as a single segment, forever.
    Raw,
    /// One paragraph per test until the input runs out.
    Multi,
}

#[derive(Debug, Clone)]
pub struct DataSource {
    text: String,
    mode: DataMode,
    next: usize,
}

impl DataSource {
    pub fn new(data: &[u8], mode: DataMode) -> Self {
        Self {
            text: String::from_utf8_lossy(data).into_owned(),
            mode,
            next: 0,
        }
    }
}

impl SegmentSource for DataSource {
    fn next_batch(&mut self) -> TtResult<Option<Vec<Segment>>> {
        let batch = match self.mode {
            DataMode::Raw => Some(vec![Segment::new(self.text.as_str(), "", -1)]),
            DataMode::Paragraphs => Some(
                paragraphs(&self.text)
                    .into_iter()
                    .map(|p| Segment::new(p, "", -1))
                    .collect(),
            ),
            DataMode::Multi => {
                let paragraph = paragraphs(&self.text).into_iter().nth(self.next);
                self.next += 1;
                paragraph.map(|p| vec![Segment::new(p, "", -1)])
            }
        };
        Ok(batch)
    }
}
