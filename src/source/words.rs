use rand::Rng;

use super::{Segment, SegmentSource};
use crate::error::{TtError, TtResult};
use crate::resources::{read_resource, ResourceKind};

/// Random words drawn from a word list.
#[derive(Debug, Clone)]
pub struct WordSource {
    words: Vec<String>,
    group_size: usize,
    groups: usize,
}

impl WordSource {
    /// Load the word list `name` (see [`read_resource`]).
    pub fn load(name: &str, group_size: usize, groups: usize) -> TtResult<Self> {
        let bytes = read_resource(ResourceKind::Words, name)?.ok_or_else(|| TtError::UnknownResource {
            kind: ResourceKind::Words,
            name: name.to_string(),
        })?;
        let words = String::from_utf8_lossy(&bytes)
            .split_whitespace()
            .map(str::to_string)
            .collect();
        Self::new(words, group_size, groups).map_err(|_| TtError::EmptyWordList(name.to_string()))
    }

    pub fn new(words: Vec<String>, group_size: usize, groups: usize) -> TtResult<Self> {
        if words.is_empty() {
            return Err(TtError::EmptyWordList(String::new()));
        }
        Ok(Self {
            words,
            group_size,
            groups: groups.max(1),
        })
    }

    /// `n` random words separated by spaces, never the same word twice in a row.
    pub fn random_text(&self, n: usize) -> String {
        let mut rng = rand::thread_rng();
        let mut picked: Vec<&str> = Vec::with_capacity(n);

        for _ in 0..n {
            let mut word = &self.words[rng.gen_range(0..self.words.len())];
            if self.words.len() > 1 {
                while picked.last() == Some(&word.as_str()) {
                    word = &self.words[rng.gen_range(0..self.words.len())];
                }
            }
            picked.push(word);
        }

        picked.join(" ")
    }
}

impl SegmentSource for WordSource {
    fn next_batch(&mut self) -> TtResult<Option<Vec<Segment>>> {
        let batch = (0..self.groups)
            .map(|_| Segment::new(self.random_text(self.group_size), "", -1))
            .collect();
        Ok(Some(batch))
    }
}
