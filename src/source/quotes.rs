use rand::seq::SliceRandom;
use serde::Deserialize;

use super::{Segment, SegmentSource};
use crate::error::{TtError, TtResult};
use crate::resources::{read_resource, ResourceKind};

#[derive(Debug, Clone, Deserialize)]
struct Quote {
    text: String,
    #[serde(default)]
    attribution: String,
}

/// Random quotes from a JSON file of `[{"text": .., "attribution": ..}]`.
#[derive(Debug, Clone)]
pub struct QuoteSource {
    quotes: Vec<Quote>,
}

impl QuoteSource {
    pub fn load(name: &str) -> TtResult<Self> {
        let bytes = read_resource(ResourceKind::Quotes, name)?.ok_or_else(|| TtError::UnknownResource {
            kind: ResourceKind::Quotes,
            name: name.to_string(),
        })?;
        Self::from_json(&bytes)
    }

    pub fn from_json(bytes: &[u8]) -> TtResult<Self> {
        let quotes = serde_json::from_slice(bytes)?;
        Ok(Self { quotes })
    }
}

impl SegmentSource for QuoteSource {
    fn next_batch(&mut self) -> TtResult<Option<Vec<Segment>>> {
        let batch = self
            .quotes
            .choose(&mut rand::thread_rng())
            .map(|quote| vec![Segment::new(quote.text.as_str(), quote.attribution.as_str(), -1)]);
        Ok(batch)
    }
}
