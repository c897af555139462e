use crate::api::RawEpisode;

/// Number and stream locations of one episode, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeDescriptor {
    number: u32,
    candidate_urls: Vec<String>,
}

impl EpisodeDescriptor {
    /// Returns `None` when there is nothing to download.
    pub fn new(number: u32, candidate_urls: Vec<String>) -> Option<Self> {
        if candidate_urls.is_empty() {
            return None;
        }
        Some(EpisodeDescriptor {
            number: number.max(1),
            candidate_urls,
        })
    }

    /// Builds a descriptor from an API record, skipping records without a
    /// name or without any stream.
    pub fn from_raw(raw: &RawEpisode) -> Option<Self> {
        let name = raw.name.as_deref().filter(|name| !name.is_empty())?;

        let candidate_urls = [&raw.std, &raw.hd]
            .into_iter()
            .flatten()
            .filter(|url| !url.is_empty())
            .cloned()
            .collect::<Vec<_>>();

        EpisodeDescriptor::new(parse_number(name), candidate_urls)
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    /// Preferred stream first.
    pub fn candidate_urls(&self) -> &[String] {
        &self.candidate_urls
    }
}

/// Leading token of an episode name such as `"12 серия"`. Anything that is
/// not a positive integer counts as episode 1.
fn parse_number(name: &str) -> u32 {
    name.split_whitespace()
        .next()
        .and_then(|token| token.parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(1)
}
