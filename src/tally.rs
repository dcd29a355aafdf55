//src/tally.rs

use ahash::AHashMap;
use crate::types::RankLabel;

/// taxon token (e.g. `g__Prevotella`) -> number of included reads naming it
pub type TaxonOccurrences = AHashMap<String, u64>;

/// Accumulated state of one sub-sample.
///
/// Only the size of each map is reported; the occurrence counts are kept so
/// frequencies stay available to callers.
#[derive(Debug, Clone)]
pub struct RankTally {
    rate: f64,
    read_count: u64,
    ranks: [TaxonOccurrences; RankLabel::COUNT],
}

impl RankTally {
    pub fn new(rate: f64) -> Self {
        Self {
            rate,
            read_count: 0,
            ranks: Default::default(),
        }
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    /// Reads included in this sample, classified or not.
    pub fn read_count(&self) -> u64 {
        self.read_count
    }

    /// Add one included read.
    ///
    /// Every token with a recognised rank prefix is counted under that rank,
    /// including repeats of the same rank within one path. Other tokens
    /// (`root`, unranked clades, garbage) are skipped.
    pub fn include(&mut self, rank_path: Option<&[String]>) {
        self.read_count += 1;

        let Some(path) = rank_path else {
            return;
        };
        for token in path {
            if let Some(rank) = RankLabel::of_token(token) {
                let seen = &mut self.ranks[rank.index()];
                match seen.get_mut(token.as_str()) {
                    Some(count) => *count += 1,
                    None => {
                        seen.insert(token.clone(), 1);
                    }
                }
            }
        }
    }

    /// Number of distinct taxa of `rank` seen in this sample.
    pub fn distinct_count(&self, rank: RankLabel) -> usize {
        self.ranks[rank.index()].len()
    }

    /// How many included reads named `token` at `rank`.
    pub fn occurrences(&self, rank: RankLabel, token: &str) -> u64 {
        self.ranks[rank.index()].get(token).copied().unwrap_or(0)
    }

    pub fn taxa(&self, rank: RankLabel) -> &TaxonOccurrences {
        &self.ranks[rank.index()]
    }
}
