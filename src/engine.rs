//src/engine.rs

use crate::error::Result;
use crate::sampler::{DrawSource, NestedSampler};
use crate::tally::RankTally;
use crate::types::ReadRecord;

const PROGRESS_INTERVAL: u64 = 1_000_000;

/// Totals over one full pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub reads: u64,
    pub classified: u64,
    pub unclassified: u64,
}

/// Single-pass rarefaction over a stream of [`ReadRecord`]s.
///
/// Each read gets one draw; it is added to every sample whose rate is at
/// least that draw. The samples are therefore nested: a read in the 0.1
/// sample is also in 0.2, 0.3, ..., 1.0.
///
/// Cost is O(reads x samples x lineage length). A finer rate buys more
/// curve points at a proportional runtime cost.
pub struct RarefactionEngine<D: DrawSource> {
    sampler: NestedSampler<D>,
    samples: Vec<RankTally>,
}

impl<D: DrawSource> RarefactionEngine<D> {
    /// `rates` must be strictly increasing.
    pub fn new(rates: Vec<f64>, source: D) -> Self {
        let samples = rates.iter().map(|&rate| RankTally::new(rate)).collect();
        Self {
            sampler: NestedSampler::new(rates, source),
            samples,
        }
    }

    pub fn samples(&self) -> &[RankTally] {
        &self.samples
    }

    pub fn into_samples(self) -> Vec<RankTally> {
        self.samples
    }

    /// Feed one read into every sample that includes it.
    pub fn include(&mut self, record: &ReadRecord) {
        let inclusion = self.sampler.next_inclusion();
        let rank_path = record.rank_path.as_deref();
        for sample in &mut self.samples[inclusion.samples] {
            sample.include(rank_path);
        }
    }

    /// Consume `records` to the end.
    ///
    /// The first error aborts the pass; the samples are then incomplete and
    /// must not be reported.
    pub fn run<I>(&mut self, records: I) -> Result<RunSummary>
    where
        I: IntoIterator<Item = Result<ReadRecord>>,
    {
        let mut summary = RunSummary::default();

        for record in records {
            let record = record?;
            self.include(&record);

            summary.reads += 1;
            if record.is_classified() {
                summary.classified += 1;
            } else {
                summary.unclassified += 1;
            }

            if summary.reads % PROGRESS_INTERVAL == 0 {
                log::debug!("Processed {} reads", summary.reads);
            }
        }

        log::info!(
            "Rarefied {} reads ({} classified, {} unclassified) across {} samples",
            summary.reads,
            summary.classified,
            summary.unclassified,
            self.samples.len()
        );
        Ok(summary)
    }
}
