// src/lib.rs
pub mod types;
pub mod error;
pub mod config;
pub mod tally;
pub mod sampler;
pub mod reader;
pub mod engine;
pub mod report;
pub mod logging;

use std::fs::File;
use std::io::{BufRead, BufWriter};
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;

pub use crate::config::{RarefactionConfig, DEFAULT_RATE};
pub use crate::error::{RarefactionError, Result, Stream};
pub use crate::types::{RankLabel, ReadRecord};

use crate::engine::{RarefactionEngine, RunSummary};
use crate::reader::PairedRecordReader;
use crate::report::RarefactionTable;
use crate::sampler::{DrawSource, RandomDraws};
use crate::tally::RankTally;

/// Everything a finished rarefaction pass produced.
pub struct RarefactionResults {
    /// One sample per rate, increasing.
    pub samples: Vec<RankTally>,
    pub summary: RunSummary,
    /// The tabular view handed to the writer.
    pub table: RarefactionTable,
}

impl RarefactionResults {
    /// Generate the rarefaction CSV text on demand
    pub fn get_rarefaction_csv(&self) -> String {
        self.table.to_csv()
    }
}

fn configured_draws(config: &RarefactionConfig) -> RandomDraws<StdRng> {
    config
        .seed
        .map(RandomDraws::seeded)
        .unwrap_or_else(RandomDraws::from_entropy)
}

/// Rarefy a pair of kraken outputs, drawing from `config.seed` (or entropy).
pub fn generate_rarefaction<P: AsRef<Path>, Q: AsRef<Path>>(
    untranslated_path: P,
    translated_path: Q,
    config: &RarefactionConfig,
) -> Result<RarefactionResults> {
    generate_rarefaction_with(
        untranslated_path,
        translated_path,
        config,
        configured_draws(config),
    )
}

/// Rarefy a pair of kraken outputs with an explicit draw source.
pub fn generate_rarefaction_with<P: AsRef<Path>, Q: AsRef<Path>, D: DrawSource>(
    untranslated_path: P,
    translated_path: Q,
    config: &RarefactionConfig,
    draws: D,
) -> Result<RarefactionResults> {
    // 1. Open both inputs (fails fast if either is missing)
    let records = PairedRecordReader::open(&untranslated_path, &translated_path)?;

    // 2. Build the sample set
    let rates = config.sample_rates()?;

    // 3. Single pass + tabulate
    rarefy(records, rates, draws, untranslated_path.as_ref())
}

/// Rarefy a pair of kraken outputs and write the CSV to `output_path`.
///
/// Inputs and rate are checked first, then the output is created, and only
/// then is any read processed; an unwritable output fails the run before
/// the pass starts.
pub fn rarefy_to_file<P: AsRef<Path>, Q: AsRef<Path>, O: AsRef<Path>>(
    untranslated_path: P,
    translated_path: Q,
    output_path: O,
    config: &RarefactionConfig,
) -> Result<RarefactionResults> {
    rarefy_to_file_with(
        untranslated_path,
        translated_path,
        output_path,
        config,
        configured_draws(config),
    )
}

/// [`rarefy_to_file`] with an explicit draw source.
pub fn rarefy_to_file_with<P, Q, O, D>(
    untranslated_path: P,
    translated_path: Q,
    output_path: O,
    config: &RarefactionConfig,
    draws: D,
) -> Result<RarefactionResults>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    O: AsRef<Path>,
    D: DrawSource,
{
    // 1. Open both inputs
    let records = PairedRecordReader::open(&untranslated_path, &translated_path)?;

    // 2. Build the sample set
    let rates = config.sample_rates()?;

    // 3. Create the output before reading any read
    let output = RarefactionOutput::create(output_path)?;

    // 4. Single pass + tabulate
    let results = rarefy(records, rates, draws, untranslated_path.as_ref())?;

    // 5. Write
    output.write(&results)?;
    Ok(results)
}

fn rarefy<U: BufRead, T: BufRead, D: DrawSource>(
    mut records: PairedRecordReader<U, T>,
    rates: Vec<f64>,
    draws: D,
    untranslated_path: &Path,
) -> Result<RarefactionResults> {
    log::info!(
        "Sampling {} rates from {} to {}",
        rates.len(),
        rates[0],
        rates[rates.len() - 1]
    );

    let mut engine = RarefactionEngine::new(rates, draws);
    let summary = engine.run(records.by_ref())?;

    let leftover = records.leftover_translations()?;
    if leftover > 0 {
        log::warn!(
            "{} translated lines were never matched to a classified read in {}",
            leftover,
            untranslated_path.display()
        );
    }

    let samples = engine.into_samples();
    let table = RarefactionTable::from_samples(&samples);

    Ok(RarefactionResults {
        samples,
        summary,
        table,
    })
}

/// An output file opened ahead of the pass.
pub struct RarefactionOutput {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl RarefactionOutput {
    /// Create (or truncate) `path` for writing.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::create(&path).map_err(|source| RarefactionError::Output {
            path: path.clone(),
            source,
        })?;
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the rarefaction CSV and flush.
    pub fn write(self, results: &RarefactionResults) -> Result<()> {
        let Self { path, writer } = self;
        if let Err(source) = results.table.write_csv(writer) {
            return Err(RarefactionError::Output { path, source });
        }

        log::info!("Wrote rarefaction data to {}", path.display());
        Ok(())
    }
}

/// Write the rarefaction CSV to `output_path`, replacing any existing file.
pub fn write_rarefaction<P: AsRef<Path>>(results: &RarefactionResults, output_path: P) -> Result<()> {
    RarefactionOutput::create(output_path)?.write(results)
}
