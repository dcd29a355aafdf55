//src/error.rs

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Which of the two kraken inputs an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// Raw `kraken` output (one line per read, `C`/`U` flag first).
    Untranslated,
    /// `kraken-translate` output (one line per classified read).
    Translated,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stream::Untranslated => f.write_str("untranslated"),
            Stream::Translated => f.write_str("translated"),
        }
    }
}

/// Everything that can abort a rarefaction run.
#[derive(Debug, Error)]
pub enum RarefactionError {
    #[error("could not open {stream} input file: {}", .path.display())]
    InputNotFound { stream: Stream, path: PathBuf },

    #[error("the rate is not in range (0, 1]: {0}")]
    InvalidRate(f64),

    #[error("the rate {rate} yields more than {limit} sampling points")]
    TooManySamples { rate: f64, limit: usize },

    #[error("translated stream out of sync at untranslated line {line}: {detail}")]
    StreamDesync { line: u64, detail: String },

    #[error("I/O error on {stream} input '{}': {source}", .path.display())]
    Io {
        stream: Stream,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write rarefaction output '{}': {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, RarefactionError>;
