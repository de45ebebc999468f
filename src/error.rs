//! Error types for seeding and extraction.

use thiserror::Error;

/// Errors raised by a single entropy source while reading.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The underlying device could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The source is not usable on this platform or gave up.
    #[error("source unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by the generator.
///
/// None of these are retried internally. A construction failure means no
/// instance exists; the caller must not fall back to a weaker source.
#[derive(Debug, Error)]
pub enum RngError {
    /// No source in the chain ever met the minimum quality bar.
    #[error("no suitable entropy source could be found")]
    NoEntropySource,

    /// The selected source dropped below the threshold mid-seed.
    #[error("entropy source `{source_name}` reports insufficient entropy")]
    OutOfEntropy {
        /// Name of the source that ran dry.
        source_name: String,
    },

    /// Extraction was requested before seeding completed.
    #[error("the generator has not been properly seeded")]
    NotSeeded,

    /// More bytes were requested than one extraction can yield.
    #[error("requested {requested} bytes but at most {max} can be extracted per call")]
    RequestTooLarge {
        /// Bytes requested by the caller.
        requested: usize,
        /// Per-call maximum.
        max: usize,
    },

    /// The selected source failed to produce a word.
    #[error("failed to read from entropy source `{source_name}`: {error}")]
    SourceRead {
        /// Name of the failing source.
        source_name: String,
        /// Underlying failure.
        #[source]
        error: SourceError,
    },

    /// A thread panicked while holding the generator lock.
    #[error("generator lock poisoned")]
    Poisoned,
}
