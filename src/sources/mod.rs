//! Entropy sources and source selection.
//!
//! A source is any device that can report how much entropy it currently
//! holds and hand out one machine word at a time. Sources are untrusted
//! and optional: the selector walks an ordered chain and settles on the
//! first one that qualifies.

mod mock;
mod os;
mod selector;

pub use mock::{MockProbe, MockSource};
pub use os::{default_chain, KernelDevice, PlatformDefault, RdSeed, SourceKind};
pub use selector::{EntropySourceSelector, SelectedSource};

use crate::error::SourceError;

/// Unit of entropy read from a source.
pub type Word = u32;

/// Size of a [`Word`] in bytes.
pub const WORD_BYTES: usize = std::mem::size_of::<Word>();

/// Size of a [`Word`] in bits; the minimum estimate a source must report.
pub const WORD_BITS: usize = WORD_BYTES * 8;

/// Trait for entropy source implementations.
///
/// Implementations should be cheap to query repeatedly: the selector
/// checks [`is_sufficient`](EntropySource::is_sufficient) once to qualify a
/// source and again before every read.
pub trait EntropySource: Send {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &str;

    /// Current entropy estimate in bits.
    fn entropy_estimate(&self) -> usize;

    /// Returns true if at least one word's worth of entropy is available.
    fn is_sufficient(&self) -> bool {
        self.entropy_estimate() >= WORD_BITS
    }

    /// Reads one word of entropy.
    fn read_word(&mut self) -> Result<Word, SourceError>;
}
