//! Scripted entropy source for tests and benchmarks.
//!
//! NOT for production: the word stream is fully predictable.

use super::{EntropySource, Word};
use crate::error::SourceError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Counters shared between a [`MockSource`] and the test observing it.
#[derive(Debug, Clone, Default)]
pub struct MockProbe {
    reads: Arc<AtomicUsize>,
    checks: Arc<AtomicUsize>,
}

impl MockProbe {
    /// Number of successful `read_word` calls.
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of entropy estimate queries.
    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}

/// Mock source with a scripted sequence of entropy estimates.
///
/// The n-th estimate query returns `estimates[n]`; once the script runs out
/// the last value repeats. Words count up from the configured start value.
#[derive(Debug)]
pub struct MockSource {
    name: String,
    estimates: Vec<usize>,
    next_word: Word,
    fail_reads: bool,
    probe: MockProbe,
}

impl MockSource {
    /// Source that always reports `bits` of entropy.
    pub fn constant(name: impl Into<String>, bits: usize) -> Self {
        Self::scripted(name, vec![bits])
    }

    /// Source that reports the given estimates in order.
    pub fn scripted(name: impl Into<String>, estimates: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            estimates,
            next_word: 0,
            fail_reads: false,
            probe: MockProbe::default(),
        }
    }

    /// Sets the first word handed out.
    pub fn starting_at(mut self, word: Word) -> Self {
        self.next_word = word;
        self
    }

    /// Makes every read fail while still reporting the scripted estimates.
    pub fn failing_reads(mut self) -> Self {
        self.fail_reads = true;
        self
    }

    /// Returns a handle to this source's call counters.
    pub fn probe(&self) -> MockProbe {
        self.probe.clone()
    }
}

impl EntropySource for MockSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn entropy_estimate(&self) -> usize {
        let n = self.probe.checks.fetch_add(1, Ordering::SeqCst);
        match self.estimates.get(n) {
            Some(&bits) => bits,
            None => self.estimates.last().copied().unwrap_or(0),
        }
    }

    fn read_word(&mut self) -> Result<Word, SourceError> {
        if self.fail_reads {
            return Err(SourceError::Unavailable("scripted read failure".into()));
        }
        let word = self.next_word;
        self.next_word = self.next_word.wrapping_add(1);
        self.probe.reads.fetch_add(1, Ordering::SeqCst);
        Ok(word)
    }
}
