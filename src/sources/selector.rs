//! Ordered source selection.
//!
//! Selection is two-phase: a source is qualified once, then re-checked
//! before every read, because a finite or rate-limited device can run dry
//! between calls.

use super::{EntropySource, Word};
use crate::error::RngError;

/// Walks an ordered chain of sources, strongest first.
pub struct EntropySourceSelector {
    sources: Vec<Box<dyn EntropySource>>,
}

impl EntropySourceSelector {
    /// Creates a selector over `sources`, ranked strongest to weakest.
    pub fn new(sources: Vec<Box<dyn EntropySource>>) -> Self {
        Self { sources }
    }

    /// Creates a selector over the built-in OS chain.
    pub fn with_default_chain() -> Self {
        Self::new(super::default_chain())
    }

    /// Number of candidate sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if there are no candidates.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Picks the first source reporting at least one word of entropy.
    ///
    /// Unselected sources are dropped without being read.
    pub fn select(self) -> Result<SelectedSource, RngError> {
        for source in self.sources {
            if source.is_sufficient() {
                tracing::debug!(source = source.name(), "Selected entropy source");
                return Ok(SelectedSource { source });
            }
            tracing::debug!(
                source = source.name(),
                "Entropy source below threshold, trying next"
            );
        }

        tracing::warn!("No entropy source met the minimum quality bar");
        Err(RngError::NoEntropySource)
    }
}

impl std::fmt::Debug for EntropySourceSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.sources.iter().map(|s| s.name()).collect();
        f.debug_struct("EntropySourceSelector")
            .field("sources", &names)
            .finish()
    }
}

/// The source chosen for one seeding pass.
pub struct SelectedSource {
    source: Box<dyn EntropySource>,
}

impl SelectedSource {
    /// Name of the chosen source.
    pub fn name(&self) -> &str {
        self.source.name()
    }

    /// Re-checks sufficiency, then reads one word.
    pub fn read_word(&mut self) -> Result<Word, RngError> {
        if !self.source.is_sufficient() {
            tracing::warn!(source = self.source.name(), "Entropy source ran dry");
            return Err(RngError::OutOfEntropy {
                source_name: self.source.name().to_string(),
            });
        }

        self.source.read_word().map_err(|error| {
            tracing::warn!(source = self.source.name(), error = %error, "Entropy source read failed");
            RngError::SourceRead {
                source_name: self.source.name().to_string(),
                error,
            }
        })
    }
}

impl std::fmt::Debug for SelectedSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectedSource")
            .field("source", &self.source.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{MockSource, WORD_BITS};

    fn boxed(source: MockSource) -> Box<dyn EntropySource> {
        Box::new(source)
    }

    #[test]
    fn test_selects_first_sufficient() {
        let weak = MockSource::constant("weak", WORD_BITS - 1);
        let strong = MockSource::constant("strong", WORD_BITS);
        let later = MockSource::constant("later", 4096);
        let later_probe = later.probe();

        let selector = EntropySourceSelector::new(vec![boxed(weak), boxed(strong), boxed(later)]);
        let selected = selector.select().unwrap();

        assert_eq!(selected.name(), "strong");
        assert_eq!(later_probe.checks(), 0);
    }

    #[test]
    fn test_no_sufficient_source() {
        let selector = EntropySourceSelector::new(vec![
            boxed(MockSource::constant("a", 0)),
            boxed(MockSource::constant("b", 8)),
        ]);
        assert!(matches!(selector.select(), Err(RngError::NoEntropySource)));
    }

    #[test]
    fn test_empty_chain() {
        let selector = EntropySourceSelector::new(Vec::new());
        assert!(selector.is_empty());
        assert!(matches!(selector.select(), Err(RngError::NoEntropySource)));
    }

    #[test]
    fn test_recheck_before_every_read() {
        let source = MockSource::scripted("fading", vec![64, 64, 0]);
        let probe = source.probe();
        let mut selected = EntropySourceSelector::new(vec![boxed(source)])
            .select()
            .unwrap();

        assert!(selected.read_word().is_ok());
        assert!(matches!(
            selected.read_word(),
            Err(RngError::OutOfEntropy { ref source_name }) if source_name == "fading"
        ));
        assert_eq!(probe.reads(), 1);
        assert_eq!(probe.checks(), 3);
    }

    #[test]
    fn test_read_failure_names_source() {
        let source = MockSource::constant("broken", 64).failing_reads();
        let mut selected = EntropySourceSelector::new(vec![boxed(source)])
            .select()
            .unwrap();
        assert!(matches!(
            selected.read_word(),
            Err(RngError::SourceRead { ref source_name, .. }) if source_name == "broken"
        ));
    }

    #[test]
    fn test_default_chain_selects_something() {
        // The platform default is always last, so a stock machine qualifies.
        let selector = EntropySourceSelector::with_default_chain();
        assert_eq!(selector.len(), 4);
        assert!(selector.select().is_ok());
    }
}
