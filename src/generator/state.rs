//! Fast-key-erasure generator state.
//!
//! # Extraction Model
//!
//! Each extraction hashes the current 32-byte state together with a
//! 64-bit counter into a 64-byte digest:
//!
//! ```text
//! digest    = H(state || counter_le)
//! output    = digest[0..num]
//! state'    = digest[32..64]
//! counter' = counter + 1
//! ```
//!
//! The returned bytes and the retained state are disjoint halves of the
//! digest, so one output does not reveal the next state short of
//! inverting the hash.
//!
//! # Limitation
//!
//! The state is seeded from OS entropy exactly once. There is no reseed
//! afterwards: all later unpredictability rests on the hash being one-way
//! over an ever-growing counter. Anyone who captures the 32-byte state can
//! predict every future output of that instance.

use crate::error::RngError;
use crate::mixing::{HashAlgorithm, HashMixer, DIGEST_LEN};
use crate::secret::{secret_bytes, SecretWord};
use crate::sources::{EntropySource, EntropySourceSelector, WORD_BYTES};
use std::sync::{Mutex, MutexGuard};
use zeroize::{Zeroize, Zeroizing};

/// Size of the secret state in bytes.
pub const STATE_LEN: usize = 32;

/// Maximum number of bytes a single extraction can return.
pub const MAX_EXTRACT: usize = STATE_LEN;

const _: () = assert!(STATE_LEN % WORD_BYTES == 0);
const _: () = assert!(DIGEST_LEN == 2 * STATE_LEN);

/// Everything guarded by the generator lock.
struct Inner {
    state: [u8; STATE_LEN],
    counter: u64,
    seeded: bool,
    mixer: Box<dyn HashMixer>,
}

impl Inner {
    fn unseeded(mixer: Box<dyn HashMixer>) -> Self {
        Self {
            state: [0u8; STATE_LEN],
            counter: 0,
            seeded: false,
            mixer,
        }
    }

    fn mix_extract_into(&mut self, out: &mut [u8]) -> Result<(), RngError> {
        if !self.seeded {
            return Err(RngError::NotSeeded);
        }

        self.mixer.write(&self.state);
        self.mixer.write(&self.counter.to_le_bytes());
        self.counter += 1;

        let mut digest = secret_bytes::<DIGEST_LEN>();
        self.mixer.finalize_into(&mut digest);
        self.state.copy_from_slice(&digest[STATE_LEN..]);
        out.copy_from_slice(&digest[..out.len()]);

        self.mixer.reset();
        Ok(())
    }

    /// Overwrites every secret field and wipes the mixer.
    fn erase(&mut self) {
        self.state.zeroize();
        self.counter.zeroize();
        self.seeded.zeroize();
        self.mixer.reset();
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        self.erase();
    }
}

/// A cryptographically secure generator guarded by a single lock.
///
/// Created only through fallible factories: an `RngState` that exists has
/// been fully seeded. Dropping it zeroizes the state, the counter and the
/// seeded flag.
///
/// All methods take `&self`; share an instance across threads with an
/// [`Arc`](std::sync::Arc) (see [`SharedRng`](super::SharedRng)).
pub struct RngState {
    inner: Mutex<Inner>,
}

impl RngState {
    /// Creates a generator seeded from the default OS source chain, mixing
    /// with SHA-512.
    ///
    /// Fails with [`RngError::NoEntropySource`] if no source qualifies and
    /// [`RngError::OutOfEntropy`] if the chosen source runs dry mid-seed.
    pub fn create() -> Result<Self, RngError> {
        Self::from_selector(
            EntropySourceSelector::with_default_chain(),
            HashAlgorithm::default().mixer(),
        )
    }

    /// Creates a generator from an explicit source chain.
    pub fn from_sources(
        sources: Vec<Box<dyn EntropySource>>,
        algorithm: HashAlgorithm,
    ) -> Result<Self, RngError> {
        Self::from_selector(EntropySourceSelector::new(sources), algorithm.mixer())
    }

    /// Creates a generator, seeding it from the first qualifying source.
    ///
    /// On failure the partially seeded instance is dropped, and therefore
    /// zeroized, before the error is returned.
    pub fn from_selector(
        selector: EntropySourceSelector,
        mixer: Box<dyn HashMixer>,
    ) -> Result<Self, RngError> {
        let mut source = selector.select()?;
        let rng = Self {
            inner: Mutex::new(Inner::unseeded(mixer)),
        };

        {
            let mut inner = rng.lock()?;
            for slot in inner.state.chunks_exact_mut(WORD_BYTES) {
                let word: SecretWord = Zeroizing::new(source.read_word()?);
                let bytes = Zeroizing::new(word.to_ne_bytes());
                slot.copy_from_slice(&bytes[..]);
            }
            inner.seeded = true;
        }

        tracing::info!(
            source = source.name(),
            words = STATE_LEN / WORD_BYTES,
            "Generator seeded"
        );
        Ok(rng)
    }

    /// Creates a generator from known state (for testing only).
    #[cfg(test)]
    pub(crate) fn from_parts_for_testing(
        state: [u8; STATE_LEN],
        counter: u64,
        mixer: Box<dyn HashMixer>,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state,
                counter,
                seeded: true,
                mixer,
            }),
        }
    }

    /// Returns a copy of the state and counter (for testing only).
    #[cfg(test)]
    pub(crate) fn snapshot(&self) -> ([u8; STATE_LEN], u64) {
        let inner = self.lock().unwrap();
        (inner.state, inner.counter)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, RngError> {
        self.inner.lock().map_err(|_| RngError::Poisoned)
    }

    /// Extracts `num` bytes, `num <= 32`.
    ///
    /// Requests above [`MAX_EXTRACT`] fail with
    /// [`RngError::RequestTooLarge`]; they are never truncated.
    pub fn mix_extract(&self, num: usize) -> Result<Zeroizing<Vec<u8>>, RngError> {
        if num > MAX_EXTRACT {
            return Err(RngError::RequestTooLarge {
                requested: num,
                max: MAX_EXTRACT,
            });
        }
        let mut out = Zeroizing::new(vec![0u8; num]);
        self.mix_extract_into(&mut out)?;
        Ok(out)
    }

    /// Fills `out` from one extraction; `out.len()` must not exceed 32.
    pub fn mix_extract_into(&self, out: &mut [u8]) -> Result<(), RngError> {
        if out.len() > MAX_EXTRACT {
            return Err(RngError::RequestTooLarge {
                requested: out.len(),
                max: MAX_EXTRACT,
            });
        }

        self.lock()?.mix_extract_into(out)?;
        tracing::trace!(num = out.len(), "Extracted from generator");
        Ok(())
    }

    /// Fills a buffer of any length, one extraction per 32-byte chunk.
    ///
    /// Each chunk is its own critical section, so concurrent callers may
    /// interleave between chunks.
    pub fn fill_bytes(&self, dest: &mut [u8]) -> Result<(), RngError> {
        for chunk in dest.chunks_mut(MAX_EXTRACT) {
            self.mix_extract_into(chunk)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for RngState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RngState").finish_non_exhaustive()
    }
}
