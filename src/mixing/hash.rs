//! Hash mixers used by the extraction step.
//!
//! The generator only needs an incremental hash with a 64-byte output that
//! can be written, finalized and reset repeatedly. SHA-512 is the reference
//! mixer; BLAKE3 in XOF mode is offered as a faster alternative.

use blake3::Hasher as Blake3Hasher;
use serde::{Deserialize, Serialize};
use sha2::digest::generic_array::GenericArray;
use sha2::{Digest, Sha512};
use zeroize::Zeroize;

/// Hash block size of SHA-512; the partial-block buffer holds at most one
/// byte less than this.
const SHA512_BLOCK_LEN: usize = 128;

/// Size of every mixer digest in bytes.
pub const DIGEST_LEN: usize = 64;

/// Incremental one-way hash with a fixed 64-byte digest.
pub trait HashMixer: Send {
    /// Absorbs `data` into the running hash.
    fn write(&mut self, data: &[u8]);

    /// Writes the digest of everything absorbed so far into `out`.
    ///
    /// The mixer must be [`reset`](HashMixer::reset) before reuse.
    fn finalize_into(&mut self, out: &mut [u8; DIGEST_LEN]);

    /// Returns the mixer to its initial empty state.
    ///
    /// Buffered input must be overwritten, not just forgotten: the mixer
    /// outlives each extraction and would otherwise keep the last
    /// `state || counter` block in memory.
    fn reset(&mut self);
}

/// Supported hash algorithms for mixing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-512 - the reference mixer.
    #[default]
    Sha512,
    /// BLAKE3 with 64 bytes of extended output.
    Blake3,
}

impl HashAlgorithm {
    /// Creates a fresh mixer for this algorithm.
    pub fn mixer(self) -> Box<dyn HashMixer> {
        match self {
            HashAlgorithm::Sha512 => Box::new(Sha512Mixer::new()),
            HashAlgorithm::Blake3 => Box::new(Blake3Mixer::new()),
        }
    }
}

/// SHA-512 mixer.
#[derive(Clone, Default)]
pub struct Sha512Mixer {
    inner: Sha512,
}

impl Sha512Mixer {
    /// Creates an empty SHA-512 mixer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl HashMixer for Sha512Mixer {
    fn write(&mut self, data: &[u8]) {
        Digest::update(&mut self.inner, data);
    }

    fn finalize_into(&mut self, out: &mut [u8; DIGEST_LEN]) {
        // Finalize straight into the caller's buffer so no copy of the
        // digest is left behind on the stack.
        Digest::finalize_into_reset(&mut self.inner, GenericArray::from_mut_slice(&mut out[..]));
    }

    fn reset(&mut self) {
        // Less than one block stays in the eager buffer without being
        // compressed, so this overwrites any buffered input in place.
        Digest::update(&mut self.inner, [0u8; SHA512_BLOCK_LEN - 1]);
        Digest::reset(&mut self.inner);
    }
}

/// BLAKE3 mixer producing 64 bytes of XOF output.
#[derive(Clone, Default)]
pub struct Blake3Mixer {
    inner: Blake3Hasher,
}

impl Blake3Mixer {
    /// Creates an empty BLAKE3 mixer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl HashMixer for Blake3Mixer {
    fn write(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    fn finalize_into(&mut self, out: &mut [u8; DIGEST_LEN]) {
        self.inner.finalize_xof().fill(out);
    }

    fn reset(&mut self) {
        // Zeroizing also clears the key words, so start over from a fresh hasher.
        self.inner.zeroize();
        self.inner = Blake3Hasher::new();
    }
}
