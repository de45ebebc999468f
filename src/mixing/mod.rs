//! One-way mixing for the extraction step.
//!
//! The generator treats the hash as an injectable capability so the
//! extraction protocol is independent of any single implementation.

mod hash;

pub use hash::{Blake3Mixer, HashAlgorithm, HashMixer, Sha512Mixer, DIGEST_LEN};
