//! Entropy Reservoir Library
//!
//! A process-wide cryptographically secure pseudorandom number generator.
//! It seeds once from the first qualifying OS entropy source, then serves
//! extractions with a fast-key-erasure construction over a 64-byte hash.
//!
//! # Architecture
//!
//! ```text
//! sources (rdseed → /dev/random → /dev/urandom → platform)
//!     ↓ select first sufficient, re-check before each word
//! generator::RngState ── mixing (SHA-512 / BLAKE3)
//!     ↓                    secret (zeroize on every exit path)
//! SharedRng / global()
//! ```
//!
//! # Design Principles
//!
//! - **Fail-closed**: construction either fully seeds or returns an error;
//!   there is no silent fallback beyond the configured chain
//! - **Disjoint halves**: returned bytes and retained state come from
//!   non-overlapping halves of each digest
//! - **Scoped erasure**: every secret temporary is zeroized on drop
//! - **No reseeding**: the seed is drawn once; see
//!   [`generator::RngState`] for what that implies
//!
//! # Example
//!
//! ```no_run
//! use entropy_reservoir::RngState;
//!
//! let rng = RngState::create().expect("no usable entropy source");
//! let key = rng.mix_extract(32).unwrap();
//! assert_eq!(key.len(), 32);
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod generator;
pub mod mixing;
pub mod secret;
pub mod sources;

// Re-export commonly used types at crate root
pub use config::{ConfigError, FileConfig, GeneratorConfig};
pub use error::{RngError, SourceError};
pub use generator::{global, random_u32, RngState, SharedRng};
pub use mixing::{HashAlgorithm, HashMixer};
pub use sources::{EntropySource, EntropySourceSelector, SourceKind};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
