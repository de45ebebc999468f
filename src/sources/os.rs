//! Operating system and hardware entropy sources.
//!
//! The default chain, strongest first:
//!
//! 1. `RDSEED` - the CPU's nondeterministic seed instruction (x86_64 only).
//!    RDSEED rather than RDRAND because the output seeds a generator.
//! 2. `/dev/random` - the blocking kernel device.
//! 3. `/dev/urandom` - the nonblocking kernel device.
//! 4. The platform default CSPRNG, reached through `getrandom`.
//!
//! Kernel device estimates come from the kernel's own entropy count. When
//! that count cannot be read the device reports zero and the chain falls
//! through to the platform default.

use super::{EntropySource, Word, WORD_BITS, WORD_BYTES};
use crate::error::SourceError;
use crate::secret::secret_bytes;
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Kernel entropy count, in bits.
const ENTROPY_AVAIL: &str = "/proc/sys/kernel/random/entropy_avail";

/// Identifies one of the built-in sources, e.g. in a config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// CPU `RDSEED` instruction.
    Rdseed,
    /// Blocking kernel device `/dev/random`.
    DevRandom,
    /// Nonblocking kernel device `/dev/urandom`.
    DevUrandom,
    /// Platform CSPRNG via `getrandom`.
    Platform,
}

impl SourceKind {
    /// All built-in sources, strongest first.
    pub const DEFAULT_ORDER: [SourceKind; 4] = [
        SourceKind::Rdseed,
        SourceKind::DevRandom,
        SourceKind::DevUrandom,
        SourceKind::Platform,
    ];

    /// Instantiates the source.
    pub fn build(self) -> Box<dyn EntropySource> {
        match self {
            SourceKind::Rdseed => Box::new(RdSeed::new()),
            SourceKind::DevRandom => Box::new(KernelDevice::random()),
            SourceKind::DevUrandom => Box::new(KernelDevice::urandom()),
            SourceKind::Platform => Box::new(PlatformDefault),
        }
    }
}

/// Builds the default source chain.
pub fn default_chain() -> Vec<Box<dyn EntropySource>> {
    SourceKind::DEFAULT_ORDER
        .iter()
        .map(|kind| kind.build())
        .collect()
}

/// The x86_64 `RDSEED` instruction.
#[derive(Debug)]
pub struct RdSeed {
    available: bool,
}

impl RdSeed {
    /// Probes the CPU for `RDSEED` support.
    pub fn new() -> Self {
        Self {
            available: hw::available(),
        }
    }
}

impl Default for RdSeed {
    fn default() -> Self {
        Self::new()
    }
}

impl EntropySource for RdSeed {
    fn name(&self) -> &str {
        "rdseed"
    }

    fn entropy_estimate(&self) -> usize {
        if self.available {
            WORD_BITS
        } else {
            0
        }
    }

    fn read_word(&mut self) -> Result<Word, SourceError> {
        if !self.available {
            return Err(SourceError::Unavailable("RDSEED not supported".into()));
        }
        hw::read().ok_or_else(|| SourceError::Unavailable("RDSEED retries exhausted".into()))
    }
}

#[cfg(target_arch = "x86_64")]
#[allow(unsafe_code)]
mod hw {
    /// Intel recommends a bounded retry loop; RDSEED may underflow under load.
    const RETRIES: usize = 10;

    pub fn available() -> bool {
        is_x86_feature_detected!("rdseed")
    }

    pub fn read() -> Option<u32> {
        if !available() {
            return None;
        }
        // SAFETY: CPU support for RDSEED was checked above.
        unsafe { rdseed32() }
    }

    #[target_feature(enable = "rdseed")]
    unsafe fn rdseed32() -> Option<u32> {
        let mut value = 0u32;
        for _ in 0..RETRIES {
            if std::arch::x86_64::_rdseed32_step(&mut value) == 1 {
                return Some(value);
            }
            std::hint::spin_loop();
        }
        None
    }
}

#[cfg(not(target_arch = "x86_64"))]
mod hw {
    pub fn available() -> bool {
        false
    }

    pub fn read() -> Option<u32> {
        None
    }
}

/// A kernel random device such as `/dev/random`.
#[derive(Debug)]
pub struct KernelDevice {
    name: String,
    path: PathBuf,
    file: Option<File>,
}

impl KernelDevice {
    /// Opens `path`. A device that cannot be opened reports zero entropy.
    pub fn open(name: impl Into<String>, path: impl AsRef<Path>) -> Self {
        let name = name.into();
        let path = path.as_ref().to_path_buf();
        let file = match File::open(&path) {
            Ok(file) => Some(file),
            Err(e) => {
                tracing::debug!(source = %name, path = %path.display(), error = %e, "Entropy device unavailable");
                None
            }
        };
        Self { name, path, file }
    }

    /// The blocking kernel device.
    pub fn random() -> Self {
        Self::open("dev-random", "/dev/random")
    }

    /// The nonblocking kernel device.
    pub fn urandom() -> Self {
        Self::open("dev-urandom", "/dev/urandom")
    }

    /// Path of the underlying device.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn kernel_entropy_count() -> Option<usize> {
    std::fs::read_to_string(ENTROPY_AVAIL)
        .ok()?
        .trim()
        .parse()
        .ok()
}

impl EntropySource for KernelDevice {
    fn name(&self) -> &str {
        &self.name
    }

    fn entropy_estimate(&self) -> usize {
        if self.file.is_none() {
            return 0;
        }
        kernel_entropy_count().unwrap_or(0)
    }

    fn read_word(&mut self) -> Result<Word, SourceError> {
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| SourceError::Unavailable(format!("{} is not open", self.path.display())))?;
        let mut buf = secret_bytes::<WORD_BYTES>();
        file.read_exact(&mut buf[..])?;
        Ok(Word::from_ne_bytes(*buf))
    }
}

/// The platform's default CSPRNG (`getrandom`).
///
/// On Windows this is the system `bcrypt` generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlatformDefault;

impl EntropySource for PlatformDefault {
    fn name(&self) -> &str {
        "platform"
    }

    fn entropy_estimate(&self) -> usize {
        let mut probe = secret_bytes::<WORD_BYTES>();
        match OsRng.try_fill_bytes(&mut probe[..]) {
            Ok(()) => WORD_BITS,
            Err(_) => 0,
        }
    }

    fn read_word(&mut self) -> Result<Word, SourceError> {
        let mut buf = secret_bytes::<WORD_BYTES>();
        OsRng
            .try_fill_bytes(&mut buf[..])
            .map_err(|e| SourceError::Unavailable(e.to_string()))?;
        Ok(Word::from_ne_bytes(*buf))
    }
}
