//! Shareable handle implementing the `rand_core` traits.

use super::RngState;
use crate::error::RngError;
use crate::secret::secret_bytes;
use rand_core::{CryptoRng, RngCore};
use std::sync::Arc;

/// Cloneable handle to one [`RngState`].
///
/// Every clone draws from the same state, so outputs across clones never
/// repeat the counter. The generator is erased once the last handle is
/// dropped.
#[derive(Debug, Clone)]
pub struct SharedRng {
    inner: Arc<RngState>,
}

impl SharedRng {
    /// Wraps an existing generator.
    pub fn new(rng: RngState) -> Self {
        Self {
            inner: Arc::new(rng),
        }
    }

    /// Creates a handle seeded from the default OS chain.
    pub fn from_os_entropy() -> Result<Self, RngError> {
        RngState::create().map(Self::new)
    }

    /// Returns the underlying generator.
    pub fn state(&self) -> &RngState {
        &self.inner
    }

    /// Returns one secure `u32`.
    pub fn try_next_u32(&self) -> Result<u32, RngError> {
        let mut buf = secret_bytes::<4>();
        self.inner.mix_extract_into(&mut buf[..])?;
        Ok(u32::from_le_bytes(*buf))
    }

    /// Returns one secure `u64`.
    pub fn try_next_u64(&self) -> Result<u64, RngError> {
        let mut buf = secret_bytes::<8>();
        self.inner.mix_extract_into(&mut buf[..])?;
        Ok(u64::from_le_bytes(*buf))
    }
}

impl From<Arc<RngState>> for SharedRng {
    fn from(inner: Arc<RngState>) -> Self {
        Self { inner }
    }
}

// The infallible methods panic on failure, as `rand_core::OsRng` does.
impl RngCore for SharedRng {
    fn next_u32(&mut self) -> u32 {
        match self.try_next_u32() {
            Ok(value) => value,
            Err(err) => panic!("shared generator failed: {err}"),
        }
    }

    fn next_u64(&mut self) -> u64 {
        match self.try_next_u64() {
            Ok(value) => value,
            Err(err) => panic!("shared generator failed: {err}"),
        }
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        if let Err(err) = self.inner.fill_bytes(dest) {
            panic!("shared generator failed: {err}");
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.inner.fill_bytes(dest).map_err(rand_core::Error::new)
    }
}

impl CryptoRng for SharedRng {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mixing::Sha512Mixer;

    fn shared_at(seed: u8) -> SharedRng {
        SharedRng::new(RngState::from_parts_for_testing(
            [seed; 32],
            0,
            Box::new(Sha512Mixer::new()),
        ))
    }

    #[test]
    fn test_clones_share_state() {
        let mut a = shared_at(4);
        let mut b = a.clone();

        let mut out_a = [0u8; 32];
        let mut out_b = [0u8; 32];
        a.fill_bytes(&mut out_a);
        b.fill_bytes(&mut out_b);

        assert_ne!(out_a, out_b);
        assert_eq!(a.state().snapshot().1, 2);
    }

    #[test]
    fn test_next_u32_uses_one_extraction() {
        let rng = shared_at(9);
        let reference = RngState::from_parts_for_testing([9; 32], 0, Box::new(Sha512Mixer::new()));

        let value = rng.try_next_u32().unwrap();
        let bytes = reference.mix_extract(4).unwrap();
        assert_eq!(value.to_le_bytes(), bytes.as_slice());
        assert_eq!(rng.state().snapshot(), reference.snapshot());
    }

    #[test]
    fn test_try_fill_bytes_long_buffer() {
        let mut rng = shared_at(1);
        let mut buf = vec![0u8; 1000];
        rng.try_fill_bytes(&mut buf).unwrap();
        assert!(buf.iter().any(|&b| b != 0));
        // 1000 bytes in 32-byte chunks.
        assert_eq!(rng.state().snapshot().1, 32);
    }

    #[test]
    fn test_from_os_entropy() {
        let mut rng = SharedRng::from_os_entropy().unwrap();
        assert_ne!(rng.next_u64(), rng.next_u64());
    }
}
