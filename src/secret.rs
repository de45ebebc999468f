//! Scoped erasure of secret buffers.
//!
//! Every temporary that holds seed words or digest output is wrapped in
//! [`Zeroizing`], so the overwrite runs when the value leaves scope: on
//! normal return, on `?` early return and during unwinding alike. The
//! `zeroize` crate uses volatile writes plus a compiler fence, so the
//! overwrite is not optimized away.

use crate::sources::Word;
use zeroize::{Zeroize, Zeroizing};

/// Fixed-size byte buffer that is zeroed when dropped.
pub type SecretBytes<const N: usize> = Zeroizing<[u8; N]>;

/// A single entropy word that is zeroed when dropped.
pub type SecretWord = Zeroizing<Word>;

/// Returns a zero-initialized scoped secret buffer.
#[inline]
pub fn secret_bytes<const N: usize>() -> SecretBytes<N> {
    Zeroizing::new([0u8; N])
}

/// Overwrites `buf` with zeroes.
///
/// For caller-owned buffers that cannot be wrapped, e.g. output slices
/// handed in from outside.
#[inline]
pub fn secure_erase(buf: &mut [u8]) {
    buf.zeroize();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_erase_zeroes_slice() {
        let mut buf = [0xA5u8; 48];
        secure_erase(&mut buf[8..]);
        assert!(buf[..8].iter().all(|&b| b == 0xA5));
        assert!(buf[8..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_secret_bytes_start_zeroed() {
        let buf = secret_bytes::<64>();
        assert_eq!(buf.len(), 64);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_secret_word_derefs_to_value() {
        let word: SecretWord = Zeroizing::new(0xDEAD_BEEF);
        assert_eq!(*word, 0xDEAD_BEEF);
    }
}
