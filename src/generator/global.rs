//! The process-wide generator.
//!
//! Created lazily on first use from the default OS chain. A failed
//! construction is not cached: the error goes to the caller and the next
//! call tries again.
//!
//! The instance lives in a static and is never dropped, so its state is not
//! erased at process exit. Use [`RngState::create`] directly where erasure
//! on teardown matters.

use super::{RngState, SharedRng};
use crate::error::RngError;
use std::sync::{Arc, Mutex, OnceLock};

static GLOBAL: OnceLock<Arc<RngState>> = OnceLock::new();

/// Serializes first-time construction so at most one instance is built.
static INIT: Mutex<()> = Mutex::new(());

/// Returns a handle to the process-wide generator, creating it if needed.
pub fn global() -> Result<SharedRng, RngError> {
    if let Some(rng) = GLOBAL.get() {
        return Ok(SharedRng::from(Arc::clone(rng)));
    }

    let _guard = INIT.lock().map_err(|_| RngError::Poisoned)?;
    if let Some(rng) = GLOBAL.get() {
        return Ok(SharedRng::from(Arc::clone(rng)));
    }

    let rng = Arc::new(RngState::create()?);
    // Cannot already be set: INIT is held and GLOBAL was empty above.
    let rng = GLOBAL.get_or_init(|| rng);
    tracing::info!("Process-wide generator initialized");
    Ok(SharedRng::from(Arc::clone(rng)))
}

/// Returns one secure `u32` from the process-wide generator.
pub fn random_u32() -> Result<u32, RngError> {
    global()?.try_next_u32()
}
