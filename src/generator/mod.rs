//! The CSPRNG proper.
//!
//! [`RngState`] owns the secret state and serves extractions under a single
//! lock. [`SharedRng`] is a cloneable handle implementing the `rand_core`
//! traits, and [`global`] hands out the process-wide instance.

mod global;
mod shared;
mod state;

pub use global::{global, random_u32};
pub use shared::SharedRng;
pub use state::{RngState, MAX_EXTRACT, STATE_LEN};
