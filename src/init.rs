//! Process-wide lifecycle anchors.
//!
//! `spec.md` §5 and §9: there is no global state today beyond an
//! init/cleanup pair that performs no work. It is kept as an explicit
//! anchor rather than dropped, so that a process-wide allocator or
//! tracing subsystem has a stable place to hook into later, without
//! changing the public surface. Multiple engines in one process remain
//! fully independent of each other and of this pair.

use std::sync::atomic::{AtomicU64, Ordering};

use once_cell::sync::Lazy;

static INIT_COUNT: Lazy<AtomicU64> = Lazy::new(|| AtomicU64::new(0));

/// Initializes process-wide state. Currently a no-op; safe to call more
/// than once, and safe to call concurrently from multiple threads.
pub fn init() {
  INIT_COUNT.fetch_add(1, Ordering::SeqCst);
}

/// Tears down process-wide state. Currently a no-op.
pub fn cleanup() {
  INIT_COUNT.fetch_sub(1, Ordering::SeqCst);
}

#[cfg(test)]
pub(crate) fn init_count() -> u64 {
  INIT_COUNT.load(Ordering::SeqCst)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn init_and_cleanup_are_idempotent_and_symmetrical() {
    let before = init_count();
    init();
    init();
    cleanup();
    cleanup();
    assert_eq!(init_count(), before);
  }
}
