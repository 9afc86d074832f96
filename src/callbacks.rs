//! Host callback hooks (C7), `spec.md` §4.7 and §7.
//!
//! Rust's `fn pointer + user_data` C idiom collapses naturally into a
//! boxed closure; hooks are stored as `Arc<dyn Fn(..) + Send + Sync>`. All
//! three hooks (`verify`, `decision`, `notify`) are invoked directly on
//! `state.hooks` while the caller still holds the `state` write-lock guard
//! (see `engine.rs`) — not just `decision`, which is the one hook §4.7
//! explicitly requires to run under the writer lock. A host callback must
//! therefore never call back into a mutating `Engine` method, or it will
//! deadlock against its own write lock.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use tracing::warn;

use crate::types::{Block, Id};

pub type DecisionFn = dyn Fn(&Id) + Send + Sync;
pub type VerifyFn = dyn Fn(&Block) -> bool + Send + Sync;
pub type NotifyFn = dyn Fn(&str) + Send + Sync;

/// The three optional hooks a host may register, plus the helpers that
/// isolate a panicking callback from corrupting engine invariants
/// (`spec.md` §7: "isolate host callbacks so a host failure cannot corrupt
/// engine invariants").
#[derive(Clone, Default)]
pub struct Hooks {
  pub decision: Option<Arc<DecisionFn>>,
  pub verify: Option<Arc<VerifyFn>>,
  pub notify: Option<Arc<NotifyFn>>,
}

impl Hooks {
  /// Invoke the verify hook, if any. A panicking verify hook is treated as
  /// rejection (`false`) rather than propagated, and reported via notify.
  pub fn call_verify(&self, block: &Block) -> bool {
    let Some(f) = &self.verify else { return true };
    match catch_unwind(AssertUnwindSafe(|| f(block))) {
      Ok(result) => result,
      Err(_) => {
        warn!("verify callback panicked; treating block as rejected");
        self.call_notify("callback_failed");
        false
      }
    }
  }

  /// Invoke the decision hook, if any, swallowing panics.
  pub fn call_decision(&self, block_id: &Id) {
    let Some(f) = &self.decision else { return };
    if catch_unwind(AssertUnwindSafe(|| f(block_id))).is_err() {
      warn!("decision callback panicked");
      self.call_notify("callback_failed");
    }
  }

  /// Invoke the notify hook, if any, swallowing panics (a panic here must
  /// not recurse into itself).
  pub fn call_notify(&self, event: &str) {
    let Some(f) = &self.notify else { return };
    let _ = catch_unwind(AssertUnwindSafe(|| f(event)));
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

  #[test]
  fn missing_verify_hook_defaults_to_accept() {
    let hooks = Hooks::default();
    let block = Block::new([1; 32], [0; 32], 0, 0, vec![]);
    assert!(hooks.call_verify(&block));
  }

  #[test]
  fn panicking_verify_hook_is_treated_as_rejection() {
    let notified = Arc::new(AtomicBool::new(false));
    let notified2 = notified.clone();
    let hooks = Hooks {
      verify: Some(Arc::new(|_: &Block| -> bool { panic!("boom") })),
      notify: Some(Arc::new(move |event: &str| {
        if event == "callback_failed" {
          notified2.store(true, Ordering::SeqCst);
        }
      })),
      decision: None,
    };
    let block = Block::new([1; 32], [0; 32], 0, 0, vec![]);
    assert!(!hooks.call_verify(&block));
    assert!(notified.load(Ordering::SeqCst));
  }

  #[test]
  fn decision_hook_is_invoked_once() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls2 = calls.clone();
    let hooks = Hooks {
      decision: Some(Arc::new(move |_id: &Id| {
        calls2.fetch_add(1, Ordering::SeqCst);
      })),
      verify: None,
      notify: None,
    };
    hooks.call_decision(&[0u8; 32]);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
  }
}
